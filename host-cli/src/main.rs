//! # Shared Element Demo
//!
//! 在终端里回放共享元素过渡。
//!
//! ## 用法
//!
//! ```bash
//! cargo run -p host-cli
//! cargo run -p host-cli -- --user 5 --every 8
//! cargo run -p host-cli -- --duration-ms 600 --easing linear --scroll 120
//! RUST_LOG=shared_element=debug cargo run -p host-cli
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use host_cli::{AppConfig, SampleApp, TextCanvas, USERS};
use shared_element::EasingFunction;

#[derive(Parser, Debug)]
#[command(name = "shared-element-demo")]
#[command(about = "共享元素过渡演示：用户列表 ⇄ 用户详情")]
#[command(version)]
struct Args {
    /// 配置文件路径
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,

    /// 要打开的用户下标
    #[arg(short, long, default_value_t = 2)]
    user: usize,

    /// 切换前列表的滚动距离
    #[arg(long, default_value_t = 0.0)]
    scroll: f32,

    /// 过渡时长（覆盖配置文件）
    #[arg(long)]
    duration_ms: Option<u32>,

    /// 缓动函数名，如 linear、fast_out_slow_in（覆盖配置文件）
    #[arg(long)]
    easing: Option<String>,

    /// 交叉淡化时长（覆盖配置文件）
    #[arg(long)]
    crossfade_ms: Option<u32>,

    /// 每隔多少帧打印一次画布
    #[arg(long, default_value_t = 4)]
    every: usize,

    /// 每个阶段最多运行的帧数
    #[arg(long, default_value_t = 600)]
    max_frames: usize,

    /// 日志级别（RUST_LOG 优先）
    #[arg(long, default_value = "info")]
    log_level: String,

    /// 把最终生效的配置写回配置文件
    #[arg(long)]
    save_config: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let config = load_config(&args)?;
    if args.save_config {
        config
            .save(&args.config)
            .with_context(|| format!("写入配置失败: {:?}", args.config))?;
        info!(path = ?args.config, "配置已保存");
    }

    let user = USERS
        .get(args.user)
        .with_context(|| format!("用户下标越界: {}（共 {} 个）", args.user, USERS.len()))?;
    info!(name = user.name, "演示开始");

    let mut app = SampleApp::new(config)?;
    if args.scroll != 0.0 {
        app.scroll_by(args.scroll)?;
        play(&mut app, "滚动", &args)?;
    }

    app.change_user(Some(args.user))?;
    play(&mut app, "列表 → 详情", &args)?;

    app.change_user(None)?;
    play(&mut app, "详情 → 列表", &args)?;

    info!("演示结束");
    Ok(())
}

/// 配置文件 + 命令行覆盖
fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = AppConfig::load(&args.config);
    if let Some(duration_ms) = args.duration_ms {
        config.transition.duration_ms = duration_ms;
    }
    if let Some(name) = &args.easing {
        config.transition.easing = parse_easing(name)?;
    }
    if let Some(crossfade_ms) = args.crossfade_ms {
        config.crossfade_ms = crossfade_ms;
    }
    config.validate()?;
    Ok(config)
}

fn parse_easing(name: &str) -> Result<EasingFunction> {
    serde_json::from_value(serde_json::Value::String(name.to_string()))
        .with_context(|| format!("未知的缓动函数: {}", name))
}

/// 运行到静止，按间隔打印画布
fn play(app: &mut SampleApp, phase: &str, args: &Args) -> Result<()> {
    println!("══ {} ══", phase);
    let every = args.every.max(1);
    let mut canvas = TextCanvas::new();

    for frame in 0..args.max_frames {
        let report = app.frame()?;
        for identity in &report.invalidated {
            println!("  [t={:.0}ms] 过渡结束，恢复 {}", report.elapsed_ms, identity);
        }

        let idle = app.is_idle();
        if frame % every == 0 || idle {
            canvas.clear();
            app.render(&mut canvas)?;
            println!("── frame {} t={:.0}ms ──", frame, report.elapsed_ms);
            for line in canvas.overlay_lines() {
                println!("  {}", line);
            }
        }
        if idle {
            info!(phase, frames = frame + 1, "阶段结束");
            return Ok(());
        }
    }

    anyhow::bail!("{} 在 {} 帧内没有结束", phase, args.max_frames)
}
