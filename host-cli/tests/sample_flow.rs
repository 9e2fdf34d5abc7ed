//! # 演示流程集成测试
//!
//! 驱动 列表 → 详情 → 列表 的完整切屏，检查覆盖层、元素可见性和追踪器回收。

use host_cli::{AppConfig, SampleApp, SampleKey, Screen, TextCanvas};
use shared_element::ElementIdentity;

fn app() -> SampleApp {
    SampleApp::new(AppConfig::default()).unwrap()
}

/// 运行到静止，返回期间所有过渡结束时重绘的元素
fn run_until_idle(app: &mut SampleApp) -> Vec<ElementIdentity<SampleKey, Screen>> {
    let mut invalidated = Vec::new();
    for _ in 0..500 {
        let report = app.frame().unwrap();
        invalidated.extend(report.invalidated);
        if app.is_idle() {
            return invalidated;
        }
    }
    panic!("演示没有静止下来");
}

fn tracked_keys(app: &SampleApp) -> usize {
    app.root().with_coordinator(|c| c.tracked_keys().count())
}

#[test]
fn test_list_to_details_first_frame() {
    let mut app = app();
    app.change_user(Some(2)).unwrap();
    assert!(app.is_cross_fading());
    assert_eq!(app.root().overlay_items().len(), 4);

    app.frame().unwrap();
    let mut canvas = TextCanvas::new();
    app.render(&mut canvas).unwrap();

    insta::assert_snapshot!(canvas.overlay_lines().join("\n"), @r"
    overlay avatar_3 [16,156 48x48] alpha=1.00
    overlay avatar_3 [16,156 48x48] alpha=0.00
    overlay text(Anna) [80,170 36x20] alpha=1.00
    overlay h1(Anna) [80,170 36x20] alpha=0.00
    ");

    // 过渡期间两屏上的实时元素都被隐藏
    assert!(canvas
        .lines()
        .iter()
        .filter(|line| line.starts_with("live") && line.contains("Anna"))
        .all(|line| line.ends_with("alpha=0.00")));
}

#[test]
fn test_list_to_details_completes() {
    let mut app = app();
    app.change_user(Some(2)).unwrap();
    let invalidated = run_until_idle(&mut app);

    assert_eq!(app.current_screen(), Screen::Details);
    assert!(!app.is_cross_fading());
    assert!(invalidated.contains(&ElementIdentity::new(SampleKey::Avatar(3), Screen::Details)));
    assert!(invalidated.contains(&ElementIdentity::new(SampleKey::Name("Anna"), Screen::Details)));

    // 列表卸载后只剩详情屏的两个键
    assert_eq!(tracked_keys(&app), 2);
    assert!(app.root().overlay_items().is_empty());

    let mut canvas = TextCanvas::new();
    app.render(&mut canvas).unwrap();
    assert_eq!(
        canvas.lines(),
        [
            "live    avatar_3 [80,188 200x200] alpha=1.00",
            "live    h1(Anna) [124,396 112x56] alpha=1.00",
        ]
    );
}

#[test]
fn test_details_back_to_list() {
    let mut app = app();
    app.change_user(Some(2)).unwrap();
    run_until_idle(&mut app);

    app.change_user(None).unwrap();
    assert_eq!(app.current_screen(), Screen::List);
    app.root().with_coordinator(|c| {
        let transitions = c.active_transitions();
        assert_eq!(transitions.len(), 2);
        for (_, transition) in transitions {
            let transition = transition.as_in_progress().unwrap();
            assert_eq!(*transition.start().identity.screen_key(), Screen::Details);
            assert_eq!(*transition.end().identity.screen_key(), Screen::List);
        }
    });

    run_until_idle(&mut app);
    assert_eq!(tracked_keys(&app), 18);
    assert!(!app
        .root()
        .should_hide(&ElementIdentity::new(SampleKey::Avatar(3), Screen::List)));
}

#[test]
fn test_scroll_recycling_cancels_unregistration() {
    let mut app = app();
    app.scroll_by(300.0).unwrap();
    app.scroll_by(-300.0).unwrap();
    assert_eq!(app.scroll_offset(), 0.0);

    app.root().with_coordinator(|c| {
        // 滚出又滚回的行不再挂起卸载，只滚进来又滚出去的行在等待卸载
        assert!(!c.has_pending_unregistration(&ElementIdentity::new(
            SampleKey::Avatar(1),
            Screen::List
        )));
        assert!(c.has_pending_unregistration(&ElementIdentity::new(
            SampleKey::Avatar(12),
            Screen::List
        )));
        assert_eq!(c.pending_unregistrations(), 10);
    });

    app.frame().unwrap();
    assert_eq!(tracked_keys(&app), 18);
    assert!(app.is_idle());
}

#[test]
fn test_open_user_after_scrolling() {
    let mut app = app();
    app.scroll_by(300.0).unwrap();
    run_until_idle(&mut app);
    assert_eq!(tracked_keys(&app), 20);

    app.change_user(Some(10)).unwrap();
    app.root().with_coordinator(|c| {
        let transitions = c.active_transitions();
        assert_eq!(transitions.len(), 2);
        let avatar = transitions[0].1.as_in_progress().unwrap();
        // 行 10 顶部在 720 - 300 = 420，头像在行内下移 12
        assert_eq!(avatar.start().bounds.top, 432.0);
    });
}
