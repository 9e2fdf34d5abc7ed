//! # Canvas 模块
//!
//! 文本画布：把每次绘制记录成一行文字，代替真实的渲染后端。

use std::fmt;

use shared_element::{Canvas, PlaceholderLayer, Rect};

/// 文本样式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextStyle {
    /// 列表正文
    Body,
    /// 详情页大标题
    Headline,
}

/// 演示内容
#[derive(Debug, Clone, PartialEq)]
pub enum SampleContent {
    /// 头像（资源编号）
    Avatar(u32),
    /// 文本
    Text { text: String, style: TextStyle },
}

impl fmt::Display for SampleContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Avatar(id) => write!(f, "avatar_{}", id),
            Self::Text {
                text,
                style: TextStyle::Body,
            } => write!(f, "text({})", text),
            Self::Text {
                text,
                style: TextStyle::Headline,
            } => write!(f, "h1({})", text),
        }
    }
}

/// 按整像素格式化矩形
fn format_rect(rect: &Rect) -> String {
    format!(
        "[{:.0},{:.0} {:.0}x{:.0}]",
        rect.left, rect.top, rect.width, rect.height
    )
}

/// 文本画布
#[derive(Debug, Default)]
pub struct TextCanvas {
    lines: Vec<String>,
}

impl TextCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// 绘制实时元素（隐藏的元素以透明度 0 绘制）
    pub fn draw_live(&mut self, content: &SampleContent, bounds: Rect, alpha: f32) {
        self.lines.push(format!(
            "live    {} {} alpha={:.2}",
            content,
            format_rect(&bounds),
            alpha
        ));
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// 只取覆盖层的绘制记录
    pub fn overlay_lines(&self) -> Vec<&str> {
        self.lines
            .iter()
            .map(String::as_str)
            .filter(|line| line.starts_with("overlay"))
            .collect()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

impl Canvas<SampleContent> for TextCanvas {
    fn draw_placeholder(&mut self, content: &SampleContent, bounds: Rect, layer: &PlaceholderLayer) {
        let drawn = layer.drawn_rect(bounds.size());
        self.lines.push(format!(
            "overlay {} {} alpha={:.2}",
            content,
            format_rect(&drawn),
            layer.alpha
        ));
    }
}
