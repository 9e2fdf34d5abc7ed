//! # Sample 模块
//!
//! 演示应用：用户列表 ⇄ 用户详情。
//!
//! ## 场景
//!
//! - 列表屏：懒加载列表，只挂载视口内的行；每行一个头像和一个名字
//! - 详情屏：居中的大头像和大标题
//! - 点击用户：新屏立即挂载，旧屏保留 `crossfade_ms` 后卸载（交叉淡化）
//! - 从详情返回：切屏前对当前用户的头像和名字调用 `prepare_transition`
//!
//! 头像和名字各自是一个共享元素，逻辑键分别是头像资源编号和名字。

use std::collections::BTreeMap;
use std::ops::Range;
use std::rc::Rc;

use tracing::{debug, info, warn};

use shared_element::{
    ElementHandle, ElementIdentity, Rect, RootEvent, SharedElementResult, SharedElementsRoot, Size,
    Vec2, container_size,
};

use crate::canvas::{SampleContent, TextCanvas, TextStyle};
use crate::config::AppConfig;

/// 用户
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct User {
    /// 头像资源编号
    pub avatar: u32,
    pub name: &'static str,
}

const fn user(avatar: u32, name: &'static str) -> User {
    User { avatar, name }
}

/// 演示数据
pub const USERS: [User; 16] = [
    user(1, "Adam"),
    user(2, "Andrew"),
    user(3, "Anna"),
    user(4, "Boris"),
    user(5, "Carl"),
    user(6, "Donna"),
    user(7, "Emily"),
    user(8, "Fiona"),
    user(9, "Grace"),
    user(10, "Irene"),
    user(11, "Jack"),
    user(12, "Jake"),
    user(13, "Mary"),
    user(14, "Peter"),
    user(15, "Rose"),
    user(16, "Victor"),
];

/// 共享元素逻辑键
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SampleKey {
    Avatar(u32),
    Name(&'static str),
}

/// 屏幕键
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    List,
    Details,
}

pub type SampleRoot = SharedElementsRoot<SampleKey, Screen, SampleContent>;
pub type SampleIdentity = ElementIdentity<SampleKey, Screen>;
type SampleHandle = ElementHandle<SampleKey, Screen, SampleContent>;

/// 列表头像边长
const LIST_AVATAR_SIZE: f32 = 48.0;
/// 列表正文行高与字宽
const BODY_HEIGHT: f32 = 20.0;
const BODY_CHAR_WIDTH: f32 = 9.0;
/// 详情头像边长
const DETAILS_AVATAR_SIZE: f32 = 200.0;
/// 详情标题行高与字宽
const HEADLINE_HEIGHT: f32 = 56.0;
const HEADLINE_CHAR_WIDTH: f32 = 28.0;
/// 详情头像与标题的间距
const DETAILS_GAP: f32 = 8.0;

/// 一个待挂载元素的描述
///
/// 共享元素包装器放在 `origin`，尺寸由它的直接子元素决定。
struct ElementSpec {
    key: SampleKey,
    content: SampleContent,
    origin: Vec2,
    children: Vec<Size>,
}

impl ElementSpec {
    /// 只有一个子元素、正好占满 `bounds` 的包装器
    fn new(key: SampleKey, content: SampleContent, bounds: Rect) -> Self {
        Self {
            key,
            content,
            origin: bounds.origin(),
            children: vec![bounds.size()],
        }
    }

    /// 测量包装器，得到绝对边界
    fn layout(&self) -> SharedElementResult<Rect> {
        let size = container_size(Size::zero(), &self.children)?;
        Ok(Rect::from_origin_size(self.origin, size))
    }
}

fn list_row(config: &AppConfig, index: usize, scroll_offset: f32) -> [ElementSpec; 2] {
    let user = USERS[index];
    let row_height = config.list_row_height;
    let top = index as f32 * row_height - scroll_offset;
    [
        ElementSpec::new(
            SampleKey::Avatar(user.avatar),
            SampleContent::Avatar(user.avatar),
            Rect::new(
                16.0,
                top + (row_height - LIST_AVATAR_SIZE) / 2.0,
                LIST_AVATAR_SIZE,
                LIST_AVATAR_SIZE,
            ),
        ),
        ElementSpec::new(
            SampleKey::Name(user.name),
            SampleContent::Text {
                text: user.name.to_string(),
                style: TextStyle::Body,
            },
            Rect::new(
                80.0,
                top + (row_height - BODY_HEIGHT) / 2.0,
                user.name.len() as f32 * BODY_CHAR_WIDTH,
                BODY_HEIGHT,
            ),
        ),
    ]
}

fn details_column(config: &AppConfig, index: usize) -> [ElementSpec; 2] {
    let user = USERS[index];
    let viewport = config.viewport;
    let name_width = user.name.len() as f32 * HEADLINE_CHAR_WIDTH;
    let top = (viewport.height - DETAILS_AVATAR_SIZE - DETAILS_GAP - HEADLINE_HEIGHT) / 2.0;
    [
        ElementSpec::new(
            SampleKey::Avatar(user.avatar),
            SampleContent::Avatar(user.avatar),
            Rect::new(
                (viewport.width - DETAILS_AVATAR_SIZE) / 2.0,
                top,
                DETAILS_AVATAR_SIZE,
                DETAILS_AVATAR_SIZE,
            ),
        ),
        ElementSpec::new(
            SampleKey::Name(user.name),
            SampleContent::Text {
                text: user.name.to_string(),
                style: TextStyle::Headline,
            },
            Rect::new(
                (viewport.width - name_width) / 2.0,
                top + DETAILS_AVATAR_SIZE + DETAILS_GAP,
                name_width,
                HEADLINE_HEIGHT,
            ),
        ),
    ]
}

/// 视口内的列表行
///
/// 行按顺序排列，可见行总是连续的一段。
fn visible_rows(config: &AppConfig, scroll_offset: f32) -> Range<usize> {
    let viewport = Rect::new(0.0, 0.0, config.viewport.width, config.viewport.height);
    let row_height = config.list_row_height;
    let is_visible = |index: &usize| {
        let top = *index as f32 * row_height - scroll_offset;
        Rect::new(0.0, top, config.viewport.width, row_height).intersects(&viewport)
    };
    let first = (0..USERS.len()).find(is_visible).unwrap_or(USERS.len());
    let last = (first..USERS.len())
        .take_while(is_visible)
        .last()
        .map_or(first, |index| index + 1);
    first..last
}

/// 已挂载的实时元素
struct LiveElement {
    handle: SampleHandle,
    content: Rc<SampleContent>,
    bounds: Rect,
}

impl LiveElement {
    fn mount(root: &SampleRoot, screen: Screen, spec: ElementSpec) -> SharedElementResult<Self> {
        let bounds = spec.layout()?;
        let content = Rc::new(spec.content);
        let handle = root.register_element(
            ElementIdentity::new(spec.key, screen),
            Rc::clone(&content),
        )?;
        handle.on_layout(bounds)?;
        Ok(Self {
            handle,
            content,
            bounds,
        })
    }

    /// 重组：再次声明存在并重新布局
    fn recompose(&mut self, bounds: Rect) -> SharedElementResult<()> {
        self.handle.refresh()?;
        self.handle.on_layout(bounds)?;
        self.bounds = bounds;
        Ok(())
    }
}

/// 已挂载的屏幕，按用户下标分组
struct MountedScreen {
    screen: Screen,
    rows: BTreeMap<usize, Vec<LiveElement>>,
}

impl MountedScreen {
    fn mount_row(
        &mut self,
        root: &SampleRoot,
        index: usize,
        specs: [ElementSpec; 2],
    ) -> SharedElementResult<()> {
        let elements = specs
            .into_iter()
            .map(|spec| LiveElement::mount(root, self.screen, spec))
            .collect::<SharedElementResult<Vec<_>>>()?;
        self.rows.insert(index, elements);
        Ok(())
    }

    fn elements(&self) -> impl Iterator<Item = &LiveElement> {
        self.rows.values().flatten()
    }

    fn find_mut(&mut self, identity: &SampleIdentity) -> Option<&mut LiveElement> {
        self.rows
            .values_mut()
            .flatten()
            .find(|element| element.handle.identity() == identity)
    }
}

/// 正在淡出的旧屏
struct Outgoing {
    screen: MountedScreen,
    remaining_ms: f32,
}

/// 单帧结果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameReport {
    /// 自启动以来的时间（毫秒）
    pub elapsed_ms: f64,
    /// 覆盖层是否需要重绘
    pub overlay_invalidated: bool,
    /// 过渡结束后重绘的元素
    pub invalidated: Vec<SampleIdentity>,
}

/// 演示应用
pub struct SampleApp {
    config: AppConfig,
    root: SampleRoot,
    selected: Option<usize>,
    scroll_offset: f32,
    current: MountedScreen,
    outgoing: Option<Outgoing>,
    elapsed_ms: f64,
}

impl SampleApp {
    /// 创建应用并挂载列表屏
    pub fn new(config: AppConfig) -> SharedElementResult<Self> {
        let root = SharedElementsRoot::new(config.transition)?;
        root.set_root_bounds(Some(Rect::new(
            0.0,
            0.0,
            config.viewport.width,
            config.viewport.height,
        )));
        let mut app = Self {
            config,
            root,
            selected: None,
            scroll_offset: 0.0,
            current: MountedScreen {
                screen: Screen::List,
                rows: BTreeMap::new(),
            },
            outgoing: None,
            elapsed_ms: 0.0,
        };
        app.current = app.mount_screen(None)?;
        Ok(app)
    }

    pub fn root(&self) -> &SampleRoot {
        &self.root
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// 当前选中的用户下标
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn current_screen(&self) -> Screen {
        self.current.screen
    }

    pub fn scroll_offset(&self) -> f32 {
        self.scroll_offset
    }

    /// 是否仍在交叉淡化
    pub fn is_cross_fading(&self) -> bool {
        self.outgoing.is_some()
    }

    fn mount_screen(&self, selected: Option<usize>) -> SharedElementResult<MountedScreen> {
        let mut screen = MountedScreen {
            screen: if selected.is_some() {
                Screen::Details
            } else {
                Screen::List
            },
            rows: BTreeMap::new(),
        };
        match selected {
            Some(index) => {
                screen.mount_row(&self.root, index, details_column(&self.config, index))?;
            }
            None => {
                for index in visible_rows(&self.config, self.scroll_offset) {
                    let specs = list_row(&self.config, index, self.scroll_offset);
                    screen.mount_row(&self.root, index, specs)?;
                }
            }
        }
        Ok(screen)
    }

    /// 切换用户（`None` 回到列表）
    ///
    /// 离开详情屏前预告当前用户的头像和名字即将被替换。
    pub fn change_user(&mut self, user: Option<usize>) -> SharedElementResult<()> {
        if user == self.selected {
            return Ok(());
        }
        if user.is_some_and(|index| index >= USERS.len()) {
            warn!(index = ?user, "用户下标越界，忽略");
            return Ok(());
        }
        if let Some(current) = self.selected.map(|index| USERS[index]) {
            self.root.prepare_transition(&[
                SampleKey::Avatar(current.avatar),
                SampleKey::Name(current.name),
            ]);
        }
        info!(from = ?self.selected, to = ?user, "切换屏幕");

        self.selected = user;
        let incoming = self.mount_screen(user)?;
        let previous = std::mem::replace(&mut self.current, incoming);
        // 上一次淡化尚未结束时，旧屏立即卸载
        self.outgoing = Some(Outgoing {
            screen: previous,
            remaining_ms: self.config.crossfade_ms as f32,
        });
        Ok(())
    }

    /// 滚动列表
    ///
    /// 离开视口的行卸载，进入视口的行挂载，留在视口内的行重新布局。
    pub fn scroll_by(&mut self, dy: f32) -> SharedElementResult<()> {
        if self.current.screen != Screen::List {
            return Ok(());
        }
        let content_height = USERS.len() as f32 * self.config.list_row_height;
        let max_offset = (content_height - self.config.viewport.height).max(0.0);
        self.scroll_offset = (self.scroll_offset + dy).clamp(0.0, max_offset);

        let visible = visible_rows(&self.config, self.scroll_offset);
        self.current.rows.retain(|index, _| visible.contains(index));
        for index in visible {
            let specs = list_row(&self.config, index, self.scroll_offset);
            match self.current.rows.get_mut(&index) {
                Some(elements) => {
                    for (element, spec) in elements.iter_mut().zip(specs) {
                        element.recompose(spec.layout()?)?;
                    }
                }
                None => self.current.mount_row(&self.root, index, specs)?,
            }
        }
        debug!(offset = self.scroll_offset, rows = self.current.rows.len(), "列表滚动");
        Ok(())
    }

    /// 推进一帧
    pub fn frame(&mut self) -> SharedElementResult<FrameReport> {
        let dt = self.config.frame_interval_ms;
        self.elapsed_ms += f64::from(dt);
        self.root.on_frame(dt);

        if let Some(outgoing) = self.outgoing.as_mut() {
            outgoing.remaining_ms -= dt;
            if outgoing.remaining_ms <= 0.0 {
                debug!(screen = ?outgoing.screen.screen, "交叉淡化结束，旧屏卸载");
                self.outgoing = None;
            }
        }

        let mut report = FrameReport {
            elapsed_ms: self.elapsed_ms,
            ..FrameReport::default()
        };
        for event in self.root.drain_events() {
            match event {
                RootEvent::OverlayInvalidated => report.overlay_invalidated = true,
                RootEvent::ElementInvalidated(identity) => {
                    if let Some(element) = self.current.find_mut(&identity) {
                        let bounds = element.bounds;
                        element.recompose(bounds)?;
                    }
                    report.invalidated.push(identity);
                }
            }
        }
        Ok(report)
    }

    /// 是否已静止：没有淡化、过渡和挂起的卸载
    pub fn is_idle(&self) -> bool {
        self.outgoing.is_none()
            && self.root.with_coordinator(|c| {
                c.active_transitions().is_empty() && c.pending_unregistrations() == 0
            })
    }

    /// 绘制一帧：旧屏、新屏、覆盖层
    pub fn render(&self, canvas: &mut TextCanvas) -> SharedElementResult<()> {
        let fade_in = match &self.outgoing {
            Some(outgoing) if self.config.crossfade_ms > 0 => {
                1.0 - (outgoing.remaining_ms / self.config.crossfade_ms as f32).clamp(0.0, 1.0)
            }
            _ => 1.0,
        };
        if let Some(outgoing) = &self.outgoing {
            draw_screen(canvas, &outgoing.screen, 1.0 - fade_in)?;
        }
        draw_screen(canvas, &self.current, fade_in)?;
        self.root.render_overlay(canvas);
        Ok(())
    }
}

fn draw_screen(canvas: &mut TextCanvas, screen: &MountedScreen, alpha: f32) -> SharedElementResult<()> {
    for element in screen.elements() {
        let alpha = if element.handle.should_hide()? { 0.0 } else { alpha };
        canvas.draw_live(&element.content, element.bounds, alpha);
    }
    Ok(())
}
