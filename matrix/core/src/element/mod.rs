//! Element Tree
//!
//! Retained-mode layout/paint units for the character grid.
//!
//! # Design
//!
//! Nodes live in an arena ([`ElementTree`]) and are addressed by
//! generational [`NodeId`] handles. Children are owned by their parent's
//! child list; the parent link is a plain handle, so the tree never forms
//! an ownership cycle. Variant behaviour (container, text, foreign) is a
//! closed [`NodeKind`] tag dispatched with `match`.
//!
//! Layout flows top-down (a parent assigns relative and expand sizes) while
//! content flows bottom-up (content-sized parents measure their children).
//! Each `set_size` that changes a node reprocesses it, notifies the parent
//! and resizes the node's children, in a single pass.

mod container;
mod foreign;
mod input;
mod layout;
mod paint;
mod text;
mod transition;
mod tree;

pub use container::{Alignment, ContainerLayout};
pub use foreign::ForeignContent;
pub use text::{layout_text, HoverTransform, TextContent, TextLayout};
pub use transition::Awaiting;
pub use tree::ElementTree;

pub(crate) use transition::RunningAnimation;

use serde::{Deserialize, Serialize};

use crate::animation::AnimationConfig;
use crate::geometry::{clamp_unit, Axis, IntPoint, PerAxis};
use crate::glyphs::DEFAULT_BACKGROUND;
use crate::sequence::{Direction, Timing, TransitionSequence};

/// Handle to a node in an [`ElementTree`]
///
/// Handles to destroyed nodes never alias a later node in the same slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

impl NodeId {
    pub(crate) const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    pub(crate) fn index(self) -> usize {
        self.index as usize
    }

    pub(crate) fn generation(self) -> u32 {
        self.generation
    }
}

/// How a node's length on one axis is decided
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sizing {
    /// Fixed number of cells
    Absolute(i32),
    /// Fraction of the parent's content length, floored
    Relative(f64),
    /// Share of the parent's leftover length
    Expand,
    /// Measured from children or text
    #[default]
    Content,
}

impl Sizing {
    /// Relative sizing with the fraction clamped to `[0, 1]`
    pub fn relative(fraction: f64) -> Self {
        Sizing::Relative(clamp_unit(fraction))
    }

    pub fn is_content(self) -> bool {
        matches!(self, Sizing::Content)
    }

    fn normalized(self) -> Self {
        match self {
            Sizing::Relative(f) => Sizing::relative(f),
            Sizing::Absolute(n) => Sizing::Absolute(n.max(0)),
            other => other,
        }
    }
}

/// Lifecycle stage; `Exited` is terminal
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stage {
    Queued,
    Entering,
    Main,
    Exiting,
    Exited,
}

impl Stage {
    /// Stages that react to the pointer
    pub fn is_interactive(self) -> bool {
        matches!(self, Stage::Main | Stage::Entering)
    }
}

/// Pointer shape the host should show over a node
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CursorHint {
    #[default]
    Default,
    Pointer,
    Text,
}

/// Padding at the start (left, top) and end (right, bottom) of each axis
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Padding {
    pub start: IntPoint,
    pub end: IntPoint,
}

impl Padding {
    pub fn uniform(n: i32) -> Self {
        Self {
            start: IntPoint::splat(n),
            end: IntPoint::splat(n),
        }
    }

    pub fn xy(x: i32, y: i32) -> Self {
        Self {
            start: IntPoint::new(x, y),
            end: IntPoint::new(x, y),
        }
    }

    pub fn sides(top: i32, right: i32, bottom: i32, left: i32) -> Self {
        Self {
            start: IntPoint::new(left, top),
            end: IntPoint::new(right, bottom),
        }
    }

    pub fn total(&self) -> IntPoint {
        self.start + self.end
    }
}

/// Animations for each trigger
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimationSet {
    pub entrance: Option<AnimationConfig>,
    pub exit: Option<AnimationConfig>,
    pub pointer_enter: Option<AnimationConfig>,
    pub pointer_exit: Option<AnimationConfig>,
    pub click: Option<AnimationConfig>,
}

impl AnimationSet {
    pub fn for_direction(&self, direction: Direction) -> Option<AnimationConfig> {
        match direction {
            Direction::Enter => self.entrance,
            Direction::Exit => self.exit,
        }
    }
}

/// Construction parameters shared by every node variant
#[derive(Clone, Debug)]
pub struct NodeConfig {
    pub key: String,
    pub sizing: PerAxis<Sizing>,
    pub padding: Padding,
    pub bordered: bool,
    pub background: char,
    pub cursor: CursorHint,
    pub scrollable: bool,
    pub offset: IntPoint,
    pub animations: AnimationSet,
    pub entrance_timing: Timing,
    pub exit_timing: Timing,
    /// Emit [`crate::ViewEvent::Clicked`] on pointer-down
    pub clickable: bool,
}

impl NodeConfig {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            sizing: PerAxis::splat(Sizing::Content),
            padding: Padding::default(),
            bordered: false,
            background: DEFAULT_BACKGROUND,
            cursor: CursorHint::Default,
            scrollable: false,
            offset: IntPoint::ZERO,
            animations: AnimationSet::default(),
            entrance_timing: Timing::Parallel,
            exit_timing: Timing::Parallel,
            clickable: false,
        }
    }

    #[must_use]
    pub fn with_width(mut self, sizing: Sizing) -> Self {
        self.sizing.x = sizing;
        self
    }

    #[must_use]
    pub fn with_height(mut self, sizing: Sizing) -> Self {
        self.sizing.y = sizing;
        self
    }

    /// Fixed size on both axes
    #[must_use]
    pub fn with_size(self, width: i32, height: i32) -> Self {
        self.with_width(Sizing::Absolute(width))
            .with_height(Sizing::Absolute(height))
    }

    /// Fill the parent on both axes
    #[must_use]
    pub fn fill(self) -> Self {
        self.with_width(Sizing::relative(1.0))
            .with_height(Sizing::relative(1.0))
    }

    #[must_use]
    pub fn with_padding(mut self, padding: Padding) -> Self {
        self.padding = padding;
        self
    }

    #[must_use]
    pub fn bordered(mut self) -> Self {
        self.bordered = true;
        self
    }

    #[must_use]
    pub fn with_background(mut self, background: char) -> Self {
        self.background = background;
        self
    }

    #[must_use]
    pub fn with_cursor(mut self, cursor: CursorHint) -> Self {
        self.cursor = cursor;
        self
    }

    #[must_use]
    pub fn scrollable(mut self) -> Self {
        self.scrollable = true;
        self
    }

    #[must_use]
    pub fn with_offset(mut self, offset: IntPoint) -> Self {
        self.offset = offset;
        self
    }

    #[must_use]
    pub fn with_entrance(mut self, config: AnimationConfig) -> Self {
        self.animations.entrance = Some(config);
        self
    }

    #[must_use]
    pub fn with_exit(mut self, config: AnimationConfig) -> Self {
        self.animations.exit = Some(config);
        self
    }

    #[must_use]
    pub fn with_pointer_enter(mut self, config: AnimationConfig) -> Self {
        self.animations.pointer_enter = Some(config);
        self
    }

    #[must_use]
    pub fn with_pointer_exit(mut self, config: AnimationConfig) -> Self {
        self.animations.pointer_exit = Some(config);
        self
    }

    #[must_use]
    pub fn with_click_animation(mut self, config: AnimationConfig) -> Self {
        self.animations.click = Some(config);
        self
    }

    #[must_use]
    pub fn with_entrance_timing(mut self, timing: Timing) -> Self {
        self.entrance_timing = timing;
        self
    }

    #[must_use]
    pub fn with_exit_timing(mut self, timing: Timing) -> Self {
        self.exit_timing = timing;
        self
    }

    #[must_use]
    pub fn clickable(mut self) -> Self {
        self.clickable = true;
        self
    }
}

/// Variant tag with per-variant state
#[derive(Clone, Debug)]
pub enum NodeKind {
    Container(ContainerLayout),
    Text(TextContent),
    Foreign(ForeignContent),
}

/// A layout/paint unit
#[derive(Debug)]
pub struct Node {
    pub(crate) key: String,
    pub(crate) kind: NodeKind,
    pub(crate) sizing: PerAxis<Sizing>,
    pub(crate) padding: Padding,
    pub(crate) bordered: bool,
    pub(crate) background: char,
    pub(crate) cursor: CursorHint,
    pub(crate) scrollable: bool,
    pub(crate) clickable: bool,
    pub(crate) animations: AnimationSet,
    pub(crate) entrance_timing: Timing,
    pub(crate) exit_timing: Timing,

    pub(crate) stage: Stage,
    pub(crate) on_view: bool,
    pub(crate) animation: Option<RunningAnimation>,
    /// Offset from the parent's top-left corner
    pub(crate) offset: IntPoint,
    /// Vertical scroll state, never positive
    pub(crate) scroll_offset: IntPoint,
    /// Screen position of the content area, as of the last draw
    pub(crate) full_content_offset: IntPoint,
    pub(crate) mouse_inside: bool,
    pub(crate) must_redraw: bool,
    pub(crate) size: IntPoint,
    pub(crate) content_size: IntPoint,
    pub(crate) showing_scroll_bar: bool,

    pub(crate) entrance: TransitionSequence,
    pub(crate) exit: TransitionSequence,
    pub(crate) transition: Option<transition::ActiveTransition>,
    pub(crate) epoch: u32,
    pub(crate) watched: bool,

    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

impl Node {
    pub(crate) fn new(config: NodeConfig, kind: NodeKind) -> Self {
        let sizing = PerAxis::new(config.sizing.x.normalized(), config.sizing.y.normalized());
        let mut size = IntPoint::ZERO;
        for axis in Axis::ALL {
            if let Sizing::Absolute(n) = sizing.get(axis) {
                size.set(axis, n);
            }
        }
        Self {
            key: config.key,
            kind,
            sizing,
            padding: config.padding,
            bordered: config.bordered,
            background: config.background,
            cursor: config.cursor,
            scrollable: config.scrollable,
            clickable: config.clickable,
            animations: config.animations,
            entrance_timing: config.entrance_timing,
            exit_timing: config.exit_timing,
            stage: Stage::Queued,
            on_view: false,
            animation: None,
            offset: config.offset,
            scroll_offset: IntPoint::ZERO,
            full_content_offset: IntPoint::ZERO,
            mouse_inside: false,
            must_redraw: true,
            size,
            content_size: IntPoint::ZERO,
            showing_scroll_bar: false,
            entrance: TransitionSequence::empty(Direction::Enter),
            exit: TransitionSequence::empty(Direction::Exit),
            transition: None,
            epoch: 0,
            watched: false,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn size(&self) -> IntPoint {
        self.size
    }

    pub fn offset(&self) -> IntPoint {
        self.offset
    }

    pub fn sizing(&self) -> PerAxis<Sizing> {
        self.sizing
    }

    pub fn content_size(&self) -> IntPoint {
        self.content_size
    }

    pub fn scroll_offset(&self) -> IntPoint {
        self.scroll_offset
    }

    pub fn background(&self) -> char {
        self.background
    }

    pub fn cursor(&self) -> CursorHint {
        self.cursor
    }

    pub fn is_bordered(&self) -> bool {
        self.bordered
    }

    pub fn is_on_view(&self) -> bool {
        self.on_view
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    pub fn is_showing_scroll_bar(&self) -> bool {
        self.showing_scroll_bar
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Outstanding completion signals of the current transition
    pub fn awaiting(&self) -> Option<Awaiting> {
        self.transition.map(|t| t.awaiting)
    }

    pub fn text(&self) -> Option<&TextContent> {
        match &self.kind {
            NodeKind::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Padding, border and scroll bar, start plus end
    pub fn boundary_size(&self) -> IntPoint {
        let border = if self.bordered { 2 } else { 0 };
        let mut total = self.padding.total() + IntPoint::splat(border);
        if self.showing_scroll_bar {
            total.x += 1;
        }
        total
    }

    /// Where content starts relative to the node's top-left corner
    pub fn content_offset(&self) -> IntPoint {
        let border = if self.bordered { 1 } else { 0 };
        self.padding.start + IntPoint::splat(border)
    }

    /// Size available to children and text
    pub fn content_area(&self) -> IntPoint {
        (self.size - self.boundary_size()).clamp_non_negative()
    }

    pub(crate) fn main_axis(&self) -> Option<Axis> {
        match &self.kind {
            NodeKind::Container(layout) => Some(layout.main_axis),
            _ => None,
        }
    }

    pub(crate) fn spacing(&self) -> i32 {
        match &self.kind {
            NodeKind::Container(layout) => layout.spacing,
            _ => 0,
        }
    }

    pub(crate) fn sequence_mut(&mut self, direction: Direction) -> &mut TransitionSequence {
        match direction {
            Direction::Enter => &mut self.entrance,
            Direction::Exit => &mut self.exit,
        }
    }
}
