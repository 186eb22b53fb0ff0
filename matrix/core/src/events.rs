//! View input and output events

use crate::element::NodeId;
use crate::geometry::NormPoint;
use crate::sequence::Direction;

/// Something the host or the controller should react to
#[derive(Clone, Debug, PartialEq)]
pub enum ViewEvent {
    /// A clickable node received a pointer-down
    Clicked { key: String },
    /// A watched node finished entering or exiting
    TransitionComplete {
        node: NodeId,
        key: String,
        direction: Direction,
    },
    /// The grid crossed the mobile width breakpoint
    BreakpointChanged { mobile: bool },
}

/// Queued input, processed most-recent-first at the next frame
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum InputEvent {
    PointerDown(NormPoint),
    PointerUp,
    Resize { width: f64, height: f64 },
    Scroll { at: NormPoint, lines: i32 },
}
