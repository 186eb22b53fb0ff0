//! Matrix Core - Headless Character-Matrix UI Engine
//!
//! A retained-mode UI rendered into a grid of text glyphs. Pages build trees
//! of containers, text and foreign nodes; the engine lays them out on the
//! character grid, sweeps tail-based wave animations across them on enter,
//! exit, hover and click, and finally perturbs glyph choice with a physics
//! field so the screen looks like a living, noisy terminal.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     Surfaces (TUI, ...)                      │
//! │        input (normalized pointer, pixel size)  ▲ surface()   │
//! └────────────────────────────┬───────────────────┼─────────────┘
//!                              │                   │
//! ┌────────────────────────────┼───────────────────┼─────────────┐
//! │                      MatrixContext                           │
//! │  ┌───────────────────┐   events   ┌────────────────────────┐ │
//! │  │ MatrixController  │◄───────────│       MatrixView       │ │
//! │  │   Route / Page    │───────────►│  ElementTree  Buffers  │ │
//! │  └───────────────────┘  set_root  │  Physics   Similarity  │ │
//! │                                   └────────────────────────┘ │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Module Overview
//!
//! - [`geometry`]: integer, real and normalized points, axes
//! - [`grid`]: character grids and the three-layer buffer
//! - [`element`]: the node arena, layout, paint, hit-testing, transitions
//! - [`animation`]: row-tracer and diagonal-swipe wave animations
//! - [`sequence`]: parallel and series ordering of child transitions
//! - [`view`]: the per-frame driver
//! - [`controller`] / [`context`]: page routing on top of the view
//! - [`physics`]: the sampled field and a spring lattice implementation
//! - [`similarity`]: glyph substitution tables
//! - [`config`]: TOML and environment configuration
//!
//! # No Terminal Dependencies
//!
//! This crate has **zero** dependencies on ratatui, crossterm, or any async
//! runtime. Hosts feed it input and read back text.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_sign_loss)]

pub mod animation;
pub mod config;
pub mod context;
pub mod controller;
pub mod element;
pub mod events;
pub mod geometry;
pub mod glyphs;
pub mod grid;
pub mod logging;
pub mod physics;
pub mod placement;
pub mod sequence;
pub mod similarity;
pub mod view;

// Re-exports for convenience
pub use animation::{Animation, AnimationConfig, AnimationKind, AnimationUse};
pub use config::{load_config, load_config_from_path, ConfigError, MatrixConfig};
pub use context::MatrixContext;
pub use controller::{MatrixController, Page, Route};
pub use element::{
    Alignment, Awaiting, ContainerLayout, CursorHint, ElementTree, HoverTransform, Node, NodeConfig,
    NodeId, NodeKind, Padding, Sizing, Stage, TextContent,
};
pub use events::ViewEvent;
pub use geometry::{Axis, IntPoint, NormPoint, PerAxis, RealPoint};
pub use grid::{CharGrid, LayeredBuffer};
pub use physics::{LatticeParams, PhysicsField, SpringLattice, StillField};
pub use placement::{PixelMetrics, PixelRect, Placement, PlacementKind, PlacementRole};
pub use sequence::{Direction, SequenceStep, Timing, TransitionSequence};
pub use similarity::{SimilarityError, SimilarityTable};
pub use view::MatrixView;
