//! Matrix TUI
//!
//! Terminal host for the character matrix engine. The engine draws into a
//! character grid; this crate feeds it terminal input and blits the grid
//! back to the screen through ratatui.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   keys, mouse, resize   ┌─────────────────────┐
//! │  crossterm   │ ──────────────────────▶ │ App                 │
//! │  EventStream │                         │  MatrixContext      │
//! └──────────────┘                         │   ├─ MatrixView     │
//!        ▲                                 │   └─ Controller     │
//!        │  MatrixSurface (ratatui)        │        └─ pages     │
//!        └──────────────────────────────── └─────────────────────┘
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_possible_truncation)]

pub mod app;
pub mod pages;
pub mod surface;

pub use app::App;
