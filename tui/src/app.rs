//! Main Application
//!
//! The App drives a [`MatrixContext`] from the terminal:
//! - Event loop (keyboard, mouse, resize)
//! - Frame ticks that update the view and blit its output
//! - Physics ticks on their own cadence
//!
//! # Coordinates
//!
//! The engine thinks in pixels for sizing and in normalized `[0, 1]`
//! coordinates for pointer input. A terminal cell is treated as a glyph
//! `font_size` pixels tall and half as wide, so one cell maps to one grid
//! column and row.

use std::io;
use std::time::Duration;

use crossterm::event::{
    self, Event, EventStream, KeyCode, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind,
};
use futures::StreamExt;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::time::MissedTickBehavior;

use matrix_core::{MatrixConfig, MatrixContext, Route, SimilarityTable, SpringLattice};

use crate::pages::{self, DemoRoute};
use crate::surface::MatrixSurface;

/// Wheel notches scroll this many lines
const SCROLL_LINES: i32 = 1;

/// Main application state
pub struct App {
    /// Is the app still running?
    running: bool,
    context: MatrixContext<DemoRoute>,
    /// Terminal size in cells
    size: (u16, u16),
    font_size: f64,
    frame_rate: u32,
    physics_hz: u32,
}

impl App {
    /// Create the app and enter the page for `route`
    ///
    /// # Errors
    ///
    /// Fails when the terminal size cannot be read or a configured
    /// similarity table cannot be loaded.
    pub fn new(config: MatrixConfig, route: &str) -> anyhow::Result<Self> {
        let similarity = match &config.similarity_table {
            Some(path) => SimilarityTable::load(path)?,
            None => SimilarityTable::builtin(),
        };

        let size = crossterm::terminal::size()?;
        let (width, height) = pixel_size(size, config.font_size);
        let mobile = i32::from(size.0) < config.mobile_width;
        let mut lattice = SpringLattice::default();
        lattice.initialize(width, height, config.particles(mobile));

        let font_size = config.font_size;
        let frame_rate = config.frame_rate;
        let physics_hz = config.physics_hz;
        let mut context = MatrixContext::new(config, Box::new(lattice), similarity);
        pages::register(&mut context);
        context.set_navigate(|path| tracing::info!(path, "Navigated"));

        let route = if DemoRoute::from_path(route).is_some() {
            route
        } else {
            tracing::warn!(route, "Unknown start route, using the title page");
            DemoRoute::Title.path()
        };
        context.initialize(width, height, route);

        Ok(Self {
            running: true,
            context,
            size,
            font_size,
            frame_rate,
            physics_hz,
        })
    }

    /// Main event loop
    pub async fn run(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        let mut event_stream = EventStream::new();

        let mut frames = tokio::time::interval(period(self.frame_rate));
        frames.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut physics = tokio::time::interval(period(self.physics_hz));
        physics.set_missed_tick_behavior(MissedTickBehavior::Skip);

        while self.running {
            tokio::select! {
                biased;

                maybe_event = event_stream.next() => match maybe_event {
                    Some(Ok(event)) => self.handle_event(event),
                    Some(Err(e)) => tracing::warn!(error = %e, "Terminal event error"),
                    None => self.running = false,
                },

                _ = frames.tick() => {
                    self.context.update();
                    self.render(terminal)?;
                }

                _ = physics.tick() => self.context.step_physics(),
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            // Only handle Press events (not Release or Repeat)
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Resize(w, h) => self.handle_resize(w, h),
            _ => {}
        }
    }

    /// Handle keyboard input
    fn handle_key(&mut self, key: event::KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => self.running = false,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.running = false;
            }
            KeyCode::Char(c) => {
                if let Some(route) = DemoRoute::from_digit(c) {
                    self.context.set_route(route.path());
                }
            }
            _ => {}
        }
    }

    /// Handle mouse input
    fn handle_mouse(&mut self, mouse: event::MouseEvent) {
        let (nx, ny) = self.normalize(mouse.column, mouse.row);
        let view = self.context.view_mut();
        match mouse.kind {
            MouseEventKind::Moved | MouseEventKind::Drag(_) => view.pointer_move(nx, ny),
            MouseEventKind::Down(MouseButton::Left) => {
                view.pointer_move(nx, ny);
                view.pointer_down(nx, ny);
            }
            MouseEventKind::Up(MouseButton::Left) => view.pointer_up(),
            MouseEventKind::ScrollDown => view.scroll(nx, ny, SCROLL_LINES),
            MouseEventKind::ScrollUp => view.scroll(nx, ny, -SCROLL_LINES),
            _ => {}
        }
    }

    /// Handle terminal resize
    fn handle_resize(&mut self, width: u16, height: u16) {
        self.size = (width, height);
        let (px_width, px_height) = pixel_size(self.size, self.font_size);
        self.context.view_mut().resize(px_width, px_height);
    }

    /// Cell centre in normalized coordinates
    fn normalize(&self, column: u16, row: u16) -> (f64, f64) {
        let columns = f64::from(self.size.0.max(1));
        let rows = f64::from(self.size.1.max(1));
        (
            (f64::from(column) + 0.5) / columns,
            (f64::from(row) + 0.5) / rows,
        )
    }

    fn render(&self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> anyhow::Result<()> {
        let output = self.context.view().buffer().output();
        terminal.draw(|frame| {
            let area = frame.area();
            frame.render_widget(MatrixSurface::new(output), area);
        })?;
        Ok(())
    }
}

/// Pixel size of a terminal of `size` cells
pub fn pixel_size(size: (u16, u16), font_size: f64) -> (f64, f64) {
    (
        f64::from(size.0) * font_size / 2.0,
        f64::from(size.1) * font_size,
    )
}

fn period(hz: u32) -> Duration {
    Duration::from_secs_f64(1.0 / f64::from(hz.max(1)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use matrix_core::PixelMetrics;

    #[test]
    fn test_pixel_size_maps_back_to_cells() {
        let (width, height) = pixel_size((80, 24), 16.0);
        let grid = PixelMetrics::new(16.0).grid_size(width, height);
        assert_eq!((grid.x, grid.y), (80, 24));
    }

    #[test]
    fn test_period_guards_zero() {
        assert_eq!(period(0), Duration::from_secs(1));
        assert_eq!(period(50), Duration::from_millis(20));
    }
}
