//! Matrix View
//!
//! Owns the layered buffer, the element tree and the physics field, and runs
//! one frame per [`MatrixView::update`].
//!
//! # Frame order
//!
//! 1. Prune exited nodes (deferred under an exiting ancestor)
//! 2. Apply the coalesced pointer move, then queued input newest first
//! 3. Paint dirty nodes into the content and animation layers
//! 4. Step animations, then settle transition signals
//! 5. Compose the output layer through physics-driven glyph substitution

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::MatrixConfig;
use crate::element::{
    ContainerLayout, CursorHint, ElementTree, ForeignContent, Node, NodeConfig, NodeId, NodeKind,
    TextContent,
};
use crate::events::{InputEvent, ViewEvent};
use crate::geometry::{IntPoint, NormPoint, RealPoint};
use crate::glyphs::DEFAULT_BACKGROUND;
use crate::grid::LayeredBuffer;
use crate::physics::PhysicsField;
use crate::placement::{PixelMetrics, Placement};
use crate::sequence::Direction;
use crate::similarity::SimilarityTable;

pub struct MatrixView {
    config: MatrixConfig,
    buffer: LayeredBuffer,
    tree: ElementTree,
    physics: Box<dyn PhysicsField>,
    similarity: SimilarityTable,
    rng: StdRng,
    queue: Vec<InputEvent>,
    pending_move: Option<NormPoint>,
    pointer_down: bool,
    /// Unknown until the first resize
    mobile: Option<bool>,
    pixel_size: (f64, f64),
}

impl MatrixView {
    pub fn new(
        config: MatrixConfig,
        physics: Box<dyn PhysicsField>,
        similarity: SimilarityTable,
    ) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let metrics = PixelMetrics::new(config.font_size);
        Self {
            config,
            buffer: LayeredBuffer::new(IntPoint::ZERO, DEFAULT_BACKGROUND),
            tree: ElementTree::new(metrics),
            physics,
            similarity,
            rng,
            queue: Vec::new(),
            pending_move: None,
            pointer_down: false,
            mobile: None,
            pixel_size: (0.0, 0.0),
        }
    }

    pub fn config(&self) -> &MatrixConfig {
        &self.config
    }

    /// Grid dimensions in cells
    pub fn size(&self) -> IntPoint {
        self.buffer.size()
    }

    pub fn is_mobile(&self) -> bool {
        self.mobile.unwrap_or(false)
    }

    pub fn buffer(&self) -> &LayeredBuffer {
        &self.buffer
    }

    pub fn tree(&self) -> &ElementTree {
        &self.tree
    }

    pub fn similarity(&self) -> &SimilarityTable {
        &self.similarity
    }

    // ========================================================================
    // Tree construction
    // ========================================================================

    pub fn create_container(&mut self, config: NodeConfig, layout: ContainerLayout) -> NodeId {
        self.tree.create(config, NodeKind::Container(layout))
    }

    pub fn create_text(&mut self, config: NodeConfig, text: TextContent) -> NodeId {
        self.tree.create(config, NodeKind::Text(text))
    }

    pub fn create_foreign(&mut self, config: NodeConfig, tag: impl Into<String>) -> NodeId {
        self.tree
            .create(config, NodeKind::Foreign(ForeignContent::new(tag)))
    }

    pub fn set_children(&mut self, id: NodeId, children: &[NodeId]) {
        self.tree.set_children(id, children);
    }

    pub fn set_root(&mut self, id: NodeId) {
        self.tree.set_root(id);
    }

    pub fn set_text(&mut self, id: NodeId, text: &str) {
        self.tree.set_text(id, text);
    }

    pub fn start_transition(&mut self, id: NodeId, direction: Direction) {
        self.tree.start_transition(id, direction);
    }

    pub fn watch(&mut self, id: NodeId) {
        self.tree.watch(id);
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.tree.get(id)
    }

    /// Registered node with `key`
    pub fn element(&self, key: &str) -> Option<NodeId> {
        let found = self.tree.lookup(key);
        if found.is_none() {
            tracing::debug!(key, "No element registered under key");
        }
        found
    }

    pub fn root(&self) -> Option<NodeId> {
        self.tree.root()
    }

    // ========================================================================
    // Input
    // ========================================================================

    /// Record the pointer position; only the latest move per frame counts
    pub fn pointer_move(&mut self, nx: f64, ny: f64) {
        self.pending_move = Some(NormPoint::new(nx, ny));
    }

    pub fn pointer_down(&mut self, nx: f64, ny: f64) {
        self.queue.push(InputEvent::PointerDown(NormPoint::new(nx, ny)));
    }

    pub fn pointer_up(&mut self) {
        self.queue.push(InputEvent::PointerUp);
    }

    /// Scroll by `lines` at a normalized position; positive scrolls down
    pub fn scroll(&mut self, nx: f64, ny: f64, lines: i32) {
        self.queue.push(InputEvent::Scroll {
            at: NormPoint::new(nx, ny),
            lines,
        });
    }

    /// Host surface size in pixels
    pub fn resize(&mut self, width: f64, height: f64) {
        self.queue.push(InputEvent::Resize { width, height });
    }

    // ========================================================================
    // Frame
    // ========================================================================

    /// Run one frame
    pub fn update(&mut self) {
        self.tree.prune();
        self.process_input();
        self.tree.paint(&mut self.buffer);
        self.tree
            .run_animations(&mut self.buffer, &self.similarity, &mut self.rng);
        self.tree.process_signals();
        self.compose();
    }

    /// Advance the physics field one step
    pub fn step_physics(&mut self) {
        self.physics.step();
    }

    fn grid_point(&self, p: NormPoint) -> RealPoint {
        let size = self.buffer.size();
        RealPoint::new(p.x() * f64::from(size.x), p.y() * f64::from(size.y))
    }

    fn process_input(&mut self) {
        if let Some(p) = self.pending_move.take() {
            if self.pointer_down {
                self.physics.set_attractor(Some((p.x(), p.y())));
            }
            let point = self.grid_point(p);
            self.tree.pointer_move(point);
        }

        let mut resized = false;
        let events = std::mem::take(&mut self.queue);
        for event in events.into_iter().rev() {
            match event {
                InputEvent::PointerDown(p) => {
                    self.pointer_down = true;
                    self.physics.set_attractor(Some((p.x(), p.y())));
                    let point = self.grid_point(p);
                    self.tree.pointer_down(point);
                }
                InputEvent::PointerUp => {
                    self.pointer_down = false;
                    self.physics.set_attractor(None);
                }
                InputEvent::Scroll { at, lines } => {
                    let point = self.grid_point(at);
                    self.tree.scroll(point, lines);
                }
                // older resizes are superseded by the newest one
                InputEvent::Resize { width, height } if !resized => {
                    resized = true;
                    self.apply_resize(width, height);
                }
                InputEvent::Resize { .. } => {}
            }
        }
    }

    fn apply_resize(&mut self, width: f64, height: f64) {
        let dims = self.tree.metrics.grid_size(width, height);
        self.pixel_size = (width, height);
        if dims == self.buffer.size() && self.mobile.is_some() {
            return;
        }
        tracing::debug!(columns = dims.x, rows = dims.y, "View resized");

        let mobile = dims.x < self.config.mobile_width;
        self.buffer.resize(dims);
        self.physics
            .resize(width, height, self.config.particles(mobile));
        self.tree.set_frame(dims);
        self.tree.resize_root();
        self.tree.clear_requested = true;
        if let Some(root) = self.tree.root() {
            self.tree.flag_redraw(root);
        }

        if self.mobile.is_some_and(|was| was != mobile) {
            tracing::info!(mobile, "Breakpoint changed");
            self.tree.events.push(ViewEvent::BreakpointChanged { mobile });
        }
        self.mobile = Some(mobile);
    }

    fn compose(&mut self) {
        let size = self.buffer.size();
        let (columns, rows) = (f64::from(size.x.max(1)), f64::from(size.y.max(1)));
        let physics = &self.physics;
        let table = &self.similarity;
        let scale = self.config.physics_scale;
        let max_index = self.config.max_similarity_index;

        self.buffer.compose(|ch, p| {
            if !table.contains(ch) {
                return ch;
            }
            let sample = physics.sample(f64::from(p.x) / columns, f64::from(p.y) / rows);
            let index = ((sample.abs() * scale).floor() as usize).min(max_index);
            table.substitute(ch, index)
        });
    }

    // ========================================================================
    // Output
    // ========================================================================

    /// The output layer as newline-joined rows
    pub fn surface(&self) -> String {
        self.buffer.surface()
    }

    /// Events produced since the last drain
    pub fn drain_events(&mut self) -> Vec<ViewEvent> {
        std::mem::take(&mut self.tree.events)
    }

    pub fn placements(&self) -> impl Iterator<Item = &Placement> {
        self.tree.placements()
    }

    pub fn cursor(&self) -> CursorHint {
        self.tree.cursor()
    }

    /// Last host size passed to [`MatrixView::resize`]
    pub fn pixel_size(&self) -> (f64, f64) {
        self.pixel_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::StillField;

    fn view() -> MatrixView {
        let config = MatrixConfig {
            seed: Some(1),
            ..MatrixConfig::default()
        };
        MatrixView::new(config, Box::new(StillField), SimilarityTable::builtin())
    }

    #[test]
    fn test_resize_sets_grid_dimensions() {
        let mut view = view();
        view.resize(80.0, 48.0);
        view.update();
        assert_eq!(view.size(), IntPoint::new(10, 3));
        assert_eq!(view.buffer().output().size(), IntPoint::new(10, 3));
        assert_eq!(view.buffer().animation().size(), IntPoint::new(10, 3));
    }

    #[test]
    fn test_newest_resize_wins() {
        let mut view = view();
        view.resize(80.0, 48.0);
        view.resize(160.0, 32.0);
        view.update();
        assert_eq!(view.size(), IntPoint::new(20, 2));
    }

    #[test]
    fn test_first_resize_emits_no_breakpoint() {
        let mut view = view();
        view.resize(80.0, 48.0);
        view.update();
        assert!(view.is_mobile());
        assert!(view.drain_events().is_empty());
    }
}
