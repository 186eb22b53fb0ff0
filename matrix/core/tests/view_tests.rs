//! View Integration Tests
//!
//! Input handling, resize and compositing through whole frames.

use std::collections::HashMap;

use matrix_core::{
    Alignment, AnimationConfig, AnimationUse, ContainerLayout, CursorHint, Direction,
    HoverTransform, MatrixConfig, MatrixView, NodeConfig, NodeId, Padding, PhysicsField,
    PixelRect, Placement, PlacementKind, SimilarityTable, Stage, StillField, TextContent,
    ViewEvent,
};
use pretty_assertions::assert_eq;

/// A field displaced by the same amount everywhere
struct ConstantField(f64);

impl PhysicsField for ConstantField {
    fn sample(&self, _nx: f64, _ny: f64) -> f64 {
        self.0
    }

    fn resize(&mut self, _pixel_width: f64, _pixel_height: f64, _particles: usize) {}

    fn step(&mut self) {}

    fn set_attractor(&mut self, _position: Option<(f64, f64)>) {}
}

fn config() -> MatrixConfig {
    MatrixConfig {
        seed: Some(3),
        ..MatrixConfig::default()
    }
}

/// A view sized to `width` x `height` pixels at the default 16px font
fn sized(width: f64, height: f64) -> MatrixView {
    let mut view = MatrixView::new(config(), Box::new(StillField), SimilarityTable::builtin());
    view.resize(width, height);
    view.update();
    view
}

/// Attach `root`, enter it and settle one frame
fn mount(view: &mut MatrixView, root: NodeId) {
    view.set_root(root);
    view.start_transition(root, Direction::Enter);
    view.update();
    view.drain_events();
}

fn clicked(events: &[ViewEvent]) -> Vec<String> {
    events
        .iter()
        .filter_map(|e| match e {
            ViewEvent::Clicked { key } => Some(key.clone()),
            _ => None,
        })
        .collect()
}

// =============================================================================
// Resize
// =============================================================================

#[test]
fn test_breakpoint_change_is_reported_once() {
    let mut view = sized(800.0, 480.0);
    assert_eq!(view.size().x, 100);
    assert!(!view.is_mobile());
    assert!(view.drain_events().is_empty());

    view.resize(400.0, 480.0);
    view.update();
    assert_eq!(
        view.drain_events(),
        vec![ViewEvent::BreakpointChanged { mobile: true }]
    );

    view.resize(320.0, 480.0);
    view.update();
    assert!(view.drain_events().is_empty());
    assert_eq!(view.size().x, 40);
}

#[test]
fn test_root_follows_frame_size() {
    let mut view = sized(80.0, 48.0);
    let root = view.create_container(NodeConfig::new("root").fill(), ContainerLayout::column());
    mount(&mut view, root);

    view.resize(160.0, 80.0);
    view.update();
    assert_eq!(
        view.node(root).map(|n| n.size()),
        Some(matrix_core::IntPoint::new(20, 5))
    );
}

// =============================================================================
// Compositing
// =============================================================================

#[test]
fn test_glyphs_missing_from_table_pass_through() {
    let table = SimilarityTable::from_map(HashMap::from([('a', vec!['b'])]));
    let mut view = MatrixView::new(config(), Box::new(ConstantField(1.0)), table);
    view.resize(32.0, 16.0);
    view.update();

    let root = view.create_text(
        NodeConfig::new("root").fill().with_background('x'),
        TextContent::new("ab"),
    );
    view.set_root(root);
    view.start_transition(root, Direction::Enter);
    view.update();

    // 'a' is substituted at index 10, clamped to its last entry
    assert_eq!(view.surface(), "bbxx");
    assert_eq!(view.buffer().content().to_text(), "abxx");
}

#[test]
fn test_queued_root_stays_off_the_output() {
    let mut view = sized(32.0, 16.0);
    let root = view.create_text(
        NodeConfig::new("root").fill().with_background('.'),
        TextContent::new("hi"),
    );
    view.set_root(root);
    view.update();

    assert_eq!(view.buffer().content().to_text(), "hi..");
    assert_ne!(view.surface(), "hi..");
}

#[test]
fn test_centered_child_lands_mid_grid() {
    let mut view = sized(80.0, 48.0);
    let root = view.create_container(
        NodeConfig::new("root").fill().with_background('.'),
        ContainerLayout::row()
            .with_justify(matrix_core::Alignment::Center)
            .with_align(matrix_core::Alignment::Center),
    );
    let label = view.create_text(NodeConfig::new("label"), TextContent::new("hi"));
    view.set_root(root);
    view.set_children(root, &[label]);
    view.start_transition(root, Direction::Enter);
    view.update();

    assert_eq!(view.surface(), "..........\n....hi....\n..........");
}

// =============================================================================
// Pointer
// =============================================================================

fn clickable_pair(view: &mut MatrixView) -> (NodeId, NodeId) {
    let root = view.create_container(
        NodeConfig::new("root").fill().clickable(),
        ContainerLayout::column(),
    );
    let button = view.create_container(
        NodeConfig::new("button")
            .with_size(4, 2)
            .clickable()
            .with_cursor(CursorHint::Pointer),
        ContainerLayout::column(),
    );
    view.set_root(root);
    view.set_children(root, &[button]);
    view.start_transition(root, Direction::Enter);
    view.update();
    view.drain_events();
    (root, button)
}

#[test]
fn test_clicks_reach_every_node_innermost_first() {
    let mut view = sized(80.0, 48.0);
    clickable_pair(&mut view);

    view.pointer_down(0.05, 0.1);
    view.pointer_up();
    view.update();
    assert_eq!(clicked(&view.drain_events()), vec!["button", "root"]);

    view.pointer_down(0.95, 0.9);
    view.update();
    assert_eq!(clicked(&view.drain_events()), vec!["root"]);
}

#[test]
fn test_cursor_follows_deepest_node() {
    let mut view = sized(80.0, 48.0);
    clickable_pair(&mut view);

    view.pointer_move(0.05, 0.1);
    view.update();
    assert_eq!(view.cursor(), CursorHint::Pointer);

    view.pointer_move(0.95, 0.9);
    view.update();
    assert_eq!(view.cursor(), CursorHint::Default);
}

#[test]
fn test_hover_transform_restores_text_on_leave() {
    let mut view = sized(80.0, 48.0);
    let root = view.create_container(NodeConfig::new("root").fill(), ContainerLayout::column());
    let label = view.create_text(
        NodeConfig::new("label"),
        TextContent::new("hi").with_hover(HoverTransform::Uppercase),
    );
    view.set_root(root);
    view.set_children(root, &[label]);
    view.start_transition(root, Direction::Enter);
    view.update();

    let text = |view: &MatrixView| view.node(label).and_then(|n| n.text()).map(TextContent::text);

    view.pointer_move(0.05, 0.1);
    view.update();
    assert_eq!(text(&view), Some("HI".to_string()));

    view.pointer_move(0.95, 0.9);
    view.update();
    assert_eq!(text(&view), Some("hi".to_string()));
}

#[test]
fn test_scroll_is_clamped_to_content() {
    let mut view = sized(32.0, 32.0);
    let root = view.create_text(
        NodeConfig::new("root").fill().scrollable(),
        TextContent::new("a\nb\nc\nd"),
    );
    mount(&mut view, root);

    let offset = |view: &MatrixView| view.node(root).map(|n| n.scroll_offset().y);

    view.scroll(0.1, 0.5, 1);
    view.update();
    assert_eq!(offset(&view), Some(-1));

    view.scroll(0.1, 0.5, 10);
    view.update();
    assert_eq!(offset(&view), Some(-2));

    view.scroll(0.1, 0.5, -10);
    view.update();
    assert_eq!(offset(&view), Some(0));

    let region = view
        .placements()
        .find(|p| p.key == "root")
        .map(|p| (p.kind.clone(), p.rect.height));
    assert_eq!(
        region,
        Some((PlacementKind::ScrollRegion { content_height: 64.0 }, 32.0))
    );
}

// =============================================================================
// Foreign placements
// =============================================================================

fn foreign_placement<'a>(view: &'a MatrixView, key: &str) -> Option<&'a Placement> {
    view.placements()
        .find(|p| p.key == key && matches!(p.kind, PlacementKind::Foreign { .. }))
}

fn rect(left: f64, top: f64, width: f64, height: f64) -> PixelRect {
    PixelRect {
        left,
        top,
        width,
        height,
    }
}

#[test]
fn test_foreign_placement_waits_for_entering_ancestor() {
    let mut view = sized(80.0, 48.0);
    let root = view.create_container(
        NodeConfig::new("root")
            .fill()
            .with_padding(Padding::uniform(1))
            .with_entrance(AnimationConfig::diagonal_swipe(2, AnimationUse::Entrance)),
        ContainerLayout::column(),
    );
    let video = view.create_foreign(NodeConfig::new("video").with_size(4, 1), "clip");
    view.set_root(root);
    view.set_children(root, &[video]);
    view.start_transition(root, Direction::Enter);

    view.update();
    assert_eq!(view.node(root).map(|n| n.stage()), Some(Stage::Entering));
    assert!(foreign_placement(&view, "video").is_none());

    for _ in 0..200 {
        if view.node(root).map(|n| n.stage()) == Some(Stage::Main) {
            break;
        }
        view.update();
    }
    assert_eq!(view.node(root).map(|n| n.stage()), Some(Stage::Main));

    view.update();
    let placement = foreign_placement(&view, "video").cloned();
    assert_eq!(
        placement,
        Some(Placement {
            key: "video".to_string(),
            kind: PlacementKind::Foreign {
                tag: "clip".to_string()
            },
            rect: rect(8.0, 16.0, 32.0, 16.0),
        })
    );
}

#[test]
fn test_foreign_placement_follows_layout_changes() {
    let mut view = sized(80.0, 48.0);
    let root = view.create_container(
        NodeConfig::new("root").fill(),
        ContainerLayout::row().with_justify(Alignment::Center),
    );
    let video = view.create_foreign(NodeConfig::new("video").with_size(4, 1), "clip");
    view.set_root(root);
    view.set_children(root, &[video]);
    view.start_transition(root, Direction::Enter);
    view.update();
    view.update();

    // 10 columns: the child starts at column 3
    assert_eq!(
        foreign_placement(&view, "video").map(|p| p.rect),
        Some(rect(24.0, 0.0, 32.0, 16.0))
    );

    // 20 columns: column 8
    view.resize(160.0, 48.0);
    view.update();
    assert_eq!(
        foreign_placement(&view, "video").map(|p| p.rect),
        Some(rect(64.0, 0.0, 32.0, 16.0))
    );
}

#[test]
fn test_foreign_placement_follows_scroll() {
    let mut view = sized(32.0, 32.0);
    let root = view.create_container(
        NodeConfig::new("root").fill().scrollable(),
        ContainerLayout::column(),
    );
    let lines = view.create_text(NodeConfig::new("lines"), TextContent::new("a\nb\nc"));
    let video = view.create_foreign(NodeConfig::new("video").with_size(2, 1), "clip");
    view.set_root(root);
    view.set_children(root, &[lines, video]);
    view.start_transition(root, Direction::Enter);
    view.update();
    view.update();

    assert_eq!(
        foreign_placement(&view, "video").map(|p| p.rect),
        Some(rect(0.0, 48.0, 16.0, 16.0))
    );

    view.scroll(0.1, 0.5, 1);
    view.update();
    assert_eq!(view.node(root).map(|n| n.scroll_offset().y), Some(-1));
    assert_eq!(
        foreign_placement(&view, "video").map(|p| p.rect),
        Some(rect(0.0, 32.0, 16.0, 16.0))
    );
}

#[test]
fn test_foreign_placement_removed_on_exit() {
    let mut view = sized(80.0, 48.0);
    let root = view.create_container(NodeConfig::new("root").fill(), ContainerLayout::column());
    let video = view.create_foreign(NodeConfig::new("video").with_size(4, 1), "clip");
    view.set_root(root);
    view.set_children(root, &[video]);
    view.start_transition(root, Direction::Enter);
    view.update();
    view.update();
    assert!(foreign_placement(&view, "video").is_some());

    view.start_transition(video, Direction::Exit);
    assert!(foreign_placement(&view, "video").is_none());

    view.update();
    assert!(foreign_placement(&view, "video").is_none());
}

#[test]
fn test_foreign_placement_removed_when_replaced() {
    let mut view = sized(80.0, 48.0);
    let root = view.create_container(NodeConfig::new("root").fill(), ContainerLayout::column());
    let video = view.create_foreign(NodeConfig::new("video").with_size(4, 1), "clip");
    view.set_root(root);
    view.set_children(root, &[video]);
    view.start_transition(root, Direction::Enter);
    view.update();
    view.update();
    assert!(foreign_placement(&view, "video").is_some());

    view.set_children(root, &[]);
    assert!(view.node(video).is_none());
    assert!(foreign_placement(&view, "video").is_none());

    view.update();
    assert!(foreign_placement(&view, "video").is_none());
}
