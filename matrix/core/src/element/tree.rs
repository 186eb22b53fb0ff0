//! Node arena, key registry and tree edits

use std::collections::{BTreeMap, HashMap, VecDeque};

use crate::events::ViewEvent;
use crate::geometry::{Axis, IntPoint};
use crate::glyphs::DEFAULT_BACKGROUND;
use crate::placement::{PixelMetrics, Placement, PlacementRole};
use crate::sequence::{Direction, TransitionSequence};

use super::transition::Signal;
use super::{CursorHint, Node, NodeConfig, NodeId, NodeKind, Sizing, Stage};

struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// Arena owning every node of one view
pub struct ElementTree {
    slots: Vec<Slot>,
    free: Vec<u32>,
    pub(crate) root: Option<NodeId>,
    /// Grid dimensions the root is laid out against
    pub(crate) frame: IntPoint,
    registry: HashMap<String, NodeId>,
    pub(crate) placements: BTreeMap<(String, PlacementRole), Placement>,
    pub(crate) metrics: PixelMetrics,
    pub(crate) signals: VecDeque<Signal>,
    pub(crate) events: Vec<ViewEvent>,
    pub(crate) cursor: CursorHint,
    pub(crate) clear_requested: bool,
}

impl ElementTree {
    pub fn new(metrics: PixelMetrics) -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            root: None,
            frame: IntPoint::ZERO,
            registry: HashMap::new(),
            placements: BTreeMap::new(),
            metrics,
            signals: VecDeque::new(),
            events: Vec::new(),
            cursor: CursorHint::Default,
            clear_requested: false,
        }
    }

    // ========================================================================
    // Arena
    // ========================================================================

    /// Add a detached node
    pub fn create(&mut self, config: NodeConfig, kind: NodeKind) -> NodeId {
        let node = Node::new(config, kind);
        let id = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.node = Some(node);
                NodeId::new(index, slot.generation)
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot {
                    generation: 0,
                    node: Some(node),
                });
                NodeId::new(index, 0)
            }
        };
        self.reprocess(id);
        id
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.slots
            .get(id.index())
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.node.as_ref())
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots
            .get_mut(id.index())
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.node.as_mut())
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    /// Number of live nodes
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.node.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn frame(&self) -> IntPoint {
        self.frame
    }

    pub(crate) fn set_frame(&mut self, frame: IntPoint) {
        self.frame = frame.clamp_non_negative();
    }

    /// Node registered under `key`
    pub fn lookup(&self, key: &str) -> Option<NodeId> {
        self.registry.get(key).copied()
    }

    pub fn cursor(&self) -> CursorHint {
        self.cursor
    }

    pub fn placements(&self) -> impl Iterator<Item = &Placement> {
        self.placements.values()
    }

    pub fn placement(&self, key: &str, role: PlacementRole) -> Option<&Placement> {
        self.placements.get(&(key.to_string(), role))
    }

    pub(crate) fn children_of(&self, id: NodeId) -> Vec<NodeId> {
        self.get(id).map(|n| n.children.clone()).unwrap_or_default()
    }

    /// Parent background, or the view default for the root
    pub(crate) fn backdrop_of(&self, id: NodeId) -> char {
        self.get(id)
            .and_then(|n| n.parent)
            .and_then(|p| self.get(p))
            .map_or(DEFAULT_BACKGROUND, |p| p.background)
    }

    pub(crate) fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = self.get(id).and_then(|n| n.parent);
        while let Some(p) = current {
            if p == ancestor {
                return true;
            }
            current = self.get(p).and_then(|n| n.parent);
        }
        false
    }

    pub(crate) fn has_ancestor_in(&self, id: NodeId, stage: Stage) -> bool {
        let mut current = self.get(id).and_then(|n| n.parent);
        while let Some(p) = current {
            match self.get(p) {
                Some(node) if node.stage == stage => return true,
                Some(node) => current = node.parent,
                None => return false,
            }
        }
        false
    }

    // ========================================================================
    // Tree edits
    // ========================================================================

    /// Replace the children of `id`
    ///
    /// Children may come from elsewhere in the tree; they are detached from
    /// their old parent first. Previous children that are not kept are
    /// destroyed.
    pub fn set_children(&mut self, id: NodeId, children: &[NodeId]) {
        if !self.contains(id) {
            tracing::warn!(?id, "set_children on a stale node");
            return;
        }

        let mut accepted: Vec<NodeId> = Vec::with_capacity(children.len());
        for &child in children {
            if !self.contains(child) {
                tracing::warn!(?child, "Skipping stale child");
            } else if child == id || self.is_ancestor(child, id) || self.root == Some(child) {
                tracing::warn!(?child, parent = ?id, "Skipping child that would form a cycle");
            } else if accepted.contains(&child) {
                tracing::warn!(?child, "Skipping duplicate child");
            } else {
                accepted.push(child);
            }
        }

        let old = self.children_of(id);
        for child in old.iter().filter(|c| !accepted.contains(*c)) {
            self.destroy(*child);
        }

        for &child in &accepted {
            let previous = self.get(child).and_then(|c| c.parent);
            if let Some(previous) = previous.filter(|p| *p != id) {
                self.detach(child, previous);
            }
            if let Some(node) = self.get_mut(child) {
                node.parent = Some(id);
            }
            self.enforce_sizing(id, child);
        }

        let (on_view, stage, entrance_timing, exit_timing) = match self.get_mut(id) {
            Some(node) => {
                node.children = accepted.clone();
                (node.on_view, node.stage, node.entrance_timing, node.exit_timing)
            }
            None => return,
        };

        if on_view {
            for &child in &accepted {
                self.register(child);
            }
        }

        if let Some(node) = self.get_mut(id) {
            node.entrance =
                TransitionSequence::of_nodes(&accepted, entrance_timing, Direction::Enter);
            if !matches!(stage, Stage::Exiting | Stage::Exited) {
                node.exit = TransitionSequence::of_nodes(&accepted, exit_timing, Direction::Exit);
            }
        }

        self.resize_children(id);
        self.reprocess(id);
        self.flag_redraw(id);

        if stage == Stage::Entering {
            self.start_sequence(id, Direction::Enter);
        }
    }

    /// Make `id` the root, destroying the previous root's subtree
    pub fn set_root(&mut self, id: NodeId) {
        let Some(parent) = self.get(id).map(|n| n.parent) else {
            tracing::warn!(?id, "set_root with a stale node");
            return;
        };
        if let Some(parent) = parent {
            self.detach(id, parent);
        }
        if let Some(old) = self.root.filter(|old| *old != id) {
            self.root = None;
            self.destroy(old);
        }
        self.root = Some(id);
        self.register(id);
        self.resize_root();
        self.clear_requested = true;
        self.flag_redraw(id);
    }

    /// Remove `child` from `parent`'s child list without destroying it
    fn detach(&mut self, child: NodeId, parent: NodeId) {
        let stage = match self.get_mut(parent) {
            Some(p) => {
                p.children.retain(|c| *c != child);
                p.stage
            }
            None => return,
        };
        self.rebuild_sequences(parent, stage);
        if let Some(node) = self.get_mut(child) {
            node.parent = None;
        }
        if self.get(parent).is_some_and(|p| p.on_view) {
            self.unregister(child);
        }
        self.handle_child_resize(parent);
    }

    pub(crate) fn rebuild_sequences(&mut self, id: NodeId, stage: Stage) {
        if let Some(node) = self.get_mut(id) {
            if node.entrance.state() == crate::sequence::SequenceState::Idle {
                node.entrance = TransitionSequence::of_nodes(
                    &node.children,
                    node.entrance_timing,
                    Direction::Enter,
                );
            }
            if !matches!(stage, Stage::Exiting | Stage::Exited) {
                node.exit =
                    TransitionSequence::of_nodes(&node.children, node.exit_timing, Direction::Exit);
            }
        }
    }

    /// Relative sizing under a content-sized parent would be circular
    fn enforce_sizing(&mut self, parent: NodeId, child: NodeId) {
        let Some(parent_sizing) = self.get(parent).map(|p| p.sizing) else {
            return;
        };
        let Some(node) = self.get_mut(child) else {
            return;
        };
        for axis in Axis::ALL {
            if parent_sizing.get(axis).is_content()
                && matches!(node.sizing.get(axis), Sizing::Relative(_))
            {
                tracing::warn!(
                    key = %node.key,
                    ?axis,
                    "Relative size under a content-sized parent, using content sizing"
                );
                node.sizing.set(axis, Sizing::Content);
            }
        }
    }

    /// Unregister and free a subtree, unlinking it from its parent
    pub fn destroy(&mut self, id: NodeId) {
        let Some(parent) = self.get(id).map(|n| n.parent) else {
            return;
        };
        if let Some(parent) = parent {
            if let Some(p) = self.get_mut(parent) {
                p.children.retain(|c| *c != id);
            }
        }
        if self.root == Some(id) {
            self.root = None;
        }
        self.unregister(id);
        self.free_subtree(id);
    }

    fn free_subtree(&mut self, id: NodeId) {
        let children = self.children_of(id);
        for child in children {
            self.free_subtree(child);
        }
        if let Some(slot) = self.slots.get_mut(id.index()) {
            if slot.generation == id.generation() && slot.node.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(id.index() as u32);
            }
        }
    }

    // ========================================================================
    // Registry
    // ========================================================================

    pub(crate) fn register(&mut self, id: NodeId) {
        let Some(node) = self.get_mut(id) else {
            return;
        };
        node.on_view = true;
        let key = node.key.clone();
        let children = node.children.clone();

        if let Some(existing) = self.registry.insert(key.clone(), id) {
            if existing != id && self.contains(existing) {
                tracing::warn!(key = %key, "Key registered twice, newest node wins");
            }
        } else {
            tracing::debug!(key = %key, "Registered element");
        }
        for child in children {
            self.register(child);
        }
    }

    pub(crate) fn unregister(&mut self, id: NodeId) {
        let Some(node) = self.get_mut(id) else {
            return;
        };
        node.on_view = false;
        node.mouse_inside = false;
        let key = node.key.clone();
        let children = node.children.clone();

        if self.registry.get(&key) == Some(&id) {
            self.registry.remove(&key);
            self.placements.remove(&(key.clone(), PlacementRole::Foreign));
            self.placements.remove(&(key.clone(), PlacementRole::ScrollRegion));
            tracing::debug!(key = %key, "Unregistered element");
        }
        for child in children {
            self.unregister(child);
        }
    }

    // ========================================================================
    // Pruning
    // ========================================================================

    /// Destroy exited nodes whose ancestors are not exiting
    pub fn prune(&mut self) {
        if let Some(root) = self.root {
            self.prune_node(root);
        }
    }

    fn prune_node(&mut self, id: NodeId) {
        let Some(node) = self.get(id) else {
            return;
        };
        if node.stage == Stage::Exiting {
            return;
        }
        let stage = node.stage;
        let exited: Vec<NodeId> = node
            .children
            .iter()
            .copied()
            .filter(|c| self.get(*c).is_some_and(|n| n.stage == Stage::Exited))
            .collect();

        if !exited.is_empty() {
            for child in &exited {
                if let Some(n) = self.get(*child) {
                    tracing::debug!(key = %n.key, "Pruning exited element");
                }
                self.destroy(*child);
            }
            self.rebuild_sequences(id, stage);
            self.resize_children(id);
            self.reprocess(id);
            self.flag_redraw(id);
        }

        for child in self.children_of(id) {
            self.prune_node(child);
        }
    }

    // ========================================================================
    // Positioning
    // ========================================================================

    /// Screen position of a node's top-left corner
    pub(crate) fn screen_origin(&self, id: NodeId) -> IntPoint {
        let mut origin = IntPoint::ZERO;
        let mut current = Some(id);
        while let Some(node_id) = current {
            let Some(node) = self.get(node_id) else {
                break;
            };
            origin = origin + node.offset;
            if let Some(parent) = node.parent.and_then(|p| self.get(p)) {
                origin = origin + parent.scroll_offset;
            }
            current = node.parent;
        }
        origin
    }

    /// Cells of `id`, in local coordinates, not clipped by any ancestor
    pub(crate) fn visible_points(&self, id: NodeId) -> Vec<IntPoint> {
        let Some(node) = self.get(id) else {
            return Vec::new();
        };
        let mut points = Vec::with_capacity(node.size.area());
        for y in 0..node.size.y {
            for x in 0..node.size.x {
                let p = IntPoint::new(x, y);
                if self.is_visible(id, p) {
                    points.push(p);
                }
            }
        }
        points
    }

    fn is_visible(&self, id: NodeId, p: IntPoint) -> bool {
        let mut current = id;
        let mut q = p;
        loop {
            let Some(node) = self.get(current) else {
                return false;
            };
            match node.parent.and_then(|pid| self.get(pid).map(|parent| (pid, parent))) {
                Some((pid, parent)) => {
                    let in_parent = node.offset + parent.scroll_offset + q;
                    let local = in_parent - parent.content_offset();
                    let area = parent.content_area();
                    if local.x < 0 || local.y < 0 || local.x >= area.x || local.y >= area.y {
                        return false;
                    }
                    q = in_parent;
                    current = pid;
                }
                None => {
                    if self.root != Some(current) {
                        return false;
                    }
                    let screen = node.offset + q;
                    return screen.x >= 0
                        && screen.y >= 0
                        && screen.x < self.frame.x
                        && screen.y < self.frame.y;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ContainerLayout;

    fn container(tree: &mut ElementTree, config: NodeConfig) -> NodeId {
        tree.create(config, NodeKind::Container(ContainerLayout::new(Axis::Y)))
    }

    #[test]
    fn test_stale_handles_do_not_alias() {
        let mut tree = ElementTree::new(PixelMetrics::default());
        let a = container(&mut tree, NodeConfig::new("a"));
        tree.destroy(a);
        let b = container(&mut tree, NodeConfig::new("b"));
        assert_eq!(a.index(), b.index());
        assert!(tree.get(a).is_none());
        assert_eq!(tree.get(b).map(Node::key), Some("b"));
    }

    #[test]
    fn test_registration_deferred_until_attached_under_root() {
        let mut tree = ElementTree::new(PixelMetrics::default());
        tree.set_frame(IntPoint::new(20, 10));
        let root = container(&mut tree, NodeConfig::new("root").fill());
        let child = container(&mut tree, NodeConfig::new("child"));
        let grandchild = container(&mut tree, NodeConfig::new("grandchild"));

        tree.set_children(child, &[grandchild]);
        assert_eq!(tree.lookup("grandchild"), None);

        tree.set_root(root);
        tree.set_children(root, &[child]);
        assert_eq!(tree.lookup("child"), Some(child));
        assert_eq!(tree.lookup("grandchild"), Some(grandchild));
    }

    #[test]
    fn test_set_children_destroys_replaced_children() {
        let mut tree = ElementTree::new(PixelMetrics::default());
        tree.set_frame(IntPoint::new(20, 10));
        let root = container(&mut tree, NodeConfig::new("root").fill());
        let a = container(&mut tree, NodeConfig::new("a"));
        let b = container(&mut tree, NodeConfig::new("b"));
        tree.set_root(root);
        tree.set_children(root, &[a, b]);
        tree.set_children(root, &[b]);

        assert!(!tree.contains(a));
        assert_eq!(tree.lookup("a"), None);
        assert_eq!(tree.get(root).map(|n| n.children().to_vec()), Some(vec![b]));
    }

    #[test]
    fn test_reparenting_moves_child() {
        let mut tree = ElementTree::new(PixelMetrics::default());
        let left = container(&mut tree, NodeConfig::new("left"));
        let right = container(&mut tree, NodeConfig::new("right"));
        let item = container(&mut tree, NodeConfig::new("item"));
        tree.set_children(left, &[item]);
        tree.set_children(right, &[item]);

        assert!(tree.get(left).is_some_and(|n| n.children().is_empty()));
        assert_eq!(tree.get(item).and_then(Node::parent), Some(right));
    }

    #[test]
    fn test_cycles_are_rejected() {
        let mut tree = ElementTree::new(PixelMetrics::default());
        let a = container(&mut tree, NodeConfig::new("a"));
        let b = container(&mut tree, NodeConfig::new("b"));
        tree.set_children(a, &[b]);
        tree.set_children(b, &[a]);

        assert!(tree.get(b).is_some_and(|n| n.children().is_empty()));
        assert_eq!(tree.get(a).and_then(Node::parent), None);
    }

    #[test]
    fn test_set_root_replaces_previous_root() {
        let mut tree = ElementTree::new(PixelMetrics::default());
        tree.set_frame(IntPoint::new(10, 5));
        let first = container(&mut tree, NodeConfig::new("first").fill());
        let second = container(&mut tree, NodeConfig::new("second").fill());
        tree.set_root(first);
        tree.set_root(second);

        assert!(!tree.contains(first));
        assert_eq!(tree.root(), Some(second));
        assert_eq!(tree.get(second).map(Node::size), Some(IntPoint::new(10, 5)));
    }

    #[test]
    fn test_clipped_points_are_not_visible() {
        let mut tree = ElementTree::new(PixelMetrics::default());
        tree.set_frame(IntPoint::new(4, 4));
        let root = container(&mut tree, NodeConfig::new("root").fill());
        let child = container(&mut tree, NodeConfig::new("child").with_size(3, 3));
        tree.set_root(root);
        tree.set_children(root, &[child]);
        if let Some(node) = tree.get_mut(child) {
            node.offset = IntPoint::new(2, 2);
        }

        let points = tree.visible_points(child);
        assert_eq!(
            points,
            vec![
                IntPoint::new(0, 0),
                IntPoint::new(1, 0),
                IntPoint::new(0, 1),
                IntPoint::new(1, 1)
            ]
        );
    }
}
