//! Pointer hit-testing

use crate::animation::{Animation, AnimationConfig};
use crate::events::ViewEvent;
use crate::geometry::{IntPoint, RealPoint};

use super::transition::RunningAnimation;
use super::tree::ElementTree;
use super::{CursorHint, Node, NodeId, Stage};

fn contains(node: &Node, p: RealPoint) -> bool {
    p.x >= 0.0 && p.y >= 0.0 && p.x < f64::from(node.size.x) && p.y < f64::from(node.size.y)
}

/// Translate a point from a parent's frame into a child's
fn into_child(parent: &Node, child: &Node, p: RealPoint) -> RealPoint {
    p - parent.scroll_offset - child.offset
}

impl ElementTree {
    /// Dispatch a pointer position in grid cells
    ///
    /// Nodes entering or leaving the pointer run their enter/exit
    /// animations, and the deepest node under the pointer picks the cursor.
    pub fn pointer_move(&mut self, p: RealPoint) {
        let mut cursor = None;
        if let Some(root) = self.root {
            let offset = self.get(root).map_or(IntPoint::ZERO, |n| n.offset);
            self.pointer_move_at(root, p - offset, &mut cursor);
        }
        self.cursor = cursor.unwrap_or(CursorHint::Default);
    }

    fn pointer_move_at(&mut self, id: NodeId, p: RealPoint, cursor: &mut Option<CursorHint>) {
        let Some(node) = self.get(id) else {
            return;
        };
        let children: Vec<(NodeId, RealPoint)> = node
            .children
            .iter()
            .filter_map(|c| self.get(*c).map(|child| (*c, into_child(node, child, p))))
            .collect();
        for (child, local) in children {
            self.pointer_move_at(child, local, cursor);
        }

        let Some(node) = self.get_mut(id) else {
            return;
        };
        let inside = contains(node, p);
        let interactive = node.stage.is_interactive();
        let was_inside = node.mouse_inside;
        node.mouse_inside = inside && interactive;

        if !interactive {
            return;
        }
        if inside && cursor.is_none() {
            *cursor = Some(node.cursor);
        }
        if inside && !was_inside {
            self.pointer_entered(id);
        } else if !inside && was_inside {
            self.pointer_left(id);
        }
    }

    fn pointer_entered(&mut self, id: NodeId) {
        let config = self.get(id).and_then(|n| n.animations.pointer_enter);
        self.start_interaction(id, config);
        self.set_hovered(id, true);
    }

    fn pointer_left(&mut self, id: NodeId) {
        let config = self.get(id).and_then(|n| n.animations.pointer_exit);
        self.start_interaction(id, config);
        self.set_hovered(id, false);
    }

    /// Interaction animations run only once the node is fully entered
    fn start_interaction(&mut self, id: NodeId, config: Option<AnimationConfig>) {
        let Some(config) = config else {
            return;
        };
        let backdrop = self.backdrop_of(id);
        if let Some(node) = self.get_mut(id) {
            if node.stage == Stage::Main {
                node.animation = Some(RunningAnimation {
                    animation: Animation::new(config, backdrop),
                    transition: None,
                });
            }
        }
    }

    /// Dispatch a pointer press in grid cells, innermost node first
    pub fn pointer_down(&mut self, p: RealPoint) {
        let mut hits = Vec::new();
        if let Some(root) = self.root {
            let offset = self.get(root).map_or(IntPoint::ZERO, |n| n.offset);
            self.collect_hits(root, p - offset, &mut hits);
        }
        for id in hits {
            let Some((clickable, key, config)) = self
                .get(id)
                .map(|n| (n.clickable, n.key.clone(), n.animations.click))
            else {
                continue;
            };
            if clickable {
                tracing::debug!(key = %key, "Clicked");
                self.events.push(ViewEvent::Clicked { key });
            }
            self.start_interaction(id, config);
        }
    }

    fn collect_hits(&self, id: NodeId, p: RealPoint, hits: &mut Vec<NodeId>) {
        let Some(node) = self.get(id) else {
            return;
        };
        for child in &node.children {
            if let Some(c) = self.get(*child) {
                self.collect_hits(*child, into_child(node, c, p), hits);
            }
        }
        if node.stage.is_interactive() && contains(node, p) {
            hits.push(id);
        }
    }

    /// Scroll the deepest scrolling node under `p` by `lines`
    ///
    /// Positive `lines` moves the content up. Returns the scrolled node.
    pub fn scroll(&mut self, p: RealPoint, lines: i32) -> Option<NodeId> {
        let mut hits = Vec::new();
        let root = self.root?;
        let offset = self.get(root).map_or(IntPoint::ZERO, |n| n.offset);
        self.collect_hits(root, p - offset, &mut hits);

        let target = hits
            .into_iter()
            .find(|id| self.get(*id).is_some_and(|n| n.showing_scroll_bar))?;
        let before = self.get(target).map(|n| n.scroll_offset)?;
        if let Some(node) = self.get_mut(target) {
            node.scroll_offset.y -= lines;
        }
        self.clamp_scroll(target);
        if self.get(target).map(|n| n.scroll_offset) != Some(before) {
            self.flag_redraw(target);
        }
        Some(target)
    }
}
