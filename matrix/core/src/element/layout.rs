//! Sizing passes and scroll state

use crate::geometry::{Axis, IntPoint};
use crate::placement::{Placement, PlacementKind, PlacementRole};

use super::tree::ElementTree;
use super::{NodeId, NodeKind, Sizing, Stage};

impl ElementTree {
    /// Resize a node and propagate
    ///
    /// Reprocesses the node, lets the parent re-layout its children, then
    /// resizes the node's own children. Equal sizes are a no-op.
    pub fn set_size(&mut self, id: NodeId, size: IntPoint) {
        let size = size.clamp_non_negative();
        let parent = match self.get_mut(id) {
            Some(node) if node.size == size => return,
            Some(node) => {
                node.size = size;
                node.parent
            }
            None => return,
        };

        self.reprocess(id);
        match parent {
            Some(parent) => self.handle_child_resize(parent),
            None if self.root == Some(id) => {
                self.clear_requested = true;
                self.flag_redraw(id);
            }
            None => {}
        }
        self.resize_children(id);
    }

    pub(crate) fn handle_child_resize(&mut self, id: NodeId) {
        self.resize_children(id);
        self.reprocess(id);
        self.flag_redraw(id);
    }

    /// Assign relative, absolute and expand sizes to every child
    pub(crate) fn resize_children(&mut self, id: NodeId) {
        let Some(node) = self.get(id) else {
            return;
        };
        let area = node.content_area();
        let main_axis = node.main_axis();
        let spacing = node.spacing();
        let parent_exiting = node.stage == Stage::Exiting;
        let children = node.children.clone();

        let mut targets: Vec<(NodeId, IntPoint, bool)> = Vec::with_capacity(children.len());
        for &child in &children {
            let Some(c) = self.get(child) else {
                continue;
            };
            let skip = parent_exiting && matches!(c.stage, Stage::Exiting | Stage::Exited);
            let mut target = c.size;
            if !skip {
                for axis in Axis::ALL {
                    match c.sizing.get(axis) {
                        Sizing::Absolute(n) => target.set(axis, n),
                        Sizing::Relative(f) => {
                            target.set_floor(axis, f * f64::from(area.get(axis)));
                        }
                        Sizing::Expand | Sizing::Content => {}
                    }
                }
            }
            targets.push((child, target, skip));
        }

        for axis in Axis::ALL {
            let expanding: Vec<usize> = targets
                .iter()
                .enumerate()
                .filter(|(_, (child, _, skip))| {
                    !skip && self.get(*child).is_some_and(|c| c.sizing.get(axis) == Sizing::Expand)
                })
                .map(|(i, _)| i)
                .collect();
            if expanding.is_empty() {
                continue;
            }

            let length = if main_axis == Some(axis) {
                let fixed: i32 = targets
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| !expanding.contains(i))
                    .map(|(_, (_, t, _))| t.get(axis))
                    .sum();
                let gaps = spacing * (targets.len() as i32 - 1).max(0);
                let leftover = area.get(axis) - fixed - gaps;
                (leftover / expanding.len() as i32).max(0)
            } else {
                area.get(axis)
            };
            for i in expanding {
                targets[i].1.set(axis, length);
            }
        }

        for (child, target, skip) in targets {
            if !skip {
                self.set_size(child, target);
            }
        }
    }

    /// Size the root against the frame
    pub(crate) fn resize_root(&mut self) {
        let Some(root) = self.root else {
            return;
        };
        let Some(node) = self.get(root) else {
            return;
        };
        let frame = self.frame;
        let mut target = node.size;
        for axis in Axis::ALL {
            match node.sizing.get(axis) {
                Sizing::Absolute(n) => target.set(axis, n),
                Sizing::Relative(f) => target.set_floor(axis, f * f64::from(frame.get(axis))),
                Sizing::Expand => target.set(axis, frame.get(axis)),
                Sizing::Content => {}
            }
        }
        self.set_size(root, target);
    }

    /// Recompute a node's content after a size or child change
    pub(crate) fn reprocess(&mut self, id: NodeId) {
        let Some(node) = self.get(id) else {
            return;
        };
        let container = matches!(node.kind, NodeKind::Container(_));
        let text = matches!(node.kind, NodeKind::Text(_));
        if container {
            self.reprocess_container(id);
        } else if text {
            self.reprocess_text(id);
        } else {
            self.flag_redraw(id);
        }
        self.update_scroll_showing(id);
    }

    /// Bring a size on content-sized axes up to `content` plus the boundary
    ///
    /// Returns true when the size changed, in which case the nested
    /// `set_size` already reprocessed the node.
    pub(crate) fn fit_content(&mut self, id: NodeId, content: IntPoint) -> bool {
        let Some(node) = self.get(id) else {
            return false;
        };
        let boundary = node.boundary_size();
        let mut target = node.size;
        for axis in Axis::ALL {
            if node.sizing.get(axis).is_content() {
                target.set(axis, boundary.get(axis) + content.get(axis));
            }
        }
        if target == node.size {
            return false;
        }
        self.set_size(id, target);
        true
    }

    /// Show or hide the scroll affordance of a scrollable node
    pub(crate) fn update_scroll_showing(&mut self, id: NodeId) {
        let (overflow, showing, key) = match self.get(id) {
            Some(node) if node.scrollable => (
                node.content_size.y > node.content_area().y,
                node.showing_scroll_bar,
                node.key.clone(),
            ),
            _ => return,
        };

        if overflow != showing {
            tracing::debug!(key = %key, showing = overflow, "Scroll bar toggled");
            if let Some(node) = self.get_mut(id) {
                node.showing_scroll_bar = overflow;
                if !overflow {
                    node.scroll_offset = IntPoint::ZERO;
                }
            }
            if !overflow {
                self.placements.remove(&(key, PlacementRole::ScrollRegion));
            }
            self.resize_children(id);
            self.reprocess(id);
            self.flag_redraw(id);
            return;
        }

        self.clamp_scroll(id);
        if overflow {
            self.publish_scroll_region(id);
        }
    }

    /// Keep the scroll offset within `[-(content - area), 0]`
    pub(crate) fn clamp_scroll(&mut self, id: NodeId) {
        if let Some(node) = self.get_mut(id) {
            let max = (node.content_size.y - node.content_area().y).max(0);
            node.scroll_offset.y = node.scroll_offset.y.clamp(-max, 0);
        }
    }

    fn publish_scroll_region(&mut self, id: NodeId) {
        let Some(node) = self.get(id) else {
            return;
        };
        if !node.on_view {
            return;
        }
        let position = self.screen_origin(id) + node.content_offset();
        let placement = Placement {
            key: node.key.clone(),
            kind: PlacementKind::ScrollRegion {
                content_height: self.metrics.to_px_y(node.content_size.y),
            },
            rect: self.metrics.rect(position, node.content_area()),
        };
        self.placements
            .insert((placement.key.clone(), PlacementRole::ScrollRegion), placement);
    }

    /// Mark a subtree for repaint
    pub fn flag_redraw(&mut self, id: NodeId) {
        let children = match self.get_mut(id) {
            Some(node) => {
                node.must_redraw = true;
                node.children.clone()
            }
            None => return,
        };
        for child in children {
            self.flag_redraw(child);
        }
    }
}
