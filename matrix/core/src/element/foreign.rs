//! Host-rendered content

use crate::geometry::IntPoint;
use crate::placement::{Placement, PlacementKind, PlacementRole};

use super::tree::ElementTree;
use super::{NodeId, NodeKind, Stage};

/// Content the host draws over the node's content area
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ForeignContent {
    /// Host-defined identifier of what to show
    pub tag: String,
}

impl ForeignContent {
    pub fn new(tag: impl Into<String>) -> Self {
        Self { tag: tag.into() }
    }
}

impl ElementTree {
    /// Publish the placement of a foreign node drawn at `origin`
    ///
    /// Skipped while an ancestor is still entering, so the host content
    /// does not appear ahead of the surrounding animation.
    pub(crate) fn place_foreign(&mut self, id: NodeId, origin: IntPoint) {
        let Some(node) = self.get(id) else {
            return;
        };
        let NodeKind::Foreign(foreign) = &node.kind else {
            return;
        };
        if !node.on_view || matches!(node.stage, Stage::Exiting | Stage::Exited) {
            return;
        }
        if self.has_ancestor_in(id, Stage::Entering) {
            return;
        }
        let placement = Placement {
            key: node.key.clone(),
            kind: PlacementKind::Foreign {
                tag: foreign.tag.clone(),
            },
            rect: self
                .metrics
                .rect(origin + node.content_offset(), node.content_area()),
        };
        self.placements
            .insert((placement.key.clone(), PlacementRole::Foreign), placement);
    }

    pub(crate) fn remove_foreign(&mut self, id: NodeId) {
        if let Some(node) = self.get(id) {
            let key = (node.key.clone(), PlacementRole::Foreign);
            self.placements.remove(&key);
        }
    }
}
