//! Flex-like containers

use serde::{Deserialize, Serialize};

use crate::geometry::{Axis, IntPoint};

use super::tree::ElementTree;
use super::{NodeId, NodeKind};

/// Placement of children within leftover space
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    #[default]
    Start,
    Center,
    End,
}

impl Alignment {
    /// Offset of an item of `length` inside `available`
    fn offset(self, available: i32, length: i32) -> i32 {
        match self {
            Alignment::Start => 0,
            Alignment::Center => (available - length).div_euclid(2),
            Alignment::End => available - length,
        }
    }
}

/// Stacking rules of a container
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerLayout {
    /// Axis children are stacked along
    pub main_axis: Axis,
    /// Position of the stack along the main axis
    pub justify: Alignment,
    /// Position of each child along the other axis
    pub align: Alignment,
    pub spacing: i32,
}

impl ContainerLayout {
    pub fn new(main_axis: Axis) -> Self {
        Self {
            main_axis,
            justify: Alignment::Start,
            align: Alignment::Start,
            spacing: 0,
        }
    }

    pub fn row() -> Self {
        Self::new(Axis::X)
    }

    pub fn column() -> Self {
        Self::new(Axis::Y)
    }

    #[must_use]
    pub fn with_justify(mut self, justify: Alignment) -> Self {
        self.justify = justify;
        self
    }

    #[must_use]
    pub fn with_align(mut self, align: Alignment) -> Self {
        self.align = align;
        self
    }

    #[must_use]
    pub fn with_spacing(mut self, spacing: i32) -> Self {
        self.spacing = spacing.max(0);
        self
    }

    /// Sum along the main axis plus spacing, maximum along the other
    pub fn content_size(&self, children: &[IntPoint]) -> IntPoint {
        let main = self.main_axis;
        let cross = main.other();
        let mut size = IntPoint::ZERO;
        for child in children {
            size.set(main, size.get(main) + child.get(main));
            size.set(cross, size.get(cross).max(child.get(cross)));
        }
        if !children.is_empty() {
            let gaps = self.spacing * (children.len() as i32 - 1);
            size.set(main, size.get(main) + gaps);
        }
        size
    }

    /// Offsets of each child inside a content area of `area`
    pub fn arrange(&self, children: &[IntPoint], area: IntPoint) -> Vec<IntPoint> {
        let main = self.main_axis;
        let cross = main.other();
        let content = self.content_size(children);
        let mut cursor = self.justify.offset(area.get(main), content.get(main));

        children
            .iter()
            .map(|child| {
                let mut offset = IntPoint::ZERO;
                offset.set(main, cursor);
                offset.set(cross, self.align.offset(area.get(cross), child.get(cross)));
                cursor += child.get(main) + self.spacing;
                offset
            })
            .collect()
    }
}

impl ElementTree {
    pub(crate) fn reprocess_container(&mut self, id: NodeId) {
        let Some(node) = self.get(id) else {
            return;
        };
        let NodeKind::Container(layout) = node.kind else {
            return;
        };
        let children = node.children.clone();
        let sizes: Vec<IntPoint> = children
            .iter()
            .map(|c| self.get(*c).map_or(IntPoint::ZERO, |n| n.size))
            .collect();
        let content = layout.content_size(&sizes);

        if let Some(node) = self.get_mut(id) {
            node.content_size = content;
        }
        if self.fit_content(id, content) {
            return;
        }

        let Some(node) = self.get(id) else {
            return;
        };
        let base = node.content_offset();
        let offsets = layout.arrange(&sizes, node.content_area());
        for (child, offset) in children.iter().zip(offsets) {
            if let Some(c) = self.get_mut(*child) {
                c.offset = base + offset;
            }
        }
        self.flag_redraw(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sizes(list: &[(i32, i32)]) -> Vec<IntPoint> {
        list.iter().map(|&(x, y)| IntPoint::new(x, y)).collect()
    }

    #[test]
    fn test_content_size_sums_main_axis() {
        let layout = ContainerLayout::row().with_spacing(1);
        let children = sizes(&[(3, 1), (4, 2), (5, 1)]);
        assert_eq!(layout.content_size(&children), IntPoint::new(14, 2));
    }

    #[test]
    fn test_empty_container_has_no_content() {
        let layout = ContainerLayout::column().with_spacing(3);
        assert_eq!(layout.content_size(&[]), IntPoint::ZERO);
    }

    #[test]
    fn test_arrange_start() {
        let layout = ContainerLayout::column().with_spacing(1);
        let offsets = layout.arrange(&sizes(&[(2, 2), (3, 1)]), IntPoint::new(10, 10));
        assert_eq!(offsets, sizes(&[(0, 0), (0, 3)]));
    }

    #[test]
    fn test_arrange_centered_floors() {
        let layout = ContainerLayout::row()
            .with_justify(Alignment::Center)
            .with_align(Alignment::Center);
        let offsets = layout.arrange(&sizes(&[(3, 1)]), IntPoint::new(10, 4));
        // (10 - 3) / 2 = 3.5 and (4 - 1) / 2 = 1.5, both floored
        assert_eq!(offsets, sizes(&[(3, 1)]));
    }

    #[test]
    fn test_arrange_end() {
        let layout = ContainerLayout::row()
            .with_justify(Alignment::End)
            .with_align(Alignment::End)
            .with_spacing(1);
        let offsets = layout.arrange(&sizes(&[(2, 1), (2, 2)]), IntPoint::new(10, 3));
        assert_eq!(offsets, sizes(&[(5, 2), (8, 1)]));
    }
}
