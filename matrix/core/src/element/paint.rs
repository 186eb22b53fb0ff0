//! Drawing into the layered buffer
//!
//! Every frame walks the whole tree to refresh each node's screen position,
//! but only nodes flagged for redraw write cells. A node writes its glyphs to
//! the content layer, and to the animation layer too unless an animation
//! currently owns that layer for it.

use crate::geometry::IntPoint;
use crate::glyphs::{
    BORDER_BOTTOM_LEFT, BORDER_BOTTOM_RIGHT, BORDER_HORIZONTAL, BORDER_TOP_LEFT,
    BORDER_TOP_RIGHT, BORDER_VERTICAL, SCROLL_THUMB, SCROLL_TRACK,
};
use crate::grid::LayeredBuffer;

use super::tree::ElementTree;
use super::{Node, NodeId, NodeKind, Stage};

impl ElementTree {
    /// Draw dirty nodes
    pub fn paint(&mut self, buffer: &mut LayeredBuffer) {
        if self.clear_requested {
            buffer.content_mut().clear();
            self.clear_requested = false;
        }
        if let Some(root) = self.root {
            let origin = self.get(root).map_or(IntPoint::ZERO, |n| n.offset);
            self.draw(root, origin, buffer);
        }
    }

    fn draw(&mut self, id: NodeId, origin: IntPoint, buffer: &mut LayeredBuffer) {
        let Some(node) = self.get_mut(id) else {
            return;
        };
        if node.stage == Stage::Exited {
            return;
        }
        let full = origin + node.scroll_offset;
        node.full_content_offset = full + node.content_offset();
        let redraw = std::mem::replace(&mut node.must_redraw, false);
        let foreign = matches!(node.kind, NodeKind::Foreign(_));
        let children = node.children.clone();

        if redraw {
            self.draw_cells(id, origin, buffer);
        }
        if foreign {
            self.place_foreign(id, origin);
        }
        for child in children {
            let offset = self.get(child).map_or(IntPoint::ZERO, |c| c.offset);
            self.draw(child, full + offset, buffer);
        }
    }

    fn draw_cells(&self, id: NodeId, origin: IntPoint, buffer: &mut LayeredBuffer) {
        let points = self.visible_points(id);
        let Some(node) = self.get(id) else {
            return;
        };
        let to_animation = node.animation.is_none() && node.stage != Stage::Queued;
        for p in points {
            let ch = glyph_at(node, p);
            buffer.content_mut().set(p, ch, origin);
            if to_animation {
                buffer.animation_mut().set(p, ch, origin);
            }
        }
    }
}

/// Glyph of a node-local cell: border, then scroll bar, then text, then fill
fn glyph_at(node: &Node, p: IntPoint) -> char {
    let size = node.size;
    let last = size - IntPoint::splat(1);

    if node.bordered {
        let glyph = match (p.x, p.y) {
            (0, 0) => Some(BORDER_TOP_LEFT),
            (x, 0) if x == last.x => Some(BORDER_TOP_RIGHT),
            (0, y) if y == last.y => Some(BORDER_BOTTOM_LEFT),
            (x, y) if x == last.x && y == last.y => Some(BORDER_BOTTOM_RIGHT),
            (0, _) => Some(BORDER_VERTICAL),
            (x, _) if x == last.x => Some(BORDER_VERTICAL),
            (_, 0) => Some(BORDER_HORIZONTAL),
            (_, y) if y == last.y => Some(BORDER_HORIZONTAL),
            _ => None,
        };
        if let Some(glyph) = glyph {
            return glyph;
        }
    }

    let start = node.content_offset();
    let area = node.content_area();

    if node.showing_scroll_bar {
        let border = i32::from(node.bordered);
        let bar_x = size.x - border - 1;
        let row = p.y - start.y;
        if p.x == bar_x && row >= 0 && row < area.y {
            return scroll_glyph(node, row);
        }
    }

    let local = p - start;
    let inside = local.x >= 0 && local.y >= 0 && local.x < area.x && local.y < area.y;
    if inside {
        if let NodeKind::Text(text) = &node.kind {
            let line = local.y - node.scroll_offset.y;
            let glyph = usize::try_from(line)
                .ok()
                .and_then(|l| text.lines.get(l))
                .and_then(|l| l.get(local.x as usize));
            if let Some(glyph) = glyph {
                return *glyph;
            }
        }
    }

    node.background
}

fn scroll_glyph(node: &Node, row: i32) -> char {
    let area = f64::from(node.content_area().y);
    let content = f64::from(node.content_size.y.max(1));
    let thumb = ((area / content * area).floor() as i32).max(1);
    let start = (f64::from(-node.scroll_offset.y) / content * area).floor() as i32;
    if row >= start && row < start + thumb {
        SCROLL_THUMB
    } else {
        SCROLL_TRACK
    }
}
