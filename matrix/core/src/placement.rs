//! Host Placements
//!
//! Some nodes need the host to show something that is not grid glyphs:
//! foreign content, or a native scroll region over a scrollable node. The
//! tree publishes these as key-indexed [`Placement`]s in pixel space; the
//! host reads them after each frame.

use serde::{Deserialize, Serialize};

use crate::geometry::IntPoint;

/// Converts grid cells to host pixels
///
/// A glyph is half as wide as it is tall.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PixelMetrics {
    pub font_size: f64,
    /// Pixel position of the grid's top-left corner on the host surface
    pub offset_x: f64,
    pub offset_y: f64,
}

impl PixelMetrics {
    pub fn new(font_size: f64) -> Self {
        Self {
            font_size,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }

    pub fn char_width(&self) -> f64 {
        self.font_size / 2.0
    }

    pub fn char_height(&self) -> f64 {
        self.font_size
    }

    pub fn to_px_x(&self, cells: i32) -> f64 {
        f64::from(cells) * self.char_width()
    }

    pub fn to_px_y(&self, cells: i32) -> f64 {
        f64::from(cells) * self.char_height()
    }

    /// Grid dimensions that fit in a pixel area
    pub fn grid_size(&self, pixel_width: f64, pixel_height: f64) -> IntPoint {
        if self.font_size <= 0.0 {
            return IntPoint::ZERO;
        }
        IntPoint::floor(pixel_width / self.char_width(), pixel_height / self.char_height())
            .clamp_non_negative()
    }

    /// Pixel rectangle of a grid rectangle, including the host offset
    pub fn rect(&self, position: IntPoint, size: IntPoint) -> PixelRect {
        PixelRect {
            left: self.to_px_x(position.x) + self.offset_x,
            top: self.to_px_y(position.y) + self.offset_y,
            width: self.to_px_x(size.x),
            height: self.to_px_y(size.y),
        }
    }
}

impl Default for PixelMetrics {
    fn default() -> Self {
        Self::new(16.0)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PixelRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// Which side table a placement belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PlacementRole {
    Foreign,
    ScrollRegion,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum PlacementKind {
    /// Host-rendered content identified by `tag`
    Foreign { tag: String },
    /// A scrollable region whose inner height is `content_height` pixels
    ScrollRegion { content_height: f64 },
}

impl PlacementKind {
    pub fn role(&self) -> PlacementRole {
        match self {
            PlacementKind::Foreign { .. } => PlacementRole::Foreign,
            PlacementKind::ScrollRegion { .. } => PlacementRole::ScrollRegion,
        }
    }
}

/// A request for the host to position something over the grid
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub key: String,
    pub kind: PlacementKind,
    pub rect: PixelRect,
}
