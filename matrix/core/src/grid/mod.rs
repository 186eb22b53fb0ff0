//! Character Grid
//!
//! A resizable 2D array of single-character cells with bounds-checked
//! access. Out-of-range reads return the filler and out-of-range writes are
//! dropped; both log a rate-limited warning rather than failing.

mod layered;

pub use layered::LayeredBuffer;

use crate::geometry::IntPoint;
use crate::logging::Throttle;

/// A grid of glyphs
#[derive(Clone, Debug)]
pub struct CharGrid {
    cells: Vec<char>,
    size: IntPoint,
    filler: char,
    warn: Throttle,
}

impl CharGrid {
    /// Create a grid of `size` filled with `filler`
    pub fn new(size: IntPoint, filler: char) -> Self {
        let size = size.clamp_non_negative();
        Self {
            cells: vec![filler; size.area()],
            size,
            filler,
            warn: Throttle::default(),
        }
    }

    pub fn size(&self) -> IntPoint {
        self.size
    }

    pub fn filler(&self) -> char {
        self.filler
    }

    /// Read the cell at `loc + offset`
    pub fn get(&mut self, loc: IntPoint, offset: IntPoint) -> char {
        match self.index_of(loc + offset) {
            Some(idx) => self.cells[idx],
            None => {
                self.warn_out_of_bounds("get", loc + offset);
                self.filler
            }
        }
    }

    /// Read without logging, for callers that probe edges on purpose
    pub fn peek(&self, loc: IntPoint) -> Option<char> {
        self.index_of(loc).map(|idx| self.cells[idx])
    }

    /// Write the cell at `loc + offset`
    pub fn set(&mut self, loc: IntPoint, ch: char, offset: IntPoint) {
        match self.index_of(loc + offset) {
            Some(idx) => self.cells[idx] = ch,
            None => self.warn_out_of_bounds("set", loc + offset),
        }
    }

    /// Reset every cell to the filler
    pub fn clear(&mut self) {
        self.cells.fill(self.filler);
    }

    /// Reallocate to `size`, wiping every cell to the filler
    ///
    /// Crate-private: layers of a [`LayeredBuffer`] only change size together.
    pub(crate) fn resize(&mut self, size: IntPoint) {
        let size = size.clamp_non_negative();
        tracing::debug!(width = size.x, height = size.y, "Resizing grid");
        self.size = size;
        self.cells = vec![self.filler; size.area()];
    }

    /// Apply `f` to every cell, writing the results into `dest`
    ///
    /// `dest` is resized first if its dimensions differ.
    pub(crate) fn map<F>(&self, mut f: F, dest: &mut CharGrid)
    where
        F: FnMut(char, IntPoint) -> char,
    {
        if dest.size != self.size {
            dest.resize(self.size);
        }
        for y in 0..self.size.y {
            for x in 0..self.size.x {
                let loc = IntPoint::new(x, y);
                if let Some(idx) = self.index_of(loc) {
                    dest.cells[idx] = f(self.cells[idx], loc);
                }
            }
        }
    }

    /// Iterate over rows as slices
    pub fn rows(&self) -> impl Iterator<Item = &[char]> {
        // chunks(0) panics, so an empty grid yields nothing
        let width = self.size.x.max(1) as usize;
        self.cells.chunks(width).take(self.size.y.max(0) as usize)
    }

    /// Row-major text with rows joined by newlines
    pub fn to_text(&self) -> String {
        self.rows()
            .map(|row| row.iter().collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn index_of(&self, loc: IntPoint) -> Option<usize> {
        if loc.x < 0 || loc.y < 0 || loc.x >= self.size.x || loc.y >= self.size.y {
            return None;
        }
        Some(loc.y as usize * self.size.x as usize + loc.x as usize)
    }

    fn warn_out_of_bounds(&mut self, op: &str, loc: IntPoint) {
        if let Some(suppressed) = self.warn.check() {
            tracing::warn!(
                op,
                x = loc.x,
                y = loc.y,
                width = self.size.x,
                height = self.size.y,
                suppressed,
                "Grid access outside bounds"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_set_then_get_inside_bounds() {
        let size = IntPoint::new(4, 3);
        let mut grid = CharGrid::new(size, '.');
        for y in 0..size.y {
            for x in 0..size.x {
                let p = IntPoint::new(x, y);
                let ch = char::from(b'a' + (y * size.x + x) as u8);
                grid.set(p, ch, IntPoint::ZERO);
                assert_eq!(grid.get(p, IntPoint::ZERO), ch);
            }
        }
    }

    #[test]
    fn test_out_of_bounds_is_filler_and_noop() {
        let mut grid = CharGrid::new(IntPoint::new(2, 2), '.');
        for p in [
            IntPoint::new(-1, 0),
            IntPoint::new(0, -1),
            IntPoint::new(2, 0),
            IntPoint::new(0, 2),
        ] {
            grid.set(p, 'x', IntPoint::ZERO);
            assert_eq!(grid.get(p, IntPoint::ZERO), '.');
        }
        assert_eq!(grid.to_text(), "..\n..");
    }

    #[test]
    fn test_offset_is_added_to_location() {
        let mut grid = CharGrid::new(IntPoint::new(3, 3), '.');
        grid.set(IntPoint::new(1, 0), 'x', IntPoint::new(1, 2));
        assert_eq!(grid.peek(IntPoint::new(2, 2)), Some('x'));
        assert_eq!(grid.get(IntPoint::ZERO, IntPoint::new(2, 2)), 'x');
    }

    #[test]
    fn test_resize_wipes_contents() {
        let mut grid = CharGrid::new(IntPoint::new(2, 2), ' ');
        grid.set(IntPoint::ZERO, 'x', IntPoint::ZERO);
        grid.resize(IntPoint::new(3, 1));
        assert_eq!(grid.size(), IntPoint::new(3, 1));
        assert_eq!(grid.to_text(), "   ");
    }

    #[test]
    fn test_map_into_destination() {
        let mut src = CharGrid::new(IntPoint::new(2, 1), 'a');
        src.set(IntPoint::new(1, 0), 'b', IntPoint::ZERO);
        let mut dest = CharGrid::new(IntPoint::ZERO, ' ');
        src.map(|c, p| if p.x == 0 { c.to_ascii_uppercase() } else { c }, &mut dest);
        assert_eq!(dest.to_text(), "Ab");
    }

    #[test]
    fn test_empty_grid_text() {
        let grid = CharGrid::new(IntPoint::ZERO, ' ');
        assert_eq!(grid.to_text(), "");
        assert_eq!(grid.rows().count(), 0);
    }
}
