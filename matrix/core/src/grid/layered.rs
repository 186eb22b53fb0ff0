//! Layered Buffer
//!
//! Three same-sized grids:
//!
//! - **content**: semantic output of the element tree, before physics
//! - **animation**: transient overlay; mirrors content outside transitions
//! - **output**: animation layer after per-cell glyph substitution
//!
//! The three always share dimensions; `resize` touches all of them.

use super::CharGrid;
use crate::geometry::IntPoint;

#[derive(Clone, Debug)]
pub struct LayeredBuffer {
    content: CharGrid,
    animation: CharGrid,
    output: CharGrid,
}

impl LayeredBuffer {
    pub fn new(size: IntPoint, filler: char) -> Self {
        Self {
            content: CharGrid::new(size, filler),
            animation: CharGrid::new(size, filler),
            output: CharGrid::new(size, filler),
        }
    }

    pub fn size(&self) -> IntPoint {
        self.content.size()
    }

    /// Resize all three layers, wiping them to the filler
    pub fn resize(&mut self, size: IntPoint) {
        self.content.resize(size);
        self.animation.resize(size);
        self.output.resize(size);
    }

    pub fn content(&self) -> &CharGrid {
        &self.content
    }

    pub fn content_mut(&mut self) -> &mut CharGrid {
        &mut self.content
    }

    pub fn animation(&self) -> &CharGrid {
        &self.animation
    }

    pub fn animation_mut(&mut self) -> &mut CharGrid {
        &mut self.animation
    }

    pub fn output(&self) -> &CharGrid {
        &self.output
    }

    /// Split borrow: content for reading, animation for writing
    pub fn content_and_animation(&mut self) -> (&mut CharGrid, &mut CharGrid) {
        (&mut self.content, &mut self.animation)
    }

    /// Produce the output layer from the animation layer through `f`
    pub fn compose<F>(&mut self, f: F)
    where
        F: FnMut(char, IntPoint) -> char,
    {
        self.animation.map(f, &mut self.output);
    }

    /// The output layer as newline-joined rows
    pub fn surface(&self) -> String {
        self.output.to_text()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resize_is_atomic_across_layers() {
        let mut buffer = LayeredBuffer::new(IntPoint::new(2, 2), '.');
        buffer
            .content_mut()
            .set(IntPoint::ZERO, 'c', IntPoint::ZERO);
        buffer
            .animation_mut()
            .set(IntPoint::ZERO, 'a', IntPoint::ZERO);
        buffer.compose(|c, _| c);

        let new_size = IntPoint::new(5, 3);
        buffer.resize(new_size);

        for grid in [buffer.content(), buffer.animation(), buffer.output()] {
            assert_eq!(grid.size(), new_size);
            assert!(grid.rows().flatten().all(|&c| c == '.'));
        }
    }

    #[test]
    fn test_layer_writes_keep_shared_dimensions() {
        let size = IntPoint::new(3, 2);
        let mut buffer = LayeredBuffer::new(size, '.');
        buffer
            .content_mut()
            .set(IntPoint::new(7, 9), 'x', IntPoint::ZERO);
        buffer
            .animation_mut()
            .set(IntPoint::new(-1, 0), 'x', IntPoint::ZERO);
        buffer.animation_mut().clear();
        buffer.compose(|c, _| c);

        for grid in [buffer.content(), buffer.animation(), buffer.output()] {
            assert_eq!(grid.size(), size);
        }
    }

    #[test]
    fn test_compose_maps_animation_layer() {
        let mut buffer = LayeredBuffer::new(IntPoint::new(3, 1), 'a');
        buffer.compose(|_, p| if p.x == 1 { 'b' } else { 'a' });
        assert_eq!(buffer.surface(), "aba");
    }
}
