//! Matrix Surface Widget
//!
//! Blits the engine's output layer into a ratatui buffer, one glyph per
//! terminal cell.

use matrix_core::glyphs::SPACE_CHAR;
use matrix_core::CharGrid;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::Widget;
use unicode_width::UnicodeWidthChar;

/// Glyph colour of the matrix
pub const MATRIX_GREEN: Color = Color::Rgb(80, 250, 123);

pub struct MatrixSurface<'a> {
    grid: &'a CharGrid,
    style: Style,
}

impl<'a> MatrixSurface<'a> {
    pub fn new(grid: &'a CharGrid) -> Self {
        Self {
            grid,
            style: Style::default().fg(MATRIX_GREEN),
        }
    }

    #[must_use]
    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }
}

/// Terminal-safe form of a glyph
///
/// Anything that would not occupy exactly one column is blanked so rows
/// never shift.
fn cell_char(ch: char) -> char {
    if ch == SPACE_CHAR || ch.width() != Some(1) {
        ' '
    } else {
        ch
    }
}

impl Widget for MatrixSurface<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for (y, row) in self.grid.rows().enumerate().take(area.height as usize) {
            for (x, ch) in row.iter().enumerate().take(area.width as usize) {
                let position = (area.x + x as u16, area.y + y as u16);
                buf[position]
                    .set_char(cell_char(*ch))
                    .set_style(self.style);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use matrix_core::IntPoint;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_blit_copies_glyphs_and_blanks_separators() {
        let mut grid = CharGrid::new(IntPoint::new(3, 2), SPACE_CHAR);
        grid.set(IntPoint::new(0, 0), 'a', IntPoint::ZERO);
        grid.set(IntPoint::new(2, 1), '█', IntPoint::ZERO);

        let area = Rect::new(0, 0, 3, 2);
        let mut buf = Buffer::empty(area);
        MatrixSurface::new(&grid).render(area, &mut buf);

        assert_eq!(buf[(0, 0)].symbol(), "a");
        assert_eq!(buf[(1, 0)].symbol(), " ");
        assert_eq!(buf[(2, 1)].symbol(), "█");
    }

    #[test]
    fn test_blit_is_clipped_to_area() {
        let grid = CharGrid::new(IntPoint::new(5, 5), 'x');
        let area = Rect::new(0, 0, 2, 1);
        let mut buf = Buffer::empty(Rect::new(0, 0, 3, 2));
        MatrixSurface::new(&grid).render(area, &mut buf);

        assert_eq!(buf[(1, 0)].symbol(), "x");
        assert_eq!(buf[(2, 0)].symbol(), " ");
        assert_eq!(buf[(0, 1)].symbol(), " ");
    }

    #[test]
    fn test_wide_glyphs_are_blanked() {
        assert_eq!(cell_char('日'), ' ');
        assert_eq!(cell_char('·'), '·');
    }
}
