//! Text Flow
//!
//! Word-wrapped text with inline child nodes. A child is anchored at a
//! placeholder glyph in the template; layout reserves the child's width in
//! background filler and its extra height as blank lines, so the child is
//! drawn over a hole in the text.

use serde::{Deserialize, Serialize};

use crate::geometry::IntPoint;
use crate::glyphs::{to_bold, to_breaking_space, CHILD_PLACEHOLDER, SPACE_CHAR};

use super::tree::ElementTree;
use super::{NodeId, NodeKind};

/// How text changes while the pointer is over it
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HoverTransform {
    #[default]
    None,
    Uppercase,
    Bold,
}

impl HoverTransform {
    fn apply(self, text: &[char]) -> Vec<char> {
        match self {
            HoverTransform::None => text.to_vec(),
            HoverTransform::Uppercase => text.iter().flat_map(|c| c.to_uppercase()).collect(),
            HoverTransform::Bold => {
                let s: String = text.iter().collect();
                to_bold(&s).chars().collect()
            }
        }
    }
}

/// Template and laid-out lines of a text node
#[derive(Clone, Debug, PartialEq)]
pub struct TextContent {
    base: Vec<char>,
    current: Vec<char>,
    hover: HoverTransform,
    hovered: bool,
    pub(crate) lines: Vec<Vec<char>>,
}

impl TextContent {
    /// Plain spaces become non-breaking separators
    pub fn new(text: &str) -> Self {
        let base: Vec<char> = to_breaking_space(text).chars().collect();
        Self {
            current: base.clone(),
            base,
            hover: HoverTransform::None,
            hovered: false,
            lines: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_hover(mut self, hover: HoverTransform) -> Self {
        self.hover = hover;
        self
    }

    pub fn hover(&self) -> HoverTransform {
        self.hover
    }

    /// The template as currently shown
    pub fn text(&self) -> String {
        self.current.iter().collect()
    }

    pub fn lines(&self) -> &[Vec<char>] {
        &self.lines
    }

    /// Lines as strings, for inspection
    pub fn line_strings(&self) -> Vec<String> {
        self.lines.iter().map(|l| l.iter().collect()).collect()
    }

    fn set_text(&mut self, text: &str) {
        self.base = to_breaking_space(text).chars().collect();
        self.refresh();
    }

    /// Returns true when the shown text changed
    fn set_hovered(&mut self, hovered: bool) -> bool {
        if self.hover == HoverTransform::None || self.hovered == hovered {
            return false;
        }
        self.hovered = hovered;
        self.refresh();
        true
    }

    fn refresh(&mut self) {
        self.current = if self.hovered {
            self.hover.apply(&self.base)
        } else {
            self.base.clone()
        };
    }
}

// ============================================================================
// Layout
// ============================================================================

/// Result of flowing a template
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TextLayout {
    pub lines: Vec<Vec<char>>,
    /// Top-left cell of each child, in content coordinates
    pub child_positions: Vec<IntPoint>,
    /// Longest line by line count
    pub content_size: IntPoint,
}

#[derive(Clone, Copy, Debug)]
enum Piece {
    Glyph(char),
    Child(usize),
}

struct Flow<'a> {
    children: &'a [IntPoint],
    filler: char,
    width: Option<i32>,
    lines: Vec<Vec<char>>,
    positions: Vec<IntPoint>,
    line: Vec<char>,
    /// Length of the line up to the end of its last child footprint
    protected: usize,
    height: i32,
    started: bool,
    row: i32,
}

impl Flow<'_> {
    fn line_len(&self) -> i32 {
        self.line.len() as i32
    }

    fn piece_width(&self, piece: Piece) -> i32 {
        match piece {
            Piece::Glyph(_) => 1,
            Piece::Child(i) => self.children[i].x.max(0),
        }
    }

    fn word_width(&self, word: &[Piece]) -> i32 {
        word.iter().map(|p| self.piece_width(*p)).sum()
    }

    /// Split a word into runs no wider than `width`
    ///
    /// A child wider than the line gets a run of its own and overflows.
    fn break_word(&self, word: &[Piece], width: i32) -> Vec<Vec<Piece>> {
        let mut runs = Vec::new();
        let mut run = Vec::new();
        let mut run_width = 0;
        for &piece in word {
            let piece_width = self.piece_width(piece);
            if !run.is_empty() && run_width + piece_width > width {
                runs.push(std::mem::take(&mut run));
                run_width = 0;
            }
            if let Piece::Child(index) = piece {
                if piece_width > width {
                    tracing::warn!(
                        child = index,
                        child_width = piece_width,
                        line_width = width,
                        "Inline child is wider than its line"
                    );
                }
            }
            run.push(piece);
            run_width += piece_width;
        }
        if !run.is_empty() {
            runs.push(run);
        }
        runs
    }

    fn place_word(&mut self, word: &[Piece]) {
        if let Some(w) = self.width.filter(|w| *w > 0) {
            if self.word_width(word) > w {
                let runs = self.break_word(word, w);
                let mut runs = runs.iter();
                if let Some(first) = runs.next() {
                    self.place_run(first);
                }
                for run in runs {
                    self.flush();
                    self.push_pieces(run);
                    self.started = true;
                }
                return;
            }
        }
        self.place_run(word);
    }

    /// Place pieces after a separator, wrapping first when they do not fit
    fn place_run(&mut self, run: &[Piece]) {
        if self.started {
            let ww = self.word_width(run);
            let wraps = self
                .width
                .is_some_and(|w| self.line_len() > 0 && self.line_len() + 1 + ww > w);
            if wraps {
                self.flush();
            } else {
                self.line.push(SPACE_CHAR);
            }
        }
        self.push_pieces(run);
        self.started = true;
    }

    fn push_pieces(&mut self, pieces: &[Piece]) {
        for piece in pieces {
            match *piece {
                Piece::Glyph(c) => self.line.push(c),
                Piece::Child(i) => {
                    let size = self.children[i];
                    self.positions[i] = IntPoint::new(self.line_len(), self.row);
                    self.line
                        .extend(std::iter::repeat(self.filler).take(size.x.max(0) as usize));
                    self.protected = self.line.len();
                    self.height = self.height.max(size.y);
                }
            }
        }
    }

    fn flush(&mut self) {
        let mut line = std::mem::take(&mut self.line);
        while line.len() > self.protected && line.last() == Some(&SPACE_CHAR) {
            line.pop();
        }
        self.lines.push(line);
        for _ in 1..self.height {
            self.lines.push(Vec::new());
        }
        self.row += self.height;
        self.height = 1;
        self.protected = 0;
        self.started = false;
    }
}

/// Flow `template` into lines
///
/// Each placeholder takes the next child in order; children without a
/// placeholder are appended at the end. With `width` of `None` the text is
/// content sized and only breaks at newlines.
pub fn layout_text(
    template: &[char],
    children: &[IntPoint],
    width: Option<i32>,
    filler: char,
) -> TextLayout {
    let mut next_child = 0;
    let mut paragraphs: Vec<Vec<Vec<Piece>>> = Vec::new();
    for paragraph in template.split(|c| *c == '\n') {
        let words: Vec<Vec<Piece>> = paragraph
            .split(|c| *c == SPACE_CHAR)
            .map(|word| {
                word.iter()
                    .filter_map(|&c| {
                        if c != CHILD_PLACEHOLDER {
                            return Some(Piece::Glyph(c));
                        }
                        if next_child < children.len() {
                            next_child += 1;
                            Some(Piece::Child(next_child - 1))
                        } else {
                            None
                        }
                    })
                    .collect::<Vec<Piece>>()
            })
            .collect();
        paragraphs.push(words);
    }
    if let Some(last) = paragraphs.last_mut() {
        last.extend((next_child..children.len()).map(|i| vec![Piece::Child(i)]));
    }

    let mut flow = Flow {
        children,
        filler,
        width,
        lines: Vec::new(),
        positions: vec![IntPoint::ZERO; children.len()],
        line: Vec::new(),
        protected: 0,
        height: 1,
        started: false,
        row: 0,
    };
    for words in &paragraphs {
        for word in words {
            flow.place_word(word);
        }
        flow.flush();
    }

    let longest = flow.lines.iter().map(Vec::len).max().unwrap_or(0) as i32;
    TextLayout {
        content_size: IntPoint::new(longest, flow.lines.len() as i32),
        lines: flow.lines,
        child_positions: flow.positions,
    }
}

// ============================================================================
// Tree integration
// ============================================================================

impl ElementTree {
    pub(crate) fn reprocess_text(&mut self, id: NodeId) {
        let Some(node) = self.get(id) else {
            return;
        };
        let NodeKind::Text(text) = &node.kind else {
            return;
        };
        let width = if node.sizing.x.is_content() {
            None
        } else {
            Some(node.content_area().x)
        };
        let sizes: Vec<IntPoint> = node
            .children
            .iter()
            .map(|c| self.get(*c).map_or(IntPoint::ZERO, |n| n.size))
            .collect();
        let layout = layout_text(&text.current, &sizes, width, node.background);
        let base = node.content_offset();
        let children = node.children.clone();

        for (child, position) in children.iter().zip(&layout.child_positions) {
            if let Some(c) = self.get_mut(*child) {
                c.offset = base + *position;
            }
        }
        if let Some(node) = self.get_mut(id) {
            node.content_size = layout.content_size;
            if let NodeKind::Text(text) = &mut node.kind {
                text.lines = layout.lines;
            }
        }
        if self.fit_content(id, layout.content_size) {
            return;
        }
        self.flag_redraw(id);
    }

    /// Replace the template of a text node
    pub fn set_text(&mut self, id: NodeId, text: &str) {
        match self.get_mut(id).map(|n| &mut n.kind) {
            Some(NodeKind::Text(content)) => content.set_text(text),
            _ => {
                tracing::debug!(?id, "set_text on a node without text");
                return;
            }
        }
        self.reprocess(id);
    }

    pub(crate) fn set_hovered(&mut self, id: NodeId, hovered: bool) {
        let changed = match self.get_mut(id).map(|n| &mut n.kind) {
            Some(NodeKind::Text(content)) => content.set_hovered(hovered),
            _ => false,
        };
        if changed {
            self.reprocess(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn chars(s: &str) -> Vec<char> {
        to_breaking_space(s).chars().collect()
    }

    fn strings(layout: &TextLayout) -> Vec<String> {
        layout
            .lines
            .iter()
            .map(|l| l.iter().map(|c| if *c == SPACE_CHAR { ' ' } else { *c }).collect())
            .collect()
    }

    #[test]
    fn test_content_sized_text_breaks_only_at_newlines() {
        let layout = layout_text(&chars("hello world\nbye"), &[], None, '.');
        assert_eq!(strings(&layout), vec!["hello world", "bye"]);
        assert_eq!(layout.content_size, IntPoint::new(11, 2));
    }

    #[test]
    fn test_wrap_respects_width() {
        let layout = layout_text(&chars("the quick brown fox jumps"), &[], Some(10), '.');
        assert_eq!(strings(&layout), vec!["the quick", "brown fox", "jumps"]);
        assert!(layout.lines.iter().all(|l| l.len() <= 10));
    }

    #[test]
    fn test_long_words_are_hard_broken() {
        let layout = layout_text(&chars("ab abcdefgh"), &[], Some(3), '.');
        assert_eq!(strings(&layout), vec!["ab", "abc", "def", "gh"]);
    }

    #[test]
    fn test_trailing_separators_are_trimmed() {
        let layout = layout_text(&chars("a  "), &[], None, '.');
        assert_eq!(strings(&layout), vec!["a"]);
    }

    #[test]
    fn test_child_footprint_reserves_space() {
        let template: Vec<char> = chars("go ").into_iter().chain([CHILD_PLACEHOLDER]).collect();
        let layout = layout_text(&template, &[IntPoint::new(3, 2)], None, '.');
        assert_eq!(strings(&layout), vec!["go ...", ""]);
        assert_eq!(layout.child_positions, vec![IntPoint::new(3, 0)]);
        assert_eq!(layout.content_size, IntPoint::new(6, 2));
    }

    #[test]
    fn test_child_footprint_is_not_trimmed() {
        let template = vec![CHILD_PLACEHOLDER];
        let layout = layout_text(&template, &[IntPoint::new(2, 1)], None, SPACE_CHAR);
        assert_eq!(layout.lines, vec![vec![SPACE_CHAR, SPACE_CHAR]]);
    }

    #[test]
    fn test_word_with_child_is_broken_to_width() {
        let template = vec!['a', 'b', CHILD_PLACEHOLDER];
        let layout = layout_text(&template, &[IntPoint::new(1, 1)], Some(2), '.');
        assert_eq!(strings(&layout), vec!["ab", "."]);
        assert_eq!(layout.child_positions, vec![IntPoint::new(0, 1)]);
        assert!(layout.lines.iter().all(|l| l.len() <= 2));
    }

    #[test]
    fn test_glyphs_around_child_are_broken_to_width() {
        let template = vec!['a', 'b', 'c', CHILD_PLACEHOLDER, 'd', 'e', 'f'];
        let layout = layout_text(&template, &[IntPoint::new(2, 1)], Some(3), '.');
        assert_eq!(strings(&layout), vec!["abc", "..d", "ef"]);
        assert_eq!(layout.child_positions, vec![IntPoint::new(0, 1)]);
    }

    #[test]
    fn test_child_wider_than_line_overflows_alone() {
        let template = vec!['a', CHILD_PLACEHOLDER, 'b'];
        let layout = layout_text(&template, &[IntPoint::new(4, 1)], Some(2), '.');
        assert_eq!(strings(&layout), vec!["a", "....", "b"]);
        assert_eq!(layout.child_positions, vec![IntPoint::new(0, 1)]);
    }

    #[test]
    fn test_unplaced_children_are_appended() {
        let layout = layout_text(&chars("x"), &[IntPoint::new(1, 1)], None, '#');
        assert_eq!(strings(&layout), vec!["x #"]);
        assert_eq!(layout.child_positions, vec![IntPoint::new(2, 0)]);
    }

    #[test]
    fn test_hover_restores_original_text() {
        let mut text = TextContent::new("Menu item").with_hover(HoverTransform::Uppercase);
        assert!(text.set_hovered(true));
        assert_eq!(text.text(), "MENU\u{a0}ITEM");
        assert!(text.set_hovered(false));
        assert_eq!(text.text(), "Menu\u{a0}item");
    }

    #[test]
    fn test_bold_hover() {
        let mut text = TextContent::new("ab").with_hover(HoverTransform::Bold);
        text.set_hovered(true);
        assert_eq!(text.text(), "\u{1D41A}\u{1D41B}");
    }

    #[test]
    fn test_no_hover_transform_is_inert() {
        let mut text = TextContent::new("ab");
        assert!(!text.set_hovered(true));
        assert_eq!(text.text(), "ab");
    }
}
