//! Glyph constants and small text helpers shared by element variants.

/// Non-breaking space: the default background and the word separator in text
pub const SPACE_CHAR: char = '\u{00a0}';

/// Middle dot used as a textured background
pub const DOT_CHAR: char = '\u{00b7}';

/// Marks where a text node's children are interleaved into its text flow
pub const CHILD_PLACEHOLDER: char = '\u{fffc}';

/// Background used when nothing else is specified
pub const DEFAULT_BACKGROUND: char = SPACE_CHAR;

pub const BORDER_TOP_LEFT: char = '╭';
pub const BORDER_TOP_RIGHT: char = '╮';
pub const BORDER_BOTTOM_LEFT: char = '╰';
pub const BORDER_BOTTOM_RIGHT: char = '╯';
pub const BORDER_VERTICAL: char = '│';
pub const BORDER_HORIZONTAL: char = '─';

pub const SCROLL_TRACK: char = '|';
pub const SCROLL_THUMB: char = '█';

const BOLD_UPPER_START: u32 = 0x1D400;
const BOLD_LOWER_START: u32 = 0x1D41A;

/// Map ASCII letters to the mathematical bold alphabet
///
/// Everything else passes through unchanged.
pub fn to_bold(text: &str) -> String {
    text.chars().map(bold_char).collect()
}

fn bold_char(c: char) -> char {
    let shifted = match c {
        'A'..='Z' => BOLD_UPPER_START + (c as u32 - 'A' as u32),
        'a'..='z' => BOLD_LOWER_START + (c as u32 - 'a' as u32),
        _ => return c,
    };
    char::from_u32(shifted).unwrap_or(c)
}

/// Frame a heading with dots and draw a rule beneath it
///
/// The rule is at least 20 cells long.
pub fn add_underline(text: &str) -> String {
    let len = text.chars().count();
    let rule: String = std::iter::repeat(BORDER_HORIZONTAL)
        .take((len + 2).max(20))
        .collect();
    format!("{DOT_CHAR}{text}{DOT_CHAR}\n{rule}")
}

/// Replace plain spaces with the non-breaking separator used by text layout
pub fn to_breaking_space(text: &str) -> String {
    text.replace(' ', &SPACE_CHAR.to_string())
}
