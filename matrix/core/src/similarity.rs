//! Visual Similarity Table
//!
//! Maps a glyph to an ordered list of substitutes that look about as "heavy"
//! on screen. The glyph itself always sits at index 0, so index 0 means
//! "no substitution" and larger indices drift further from the original.
//!
//! Tables come from JSON (`{"a": ["o", "e", ...]}`) or from the built-in
//! density ramp.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// ASCII glyphs ordered from lightest to densest
const DENSITY_RAMP: &str =
    " .'`^\",:;Il!i><~+_-?][}{1)(|\\/tfjrxnuvczXYUJCLQ0OZmwqpdbkhao*#MW&8%B@$";

/// Non-ASCII glyphs the engine draws, paired with the ramp glyph they weigh like
const ANCHORED_GLYPHS: &[(char, char)] = &[
    ('·', '.'),
    ('─', '-'),
    ('│', '|'),
    ('╭', '+'),
    ('╮', '+'),
    ('╰', '+'),
    ('╯', '+'),
];

/// Substitutes kept per glyph, not counting the glyph itself
const MAX_SUBSTITUTES: usize = 99;

/// Errors that can occur when loading a similarity table
#[derive(Debug, Error)]
pub enum SimilarityError {
    /// Failed to read the table file
    #[error("Failed to read similarity table at {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    /// File is not the expected JSON shape
    #[error("Failed to parse similarity table: {0}")]
    ParseError(#[from] serde_json::Error),

    /// A key or entry is not exactly one character
    #[error("Similarity table entry is not a single glyph: {0:?}")]
    InvalidGlyph(String),
}

/// Glyph to ordered substitutes, self first
#[derive(Clone, Debug, Default)]
pub struct SimilarityTable {
    entries: HashMap<char, Vec<char>>,
}

impl SimilarityTable {
    /// Build from raw substitute lists; each glyph is prepended to its own list
    pub fn from_map(map: HashMap<char, Vec<char>>) -> Self {
        let entries = map
            .into_iter()
            .map(|(glyph, substitutes)| {
                let mut list = Vec::with_capacity(substitutes.len() + 1);
                list.push(glyph);
                list.extend(substitutes);
                (glyph, list)
            })
            .collect();
        Self { entries }
    }

    /// Parse a JSON object of glyph -> substitute list
    pub fn from_json_str(json: &str) -> Result<Self, SimilarityError> {
        let raw: HashMap<String, Vec<String>> = serde_json::from_str(json)?;
        let mut map = HashMap::with_capacity(raw.len());
        for (key, values) in raw {
            let glyph = single_char(&key)?;
            let substitutes = values
                .iter()
                .map(|v| single_char(v))
                .collect::<Result<Vec<_>, _>>()?;
            map.insert(glyph, substitutes);
        }
        Ok(Self::from_map(map))
    }

    /// Load a JSON table from disk
    pub fn load(path: &Path) -> Result<Self, SimilarityError> {
        let json = std::fs::read_to_string(path).map_err(|e| SimilarityError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;
        let table = Self::from_json_str(&json)?;
        tracing::info!(
            path = %path.display(),
            glyphs = table.len(),
            "Loaded similarity table"
        );
        Ok(table)
    }

    /// Table derived from the built-in density ramp
    ///
    /// Every glyph's substitutes are the other known glyphs ordered by how
    /// close their density is.
    pub fn builtin() -> Self {
        let ramp: Vec<char> = DENSITY_RAMP.chars().collect();
        let last = (ramp.len() - 1).max(1) as f64;
        let mut densities: Vec<(char, f64)> = ramp
            .iter()
            .enumerate()
            .map(|(i, &c)| (c, i as f64 / last))
            .collect();
        for &(glyph, anchor) in ANCHORED_GLYPHS {
            if let Some(&(_, d)) = densities.iter().find(|(c, _)| *c == anchor) {
                densities.push((glyph, d));
            }
        }
        densities.push(('█', 1.0));

        let mut map = HashMap::with_capacity(densities.len());
        for &(glyph, density) in &densities {
            let mut others: Vec<(char, f64)> = densities
                .iter()
                .copied()
                .filter(|(c, _)| *c != glyph)
                .collect();
            others.sort_by(|a, b| {
                let da = (a.1 - density).abs();
                let db = (b.1 - density).abs();
                da.total_cmp(&db)
                    .then(a.1.total_cmp(&b.1))
                    .then(a.0.cmp(&b.0))
            });
            let substitutes = others
                .into_iter()
                .take(MAX_SUBSTITUTES)
                .map(|(c, _)| c)
                .collect();
            map.insert(glyph, substitutes);
        }
        Self::from_map(map)
    }

    pub fn contains(&self, glyph: char) -> bool {
        self.entries.contains_key(&glyph)
    }

    /// The substitute at `index`, clamped to the end of the list
    ///
    /// Unknown glyphs are returned unchanged.
    pub fn substitute(&self, glyph: char, index: usize) -> char {
        match self.entries.get(&glyph) {
            Some(list) if !list.is_empty() => list[index.min(list.len() - 1)],
            _ => glyph,
        }
    }

    /// Substitute list for a glyph, self first
    pub fn substitutes(&self, glyph: char) -> Option<&[char]> {
        self.entries.get(&glyph).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn single_char(s: &str) -> Result<char, SimilarityError> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(SimilarityError::InvalidGlyph(s.to_string())),
    }
}
