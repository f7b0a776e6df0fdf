//! Byte offset to line/column translation for diagnostics.
//!
//! Diagnostics only ever need a handful of offsets, so instead of building a
//! line table the offsets are sorted and resolved in one forward scan.

use std::collections::HashMap;

/// A location in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    /// 1-based line number.
    pub line: usize,
    /// 0-based column, counted in characters.
    pub symbol: usize,
}

impl Position {
    pub const START: Position = Position { line: 1, symbol: 0 };
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {} symbol {}", self.line, self.symbol)
    }
}

/// Resolve every offset in `positions` to a [`Position`].
///
/// The input may be unordered and may repeat offsets. An offset resolves to
/// the location of the character starting there; offsets at or past the end
/// of `source` resolve to the location just after the last character.
pub fn translate_positions(source: &str, positions: &[usize]) -> HashMap<usize, Position> {
    let mut targets = positions.to_vec();
    targets.sort_unstable();
    targets.dedup();

    let mut translations = HashMap::with_capacity(targets.len());
    let mut pending = targets.iter().copied().peekable();
    let mut here = Position::START;

    for (offset, c) in source.char_indices() {
        while let Some(&target) = pending.peek() {
            if target > offset {
                break;
            }
            // Offsets inside a multi-byte character resolve to that character.
            translations.insert(target, here);
            pending.next();
        }
        if pending.peek().is_none() {
            return translations;
        }

        if c == '\n' {
            here.line += 1;
            here.symbol = 0;
        } else {
            here.symbol += 1;
        }
    }

    for target in pending {
        translations.insert(target, here);
    }
    translations
}
