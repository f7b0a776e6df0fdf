//! # Tokens
//!
//! Tokens are the only thing the matcher records. Each one says "rule `kind`
//! matched `source[begin..end]` while the matcher was `depth` rules deep".
//! There are no parent or child links: the tree is implicit in the flat,
//! completion-ordered token sequence and is rebuilt afterwards, either by span
//! containment ([`crate::ast`]) or by depth bucketing ([`crate::order`]).
//!
//! ```text
//! "[a]\n"
//!
//! #0 Identifier   1..2  depth 3
//! #1 PegText      1..2  depth 2
//! #2 Action0      2..2  depth 2
//! #3 EndOfLine    3..4  depth 3
//! #4 SpaceComment 3..4  depth 2
//! #5 Section      0..4  depth 1
//! #6 Grammar      0..4  depth 0
//! ```
//!
//! A parent always completes, and is therefore emitted, after its children.

use crate::rule_kind::RuleKind;

/// A matched rule span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Token {
    pub kind: RuleKind,
    pub begin: usize,
    pub end: usize,
    pub depth: u32,
}

impl Token {
    /// The sentinel stored in unwritten buffer slots and at bucket ends.
    pub const SENTINEL: Token = Token {
        kind: RuleKind::UNKNOWN,
        begin: 0,
        end: 0,
        depth: 0,
    };

    pub fn new(kind: RuleKind, begin: usize, end: usize, depth: u32) -> Self {
        Self {
            kind,
            begin,
            end,
            depth,
        }
    }

    pub fn is_sentinel(&self) -> bool {
        self.kind.is_sentinel()
    }

    /// Epsilon matches such as action markers cover no text.
    pub fn is_zero_width(&self) -> bool {
        self.begin == self.end
    }

    /// True if `other`'s span lies inside this token's span.
    pub fn contains(&self, other: &Token) -> bool {
        self.begin <= other.begin && self.end >= other.end
    }

    /// The matched text.
    pub fn text<'s>(&self, source: &'s str) -> &'s str {
        source.get(self.begin..self.end).unwrap_or("")
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.kind, self.begin, self.end, self.depth
        )
    }
}

/// A token tagged with its emission index, as stored in depth buckets.
///
/// The index is what makes containment a parent relation: two tokens can
/// share a span (a capture and the rule it wraps), and only the later one is
/// the parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OrderedToken {
    pub token: Token,
    pub index: usize,
}

impl OrderedToken {
    pub const SENTINEL: OrderedToken = OrderedToken {
        token: Token::SENTINEL,
        index: 0,
    };

    pub fn is_sentinel(&self) -> bool {
        self.token.is_sentinel()
    }

    /// Span containment plus later emission.
    pub fn is_parent_of(&self, other: &OrderedToken) -> bool {
        self.token.contains(&other.token) && self.index > other.index
    }
}
