//! # Parsing Expressions
//!
//! The closed set of PEG constructs a rule body is built from. One recursive
//! function, [`Matcher::eval`](super::Matcher::eval), interprets them.
//!
//! | construct      | consumes | records                          |
//! |----------------|----------|----------------------------------|
//! | terminals      | yes      | nothing                          |
//! | `Seq`/`Choice` | children | children                         |
//! | repetition     | children | children of successful attempts  |
//! | `And`/`Not`    | no       | nothing (lookahead only)         |
//! | `Rule`         | body     | one token for the rule           |
//! | `Capture`      | body     | one `PegText` token              |
//! | `Action`       | no       | one zero-width marker            |

use crate::rule_kind::RuleKind;

/// A parsing expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// A single character.
    Char(char),
    /// A fixed string.
    Literal(&'static str),
    /// One character in an inclusive range.
    Range(char, char),
    /// One character out of a set.
    Set(&'static str),
    /// Any single character.
    Any,
    /// Succeeds only at the end of input.
    EndOfInput,

    /// All of these, in order.
    Seq(Vec<Expr>),
    /// The first of these that matches.
    Choice(Vec<Expr>),
    ZeroOrMore(Box<Expr>),
    OneOrMore(Box<Expr>),
    Optional(Box<Expr>),

    /// Positive lookahead.
    And(Box<Expr>),
    /// Negative lookahead.
    Not(Box<Expr>),

    /// Invoke a rule from the table.
    Rule(RuleKind),
    /// Record the matched text for the next action.
    Capture(Box<Expr>),
    /// Record a semantic action marker.
    Action(RuleKind),
}

impl Expr {
    /// Check a terminal against the character at the cursor.
    pub(crate) fn matches_char(&self, c: char) -> bool {
        match self {
            Expr::Char(expected) => c == *expected,
            Expr::Range(lo, hi) => (*lo..=*hi).contains(&c),
            Expr::Set(chars) => chars.contains(c),
            Expr::Any => true,
            _ => false,
        }
    }

    /// How a terminal reads in an "expected ..." message.
    pub fn describe(&self) -> String {
        match self {
            Expr::Char(c) => format!("{c:?}"),
            Expr::Literal(s) => format!("{s:?}"),
            Expr::Range(lo, hi) => format!("{lo:?}..={hi:?}"),
            Expr::Set(chars) => format!("[{}]", chars.escape_default()),
            Expr::Any => "any character".to_string(),
            Expr::EndOfInput => "end of input".to_string(),
            Expr::Rule(kind) => kind.name().to_string(),
            _ => "expression".to_string(),
        }
    }
}

pub fn seq(items: impl IntoIterator<Item = Expr>) -> Expr {
    Expr::Seq(items.into_iter().collect())
}

pub fn choice(items: impl IntoIterator<Item = Expr>) -> Expr {
    Expr::Choice(items.into_iter().collect())
}

pub fn zero_or_more(expr: Expr) -> Expr {
    Expr::ZeroOrMore(Box::new(expr))
}

pub fn one_or_more(expr: Expr) -> Expr {
    Expr::OneOrMore(Box::new(expr))
}

pub fn optional(expr: Expr) -> Expr {
    Expr::Optional(Box::new(expr))
}

pub fn and(expr: Expr) -> Expr {
    Expr::And(Box::new(expr))
}

pub fn not(expr: Expr) -> Expr {
    Expr::Not(Box::new(expr))
}

pub fn capture(expr: Expr) -> Expr {
    Expr::Capture(Box::new(expr))
}

pub fn rule(kind: RuleKind) -> Expr {
    Expr::Rule(kind)
}
