//! Error types and the failure report.
//!
//! Sub-rule failures are part of normal backtracking and never surface. Only
//! the start rule's failure becomes a [`ParseError`], which carries two views
//! of what went wrong:
//!
//! - the furthest failure point the matcher reached, with the rules that were
//!   active there and the terminals it expected, and
//! - one diagnostic per depth, deepest first, picked from the depth buckets of
//!   the failed buffer (backtracking residue included).

use thiserror::Error;

use crate::order::DepthBuckets;
use crate::position::{Position, translate_positions};
use crate::rule_kind::RuleKind;
use crate::token::Token;

/// A derived view was requested without a successful parse behind it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("no successful parse: tokens, buckets and trees are unavailable")]
    NotParsed,
    #[error("token stream reduced to {roots} top-level nodes instead of one")]
    Unrooted { roots: usize },
}

/// Why the start rule's result was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureCause {
    /// The start rule did not match.
    NoMatch,
    /// The start rule matched but stopped before the end of input.
    Unconsumed { offset: usize, position: Position },
}

/// The furthest point the matcher reached before giving up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailurePoint {
    pub offset: usize,
    pub position: Position,
    /// Rules active at the failure, outermost first.
    pub rules: Vec<RuleKind>,
    /// Terminals that would have let matching continue.
    pub expected: Vec<String>,
}

/// One "attempted but not completed" rule, located in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: RuleKind,
    pub begin: usize,
    pub end: usize,
    pub start: Position,
    pub finish: Position,
    pub text: String,
}

/// The start rule failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", render(.cause, .failure, .diagnostics))]
pub struct ParseError {
    pub cause: FailureCause,
    pub failure: Option<FailurePoint>,
    /// Deepest first.
    pub diagnostics: Vec<Diagnostic>,
}

/// Raw failure data gathered by the matcher, before position translation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Furthest {
    pub offset: usize,
    pub rules: Vec<RuleKind>,
    pub expected: Vec<String>,
}

/// Pick one token per depth, deepest first.
///
/// Each bucket ends in a sentinel, so its second-to-last entry is the last
/// token the matcher wrote at that depth before the start rule gave up.
/// Depths that never saw a token are skipped.
pub fn select_diagnostics(buckets: &DepthBuckets) -> Vec<Token> {
    buckets
        .iter()
        .rev()
        .filter(|bucket| bucket.len() > 1)
        .map(|bucket| bucket[bucket.len() - 2].token)
        .collect()
}

impl ParseError {
    /// Assemble the report for a failed parse of `source`.
    pub(crate) fn build(
        source: &str,
        buckets: &DepthBuckets,
        furthest: Option<Furthest>,
        unconsumed: Option<usize>,
    ) -> Self {
        let tokens = select_diagnostics(buckets);

        let mut offsets: Vec<usize> = tokens.iter().flat_map(|t| [t.begin, t.end]).collect();
        offsets.extend(furthest.as_ref().map(|f| f.offset));
        offsets.extend(unconsumed);
        let translations = translate_positions(source, &offsets);
        let at = |offset: usize| {
            translations
                .get(&offset)
                .copied()
                .unwrap_or(Position::START)
        };

        let diagnostics = tokens
            .iter()
            .map(|token| Diagnostic {
                kind: token.kind,
                begin: token.begin,
                end: token.end,
                start: at(token.begin),
                finish: at(token.end),
                text: token.text(source).to_string(),
            })
            .collect();

        let failure = furthest.map(|f| FailurePoint {
            offset: f.offset,
            position: at(f.offset),
            rules: f.rules,
            expected: f.expected,
        });

        let cause = match unconsumed {
            Some(offset) => FailureCause::Unconsumed {
                offset,
                position: at(offset),
            },
            None => FailureCause::NoMatch,
        };

        Self {
            cause,
            failure,
            diagnostics,
        }
    }

    /// The (rule, begin, end) chain, deepest first.
    pub fn chain(&self) -> impl Iterator<Item = (RuleKind, usize, usize)> + '_ {
        self.diagnostics.iter().map(|d| (d.kind, d.begin, d.end))
    }
}

fn render(cause: &FailureCause, failure: &Option<FailurePoint>, diagnostics: &[Diagnostic]) -> String {
    let mut out = String::new();

    let failure = failure.as_ref().filter(|f| match cause {
        FailureCause::NoMatch => true,
        FailureCause::Unconsumed { offset, .. } => f.offset >= *offset,
    });

    match (failure, cause) {
        (Some(f), _) => {
            out.push_str(&format!("parse error at {}", f.position));
            if !f.rules.is_empty() {
                let chain: Vec<&str> = f.rules.iter().map(|r| r.name()).collect();
                out.push_str(&format!(" in {}", chain.join(" > ")));
            }
            match f.expected.as_slice() {
                [] => {}
                [only] => out.push_str(&format!(": expected {only}")),
                many => out.push_str(&format!(": expected one of {}", many.join(", "))),
            }
        }
        (None, FailureCause::Unconsumed { position, .. }) => {
            out.push_str(&format!("parse error at {position}: unconsumed input"));
        }
        (None, FailureCause::NoMatch) => out.push_str("parse error: no match"),
    }
    out.push('\n');

    for d in diagnostics {
        out.push_str(&format!(
            "\nparse error near {} ({} - {}):\n{}\n",
            d.kind, d.start, d.finish, d.text
        ));
    }
    out
}
