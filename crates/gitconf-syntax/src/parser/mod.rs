//! # Parser - Backtracking Matcher
//!
//! This module runs a rule table against source text and records a flat
//! [`Token`] for every rule that matches.
//!
//! ## Cursors Instead of Shared State
//!
//! Every evaluation step takes a [`Cursor`] by value and either returns a new
//! cursor (success) or `None` (failure). A failing branch has nothing to undo:
//! the caller still holds the cursor it passed in, so position, token count
//! and depth are restored simply by using it again.
//!
//! ```text
//! Cursor { position: 4, tokens: 7, depth: 2 }
//!   └─ Choice
//!        ├─ alt 1: writes slots 7, 8 … fails  → None
//!        └─ alt 2: starts again from tokens: 7, overwriting the residue
//! ```
//!
//! Tokens are written into the [`TokenBuffer`] at the cursor's token index.
//! Slots past the committed count hold the residue of failed attempts until
//! they are overwritten; error reporting uses exactly that residue.
//!
//! ## Depth
//!
//! A rule (or capture) records its token at the caller's depth and runs its
//! body one level deeper. Action markers record at the current depth.
//!
//! ## Public API
//!
//! ```
//! use gitconf_syntax::{Parser, RuleKind};
//!
//! let mut parser = Parser::new("[core]\n\ta = 1\n");
//! parser.parse().unwrap();
//!
//! let root = parser.tokens().unwrap().last().unwrap();
//! assert_eq!(root.kind, RuleKind::GRAMMAR);
//! ```

pub mod expr;
pub mod grammar;

use std::cell::OnceCell;

use serde::{Deserialize, Serialize};

use crate::ast::Ast;
use crate::buffer::TokenBuffer;
use crate::cst;
use crate::error::{Furthest, ParseError, TreeError};
use crate::order::DepthBuckets;
use crate::preorder::PreOrder;
use crate::rule_kind::{RuleKind, SyntaxNode};
use crate::token::Token;
use expr::Expr;
use grammar::{GITCONFIG, Grammar};

/// Backtracking snapshot: everything a failed alternative must not disturb.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    /// Byte offset into the source.
    pub position: usize,
    /// Number of committed tokens.
    pub tokens: usize,
    /// Current nesting level.
    pub depth: u32,
}

impl Cursor {
    pub const START: Cursor = Cursor {
        position: 0,
        tokens: 0,
        depth: 0,
    };

    fn advance(self, bytes: usize) -> Self {
        Self {
            position: self.position + bytes,
            ..self
        }
    }

    fn deeper(self) -> Self {
        Self {
            depth: self.depth + 1,
            ..self
        }
    }
}

/// Evaluates expressions of one grammar against one source.
///
/// Owns the token buffer of a single run. Besides the buffer it tracks the
/// furthest failure, which only ever feeds error reporting.
#[derive(Debug)]
pub struct Matcher<'g, 's> {
    grammar: &'g Grammar,
    source: &'s str,
    buffer: TokenBuffer,
    /// Rules currently being evaluated, outermost first.
    active: Vec<RuleKind>,
    /// Nesting of lookahead; failures inside it are not reported.
    lookahead: u32,
    furthest: Option<Furthest>,
}

impl<'g, 's> Matcher<'g, 's> {
    /// `capacity` is capped at one slot per input byte; the buffer doubles
    /// past that on demand.
    pub fn new(grammar: &'g Grammar, source: &'s str, capacity: usize) -> Self {
        Self {
            grammar,
            source,
            buffer: TokenBuffer::with_capacity(capacity.clamp(1, source.len() + 1)),
            active: Vec::new(),
            lookahead: 0,
            furthest: None,
        }
    }

    /// Match the rule `kind` at `cur`.
    pub fn rule(&mut self, kind: RuleKind, cur: Cursor) -> Option<Cursor> {
        let grammar = self.grammar;
        let Some(def) = grammar.rule(kind) else {
            log::warn!("rule {kind} has no definition in the grammar");
            return None;
        };

        self.active.push(kind);
        let matched = self.eval(&def.expr, cur.deeper());
        self.active.pop();

        matched.map(|end| self.add(kind, cur.position, Cursor { depth: cur.depth, ..end }))
    }

    /// Evaluate `expr` at `cur`.
    pub fn eval(&mut self, expr: &Expr, cur: Cursor) -> Option<Cursor> {
        match expr {
            Expr::Char(_) | Expr::Range(..) | Expr::Set(_) | Expr::Any => {
                match self.rest(cur).chars().next() {
                    Some(c) if expr.matches_char(c) => Some(cur.advance(c.len_utf8())),
                    _ => self.fail(expr, cur),
                }
            }
            Expr::Literal(literal) => {
                if self.rest(cur).starts_with(literal) {
                    Some(cur.advance(literal.len()))
                } else {
                    self.fail(expr, cur)
                }
            }
            Expr::EndOfInput => {
                if cur.position >= self.source.len() {
                    Some(cur)
                } else {
                    self.fail(expr, cur)
                }
            }

            Expr::Seq(items) => items.iter().try_fold(cur, |next, item| self.eval(item, next)),
            Expr::Choice(alternatives) => alternatives.iter().find_map(|alt| self.eval(alt, cur)),
            Expr::ZeroOrMore(inner) => Some(self.repeat(inner, cur)),
            Expr::OneOrMore(inner) => {
                let first = self.eval(inner, cur)?;
                Some(self.repeat(inner, first))
            }
            Expr::Optional(inner) => Some(self.eval(inner, cur).unwrap_or(cur)),

            Expr::And(inner) => self.look_ahead(inner, cur).map(|_| cur),
            Expr::Not(inner) => match self.look_ahead(inner, cur) {
                Some(_) => None,
                None => Some(cur),
            },

            Expr::Rule(kind) => self.rule(*kind, cur),
            Expr::Capture(inner) => {
                let end = self.eval(inner, cur.deeper())?;
                Some(self.add(
                    RuleKind::PEG_TEXT,
                    cur.position,
                    Cursor { depth: cur.depth, ..end },
                ))
            }
            Expr::Action(kind) => Some(self.add(*kind, cur.position, cur)),
        }
    }

    /// The buffer as written so far, residue included.
    pub fn buffer(&self) -> &TokenBuffer {
        &self.buffer
    }

    pub(crate) fn finish(self) -> (TokenBuffer, Option<Furthest>) {
        (self.buffer, self.furthest)
    }

    fn rest(&self, cur: Cursor) -> &'s str {
        self.source.get(cur.position..).unwrap_or("")
    }

    /// Loop `inner` until it fails or stops making progress.
    fn repeat(&mut self, inner: &Expr, mut cur: Cursor) -> Cursor {
        while let Some(next) = self.eval(inner, cur) {
            if next.position == cur.position {
                break;
            }
            cur = next;
        }
        cur
    }

    fn look_ahead(&mut self, inner: &Expr, cur: Cursor) -> Option<Cursor> {
        self.lookahead += 1;
        let matched = self.eval(inner, cur);
        self.lookahead -= 1;
        matched
    }

    /// Record a token ending at `cur.position` and commit it.
    fn add(&mut self, kind: RuleKind, begin: usize, cur: Cursor) -> Cursor {
        self.buffer
            .add(cur.tokens, Token::new(kind, begin, cur.position, cur.depth));
        Cursor {
            tokens: cur.tokens + 1,
            ..cur
        }
    }

    /// Note a terminal failure and fail.
    fn fail(&mut self, expr: &Expr, cur: Cursor) -> Option<Cursor> {
        if self.lookahead > 0 {
            return None;
        }
        match &mut self.furthest {
            Some(furthest) if cur.position < furthest.offset => {}
            Some(furthest) if cur.position == furthest.offset => {
                let expected = expr.describe();
                if !furthest.expected.contains(&expected) {
                    furthest.expected.push(expected);
                }
                furthest.rules.clone_from(&self.active);
            }
            _ => {
                self.furthest = Some(Furthest {
                    offset: cur.position,
                    rules: self.active.clone(),
                    expected: vec![expr.describe()],
                });
            }
        }
        None
    }
}

/// Knobs for a parse run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserOptions {
    /// Token slots preallocated before the buffer starts doubling.
    pub initial_capacity: usize,
    /// Reject a start-rule match that stops before the end of input.
    pub require_full_input: bool,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            initial_capacity: i16::MAX as usize,
            require_full_input: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Fresh,
    Matched,
    Failed,
}

/// A parse run over one source text.
///
/// Derived views (tokens, buckets, tree, traversal) are only available after
/// [`Parser::parse`] succeeded; otherwise they return [`TreeError::NotParsed`].
#[derive(Debug)]
pub struct Parser<'g, 's> {
    grammar: &'g Grammar,
    source: &'s str,
    options: ParserOptions,
    buffer: TokenBuffer,
    state: State,
    ordered: OnceCell<DepthBuckets>,
}

impl<'s> Parser<'static, 's> {
    /// A parser for the gitconfig grammar with default options.
    pub fn new(source: &'s str) -> Self {
        Self::with_grammar(&GITCONFIG, source, ParserOptions::default())
    }

    /// A parser for the gitconfig grammar.
    pub fn with_options(source: &'s str, options: ParserOptions) -> Self {
        Self::with_grammar(&GITCONFIG, source, options)
    }
}

impl<'g, 's> Parser<'g, 's> {
    pub fn with_grammar(grammar: &'g Grammar, source: &'s str, options: ParserOptions) -> Self {
        Self {
            grammar,
            source,
            options,
            buffer: TokenBuffer::with_capacity(0),
            state: State::Fresh,
            ordered: OnceCell::new(),
        }
    }

    /// Parse from the start rule.
    pub fn parse(&mut self) -> Result<(), ParseError> {
        self.parse_rule(RuleKind::START)
    }

    /// Parse with `start` as the top-level rule.
    pub fn parse_rule(&mut self, start: RuleKind) -> Result<(), ParseError> {
        self.reset();
        log::debug!("parsing {} bytes from rule {start}", self.source.len());

        let mut matcher = Matcher::new(self.grammar, self.source, self.options.initial_capacity);
        let matched = matcher.rule(start, Cursor::START);
        let (mut buffer, furthest) = matcher.finish();

        let unconsumed = match matched {
            Some(end) if self.options.require_full_input && end.position < self.source.len() => {
                Some(end.position)
            }
            Some(end) => {
                buffer.trim(end.tokens);
                log::debug!("matched {} tokens", end.tokens);
                self.buffer = buffer;
                self.state = State::Matched;
                return Ok(());
            }
            None => None,
        };

        let buckets = DepthBuckets::from_tokens(buffer.tokens());
        let err = ParseError::build(self.source, &buckets, furthest, unconsumed);
        log::debug!("parse failed: {} diagnostics", err.diagnostics.len());
        self.state = State::Failed;
        Err(err)
    }

    /// Forget the previous run.
    pub fn reset(&mut self) {
        self.buffer = TokenBuffer::with_capacity(0);
        self.state = State::Fresh;
        self.ordered = OnceCell::new();
    }

    pub fn source(&self) -> &'s str {
        self.source
    }

    pub fn is_matched(&self) -> bool {
        self.state == State::Matched
    }

    /// The trimmed buffer.
    pub fn buffer(&self) -> Result<&TokenBuffer, TreeError> {
        self.require_matched()?;
        Ok(&self.buffer)
    }

    /// Tokens in completion order.
    pub fn tokens(&self) -> Result<&[Token], TreeError> {
        Ok(self.buffer()?.tokens())
    }

    /// Depth buckets, computed once per successful run.
    pub fn order(&self) -> Result<&DepthBuckets, TreeError> {
        self.require_matched()?;
        Ok(self
            .ordered
            .get_or_init(|| DepthBuckets::from_tokens(self.buffer.tokens())))
    }

    /// Rebuild the tree by span containment.
    pub fn ast(&self) -> Result<Ast, TreeError> {
        Ast::build(self.tokens()?)
    }

    /// Depth-first walk with gap annotations.
    pub fn pre_order(&self) -> Result<PreOrder<'_>, TreeError> {
        Ok(PreOrder::new(self.order()?))
    }

    /// Lossless rowan tree.
    pub fn syntax_tree(&self) -> Result<SyntaxNode, TreeError> {
        Ok(cst::build(self.source, self.pre_order()?))
    }

    /// Indented rule names with quoted text, one traversal item per line.
    pub fn render_tree(&self) -> Result<String, TreeError> {
        Ok(crate::preorder::render_syntax_tree(self.source, self.pre_order()?))
    }

    /// Per-character rule chains, for highlighting.
    pub fn render_breadcrumbs(&self) -> Result<String, TreeError> {
        Ok(crate::preorder::render_breadcrumbs(self.source, self.pre_order()?))
    }

    fn require_matched(&self) -> Result<(), TreeError> {
        match self.state {
            State::Matched => Ok(()),
            State::Fresh | State::Failed => Err(TreeError::NotParsed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds(tokens: &[Token]) -> Vec<RuleKind> {
        tokens.iter().map(|t| t.kind).collect()
    }

    #[test]
    fn records_tokens_in_completion_order() {
        let mut parser = Parser::new("[a]\n");
        parser.parse().unwrap();

        let tokens = parser.tokens().unwrap();
        assert_eq!(
            kinds(tokens),
            vec![
                RuleKind::IDENTIFIER,
                RuleKind::PEG_TEXT,
                RuleKind::ACTION0,
                RuleKind::END_OF_LINE,
                RuleKind::SPACE_COMMENT,
                RuleKind::SECTION,
                RuleKind::GRAMMAR,
            ]
        );
        let depths: Vec<u32> = tokens.iter().map(|t| t.depth).collect();
        assert_eq!(depths, vec![3, 2, 2, 3, 2, 1, 0]);
        assert_eq!(tokens[2].begin, tokens[2].end);
    }

    #[test]
    fn failed_alternative_leaves_cursor_untouched() {
        let source = "[core\n";
        let mut matcher = Matcher::new(&GITCONFIG, source, 4);
        let before = Cursor::START;

        assert_eq!(matcher.rule(RuleKind::SECTION, before), None);
        // Residue was written, but nothing was committed from `before`.
        assert_eq!(matcher.buffer().tokens().len(), 3);

        let after = matcher.eval(&Expr::Char('['), before).unwrap();
        assert_eq!(after, Cursor { position: 1, ..before });
    }

    #[test]
    fn repetition_discards_only_the_failing_attempt() {
        let mut matcher = Matcher::new(&GITCONFIG, "one two #c", 16);
        let end = matcher.rule(RuleKind::VALUE, Cursor::START).unwrap();

        assert_eq!(end.position, 7);
        // Word, Space, Word, Value; the trailing Space before '#' was rolled back.
        assert_eq!(end.tokens, 4);
        assert_eq!(
            kinds(&matcher.buffer().tokens()[..end.tokens]),
            vec![
                RuleKind::WORD,
                RuleKind::SPACE,
                RuleKind::WORD,
                RuleKind::VALUE
            ]
        );
    }

    #[test]
    fn lookahead_consumes_and_records_nothing() {
        let mut matcher = Matcher::new(&GITCONFIG, "\n", 4);
        let ahead = expr::and(expr::rule(RuleKind::END_OF_LINE));

        assert_eq!(matcher.eval(&ahead, Cursor::START), Some(Cursor::START));
        let refused = expr::not(Expr::Char('\n'));
        assert_eq!(matcher.eval(&refused, Cursor::START), None);
    }

    #[test]
    fn ordered_choice_takes_first_match() {
        let mut matcher = Matcher::new(&GITCONFIG, "ab", 4);
        let first_wins = expr::choice([Expr::Char('a'), Expr::Literal("ab")]);
        assert_eq!(matcher.eval(&first_wins, Cursor::START).unwrap().position, 1);
    }

    #[test]
    fn furthest_failure_names_active_rules() {
        let mut parser = Parser::new("[core\n  a = 1\n");
        let err = parser.parse().unwrap_err();

        let failure = err.failure.unwrap();
        assert_eq!(failure.offset, 5);
        assert_eq!(failure.rules, vec![RuleKind::GRAMMAR, RuleKind::SECTION]);
        assert!(failure.expected.contains(&"']'".to_string()));
    }

    #[test]
    fn expected_sets_read_as_character_classes() {
        let mut parser = Parser::new("[a \"b]\n");
        let err = parser.parse().unwrap_err();

        let failure = err.failure.as_ref().unwrap();
        assert!(failure.expected.contains(&"[.@-_]".to_string()));
        let message = err.to_string();
        assert!(message.contains("expected one of "), "{message}");
        assert!(!message.contains("one of one of"), "{message}");
    }

    #[test]
    fn views_require_a_successful_parse() {
        let mut parser = Parser::new("[core\n");
        assert_eq!(parser.tokens().unwrap_err(), TreeError::NotParsed);

        assert!(parser.parse().is_err());
        assert_eq!(parser.order().unwrap_err(), TreeError::NotParsed);
        assert!(parser.ast().is_err());
        assert!(parser.pre_order().is_err());
    }

    #[test]
    fn reset_invalidates_views() {
        let mut parser = Parser::new("[a]\n");
        parser.parse().unwrap();
        assert!(parser.is_matched());

        parser.reset();
        assert_eq!(parser.tokens().unwrap_err(), TreeError::NotParsed);
    }

    #[test]
    fn order_is_cached() {
        let mut parser = Parser::new("[a]\n");
        parser.parse().unwrap();
        let first: *const DepthBuckets = parser.order().unwrap();
        let second: *const DepthBuckets = parser.order().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn partial_match_is_rejected_by_default() {
        let mut strict = Parser::new("[a]\n!\n");
        assert!(strict.parse().is_err());

        let options = ParserOptions {
            require_full_input: false,
            ..ParserOptions::default()
        };
        let mut lenient = Parser::with_options("[a]\n!\n", options);
        lenient.parse().unwrap();
        assert_eq!(lenient.tokens().unwrap().last().unwrap().end, 4);
    }

    #[test]
    fn oversized_capacity_is_capped() {
        let options = ParserOptions {
            initial_capacity: usize::MAX / 2,
            ..ParserOptions::default()
        };
        let mut parser = Parser::with_options("[a]\n", options);
        parser.parse().unwrap();
        assert_eq!(parser.tokens().unwrap().last().unwrap().end, 4);

        let matcher = Matcher::new(&GITCONFIG, "[a]\n", usize::MAX);
        assert_eq!(matcher.buffer().capacity(), 5);
    }

    #[test]
    fn parse_from_another_rule() {
        let mut parser = Parser::new("yellow reverse");
        parser.parse_rule(RuleKind::VALUE).unwrap();
        let root = *parser.tokens().unwrap().last().unwrap();
        assert_eq!(root, Token::new(RuleKind::VALUE, 0, 14, 0));
    }

    #[test]
    fn undefined_rule_fails() {
        let mut parser = Parser::new("x");
        assert!(parser.parse_rule(RuleKind::PEG_TEXT).is_err());
    }
}
