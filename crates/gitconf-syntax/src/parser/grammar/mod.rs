//! # Grammar Rules
//!
//! A grammar is an ordered table of rule definitions indexed by
//! [`RuleKind`] discriminant. Slot 0 is reserved and slot 1 holds the start
//! rule. The matcher never inspects a rule's name, only its body, so the
//! table is the whole contract between the engine and a concrete language.
//!
//! ## The gitconfig Grammar
//!
//! ```text
//! Grammar      <- (SpaceComment / Section)+
//! Section      <- Space* '[' Space* <Identifier> Action0
//!                 (Space+ '"' <Identifier> Action1 '"')?
//!                 Space* ']' SpaceComment ValueLine*
//! ValueLine    <- Space* <Identifier> Action2 Space* '=' Space*
//!                 <Value> Action3 SpaceComment
//! Value        <- Word (Space+ Word)*
//! Identifier   <- [A-Za-z0-9_.@-]+
//! Word         <- (!('\n' / '\r' / '#' / '\t' / ' ') .)+
//! SpaceComment <- &[\n\r] EndOfLine / &'#' Comment / &[\t ] Space+
//! Comment      <- '#' (!EndOfLine .)* EndOfLine
//! Space        <- ' ' / '\t'
//! EndOfLine    <- "\r\n" / '\n' / '\r'
//! ```
//!
//! `<...>` is a capture; `ActionN` fires a semantic action with the most
//! recent capture (see [`crate::actions`]).

use std::sync::LazyLock;

use crate::parser::expr::{
    Expr, and, capture, choice, not, one_or_more, optional, rule, seq, zero_or_more,
};
use crate::rule_kind::RuleKind;

/// One row of the rule table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleDef {
    pub kind: RuleKind,
    pub expr: Expr,
}

/// An ordered rule table.
#[derive(Debug, Clone)]
pub struct Grammar {
    slots: Vec<Option<RuleDef>>,
}

impl Grammar {
    /// Build a table from rule definitions; each lands in its kind's slot.
    pub fn new(defs: impl IntoIterator<Item = RuleDef>) -> Self {
        let mut slots = vec![None; RuleKind::ALL.len()];
        for def in defs {
            let index = def.kind.index();
            slots[index] = Some(def);
        }
        Self { slots }
    }

    /// The definition for `kind`, if the table has one.
    pub fn rule(&self, kind: RuleKind) -> Option<&RuleDef> {
        self.slots.get(kind.index()).and_then(Option::as_ref)
    }

    /// The start rule's definition (slot 1).
    pub fn start(&self) -> Option<&RuleDef> {
        self.rule(RuleKind::START)
    }

    /// Defined rules in table order.
    pub fn rules(&self) -> impl Iterator<Item = &RuleDef> {
        self.slots.iter().flatten()
    }

    /// The gitconfig grammar.
    pub fn gitconfig() -> Self {
        use RuleKind::*;

        let def = |kind, expr| RuleDef { kind, expr };
        let spaces = || zero_or_more(rule(SPACE));

        Self::new([
            def(
                GRAMMAR,
                one_or_more(choice([rule(SPACE_COMMENT), rule(SECTION)])),
            ),
            def(
                SECTION,
                seq([
                    spaces(),
                    Expr::Char('['),
                    spaces(),
                    capture(rule(IDENTIFIER)),
                    Expr::Action(ACTION0),
                    optional(seq([
                        one_or_more(rule(SPACE)),
                        Expr::Char('"'),
                        capture(rule(IDENTIFIER)),
                        Expr::Action(ACTION1),
                        Expr::Char('"'),
                    ])),
                    spaces(),
                    Expr::Char(']'),
                    rule(SPACE_COMMENT),
                    zero_or_more(rule(VALUE_LINE)),
                ]),
            ),
            def(
                VALUE_LINE,
                seq([
                    spaces(),
                    capture(rule(IDENTIFIER)),
                    Expr::Action(ACTION2),
                    spaces(),
                    Expr::Char('='),
                    spaces(),
                    capture(rule(VALUE)),
                    Expr::Action(ACTION3),
                    rule(SPACE_COMMENT),
                ]),
            ),
            def(
                VALUE,
                seq([
                    rule(WORD),
                    zero_or_more(seq([one_or_more(rule(SPACE)), rule(WORD)])),
                ]),
            ),
            def(
                IDENTIFIER,
                one_or_more(choice([
                    Expr::Set(".@-_"),
                    Expr::Range('0', '9'),
                    Expr::Range('A', 'Z'),
                    Expr::Range('a', 'z'),
                ])),
            ),
            def(
                WORD,
                one_or_more(seq([not(Expr::Set("\n\r#\t ")), Expr::Any])),
            ),
            def(
                SPACE_COMMENT,
                choice([
                    seq([and(Expr::Set("\n\r")), rule(END_OF_LINE)]),
                    seq([and(Expr::Char('#')), rule(COMMENT)]),
                    seq([and(Expr::Set("\t ")), one_or_more(rule(SPACE))]),
                ]),
            ),
            def(
                COMMENT,
                seq([
                    Expr::Char('#'),
                    zero_or_more(seq([not(rule(END_OF_LINE)), Expr::Any])),
                    rule(END_OF_LINE),
                ]),
            ),
            def(SPACE, choice([Expr::Char(' '), Expr::Char('\t')])),
            def(
                END_OF_LINE,
                choice([Expr::Literal("\r\n"), Expr::Char('\n'), Expr::Char('\r')]),
            ),
        ])
    }
}

/// The shared gitconfig rule table.
pub static GITCONFIG: LazyLock<Grammar> = LazyLock::new(Grammar::gitconfig);
