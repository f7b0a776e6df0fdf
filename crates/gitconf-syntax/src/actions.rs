//! Semantic actions.
//!
//! The grammar marks points of interest with zero-width `ACTION0..3` tokens,
//! each placed right after a capture. Replaying the token stream in emission
//! order therefore sees every `PEG_TEXT` before the action that consumes it.

use crate::rule_kind::RuleKind;
use crate::token::Token;

/// Callbacks fired while replaying a successful parse.
pub trait Actions {
    /// `ACTION0`: a section header was read.
    fn begin_section(&mut self, name: &str);
    /// `ACTION1`: the quoted subsection id of the current section.
    fn set_section_id(&mut self, id: &str);
    /// `ACTION2`: the key of a value line.
    fn set_key(&mut self, key: &str);
    /// `ACTION3`: the value for the last key.
    fn add_value(&mut self, value: &str);
}

/// Replay `tokens` against `actions`, handing each action the latest capture.
pub fn execute<A: Actions + ?Sized>(tokens: &[Token], source: &str, actions: &mut A) {
    let mut text = "";
    for token in tokens {
        match token.kind {
            RuleKind::PEG_TEXT => text = token.text(source),
            RuleKind::ACTION0 => actions.begin_section(text),
            RuleKind::ACTION1 => actions.set_section_id(text),
            RuleKind::ACTION2 => actions.set_key(text),
            RuleKind::ACTION3 => actions.add_value(text),
            _ => {}
        }
    }
}
