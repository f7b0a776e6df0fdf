//! Growable flat token storage owned by a single parse run.

use crate::token::Token;

/// Flat array of tokens written by index.
///
/// Slots past the committed count keep whatever a backtracked attempt wrote
/// there until they are overwritten. That residue is what error reporting
/// looks at when the start rule fails; after a successful parse the buffer is
/// trimmed to the committed count and becomes read-only.
#[derive(Debug, Clone)]
pub struct TokenBuffer {
    slots: Vec<Token>,
}

impl TokenBuffer {
    /// Preallocate `capacity` sentinel slots (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: vec![Token::SENTINEL; capacity.max(1)],
        }
    }

    /// Double the capacity until `index` is a valid slot.
    pub fn expand(&mut self, index: usize) {
        while index >= self.slots.len() {
            let doubled = self.slots.len() * 2;
            log::trace!("token buffer grows to {doubled} slots");
            self.slots.resize(doubled, Token::SENTINEL);
        }
    }

    /// Write `token` at `index`, growing first if needed.
    pub fn add(&mut self, index: usize, token: Token) {
        self.expand(index);
        self.slots[index] = token;
    }

    /// Drop everything past `length`.
    pub fn trim(&mut self, length: usize) {
        self.slots.truncate(length);
    }

    /// The written prefix: every slot before the first sentinel.
    pub fn tokens(&self) -> &[Token] {
        let end = self
            .slots
            .iter()
            .position(Token::is_sentinel)
            .unwrap_or(self.slots.len());
        &self.slots[..end]
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }
}

impl std::fmt::Display for TokenBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for token in self.tokens() {
            writeln!(f, "{token}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule_kind::RuleKind;

    fn space(at: usize) -> Token {
        Token::new(RuleKind::SPACE, at, at + 1, 1)
    }

    #[test]
    fn expand_doubles_and_keeps_entries() {
        let mut buffer = TokenBuffer::with_capacity(2);
        buffer.add(0, space(0));
        buffer.add(1, space(1));
        buffer.add(2, space(2));

        assert_eq!(buffer.capacity(), 4);
        assert_eq!(buffer.tokens(), &[space(0), space(1), space(2)]);
    }

    #[test]
    fn expand_is_noop_within_capacity() {
        let mut buffer = TokenBuffer::with_capacity(8);
        buffer.expand(7);
        assert_eq!(buffer.capacity(), 8);
    }

    #[test]
    fn zero_capacity_still_grows() {
        let mut buffer = TokenBuffer::with_capacity(0);
        buffer.add(5, space(5));
        assert_eq!(buffer.capacity(), 8);
    }

    #[test]
    fn tokens_stop_at_first_sentinel() {
        let mut buffer = TokenBuffer::with_capacity(4);
        buffer.add(0, space(0));
        buffer.add(2, space(2));
        assert_eq!(buffer.tokens(), &[space(0)]);
    }

    #[test]
    fn trim_drops_residue() {
        let mut buffer = TokenBuffer::with_capacity(4);
        for i in 0..4 {
            buffer.add(i, space(i));
        }
        buffer.trim(2);
        assert_eq!(buffer.tokens().len(), 2);
        assert_eq!(buffer.capacity(), 2);
    }

    #[test]
    fn display_prints_one_token_per_line() {
        let mut buffer = TokenBuffer::with_capacity(2);
        buffer.add(0, space(0));
        buffer.add(1, space(1));
        assert_eq!(buffer.to_string(), "Space 0 1 1\nSpace 1 2 1\n");
    }
}
