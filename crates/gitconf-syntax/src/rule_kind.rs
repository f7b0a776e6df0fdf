//! RuleKind enum for every rule tag the matcher records and the traversal emits.
//!
//! One enum covers the grammar's structural rules, the capture and action
//! markers, and the synthetic gap tags produced by the pre-order traversal.
//! Discriminant 0 is reserved as the sentinel and discriminant 1 is the start
//! rule, matching the layout of the rule table in [`crate::parser::grammar`].

/// All rule tags of the gitconfig grammar.
///
/// The `repr(u16)` discriminant doubles as the index into the rule table and
/// as the raw kind stored in rowan's green tree.
///
/// We use SCREAMING_CASE following the rust-analyzer convention for kinds.
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[allow(non_camel_case_types)]
pub enum RuleKind {
    /// Reserved slot; marks unwritten buffer entries and bucket ends.
    #[default]
    UNKNOWN,

    // === Structural rules (rule table order) ===
    /// Start rule: `(SpaceComment / Section)+`
    GRAMMAR,
    /// `[type "id"]` header followed by its value lines
    SECTION,
    /// `key = value` line
    VALUE_LINE,
    /// Space separated words of a value
    VALUE,
    /// Section type, section id or key
    IDENTIFIER,
    /// Run of characters up to whitespace or `#`
    WORD,
    /// Line ending, comment or horizontal whitespace
    SPACE_COMMENT,
    /// `#` up to the end of the line
    COMMENT,
    /// Single space or tab
    SPACE,
    /// `\r\n`, `\n` or `\r`
    END_OF_LINE,

    // === Captures and semantic actions ===
    /// Captured text handed to the next action
    PEG_TEXT,
    /// Begin a section with the captured type
    ACTION0,
    /// Set the current section's id
    ACTION1,
    /// Set the current key
    ACTION2,
    /// Store the captured value under the current key
    ACTION3,

    // === Synthetic traversal gaps ===
    /// Text between a node's start and its first child
    PREFIX,
    /// Text between two consecutive children
    INFIX,
    /// Text between the last child and the node's end
    SUFFIX,
}

impl RuleKind {
    /// Every kind, indexed by discriminant.
    pub const ALL: [RuleKind; 19] = [
        Self::UNKNOWN,
        Self::GRAMMAR,
        Self::SECTION,
        Self::VALUE_LINE,
        Self::VALUE,
        Self::IDENTIFIER,
        Self::WORD,
        Self::SPACE_COMMENT,
        Self::COMMENT,
        Self::SPACE,
        Self::END_OF_LINE,
        Self::PEG_TEXT,
        Self::ACTION0,
        Self::ACTION1,
        Self::ACTION2,
        Self::ACTION3,
        Self::PREFIX,
        Self::INFIX,
        Self::SUFFIX,
    ];

    /// The start rule of the grammar.
    pub const START: RuleKind = RuleKind::GRAMMAR;

    /// Look a kind up by its raw discriminant.
    pub fn from_raw(raw: u16) -> Option<Self> {
        Self::ALL.get(usize::from(raw)).copied()
    }

    /// Position of this kind in the rule table.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Human readable name used in diagnostics and tree dumps.
    pub fn name(self) -> &'static str {
        match self {
            Self::UNKNOWN => "Unknown",
            Self::GRAMMAR => "Grammar",
            Self::SECTION => "Section",
            Self::VALUE_LINE => "ValueLine",
            Self::VALUE => "Value",
            Self::IDENTIFIER => "Identifier",
            Self::WORD => "Word",
            Self::SPACE_COMMENT => "SpaceComment",
            Self::COMMENT => "Comment",
            Self::SPACE => "Space",
            Self::END_OF_LINE => "EndOfLine",
            Self::PEG_TEXT => "PegText",
            Self::ACTION0 => "Action0",
            Self::ACTION1 => "Action1",
            Self::ACTION2 => "Action2",
            Self::ACTION3 => "Action3",
            Self::PREFIX => "Prefix",
            Self::INFIX => "Infix",
            Self::SUFFIX => "Suffix",
        }
    }

    /// Returns true for the gap tags only the traversal produces.
    pub fn is_synthetic(self) -> bool {
        matches!(self, Self::PREFIX | Self::INFIX | Self::SUFFIX)
    }

    /// Returns true for the zero-width semantic action markers.
    pub fn is_action(self) -> bool {
        matches!(
            self,
            Self::ACTION0 | Self::ACTION1 | Self::ACTION2 | Self::ACTION3
        )
    }

    /// Returns true for the reserved sentinel tag.
    pub fn is_sentinel(self) -> bool {
        self == Self::UNKNOWN
    }
}

impl std::fmt::Display for RuleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl From<RuleKind> for rowan::SyntaxKind {
    fn from(kind: RuleKind) -> Self {
        Self(kind as u16)
    }
}

/// Language definition for rowan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GitconfigLang {}

impl rowan::Language for GitconfigLang {
    type Kind = RuleKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        // Only kinds produced by `kind_to_raw` ever reach the green tree.
        RuleKind::from_raw(raw.0).unwrap_or(RuleKind::UNKNOWN)
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

/// Type alias for our syntax nodes.
pub type SyntaxNode = rowan::SyntaxNode<GitconfigLang>;
/// Type alias for our syntax tokens.
pub type SyntaxToken = rowan::SyntaxToken<GitconfigLang>;
/// Type alias for syntax elements (node or token).
pub type SyntaxElement = rowan::SyntaxElement<GitconfigLang>;

#[cfg(test)]
mod tests {
    use super::*;
    use rowan::Language;

    #[test]
    fn all_is_indexed_by_discriminant() {
        for (i, kind) in RuleKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
    }

    #[test]
    fn start_rule_is_index_one() {
        assert_eq!(RuleKind::START.index(), 1);
        assert_eq!(RuleKind::default(), RuleKind::UNKNOWN);
    }

    #[test]
    fn synthetic_and_action_detection() {
        assert!(RuleKind::INFIX.is_synthetic());
        assert!(!RuleKind::SECTION.is_synthetic());
        assert!(RuleKind::ACTION2.is_action());
        assert!(!RuleKind::PEG_TEXT.is_action());
        assert!(RuleKind::UNKNOWN.is_sentinel());
    }

    #[test]
    fn out_of_range_raw_is_rejected() {
        assert_eq!(RuleKind::from_raw(19), None);
        assert_eq!(RuleKind::from_raw(2), Some(RuleKind::SECTION));
    }

    #[test]
    fn rowan_conversion_roundtrip() {
        let kind = RuleKind::VALUE_LINE;
        let raw: rowan::SyntaxKind = kind.into();
        let back = GitconfigLang::kind_from_raw(raw);
        assert_eq!(kind, back);
    }
}
