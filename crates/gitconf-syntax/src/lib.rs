//! # gitconf-syntax
//!
//! A backtracking PEG engine for gitconfig files that records a flat token
//! stream and rebuilds trees from it.
//!
//! ## Trees Without Pointers
//!
//! The matcher never links nodes together. Every rule that matches leaves one
//! [`Token`]: its kind, its byte span and the depth it was called at. Tokens
//! are written in *completion order*, so children always come before their
//! parent:
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
//! Structure is recovered afterwards in two independent ways, which always
//! agree on a successful parse:
//!
//! - [`ast`] rebuilds the tree from span containment alone;
//! - [`preorder`] walks the tree using the per-depth [`order`] buckets and
//!   reports the text between children as `Prefix`/`Infix`/`Suffix` gaps.
//!
//! ## Architecture Overview
//!
//! ```text
//! Source → Matcher → TokenBuffer → DepthBuckets → PreOrder → rowan tree
//!          (Grammar)   (trimmed)        │
//!                                       └────────→ Ast
//!
//! failure: TokenBuffer (with residue) → DepthBuckets → ParseError
//! ```
//!
//! ### 1. Matcher ([`parser`] module)
//!
//! Interprets the rule table of [`parser::grammar`] with ordered choice and
//! unlimited backtracking. Backtracking is a value copy of a [`Cursor`].
//!
//! ### 2. Buffer and Buckets ([`buffer`], [`order`])
//!
//! The token buffer doubles on demand and is trimmed to the committed count
//! once the start rule succeeds. Bucketing groups tokens by depth.
//!
//! ### 3. Views ([`ast`], [`preorder`], [`cst`])
//!
//! Derived only from a successful parse. The [`cst`] view feeds the traversal
//! into a rowan `GreenNodeBuilder`, giving a lossless tree.
//!
//! ### 4. Failures ([`error`], [`position`])
//!
//! A failed parse reports the furthest point reached plus one diagnostic per
//! depth, with offsets translated to line and column.
//!
//! ## Module Structure
//!
//! ```text
//! gitconf-syntax/
//! ├── lib.rs          # This file - public API and end-to-end tests
//! ├── rule_kind.rs    # RuleKind enum and Rowan integration
//! ├── token.rs        # Token and OrderedToken
//! ├── buffer.rs       # Growable token buffer
//! ├── order.rs        # Depth buckets
//! ├── ast.rs          # Containment-based tree
//! ├── preorder.rs     # Gap-annotated depth-first walk
//! ├── cst.rs          # Lossless rowan tree
//! ├── actions.rs      # Semantic action replay
//! ├── error.rs        # ParseError, TreeError
//! ├── position.rs     # Offset → line/symbol
//! └── parser/
//!     ├── mod.rs      # Cursor, Matcher, Parser
//!     ├── expr.rs     # Parsing expressions
//!     └── grammar/
//!         └── mod.rs  # The gitconfig rule table
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use gitconf_syntax::{Parser, RuleKind};
//!
//! let source = "[core]\n\tbare = false\n";
//! let mut parser = Parser::new(source);
//! parser.parse().unwrap();
//!
//! // The tree preserves all text
//! let tree = parser.syntax_tree().unwrap();
//! assert_eq!(tree.text().to_string(), source);
//!
//! // Navigate the tree structure
//! assert_eq!(tree.kind(), RuleKind::GRAMMAR);
//! let section = tree.children().next().unwrap();
//! assert_eq!(section.kind(), RuleKind::SECTION);
//! ```

pub mod actions;
pub mod ast;
pub mod buffer;
pub mod cst;
pub mod error;
pub mod order;
pub mod parser;
pub mod position;
pub mod preorder;
pub mod rule_kind;
pub mod token;

pub use actions::{Actions, execute};
pub use ast::{Ast, AstNode, NodeId};
pub use error::{Diagnostic, FailureCause, FailurePoint, ParseError, TreeError};
pub use order::DepthBuckets;
pub use parser::grammar::{GITCONFIG, Grammar, RuleDef};
pub use parser::{Cursor, Matcher, Parser, ParserOptions};
pub use position::Position;
pub use preorder::{PreOrder, TraversalItem, render_breadcrumbs, render_syntax_tree};
pub use rule_kind::{GitconfigLang, RuleKind, SyntaxElement, SyntaxNode, SyntaxToken};
pub use token::{OrderedToken, Token};

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;
    use pretty_assertions::assert_eq;

    fn parsed(source: &str) -> Parser<'static, '_> {
        let mut parser = Parser::new(source);
        if let Err(err) = parser.parse() {
            panic!("{source:?} failed to parse:\n{err}");
        }
        parser
    }

    #[test]
    fn snapshot_value_lines() {
        let source = "[user]\n  name = A B # me\n";
        let parser = parsed(source);
        assert_snapshot!(parser.render_tree().unwrap(), @r##"
        Grammar "[user]\n  name = A B # me\n"
         Section "[user]\n  name = A B "
          Prefix "["
          PegText "user"
           Identifier "user"
          Action0 ""
          Infix "]"
          SpaceComment "\n"
           EndOfLine "\n"
          ValueLine "  name = A B "
           Space " "
           Space " "
           PegText "name"
            Identifier "name"
           Action2 ""
           Space " "
           Infix "="
           Space " "
           PegText "A B"
            Value "A B"
             Word "A"
             Space " "
             Word "B"
           Action3 ""
           SpaceComment " "
            Space " "
         SpaceComment "# me\n"
          Comment "# me\n"
           Prefix "# me"
           EndOfLine "\n"
        "##);
    }

    #[test]
    fn ast_renders_without_markers() {
        let source = "[a]\n";
        let parser = parsed(source);
        assert_snapshot!(parser.ast().unwrap().render(source), @r#"
        Grammar "[a]\n"
         Section "[a]\n"
          PegText "a"
           Identifier "a"
          SpaceComment "\n"
           EndOfLine "\n"
        "#);
    }

    #[test]
    fn breadcrumbs_cover_every_character() {
        let source = "[a]\n  k = v\n";
        let parser = parsed(source);
        let rendered = parser.render_breadcrumbs().unwrap();

        let value = rendered
            .lines()
            .find(|line| line.ends_with(" Word"))
            .unwrap();
        assert_eq!(
            value,
            "10 Grammar Section ValueLine PegText Value Word"
        );
    }

    #[test]
    fn buffer_listing_shows_completion_order() {
        let parser = parsed("[a]\n");
        let listing = parser.buffer().unwrap().to_string();
        assert_eq!(listing.lines().last(), Some("Grammar 0 4 0"));
        assert_eq!(listing.lines().count(), 7);
    }
}
