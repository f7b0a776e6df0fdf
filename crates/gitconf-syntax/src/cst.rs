//! Lossless rowan tree built from the pre-order traversal.
//!
//! Non-leaf items open nodes, leaf rules and gaps become tokens. Because gaps
//! cover exactly the text no recorded rule claims, a full-input parse gives a
//! tree whose text is the source, byte for byte.

use rowan::GreenNodeBuilder;

use crate::preorder::TraversalItem;
use crate::rule_kind::{RuleKind, SyntaxNode};

/// Build the syntax tree for `source` from its traversal.
pub fn build(source: &str, items: impl IntoIterator<Item = TraversalItem>) -> SyntaxNode {
    let mut builder = GreenNodeBuilder::new();
    // Depths of the currently open nodes.
    let mut open: Vec<usize> = Vec::new();

    for item in items {
        while open.last().is_some_and(|&depth| depth >= item.depth) {
            builder.finish_node();
            open.pop();
        }

        if !item.leaf {
            builder.start_node(item.kind.into());
            open.push(item.depth);
        } else if open.is_empty() {
            // A lone leaf root still needs a node around it.
            builder.start_node(item.kind.into());
            builder.token(item.kind.into(), item.text(source));
            open.push(item.depth);
        } else if !item.is_zero_width() {
            builder.token(item.kind.into(), item.text(source));
        }
    }

    if open.is_empty() {
        builder.start_node(RuleKind::UNKNOWN.into());
        open.push(0);
    }
    for _ in open {
        builder.finish_node();
    }

    SyntaxNode::new_root(builder.finish())
}
