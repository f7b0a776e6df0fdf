//! # Pre-Order Traversal
//!
//! Walks the parse tree depth-first using the [`DepthBuckets`] as the only
//! source of structure: the children of a node at depth `d` are the next
//! unvisited entries of bucket `d + 1` that the node contains. Every bucket
//! keeps a cursor, and since the walk visits nodes in source order each
//! cursor only ever moves forward.
//!
//! Source text that no recorded child claims is reported as a gap:
//!
//! ```text
//! Section "[a]\n"
//!   Prefix "["            node.begin .. first child
//!   PegText "a"
//!   Infix "]"             previous child .. next child
//!   SpaceComment "\n"
//!                         (Suffix: last child .. node.end, empty here)
//! ```
//!
//! The root comes out first, so the stream describes the whole tree.

use std::collections::VecDeque;

use crate::order::DepthBuckets;
use crate::rule_kind::RuleKind;
use crate::token::OrderedToken;

/// One step of the walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraversalItem {
    /// A grammar rule, or one of the gap kinds `PREFIX`, `INFIX`, `SUFFIX`.
    pub kind: RuleKind,
    pub begin: usize,
    pub end: usize,
    pub depth: usize,
    /// `false` for nodes whose children follow.
    pub leaf: bool,
    /// Enclosing rules, root first.
    pub ancestors: Vec<RuleKind>,
}

impl TraversalItem {
    pub fn is_gap(&self) -> bool {
        self.kind.is_synthetic()
    }

    pub fn is_zero_width(&self) -> bool {
        self.begin == self.end
    }

    pub fn text<'s>(&self, source: &'s str) -> &'s str {
        source.get(self.begin..self.end).unwrap_or("")
    }
}

#[derive(Debug, Clone, Copy)]
struct Frame {
    node: OrderedToken,
    depth: usize,
    /// End of the last visited child, `None` before the first one.
    last_end: Option<usize>,
}

/// Depth-first iterator over a successful parse.
#[derive(Debug)]
pub struct PreOrder<'a> {
    buckets: &'a DepthBuckets,
    cursors: Vec<usize>,
    stack: Vec<Frame>,
    pending: VecDeque<TraversalItem>,
}

impl<'a> PreOrder<'a> {
    pub fn new(buckets: &'a DepthBuckets) -> Self {
        Self {
            buckets,
            cursors: vec![0; buckets.depth_count() + 1],
            stack: Vec::new(),
            pending: VecDeque::new(),
        }
    }

    fn ancestors(&self) -> Vec<RuleKind> {
        self.stack.iter().map(|frame| frame.node.token.kind).collect()
    }

    /// The next unvisited entry at `depth` if `parent` contains it.
    fn next_child(&self, parent: &OrderedToken, depth: usize) -> Option<OrderedToken> {
        let candidate = self.buckets.slot(depth, self.cursors[depth]);
        (!candidate.is_sentinel() && parent.is_parent_of(&candidate)).then_some(candidate)
    }

    fn gap(&mut self, kind: RuleKind, begin: usize, end: usize, depth: usize) {
        if begin < end {
            let ancestors = self.ancestors();
            self.pending.push_back(TraversalItem {
                kind,
                begin,
                end,
                depth,
                leaf: true,
                ancestors,
            });
        }
    }

    /// Visit `node` at `depth`; opens a frame when it has children.
    fn visit(&mut self, node: OrderedToken, depth: usize) {
        self.cursors[depth] += 1;
        let leaf = self.next_child(&node, depth + 1).is_none();
        let ancestors = self.ancestors();
        self.pending.push_back(TraversalItem {
            kind: node.token.kind,
            begin: node.token.begin,
            end: node.token.end,
            depth,
            leaf,
            ancestors,
        });
        if !leaf {
            self.stack.push(Frame {
                node,
                depth,
                last_end: None,
            });
        }
    }

    /// Advance until at least one item is pending or the walk is over.
    fn step(&mut self) -> bool {
        let Some(frame) = self.stack.last().copied() else {
            let root = self.buckets.slot(0, self.cursors[0]);
            if root.is_sentinel() {
                return false;
            }
            self.visit(root, 0);
            return true;
        };

        let depth = frame.depth + 1;
        match self.next_child(&frame.node, depth) {
            Some(child) => {
                let (begin, end) = (child.token.begin, child.token.end);
                match frame.last_end {
                    None => self.gap(RuleKind::PREFIX, frame.node.token.begin, begin, depth),
                    Some(last) => self.gap(RuleKind::INFIX, last, begin, depth),
                }
                if let Some(top) = self.stack.last_mut() {
                    top.last_end = Some(end);
                }
                self.visit(child, depth);
            }
            None => {
                let last = frame.last_end.unwrap_or(frame.node.token.begin);
                self.gap(RuleKind::SUFFIX, last, frame.node.token.end, depth);
                self.stack.pop();
            }
        }
        true
    }
}

impl Iterator for PreOrder<'_> {
    type Item = TraversalItem;

    fn next(&mut self) -> Option<Self::Item> {
        while self.pending.is_empty() {
            if !self.step() {
                return None;
            }
        }
        self.pending.pop_front()
    }
}

/// Render a walk as indented `Rule "text"` lines.
pub fn render_syntax_tree(source: &str, items: impl IntoIterator<Item = TraversalItem>) -> String {
    let mut out = String::new();
    for item in items {
        out.push_str(&format!(
            "{:indent$}{} {:?}\n",
            "",
            item.kind,
            item.text(source),
            indent = item.depth
        ));
    }
    out
}

/// Render a walk as breadcrumbs: one line per node or marker, one line per
/// character of every leaf, each prefixed with the enclosing rule chain.
///
/// ```text
/// 0 Grammar Section
/// 1 Grammar Section PegText
/// 1 Grammar Section PegText Identifier
/// ```
pub fn render_breadcrumbs(source: &str, items: impl IntoIterator<Item = TraversalItem>) -> String {
    let mut out = String::new();
    for item in items {
        let mut trail: Vec<&str> = item.ancestors.iter().map(|kind| kind.name()).collect();
        trail.push(item.kind.name());
        let trail = trail.join(" ");

        if !item.leaf || item.is_zero_width() {
            out.push_str(&format!("{} {trail}\n", item.begin));
            continue;
        }
        for (offset, _) in item.text(source).char_indices() {
            out.push_str(&format!("{} {trail}\n", item.begin + offset));
        }
        out.push('\n');
    }
    out
}
