//! Parse tree rebuilt from span containment.
//!
//! Works on the flat token stream in emission order. Children always finish
//! before their parent, so when a token arrives every pending node whose span
//! it contains is one of its children. Those are popped off the stack and
//! linked as the new node's child list.
//!
//! Zero-width tokens (action markers) carry no structure and are skipped.

use crate::error::TreeError;
use crate::token::Token;

/// Index into [`Ast::nodes`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AstNode {
    pub token: Token,
    pub first_child: Option<NodeId>,
    pub next_sibling: Option<NodeId>,
}

/// Arena-backed tree with a single root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ast {
    nodes: Vec<AstNode>,
    root: NodeId,
}

impl Ast {
    pub fn build(tokens: &[Token]) -> Result<Self, TreeError> {
        let mut nodes: Vec<AstNode> = Vec::with_capacity(tokens.len());
        let mut stack: Vec<NodeId> = Vec::new();

        for token in tokens.iter().filter(|t| !t.is_zero_width()) {
            let id = NodeId(nodes.len());
            nodes.push(AstNode {
                token: *token,
                first_child: None,
                next_sibling: None,
            });

            // Popping yields children right to left, so each one is prepended.
            while let Some(&top) = stack.last() {
                if !token.contains(&nodes[top.0].token) {
                    break;
                }
                stack.pop();
                nodes[top.0].next_sibling = nodes[id.0].first_child;
                nodes[id.0].first_child = Some(top);
            }
            stack.push(id);
        }

        match stack.as_slice() {
            [root] => Ok(Self { root: *root, nodes }),
            _ => Err(TreeError::Unrooted { roots: stack.len() }),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &AstNode {
        &self.nodes[id.0]
    }

    pub fn nodes(&self) -> &[AstNode] {
        &self.nodes
    }

    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            ast: self,
            next: self.node(id).first_child,
        }
    }

    /// Nodes depth-first, parents before children, with their depth.
    pub fn pre_order(&self) -> impl Iterator<Item = (usize, &AstNode)> + '_ {
        let mut stack = vec![(0, self.root)];
        std::iter::from_fn(move || {
            let (depth, id) = stack.pop()?;
            let children: Vec<NodeId> = self.children(id).collect();
            stack.extend(children.into_iter().rev().map(|child| (depth + 1, child)));
            Some((depth, self.node(id)))
        })
    }

    /// Indented `Rule "text"` lines.
    pub fn render(&self, source: &str) -> String {
        let mut out = String::new();
        for (depth, node) in self.pre_order() {
            out.push_str(&format!(
                "{:depth$}{} {:?}\n",
                "",
                node.token.kind,
                node.token.text(source)
            ));
        }
        out
    }
}

/// Sibling-chain iterator returned by [`Ast::children`].
#[derive(Debug, Clone)]
pub struct Children<'a> {
    ast: &'a Ast,
    next: Option<NodeId>,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        self.next = self.ast.node(id).next_sibling;
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule_kind::RuleKind;
    use pretty_assertions::assert_eq;

    fn tok(kind: RuleKind, begin: usize, end: usize, depth: u32) -> Token {
        Token::new(kind, begin, end, depth)
    }

    fn section() -> Vec<Token> {
        vec![
            tok(RuleKind::IDENTIFIER, 1, 2, 3),
            tok(RuleKind::PEG_TEXT, 1, 2, 2),
            tok(RuleKind::ACTION0, 2, 2, 2),
            tok(RuleKind::END_OF_LINE, 3, 4, 3),
            tok(RuleKind::SPACE_COMMENT, 3, 4, 2),
            tok(RuleKind::SECTION, 0, 4, 1),
            tok(RuleKind::GRAMMAR, 0, 4, 0),
        ]
    }

    #[test]
    fn links_children_in_source_order() {
        let ast = Ast::build(&section()).unwrap();
        let root = ast.node(ast.root());
        assert_eq!(root.token.kind, RuleKind::GRAMMAR);

        let section = ast.children(ast.root()).next().unwrap();
        let kinds: Vec<RuleKind> = ast
            .children(section)
            .map(|id| ast.node(id).token.kind)
            .collect();
        assert_eq!(kinds, vec![RuleKind::PEG_TEXT, RuleKind::SPACE_COMMENT]);
    }

    #[test]
    fn skips_zero_width_tokens() {
        let ast = Ast::build(&section()).unwrap();
        assert_eq!(ast.nodes().len(), 6);
        assert!(ast.pre_order().all(|(_, n)| n.token.kind != RuleKind::ACTION0));
    }

    #[test]
    fn rejects_a_forest() {
        let tokens = [
            tok(RuleKind::SPACE, 0, 1, 0),
            tok(RuleKind::SPACE, 1, 2, 0),
        ];
        assert_eq!(Ast::build(&tokens), Err(TreeError::Unrooted { roots: 2 }));
        assert_eq!(Ast::build(&[]), Err(TreeError::Unrooted { roots: 0 }));
    }

    #[test]
    fn renders_indented_dump() {
        let ast = Ast::build(&section()).unwrap();
        insta::assert_snapshot!(ast.render("[a]\n"), @r#"
        Grammar "[a]\n"
         Section "[a]\n"
          PegText "a"
           Identifier "a"
          SpaceComment "\n"
           EndOfLine "\n"
        "#);
    }
}
