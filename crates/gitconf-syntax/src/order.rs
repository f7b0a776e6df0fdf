//! # Depth Buckets
//!
//! Groups a flat token sequence by depth. Within one depth the matcher
//! commits tokens strictly left to right, so emission order inside a bucket is
//! source order:
//!
//! ```text
//! depth 0: Grammar
//! depth 1: Section
//! depth 2: PegText Action0 SpaceComment
//! depth 3: Identifier EndOfLine
//! depth 4:
//! ```
//!
//! Every bucket ends with one sentinel entry, and one sentinel-only bucket
//! follows the deepest level. Look-ups of "the next token at depth d + 1" from
//! the traversal therefore never run off the end; they land on a sentinel.

use crate::token::{OrderedToken, Token};

/// Per-depth, source-ordered token buckets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepthBuckets {
    buckets: Vec<Vec<OrderedToken>>,
}

impl DepthBuckets {
    /// Bucket `tokens` by depth.
    ///
    /// A sentinel inside the stream marks a premature end; everything from it
    /// on is ignored.
    pub fn from_tokens(tokens: &[Token]) -> Self {
        let tokens = match tokens.iter().position(Token::is_sentinel) {
            Some(end) => &tokens[..end],
            None => tokens,
        };

        // Pass 1: count per depth to presize.
        let mut counts: Vec<usize> = vec![0];
        for token in tokens {
            let depth = token.depth as usize;
            if depth >= counts.len() {
                counts.resize(depth + 1, 0);
            }
            counts[depth] += 1;
        }
        counts.push(0);

        let mut buckets: Vec<Vec<OrderedToken>> = counts
            .iter()
            .map(|count| Vec::with_capacity(count + 1))
            .collect();

        // Pass 2: scatter in emission order.
        for (index, token) in tokens.iter().enumerate() {
            buckets[token.depth as usize].push(OrderedToken {
                token: *token,
                index,
            });
        }
        for bucket in &mut buckets {
            bucket.push(OrderedToken::SENTINEL);
        }

        Self { buckets }
    }

    /// Number of buckets, including the trailing empty one.
    pub fn depth_count(&self) -> usize {
        self.buckets.len()
    }

    /// The real entries at `depth`, without the sentinel.
    pub fn depth(&self, depth: usize) -> &[OrderedToken] {
        self.buckets
            .get(depth)
            .map(|bucket| &bucket[..bucket.len() - 1])
            .unwrap_or(&[])
    }

    /// The full bucket at `depth`, sentinel included.
    pub fn bucket(&self, depth: usize) -> &[OrderedToken] {
        self.buckets.get(depth).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Entry `i` at `depth`, or the sentinel when out of range.
    pub fn slot(&self, depth: usize, i: usize) -> OrderedToken {
        self.buckets
            .get(depth)
            .and_then(|bucket| bucket.get(i))
            .copied()
            .unwrap_or(OrderedToken::SENTINEL)
    }

    /// Iterate buckets shallowest first, sentinels included.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &[OrderedToken]> {
        self.buckets.iter().map(Vec::as_slice)
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

    fn sample() -> Vec<Token> {
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

    fn kinds(entries: &[OrderedToken]) -> Vec<RuleKind> {
        entries.iter().map(|e| e.token.kind).collect()
    }

    #[test]
    fn buckets_by_depth_in_emission_order() {
        let buckets = DepthBuckets::from_tokens(&sample());

        assert_eq!(buckets.depth_count(), 5);
        assert_eq!(kinds(buckets.depth(0)), vec![RuleKind::GRAMMAR]);
        assert_eq!(kinds(buckets.depth(1)), vec![RuleKind::SECTION]);
        assert_eq!(
            kinds(buckets.depth(2)),
            vec![
                RuleKind::PEG_TEXT,
                RuleKind::ACTION0,
                RuleKind::SPACE_COMMENT
            ]
        );
        assert_eq!(
            kinds(buckets.depth(3)),
            vec![RuleKind::IDENTIFIER, RuleKind::END_OF_LINE]
        );
        assert!(buckets.depth(4).is_empty());
    }

    #[test]
    fn entries_remember_emission_index() {
        let buckets = DepthBuckets::from_tokens(&sample());
        let indices: Vec<usize> = buckets.depth(2).iter().map(|e| e.index).collect();
        assert_eq!(indices, vec![1, 2, 4]);
    }

    #[test]
    fn every_bucket_ends_in_sentinel() {
        let buckets = DepthBuckets::from_tokens(&sample());
        for bucket in buckets.iter() {
            assert!(bucket.last().is_some_and(OrderedToken::is_sentinel));
        }
        assert!(buckets.slot(3, 2).is_sentinel());
        assert!(buckets.slot(9, 0).is_sentinel());
    }

    #[test]
    fn sentinel_truncates_stream() {
        let mut tokens = sample();
        tokens.insert(3, Token::SENTINEL);
        let buckets = DepthBuckets::from_tokens(&tokens);

        assert_eq!(buckets.depth_count(), 5);
        assert!(buckets.depth(0).is_empty());
        assert_eq!(kinds(buckets.depth(3)), vec![RuleKind::IDENTIFIER]);
    }

    #[test]
    fn bucketing_is_idempotent() {
        let tokens = sample();
        assert_eq!(
            DepthBuckets::from_tokens(&tokens),
            DepthBuckets::from_tokens(&tokens)
        );
    }

    #[test]
    fn empty_stream_has_one_level_and_spare() {
        let buckets = DepthBuckets::from_tokens(&[]);
        assert_eq!(buckets.depth_count(), 2);
        assert!(buckets.depth(0).is_empty());
    }
}
