//! Token-budgeted chunk planning.
//!
//! Greedy single pass: items are appended to a running chunk until the next
//! one would overflow the budget, at which point the running chunk is closed
//! and a new one starts. Items are never split, so a single item larger than
//! the whole budget still goes through, alone in its own chunk, as an
//! accepted overshoot.

use crate::tokenizer::TokenCounter;

/// An ordered group of items whose token sum fits the budget (except the
/// singleton-overshoot case)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Items in input order
    pub items: Vec<String>,
    /// Token sum of the items
    pub tokens: usize,
}

impl Chunk {
    /// The chunk's items joined into one prompt body, newline-separated
    pub fn joined_text(&self) -> String {
        self.items.join("\n")
    }
}

/// Partitions ordered text sequences into token-budgeted chunks
pub struct ChunkPlanner<'t> {
    tokenizer: &'t dyn TokenCounter,
    budget: usize,
}

impl<'t> ChunkPlanner<'t> {
    pub fn new(tokenizer: &'t dyn TokenCounter, budget: usize) -> Self {
        Self { tokenizer, budget }
    }

    /// Partition `items` in order. Every chunk is a contiguous subsequence
    /// of the input, no chunk is empty, and an empty input yields no chunks.
    pub fn plan(&self, items: &[String]) -> Vec<Chunk> {
        let mut chunks = Vec::new();
        let mut current: Vec<String> = Vec::new();
        let mut current_tokens = 0usize;

        for item in items {
            let item_tokens = self.tokenizer.count(item);
            if !current.is_empty() && current_tokens + item_tokens > self.budget {
                chunks.push(Chunk {
                    items: std::mem::take(&mut current),
                    tokens: current_tokens,
                });
                current_tokens = 0;
            }
            current.push(item.clone());
            current_tokens += item_tokens;
        }

        if !current.is_empty() {
            chunks.push(Chunk {
                items: current,
                tokens: current_tokens,
            });
        }
        chunks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::WordTokenizer;
    use proptest::prelude::*;

    fn plan(items: &[&str], budget: usize) -> Vec<Chunk> {
        let owned: Vec<String> = items.iter().map(|s| s.to_string()).collect();
        ChunkPlanner::new(&WordTokenizer, budget).plan(&owned)
    }

    #[test]
    fn empty_input_yields_no_chunks() {
        assert!(plan(&[], 10).is_empty());
    }

    #[test]
    fn fills_greedily_and_accepts_singleton_overshoot() {
        let chunks = plan(
            &["a b c", "d e f g", "h", "i j k l m n o p q r s"],
            10,
        );
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].items, vec!["a b c", "d e f g", "h"]);
        assert_eq!(chunks[0].tokens, 8);
        assert_eq!(chunks[1].items, vec!["i j k l m n o p q r s"]);
        assert_eq!(chunks[1].tokens, 11);
    }

    #[test]
    fn oversized_first_item_does_not_emit_an_empty_chunk() {
        let chunks = plan(&["one two three four five", "six"], 3);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].items, vec!["one two three four five"]);
        assert_eq!(chunks[1].items, vec!["six"]);
    }

    #[test]
    fn exact_budget_fit_stays_in_one_chunk() {
        let chunks = plan(&["a b", "c d", "e"], 5);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].tokens, 5);
    }

    #[test]
    fn joined_text_preserves_item_order() {
        let chunks = plan(&["first", "second"], 10);
        assert_eq!(chunks[0].joined_text(), "first\nsecond");
    }

    proptest! {
        #[test]
        fn plan_is_a_contiguous_partition_within_budget(
            items in prop::collection::vec("[a-z]{1,8}( [a-z]{1,8}){0,6}", 0..40),
            budget in 1usize..20,
        ) {
            let tokenizer = WordTokenizer;
            let chunks = ChunkPlanner::new(&tokenizer, budget).plan(&items);

            // concatenating chunks reproduces the input exactly
            let flattened: Vec<String> =
                chunks.iter().flat_map(|c| c.items.iter().cloned()).collect();
            prop_assert_eq!(&flattened, &items);

            for chunk in &chunks {
                prop_assert!(!chunk.items.is_empty());
                // only a singleton may overshoot the budget
                prop_assert!(chunk.tokens <= budget || chunk.items.len() == 1);
                let recounted: usize = chunk.items.iter().map(|i| tokenizer.count(i)).sum();
                prop_assert_eq!(chunk.tokens, recounted);
            }
        }
    }
}
