//! Token counting.
//!
//! Exact vocabularies are a provider detail; what the planner and summarizer
//! need is a total, deterministic, non-negative count that is the same in
//! both places. A mismatched counter only risks sub-optimal chunking, never
//! incorrectness, so a cheap estimator is the production default.

/// Counts tokens in a piece of text
pub trait TokenCounter: Send + Sync {
    /// Token count for `text`. Total and deterministic; empty text is 0.
    fn count(&self, text: &str) -> usize;
}

/// Character-based estimator, roughly one token per four characters.
#[derive(Debug, Clone)]
pub struct CharEstimator {
    chars_per_token: usize,
}

impl CharEstimator {
    pub fn new(chars_per_token: usize) -> Self {
        Self {
            chars_per_token: chars_per_token.max(1),
        }
    }
}

impl Default for CharEstimator {
    fn default() -> Self {
        Self::new(4)
    }
}

impl TokenCounter for CharEstimator {
    fn count(&self, text: &str) -> usize {
        text.chars().count().div_ceil(self.chars_per_token)
    }
}

/// Whitespace word counter. Mostly useful in tests, where budgets stated in
/// words are easy to reason about.
#[derive(Debug, Clone, Default)]
pub struct WordTokenizer;

impl TokenCounter for WordTokenizer {
    fn count(&self, text: &str) -> usize {
        text.split_whitespace().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn char_estimator_rounds_up_and_handles_empty() {
        let counter = CharEstimator::default();
        assert_eq!(counter.count(""), 0);
        assert_eq!(counter.count("a"), 1);
        assert_eq!(counter.count("abcd"), 1);
        assert_eq!(counter.count("abcde"), 2);
    }

    #[test]
    fn word_tokenizer_counts_whitespace_separated_words() {
        let counter = WordTokenizer;
        assert_eq!(counter.count(""), 0);
        assert_eq!(counter.count("   "), 0);
        assert_eq!(counter.count("i j k l m n o p q r s"), 11);
    }
}
