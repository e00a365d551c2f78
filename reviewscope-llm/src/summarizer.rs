//! Hierarchical (map-reduce) summarization.
//!
//! Input that fits the token budget is summarized in a single inference
//! call. Anything larger is partitioned by the chunk planner, each chunk is
//! summarized independently (map), and the partial summaries are combined in
//! one follow-up call (reduce). The reduce stage assumes partials fit one
//! call; `recursive_reduce` re-applies chunking to the partials for callers
//! that cannot accept that assumption.

use crate::chunker::ChunkPlanner;
use crate::prompts::{analysis_prompt, combine_prompt, PARTIAL_SEPARATOR};
use crate::tokenizer::TokenCounter;
use crate::{LlmResult, TextGenerator};
use std::sync::Arc;

/// Summarizer behavior knobs
#[derive(Debug, Clone)]
pub struct SummarizerConfig {
    /// Token budget per prompt chunk
    pub max_tokens_per_chunk: usize,
    /// Re-chunk partial summaries when they overflow the budget instead of
    /// assuming they fit one reduce call
    pub recursive_reduce: bool,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            max_tokens_per_chunk: 7500,
            recursive_reduce: false,
        }
    }
}

/// Map-reduce summarizer over a text-completion collaborator.
///
/// Calls are sequential and uncached; order of partial summaries always
/// equals chunk order. Any inference failure aborts the whole call with no
/// partial result.
pub struct Summarizer {
    generator: Arc<dyn TextGenerator>,
    tokenizer: Box<dyn TokenCounter>,
    config: SummarizerConfig,
}

impl Summarizer {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        tokenizer: Box<dyn TokenCounter>,
        config: SummarizerConfig,
    ) -> Self {
        Self {
            generator,
            tokenizer,
            config,
        }
    }

    /// Summarize `items` into one final text.
    ///
    /// Issues exactly one inference call when the items fit the budget, and
    /// one call per chunk plus one reduce call otherwise.
    pub async fn summarize(&self, items: &[String]) -> LlmResult<String> {
        let budget = self.config.max_tokens_per_chunk;
        let total = self.total_tokens(items);

        if total <= budget {
            tracing::info!(total_tokens = total, "input fits budget, single-pass summary");
            return self
                .generator
                .generate(&analysis_prompt(&items.join("\n")))
                .await;
        }

        let planner = ChunkPlanner::new(self.tokenizer.as_ref(), budget);
        let chunks = planner.plan(items);
        tracing::info!(
            total_tokens = total,
            chunks = chunks.len(),
            "input exceeds budget, map-reduce summary"
        );

        let mut partials = Vec::with_capacity(chunks.len());
        for (index, chunk) in chunks.iter().enumerate() {
            tracing::debug!(
                chunk = index + 1,
                of = chunks.len(),
                tokens = chunk.tokens,
                "summarizing chunk"
            );
            let partial = self
                .generator
                .generate(&analysis_prompt(&chunk.joined_text()))
                .await?;
            partials.push(partial);
        }

        if self.config.recursive_reduce {
            partials = self.compact_partials(partials).await?;
        }

        self.generator
            .generate(&combine_prompt(&partials.join(PARTIAL_SEPARATOR)))
            .await
    }

    /// Fold oversized partial-summary sets down until they fit one reduce
    /// call: re-chunk the partials and combine each chunk, repeating while
    /// the set keeps shrinking.
    async fn compact_partials(&self, mut partials: Vec<String>) -> LlmResult<Vec<String>> {
        let budget = self.config.max_tokens_per_chunk;
        let planner = ChunkPlanner::new(self.tokenizer.as_ref(), budget);

        loop {
            let total = self.total_tokens(&partials);
            if total <= budget {
                return Ok(partials);
            }

            let chunks = planner.plan(&partials);
            if chunks.len() >= partials.len() {
                // every partial already sits alone in its chunk; combining
                // cannot shrink the set any further
                return Ok(partials);
            }
            tracing::debug!(
                partials = partials.len(),
                folded_into = chunks.len(),
                "partial summaries overflow budget, folding"
            );

            let mut next = Vec::with_capacity(chunks.len());
            for chunk in &chunks {
                let combined = self
                    .generator
                    .generate(&combine_prompt(&chunk.items.join(PARTIAL_SEPARATOR)))
                    .await?;
                next.push(combined);
            }
            partials = next;
        }
    }

    fn total_tokens(&self, items: &[String]) -> usize {
        items.iter().map(|item| self.tokenizer.count(item)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::WordTokenizer;
    use crate::LlmError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Generator that records every prompt and answers from a script
    struct ScriptedGenerator {
        prompts: Mutex<Vec<String>>,
        response_text: String,
        fail_on_call: Option<usize>,
    }

    impl ScriptedGenerator {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                prompts: Mutex::new(Vec::new()),
                response_text: String::new(),
                fail_on_call: None,
            })
        }

        fn with_response(text: &str) -> Arc<Self> {
            Arc::new(Self {
                prompts: Mutex::new(Vec::new()),
                response_text: text.to_string(),
                fail_on_call: None,
            })
        }

        fn failing_on(call: usize) -> Arc<Self> {
            Arc::new(Self {
                prompts: Mutex::new(Vec::new()),
                response_text: String::new(),
                fail_on_call: Some(call),
            })
        }

        fn calls(&self) -> usize {
            self.prompts.lock().unwrap().len()
        }

        fn prompt(&self, index: usize) -> String {
            self.prompts.lock().unwrap()[index].clone()
        }
    }

    #[async_trait]
    impl TextGenerator for ScriptedGenerator {
        async fn generate(&self, prompt: &str) -> LlmResult<String> {
            let call = {
                let mut prompts = self.prompts.lock().unwrap();
                prompts.push(prompt.to_string());
                prompts.len()
            };
            if self.fail_on_call == Some(call) {
                return Err(LlmError::Inference("scripted failure".to_string()));
            }
            if self.response_text.is_empty() {
                Ok(format!("summary-{call}"))
            } else {
                Ok(self.response_text.clone())
            }
        }
    }

    fn summarizer(generator: Arc<ScriptedGenerator>, budget: usize) -> Summarizer {
        Summarizer::new(
            generator,
            Box::new(WordTokenizer),
            SummarizerConfig {
                max_tokens_per_chunk: budget,
                recursive_reduce: false,
            },
        )
    }

    fn items(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn small_input_takes_the_single_pass_path() {
        let generator = ScriptedGenerator::new();
        let result = summarizer(generator.clone(), 10)
            .summarize(&items(&["a b c", "d e f g"]))
            .await
            .unwrap();

        assert_eq!(result, "summary-1");
        assert_eq!(generator.calls(), 1);
        // one prompt body, newline-joined, order preserved
        assert!(generator.prompt(0).contains("a b c\nd e f g"));
        assert!(generator.prompt(0).contains("Review Text:"));
    }

    #[tokio::test]
    async fn large_input_maps_each_chunk_then_reduces() {
        let generator = ScriptedGenerator::new();
        // budget 10 splits these into [8-token chunk, 11-token overshoot]
        let input = items(&["a b c", "d e f g", "h", "i j k l m n o p q r s"]);
        let result = summarizer(generator.clone(), 10)
            .summarize(&input)
            .await
            .unwrap();

        // one call per chunk plus one reduce
        assert_eq!(generator.calls(), 3);
        assert_eq!(result, "summary-3");

        assert!(generator.prompt(0).contains("a b c\nd e f g\nh"));
        assert!(generator.prompt(1).contains("i j k l m n o p q r s"));

        // reduce sees the partials in chunk order with the explicit separator
        let reduce = generator.prompt(2);
        assert!(reduce.contains("partial summaries"));
        assert!(reduce.contains("summary-1\n\n---\n\nsummary-2"));
    }

    #[tokio::test]
    async fn exact_budget_total_still_uses_one_call() {
        let generator = ScriptedGenerator::new();
        summarizer(generator.clone(), 5)
            .summarize(&items(&["a b", "c d e"]))
            .await
            .unwrap();
        assert_eq!(generator.calls(), 1);
    }

    #[tokio::test]
    async fn inference_failure_aborts_without_a_partial_result() {
        let generator = ScriptedGenerator::failing_on(2);
        let input = items(&["a b c", "d e f g", "h", "i j k l m n o p q r s"]);
        let err = summarizer(generator.clone(), 10)
            .summarize(&input)
            .await
            .unwrap_err();

        assert!(matches!(err, LlmError::Inference(_)));
        // the second map call failed; no reduce call was issued
        assert_eq!(generator.calls(), 2);
    }

    #[tokio::test]
    async fn recursive_reduce_folds_oversized_partials() {
        // every response is 4 words, so 4 partials (16 tokens) overflow the
        // 8-token budget and must be folded pairwise before the final reduce
        let generator = ScriptedGenerator::with_response("w w w w");
        let input: Vec<String> = (0..8).map(|_| "x x x".to_string()).collect();
        let summarizer = Summarizer::new(
            generator.clone(),
            Box::new(WordTokenizer),
            SummarizerConfig {
                max_tokens_per_chunk: 8,
                recursive_reduce: true,
            },
        );

        summarizer.summarize(&input).await.unwrap();

        // 4 map calls + 2 fold calls + 1 final reduce
        assert_eq!(generator.calls(), 7);
        assert!(generator.prompt(4).contains("partial summaries"));
        assert!(generator.prompt(5).contains("partial summaries"));
    }

    #[tokio::test]
    async fn non_recursive_reduce_reproduces_the_single_combine_call() {
        let generator = ScriptedGenerator::with_response("w w w w");
        let input: Vec<String> = (0..8).map(|_| "x x x".to_string()).collect();
        summarizer(generator.clone(), 8)
            .summarize(&input)
            .await
            .unwrap();

        // 4 map calls + exactly 1 reduce, even though the partials overflow
        assert_eq!(generator.calls(), 5);
    }
}
