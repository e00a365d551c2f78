//! Instruction templates for the two summarization stages.

/// Separator placed between partial summaries in the reduce prompt
pub const PARTIAL_SEPARATOR: &str = "\n\n---\n\n";

const ANALYSIS_INSTRUCTIONS: &str = "\
You are an AI assistant that reads customer reviews and summarizes key feedback \
to help business owners improve their services.

Focus on these 5 areas:

Customer Experience: Overall feelings, staff behavior, and satisfaction.

Product / Service Quality: Quality, reliability, and performance.

Pricing and Charges: Fairness, transparency, value, and billing issues.

Digital Platform Experience: Usability and functionality of website, app, or online tools.

Support and Issue Resolution: Responsiveness, helpfulness, and problem-solving effectiveness.

For each area, provide:

A clear sentiment overview (e.g. percentage positive/negative/neutral if possible).

Key themes or examples mentioned frequently by customers.

Any notable praise or common complaints.

If a category is not discussed, write \"Not mentioned.\"

Conclude with a brief overall summary highlighting major strengths and any clear \
improvement areas. Keep language simple, actionable, and focused on what business \
owners can learn. Avoid rewriting full reviews or including unrelated content.";

const COMBINE_INSTRUCTIONS: &str = "\
You are given several partial summaries of customer reviews.
Your task is to combine them into a single cohesive summary covering:
- Overall Sentiment
- Pros
- Cons / Complaints
- Key Features Mentioned
- Recurring Themes";

/// Map-stage (and single-pass) prompt: analyze a body of review text
pub fn analysis_prompt(reviews_text: &str) -> String {
    format!("{}\n\nReview Text:\n{}", ANALYSIS_INSTRUCTIONS, reviews_text)
}

/// Reduce-stage prompt: combine already-generated partial summaries
pub fn combine_prompt(partials_text: &str) -> String {
    format!(
        "{}\n\nHere are the partial summaries:\n\n{}",
        COMBINE_INSTRUCTIONS, partials_text
    )
}
