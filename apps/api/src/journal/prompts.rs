// Prompt constants and composition for the weekly journal persona.

use crate::llm_client::prompts::{fill_template, PLAIN_TEXT_INSTRUCTION};
use crate::transactions::aggregate::{WeekBucket, WeekStats};
use crate::transactions::models::TransactionView;

/// Replace `{week_start}`, `{week_end}`, `{total}`, `{transaction_count}`,
/// `{categories_json}`, `{transactions_json}` and `{plain_text_instruction}`.
pub const PERSONA_PROMPT_TEMPLATE: &str = r#"You are a creative financial storyteller who turns spending data into engaging weekly personas and narratives.

WEEK DATA ({week_start} to {week_end}):
- Total spent: ${total}
- Transaction count: {transaction_count}
- Category breakdown (JSON): {categories_json}
- Raw transactions (JSON):
{transactions_json}

TASK: Create a weekly financial persona and story with these exact components:
1. PERSONA_NAME: a creative 2-3 word persona based on the spending pattern (for example "Foodie Adventurer", "Thrifty Saver", "Coffee Connoisseur", "Utility Warrior").
2. EMOJI: a single emoji that represents the persona.
3. STORY: a 2-3 sentence narrative that tells the week like a story, mentions specific amounts and patterns, and ends with a friendly tip for next week. Fun and relatable, never judgmental.

FORMAT YOUR RESPONSE EXACTLY LIKE THIS:
PERSONA_NAME: [persona name]
EMOJI: [single emoji]
STORY: [2-3 sentence story with amounts and tip]

STYLE GUIDELINES:
- {plain_text_instruction}
- Use simple, conversational language, like texting a friend.
- Focus on the most interesting spending patterns and name merchants or categories when relevant.
- Only mention amounts that appear in the week data.

If there are no transactions for the week, create a "Financial Hermit" persona with a story about staying in and saving money."#;

pub fn compose_persona_prompt(bucket: &WeekBucket, stats: &WeekStats) -> String {
    let transactions: Vec<TransactionView> =
        bucket.transactions.iter().map(TransactionView::from).collect();

    let week_start = bucket.week_start.to_string();
    let week_end = bucket.week_end().to_string();
    let total = stats.total.to_string();
    let count = stats.transaction_count.to_string();
    let categories = serde_json::to_string(&stats.categories).unwrap_or_default();
    let transactions = serde_json::to_string_pretty(&transactions).unwrap_or_default();

    fill_template(
        PERSONA_PROMPT_TEMPLATE,
        &[
            ("plain_text_instruction", PLAIN_TEXT_INSTRUCTION),
            ("week_start", week_start.as_str()),
            ("week_end", week_end.as_str()),
            ("total", total.as_str()),
            ("transaction_count", count.as_str()),
            ("categories_json", categories.as_str()),
            ("transactions_json", transactions.as_str()),
        ],
    )
}
