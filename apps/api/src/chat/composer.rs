//! Prompt Composer — builds the single text payload sent for a chat turn.
//!
//! Block order is fixed: role, data, output format, question, internal note.
//! No block is ever skipped and nothing branches on the question text. Refusing
//! to leak the instructions is asked for in the prompt, not enforced here.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::chat::prompts::{
    DATA_BLOCK_TEMPLATE, INTERNAL_NOTE, OUTPUT_FORMAT_TEMPLATE, QUESTION_TEMPLATE, ROLE_BLOCK,
};
use crate::llm_client::prompts::{
    fill_template, DATA_GROUNDING_INSTRUCTION, PLAIN_TEXT_INSTRUCTION,
};
use crate::transactions::aggregate::{
    category_totals, recent_week_summaries, sorted_by_date_desc, summarize, CategoryTotal,
    WeeklySummary,
};
use crate::transactions::models::{Transaction, TransactionView};

const BLOCK_SEPARATOR: &str = "\n\n";

/// Everything the model may cite when answering.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ChatContext {
    pub total: Decimal,
    pub transactions: Vec<TransactionView>,
    pub category_totals: Vec<CategoryTotal>,
    pub weekly: Vec<WeeklySummary>,
}

impl ChatContext {
    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        Self {
            total: summarize(transactions).total,
            transactions: sorted_by_date_desc(transactions)
                .iter()
                .map(TransactionView::from)
                .collect(),
            category_totals: category_totals(transactions),
            weekly: recent_week_summaries(transactions),
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_default()
}

pub fn data_block(context: &ChatContext) -> String {
    let total = context.total.to_string();
    let transactions = to_json(&context.transactions);
    let category_totals = to_json(&context.category_totals);
    let weekly = to_json(&context.weekly);

    fill_template(
        DATA_BLOCK_TEMPLATE,
        &[
            ("grounding_instruction", DATA_GROUNDING_INSTRUCTION),
            ("total", total.as_str()),
            ("transactions_json", transactions.as_str()),
            ("category_totals_json", category_totals.as_str()),
            ("weekly_json", weekly.as_str()),
        ],
    )
}

pub fn output_format_block() -> String {
    fill_template(
        OUTPUT_FORMAT_TEMPLATE,
        &[("plain_text_instruction", PLAIN_TEXT_INSTRUCTION)],
    )
}

pub fn question_block(question: &str) -> String {
    fill_template(QUESTION_TEMPLATE, &[("question", question.trim())])
}

pub fn compose_chat_prompt(question: &str, context: &ChatContext) -> String {
    [
        ROLE_BLOCK.to_string(),
        data_block(context),
        output_format_block(),
        question_block(question),
        INTERNAL_NOTE.to_string(),
    ]
    .join(BLOCK_SEPARATOR)
}
