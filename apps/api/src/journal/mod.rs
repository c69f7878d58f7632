//! Weekly journal: one persona entry per recent week of spending.
//!
//! Each week not already cached costs one completion call. A failed call
//! yields a deterministic fallback entry, which is never cached so the next
//! request tries the model again.

pub mod handlers;
pub mod persona;
pub mod prompts;

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{info, warn};

use crate::journal::persona::{extract_persona, fallback_persona, no_activity_persona, PersonaEntry};
use crate::journal::prompts::compose_persona_prompt;
use crate::llm_client::{CompletionClient, CompletionRequest, GenerationParams};
use crate::transactions::aggregate::{
    group_by_week, recent_weeks, top_categories, week_end, week_start, CategoryTotal, WeekBucket,
    WeekStats,
};
use crate::transactions::models::Transaction;

pub const TOP_CATEGORY_LIMIT: usize = 3;

const PERSONA_PARAMS: GenerationParams = GenerationParams {
    temperature: Some(0.7),
    candidate_count: 1,
    max_output_tokens: Some(200),
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntrySource {
    Model,
    Fallback,
    NoActivity,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JournalEntry {
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub persona: PersonaEntry,
    pub top_categories: Vec<CategoryTotal>,
    pub source: EntrySource,
}

impl JournalEntry {
    fn new(week_start: NaiveDate, persona: PersonaEntry, source: EntrySource) -> Self {
        Self {
            week_start,
            week_end: week_end(week_start),
            top_categories: top_categories(&persona.stats, TOP_CATEGORY_LIMIT),
            persona,
            source,
        }
    }

    /// Only model-written entries are worth keeping for the session.
    pub fn is_cacheable(&self) -> bool {
        self.source == EntrySource::Model
    }
}

/// Builds entries for up to four recent weeks, newest first.
///
/// `cached` holds earlier model entries for the same customer, keyed by week
/// start; those weeks skip the model call. An empty dataset produces a single
/// no-activity entry for the week containing `today`.
pub async fn build_journal(
    llm: &dyn CompletionClient,
    transactions: &[Transaction],
    cached: &HashMap<NaiveDate, JournalEntry>,
    today: NaiveDate,
) -> Vec<JournalEntry> {
    if transactions.is_empty() {
        let persona = no_activity_persona(WeekStats::default());
        return vec![JournalEntry::new(
            week_start(today),
            persona,
            EntrySource::NoActivity,
        )];
    }

    let buckets = group_by_week(transactions);
    let mut entries = Vec::new();

    for week in recent_weeks(&buckets) {
        if let Some(entry) = cached.get(&week) {
            entries.push(entry.clone());
            continue;
        }
        if let Some(bucket) = buckets.get(&week) {
            entries.push(generate_entry(llm, bucket).await);
        }
    }

    entries
}

async fn generate_entry(llm: &dyn CompletionClient, bucket: &WeekBucket) -> JournalEntry {
    let stats = bucket.stats();
    let request =
        CompletionRequest::new(compose_persona_prompt(bucket, &stats)).with_params(PERSONA_PARAMS);

    match llm.complete(&request).await {
        Ok(raw) => {
            info!("Journal persona generated for week {}", bucket.week_start);
            JournalEntry::new(
                bucket.week_start,
                extract_persona(&raw, stats),
                EntrySource::Model,
            )
        }
        Err(e) => {
            warn!(
                "Journal persona failed for week {}: {e}",
                bucket.week_start
            );
            JournalEntry::new(bucket.week_start, fallback_persona(stats), EntrySource::Fallback)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    use crate::journal::persona::HERMIT_PERSONA_NAME;
    use crate::testing::FakeCompletion;

    const REPLY: &str = "PERSONA_NAME: Coffee Connoisseur\nEMOJI: ☕\nSTORY: Lots of lattes.";

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    fn txn(m: u32, d: u32, cents: i64, description: &str) -> Transaction {
        Transaction::new(date(m, d), Decimal::new(cents, 2), description)
    }

    /// Six distinct weeks in January/February 2024.
    fn six_weeks() -> Vec<Transaction> {
        vec![
            txn(1, 1, 1250, "Coffee Shop"),
            txn(1, 3, 4000, "Coffee Shop"),
            txn(1, 9, 2000, "Groceries — Trader Joe's"),
            txn(1, 16, 1500, "Uber ride"),
            txn(1, 23, 3000, "Dining — Chipotle"),
            txn(1, 30, 900, "Coffee Shop"),
            txn(2, 6, 6000, "Utilities — Power"),
            txn(2, 7, 1000, "Groceries — Kroger"),
        ]
    }

    #[tokio::test]
    async fn test_four_newest_weeks_newest_first() {
        let llm = FakeCompletion::replying(REPLY);
        let entries = build_journal(&llm, &six_weeks(), &HashMap::new(), date(2, 10)).await;

        let weeks: Vec<_> = entries.iter().map(|e| e.week_start).collect();
        assert_eq!(weeks, vec![date(2, 5), date(1, 29), date(1, 22), date(1, 15)]);
        assert_eq!(llm.requests().len(), 4);

        let newest = &entries[0];
        assert_eq!(newest.week_end, date(2, 11));
        assert_eq!(newest.source, EntrySource::Model);
        assert_eq!(newest.persona.persona_name, "Coffee Connoisseur");
        assert_eq!(newest.persona.stats.total, Decimal::new(7000, 2));
        assert_eq!(newest.top_categories[0].category, "Utilities");
        assert!(newest.is_cacheable());
    }

    #[tokio::test]
    async fn test_persona_call_uses_journal_params() {
        let llm = FakeCompletion::replying(REPLY);
        build_journal(&llm, &six_weeks()[..2], &HashMap::new(), date(1, 5)).await;

        let requests = llm.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].params, PERSONA_PARAMS);
        assert!(requests[0].history.is_empty());
        assert!(requests[0].prompt.contains("Total spent: $52.50"));
    }

    #[tokio::test]
    async fn test_cached_weeks_skip_the_model() {
        let llm = FakeCompletion::replying(REPLY);
        let first = build_journal(&llm, &six_weeks(), &HashMap::new(), date(2, 10)).await;
        let cached: HashMap<_, _> = first.into_iter().map(|e| (e.week_start, e)).collect();

        let again = FakeCompletion::failing();
        let second = build_journal(&again, &six_weeks(), &cached, date(2, 10)).await;

        assert!(again.requests().is_empty());
        assert!(second.iter().all(|e| e.source == EntrySource::Model));
    }

    #[tokio::test]
    async fn test_failed_call_falls_back_without_caching() {
        let llm = FakeCompletion::failing();
        let entries = build_journal(&llm, &six_weeks()[..2], &HashMap::new(), date(1, 5)).await;

        assert_eq!(entries.len(), 1);
        let entry = &entries[0];
        assert_eq!(entry.source, EntrySource::Fallback);
        assert!(!entry.is_cacheable());
        assert_eq!(
            entry.persona.story,
            "This week you spent $52 across 2 transactions. Keep up the tracking!"
        );
    }

    #[tokio::test]
    async fn test_empty_dataset_is_single_no_activity_entry() {
        let llm = FakeCompletion::replying(REPLY);
        let entries = build_journal(&llm, &[], &HashMap::new(), date(1, 10)).await;

        assert_eq!(entries.len(), 1);
        let entry = &entries[0];
        assert_eq!(entry.source, EntrySource::NoActivity);
        assert_eq!(entry.week_start, date(1, 8));
        assert_eq!(entry.persona.persona_name, HERMIT_PERSONA_NAME);
        assert_eq!(entry.persona.stats, WeekStats::default());
        assert!(entry.top_categories.is_empty());
        assert!(llm.requests().is_empty());
    }
}
