//! Transaction Aggregator — pure group-by-sum over transaction lists.
//!
//! No I/O. Every function here is deterministic in its inputs, which is what
//! lets the dashboard and the journal share one set of numbers.

use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::transactions::models::Transaction;

/// Separator used by the mock data set between a category and a merchant,
/// e.g. `"Groceries — Trader Joe's"`.
pub const CATEGORY_SEPARATOR: &str = " — ";
pub const FALLBACK_CATEGORY: &str = "Other";
/// Number of weeks shown by the journal and the dashboard's weekly view.
pub const RECENT_WEEK_LIMIT: usize = 4;

/// Summary statistics for any slice of transactions (usually one week).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WeekStats {
    pub total: Decimal,
    pub categories: BTreeMap<String, Decimal>,
    pub transaction_count: usize,
}

/// Transactions sharing the same Monday-to-Sunday span, in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct WeekBucket {
    pub week_start: NaiveDate,
    pub transactions: Vec<Transaction>,
}

impl WeekBucket {
    pub fn week_end(&self) -> NaiveDate {
        week_end(self.week_start)
    }

    pub fn stats(&self) -> WeekStats {
        summarize(&self.transactions)
    }
}

/// One row of the weekly view: a week's range and its stats.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklySummary {
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub stats: WeekStats,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub amount: Decimal,
}

/// Derives the grouping label for a description.
///
/// Rule: text before the `" — "` separator when present, otherwise the first
/// whitespace-delimited token, otherwise `"Other"`.
pub fn derive_category(description: &str) -> String {
    let candidate = match description.split_once(CATEGORY_SEPARATOR) {
        Some((head, _)) => head.trim(),
        None => description.split_whitespace().next().unwrap_or(""),
    };

    if candidate.is_empty() {
        FALLBACK_CATEGORY.to_string()
    } else {
        candidate.to_string()
    }
}

/// Monday of the ISO week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

pub fn week_end(week_start: NaiveDate) -> NaiveDate {
    week_start + Duration::days(6)
}

pub fn summarize(transactions: &[Transaction]) -> WeekStats {
    let mut categories: BTreeMap<String, Decimal> = BTreeMap::new();
    let mut total = Decimal::ZERO;

    for txn in transactions {
        total += txn.amount;
        *categories.entry(txn.category()).or_insert(Decimal::ZERO) += txn.amount;
    }

    WeekStats {
        total,
        categories,
        transaction_count: transactions.len(),
    }
}

pub fn group_by_week(transactions: &[Transaction]) -> BTreeMap<NaiveDate, WeekBucket> {
    let mut buckets: BTreeMap<NaiveDate, WeekBucket> = BTreeMap::new();

    for txn in transactions {
        let start = week_start(txn.purchase_date);
        buckets
            .entry(start)
            .or_insert_with(|| WeekBucket {
                week_start: start,
                transactions: Vec::new(),
            })
            .transactions
            .push(txn.clone());
    }

    buckets
}

/// Most recent week starts, newest first, capped at [`RECENT_WEEK_LIMIT`].
pub fn recent_weeks(buckets: &BTreeMap<NaiveDate, WeekBucket>) -> Vec<NaiveDate> {
    buckets
        .keys()
        .rev()
        .take(RECENT_WEEK_LIMIT)
        .copied()
        .collect()
}

/// Stats for the most recent weeks, newest first.
pub fn recent_week_summaries(transactions: &[Transaction]) -> Vec<WeeklySummary> {
    let buckets = group_by_week(transactions);
    recent_weeks(&buckets)
        .into_iter()
        .map(|start| {
            let bucket = &buckets[&start];
            WeeklySummary {
                week_start: start,
                week_end: bucket.week_end(),
                stats: bucket.stats(),
            }
        })
        .collect()
}

/// Whole-dataset category totals, largest first (ties broken by name).
pub fn category_totals(transactions: &[Transaction]) -> Vec<CategoryTotal> {
    sorted_categories(&summarize(transactions).categories)
}

/// The `n` largest categories of a week.
pub fn top_categories(stats: &WeekStats, n: usize) -> Vec<CategoryTotal> {
    let mut sorted = sorted_categories(&stats.categories);
    sorted.truncate(n);
    sorted
}

fn sorted_categories(categories: &BTreeMap<String, Decimal>) -> Vec<CategoryTotal> {
    let mut totals: Vec<CategoryTotal> = categories
        .iter()
        .map(|(category, amount)| CategoryTotal {
            category: category.clone(),
            amount: *amount,
        })
        .collect();
    totals.sort_by(|a, b| {
        b.amount
            .cmp(&a.amount)
            .then_with(|| a.category.cmp(&b.category))
    });
    totals
}

/// Newest purchase first. Stable, so same-day records keep input order.
pub fn sorted_by_date_desc(transactions: &[Transaction]) -> Vec<Transaction> {
    let mut sorted = transactions.to_vec();
    sorted.sort_by(|a, b| b.purchase_date.cmp(&a.purchase_date));
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn txn(day: NaiveDate, cents: i64, description: &str) -> Transaction {
        Transaction::new(day, Decimal::new(cents, 2), description)
    }

    fn sample() -> Vec<Transaction> {
        vec![
            txn(date(2024, 1, 1), 1250, "Coffee Shop"),
            txn(date(2024, 1, 3), 4000, "Coffee Shop"),
            txn(date(2024, 1, 9), 6533, "Groceries — Trader Joe's"),
            txn(date(2024, 1, 14), -1000, "Refund from Target"),
            txn(date(2024, 1, 16), 1999, "Netflix subscription"),
            txn(date(2023, 12, 20), 333, ""),
            txn(date(2023, 12, 12), 10001, "Rent — December"),
        ]
    }

    #[test]
    fn test_category_first_token() {
        assert_eq!(derive_category("Coffee Shop"), "Coffee");
        assert_eq!(derive_category("  Uber   trip home"), "Uber");
    }

    #[test]
    fn test_category_separator_wins_over_first_token() {
        assert_eq!(derive_category("Dining Out — Chipotle"), "Dining Out");
    }

    #[test]
    fn test_category_blank_is_other() {
        assert_eq!(derive_category(""), "Other");
        assert_eq!(derive_category("   "), "Other");
        assert_eq!(derive_category(" — Chipotle"), "Other");
    }

    #[test]
    fn test_category_is_deterministic_regardless_of_neighbours() {
        let alone = summarize(&[txn(date(2024, 1, 1), 100, "Coffee Shop")]);
        let crowded = summarize(&sample());
        assert!(alone.categories.contains_key("Coffee"));
        assert!(crowded.categories.contains_key("Coffee"));
        assert_eq!(derive_category("Coffee Shop"), derive_category("Coffee Shop"));
    }

    #[test]
    fn test_monday_is_its_own_week_start() {
        let monday = date(2024, 1, 1);
        assert_eq!(week_start(monday), monday);
    }

    #[test]
    fn test_sunday_maps_to_preceding_monday() {
        assert_eq!(week_start(date(2024, 1, 7)), date(2024, 1, 1));
        assert_eq!(week_end(date(2024, 1, 1)), date(2024, 1, 7));
    }

    #[test]
    fn test_week_start_crosses_year_boundary() {
        // 2025-01-01 is a Wednesday
        assert_eq!(week_start(date(2025, 1, 1)), date(2024, 12, 30));
    }

    #[test]
    fn test_empty_input_yields_zero_stats() {
        let stats = summarize(&[]);
        assert_eq!(stats.total, Decimal::ZERO);
        assert!(stats.categories.is_empty());
        assert_eq!(stats.transaction_count, 0);
        assert!(group_by_week(&[]).is_empty());
        assert!(category_totals(&[]).is_empty());
    }

    #[test]
    fn test_coffee_shop_scenario() {
        let txns = vec![
            txn(date(2024, 1, 1), 1250, "Coffee Shop"),
            txn(date(2024, 1, 3), 4000, "Coffee Shop"),
        ];
        let buckets = group_by_week(&txns);
        assert_eq!(buckets.len(), 1);

        let stats = buckets[&date(2024, 1, 1)].stats();
        assert_eq!(stats.total, Decimal::new(5250, 2));
        assert_eq!(stats.transaction_count, 2);
        assert_eq!(stats.categories.len(), 1);
        assert_eq!(stats.categories["Coffee"], Decimal::new(5250, 2));
    }

    #[test]
    fn test_category_sums_reconcile_with_total() {
        let txns = sample();
        let whole = summarize(&txns);
        let category_sum: Decimal = whole.categories.values().copied().sum();
        assert_eq!(category_sum, whole.total);

        let chart_sum: Decimal = category_totals(&txns).iter().map(|c| c.amount).sum();
        assert_eq!(chart_sum, whole.total);

        for bucket in group_by_week(&txns).values() {
            let stats = bucket.stats();
            let sum: Decimal = stats.categories.values().copied().sum();
            assert_eq!(sum, stats.total, "week {}", bucket.week_start);
        }
    }

    #[test]
    fn test_bucket_keeps_input_order() {
        let txns = vec![
            txn(date(2024, 1, 5), 100, "Late"),
            txn(date(2024, 1, 2), 200, "Early"),
        ];
        let buckets = group_by_week(&txns);
        let bucket = &buckets[&date(2024, 1, 1)];
        assert_eq!(bucket.transactions[0].description, "Late");
        assert_eq!(bucket.transactions[1].description, "Early");
    }

    #[test]
    fn test_recent_weeks_newest_first_capped_at_four() {
        let buckets = group_by_week(&sample());
        assert_eq!(buckets.len(), 5);

        let recent = recent_weeks(&buckets);
        assert_eq!(
            recent,
            vec![
                date(2024, 1, 15),
                date(2024, 1, 8),
                date(2024, 1, 1),
                date(2023, 12, 18),
            ]
        );
    }

    #[test]
    fn test_recent_week_summaries() {
        let summaries = recent_week_summaries(&sample());
        assert_eq!(summaries.len(), 4);
        assert_eq!(summaries[0].week_start, date(2024, 1, 15));
        assert_eq!(summaries[0].week_end, date(2024, 1, 21));
        assert_eq!(summaries[0].stats.transaction_count, 1);
        assert_eq!(summaries[1].stats.total, Decimal::new(5533, 2));
        assert!(recent_week_summaries(&[]).is_empty());
    }

    #[test]
    fn test_category_totals_sorted_by_amount_desc() {
        let totals = category_totals(&sample());
        assert_eq!(totals[0].category, "Rent");
        assert_eq!(totals[1].category, "Groceries");
        assert!(totals.windows(2).all(|w| w[0].amount >= w[1].amount));
    }

    #[test]
    fn test_top_categories_truncates() {
        let stats = summarize(&sample());
        let top = top_categories(&stats, 3);
        assert_eq!(top.len(), 3);
        assert_eq!(top[0].category, "Rent");
    }

    #[test]
    fn test_sorted_by_date_desc() {
        let sorted = sorted_by_date_desc(&sample());
        assert_eq!(sorted.first().unwrap().purchase_date, date(2024, 1, 16));
        assert_eq!(sorted.last().unwrap().purchase_date, date(2023, 12, 12));
    }
}
