//! Axum route handler for the spending dashboard.

use axum::{
    extract::{Path, State},
    Json,
};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;
use crate::transactions::aggregate::{
    category_totals, recent_week_summaries, sorted_by_date_desc, summarize, CategoryTotal,
    WeeklySummary,
};
use crate::transactions::load_transactions;
use crate::transactions::models::{Transaction, TransactionView};
use crate::transactions::source::SourceFailure;

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub user_index: usize,
    pub total: Decimal,
    pub transaction_count: usize,
    /// Newest first.
    pub transactions: Vec<TransactionView>,
    /// Chart data, largest category first.
    pub category_totals: Vec<CategoryTotal>,
    /// Up to four most recent weeks, newest first.
    pub weekly: Vec<WeeklySummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_error: Option<SourceFailure>,
}

pub fn build_dashboard(
    user_index: usize,
    transactions: &[Transaction],
    source_error: Option<SourceFailure>,
) -> DashboardResponse {
    let stats = summarize(transactions);
    DashboardResponse {
        user_index,
        total: stats.total,
        transaction_count: stats.transaction_count,
        transactions: sorted_by_date_desc(transactions)
            .iter()
            .map(TransactionView::from)
            .collect(),
        category_totals: category_totals(transactions),
        weekly: recent_week_summaries(transactions),
        source_error,
    }
}

/// GET /api/v1/sessions/:session_id/dashboard
///
/// A failed fetch still renders: empty data plus `source_error`.
pub async fn handle_dashboard(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<DashboardResponse>, AppError> {
    let session = state.sessions.require_authenticated(session_id).await?;
    let (transactions, source_error) =
        load_transactions(state.source.as_ref(), session.user_index).await;

    Ok(Json(build_dashboard(
        session.user_index,
        &transactions,
        source_error,
    )))
}
