//! Route handlers for the unified transaction log: the recent feed, the
//! trailing 30-day summary, the top-category ranking and the mirror
//! reconciliation pass.

use axum::{Json, extract::State, response::IntoResponse};
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    auth::Claims,
    ledger,
    models::{Expense, Income},
    report::{self, RECENT_TRANSACTION_COUNT, TOP_CATEGORY_COUNT},
    stores::{RecordStore, TransactionStore},
};

/// A route handler for the owner's most recent unified log entries.
pub async fn get_recent_transactions<I, E, T>(
    State(state): State<AppState<I, E, T>>,
    claims: Claims,
) -> Result<impl IntoResponse, Error>
where
    T: TransactionStore,
{
    let recent = report::recent_transactions(
        &state.transaction_store,
        claims.owner(),
        RECENT_TRANSACTION_COUNT,
    )?;

    Ok(Json(recent))
}

/// A route handler for the trailing 30-day income/expense/savings summary.
///
/// The route keeps its historical "summary" name even though the window is a
/// trailing 30 days rather than a calendar month.
pub async fn get_monthly_summary<I, E, T>(
    State(state): State<AppState<I, E, T>>,
    claims: Claims,
) -> Result<impl IntoResponse, Error>
where
    T: TransactionStore,
{
    let today = OffsetDateTime::now_utc().date();
    let summary = report::monthly_summary(&state.transaction_store, claims.owner(), today)?;

    Ok(Json(summary))
}

/// A route handler for the owner's top spending categories.
pub async fn get_top_categories<I, E, T>(
    State(state): State<AppState<I, E, T>>,
    claims: Claims,
) -> Result<impl IntoResponse, Error>
where
    T: TransactionStore,
{
    let top = report::top_spending_categories(
        &state.transaction_store,
        claims.owner(),
        TOP_CATEGORY_COUNT,
    )?;

    Ok(Json(top))
}

/// A route handler for backfilling transaction mirrors that were lost to the
/// non-atomic dual write.
///
/// Safe to call repeatedly; a log that is already consistent backfills
/// nothing.
pub async fn reconcile_transactions<I, E, T>(
    State(state): State<AppState<I, E, T>>,
    claims: Claims,
) -> Result<impl IntoResponse, Error>
where
    I: RecordStore<Income>,
    E: RecordStore<Expense>,
    T: TransactionStore,
{
    let AppState {
        income_store,
        expense_store,
        mut transaction_store,
        ..
    } = state;

    let summary = ledger::reconcile(
        &income_store,
        &expense_store,
        &mut transaction_store,
        claims.owner(),
    )?;

    Ok(Json(summary))
}
