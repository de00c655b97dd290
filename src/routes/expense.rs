//! Route handlers for the expense record collection.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    auth::Claims,
    ledger::{self, RecordSubmission},
    models::{DatabaseID, Expense, ExpenseRecord},
    report::{self, EXPENSE_CATEGORIES},
    stores::{RecordStore, TransactionStore},
};

/// The response body for a successful expense creation.
#[derive(Debug, Serialize, Deserialize)]
pub struct ExpenseCreated {
    /// The stored record, with its assigned ID.
    pub expense: ExpenseRecord,
}

/// A route handler for recording a new expense.
///
/// Writes the typed record and its transaction mirror via the ledger.
pub async fn create_expense<I, E, T>(
    State(state): State<AppState<I, E, T>>,
    claims: Claims,
    Json(submission): Json<RecordSubmission>,
) -> Result<impl IntoResponse, Error>
where
    E: RecordStore<Expense>,
    T: TransactionStore,
{
    let AppState {
        mut expense_store,
        mut transaction_store,
        ..
    } = state;

    let expense = ledger::record_expense(
        &mut expense_store,
        &mut transaction_store,
        claims.owner(),
        submission,
    )?;

    Ok((StatusCode::CREATED, Json(ExpenseCreated { expense })))
}

/// A route handler for listing the owner's expense records.
pub async fn get_expenses<I, E, T>(
    State(state): State<AppState<I, E, T>>,
    claims: Claims,
) -> Result<impl IntoResponse, Error>
where
    E: RecordStore<Expense>,
{
    let expenses = state.expense_store.for_owner(claims.owner())?;

    Ok(Json(expenses))
}

/// A route handler for updating an expense record.
///
/// The record's transaction mirror is not touched; mirrors are write-once.
///
/// This function will return the status code 404 if the record does not
/// exist or belongs to another owner.
pub async fn update_expense<I, E, T>(
    State(state): State<AppState<I, E, T>>,
    claims: Claims,
    Path(expense_id): Path<DatabaseID>,
    Json(submission): Json<RecordSubmission>,
) -> Result<impl IntoResponse, Error>
where
    E: RecordStore<Expense>,
{
    let mut expense_store = state.expense_store;

    let fields = submission.validate(claims.owner(), OffsetDateTime::now_utc())?;
    let expense = expense_store.update(expense_id, fields)?;

    Ok(Json(expense))
}

/// A route handler for deleting an expense record.
///
/// The record's transaction mirror is not touched; mirrors are write-once.
///
/// This function will return the status code 404 if the record does not
/// exist or belongs to another owner.
pub async fn delete_expense<I, E, T>(
    State(state): State<AppState<I, E, T>>,
    claims: Claims,
    Path(expense_id): Path<DatabaseID>,
) -> Result<impl IntoResponse, Error>
where
    E: RecordStore<Expense>,
{
    let mut expense_store = state.expense_store;

    expense_store.delete(expense_id, claims.owner())?;

    Ok(StatusCode::NO_CONTENT)
}

/// A route handler for the per-category expense status report.
pub async fn get_expense_budget_status<I, E, T>(
    State(state): State<AppState<I, E, T>>,
    claims: Claims,
) -> Result<impl IntoResponse, Error>
where
    E: RecordStore<Expense>,
{
    let status = report::budget_status::<Expense, _>(
        &state.expense_store,
        claims.owner(),
        &EXPENSE_CATEGORIES,
    )?;

    Ok(Json(status))
}

/// A route handler for the zero-filled daily expense totals over the trailing
/// 30-day window.
pub async fn get_expense_daily_totals<I, E, T>(
    State(state): State<AppState<I, E, T>>,
    claims: Claims,
) -> Result<impl IntoResponse, Error>
where
    E: RecordStore<Expense>,
{
    let today = OffsetDateTime::now_utc().date();
    let totals = report::daily_expense_totals(&state.expense_store, claims.owner(), today)?;

    Ok(Json(totals))
}

/// A route handler for the current calendar month's expense total.
pub async fn get_expense_monthly_total<I, E, T>(
    State(state): State<AppState<I, E, T>>,
    claims: Claims,
) -> Result<impl IntoResponse, Error>
where
    E: RecordStore<Expense>,
{
    let today = OffsetDateTime::now_utc().date();
    let total = report::month_total::<Expense, _>(
        &state.expense_store,
        claims.owner(),
        today.month(),
        today.year(),
    )?;

    Ok(Json(total))
}
