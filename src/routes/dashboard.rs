//! Route handler for the combined dashboard payload.

use axum::{Json, extract::State, response::IntoResponse};

use crate::{
    AppState, Error,
    auth::Claims,
    models::{Expense, Income},
    report,
    stores::RecordStore,
};

/// A route handler for the dashboard payload: the owner's income and expense
/// records plus the combined recent-transactions view.
pub async fn get_dashboard<I, E, T>(
    State(state): State<AppState<I, E, T>>,
    claims: Claims,
) -> Result<impl IntoResponse, Error>
where
    I: RecordStore<Income>,
    E: RecordStore<Expense>,
{
    let dashboard = report::dashboard(&state.income_store, &state.expense_store, claims.owner())?;

    Ok(Json(dashboard))
}
