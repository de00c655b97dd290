//! This module defines the REST API's routes and their handlers.
//!
//! Every route requires a bearer token; there are no unauthenticated reads.

mod dashboard;
mod expense;
mod export;
mod income;
mod transaction;

pub mod endpoints;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::{
    AppState,
    models::{Expense, Income},
    stores::{RecordStore, TransactionStore},
};

/// Return a router with all the app's routes.
pub fn build_router<I, E, T>(state: AppState<I, E, T>) -> Router
where
    I: RecordStore<Income> + Clone + Send + Sync + 'static,
    E: RecordStore<Expense> + Clone + Send + Sync + 'static,
    T: TransactionStore + Clone + Send + Sync + 'static,
{
    let router: Router<AppState<I, E, T>> = Router::new()
        .route(endpoints::INCOME, post(income::create_income))
        .route(
            endpoints::INCOME_ENTRY,
            put(income::update_income).delete(income::delete_income),
        )
        .route(endpoints::INCOMES, get(income::get_incomes))
        .route(
            endpoints::INCOMES_PER_CATEGORY,
            get(income::get_income_budget_status),
        )
        .route(
            endpoints::INCOMES_MONTHLY_TOTAL,
            get(income::get_income_monthly_total),
        )
        .route(endpoints::INCOMES_EXPORT, get(export::export_incomes))
        .route(endpoints::EXPENSE, post(expense::create_expense))
        .route(
            endpoints::EXPENSE_ENTRY,
            put(expense::update_expense).delete(expense::delete_expense),
        )
        .route(endpoints::EXPENSES, get(expense::get_expenses))
        .route(
            endpoints::EXPENSES_PER_CATEGORY,
            get(expense::get_expense_budget_status),
        )
        .route(
            endpoints::EXPENSES_DAILY_TOTALS,
            get(expense::get_expense_daily_totals),
        )
        .route(
            endpoints::EXPENSES_MONTHLY_TOTAL,
            get(expense::get_expense_monthly_total),
        )
        .route(endpoints::EXPENSES_EXPORT, get(export::export_expenses))
        .route(
            endpoints::TRANSACTION_RECENT,
            get(transaction::get_recent_transactions),
        )
        .route(
            endpoints::TRANSACTION_SUMMARY,
            get(transaction::get_monthly_summary),
        )
        .route(
            endpoints::TRANSACTION_RECONCILE,
            post(transaction::reconcile_transactions),
        )
        .route(
            endpoints::TRANSACTION_EXPORT,
            get(export::export_transactions),
        )
        .route(
            endpoints::TOP_CATEGORIES,
            get(transaction::get_top_categories),
        )
        .route(endpoints::DASHBOARD, get(dashboard::get_dashboard));

    router.with_state(state)
}


#[cfg(test)]
mod router_tests {
    use axum::http::StatusCode;

    use crate::routes::{
        endpoints,
        test_utils::{test_server, test_state},
    };

    #[tokio::test]
    async fn requests_without_a_token_are_unauthorized() {
        let server = test_server(test_state());

        let response = server.get(endpoints::INCOMES).await;

        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn requests_with_an_invalid_token_are_forbidden() {
        let server = test_server(test_state());

        let response = server
            .get(endpoints::INCOMES)
            .authorization_bearer("not.a.real.token")
            .await;

        response.assert_status(StatusCode::FORBIDDEN);
    }
}
