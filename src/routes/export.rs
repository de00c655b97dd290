//! Route handlers for the spreadsheet downloads.

use axum::{extract::State, http::header, response::IntoResponse};

use crate::{
    AppState, Error,
    auth::Claims,
    export::{expense_sheet, income_sheet, transaction_sheet, write_csv},
    models::{Expense, Income},
    stores::{RecordStore, TransactionQuery, TransactionStore},
};

/// A route handler for downloading the owner's income records as a
/// spreadsheet.
pub async fn export_incomes<I, E, T>(
    State(state): State<AppState<I, E, T>>,
    claims: Claims,
) -> Result<impl IntoResponse, Error>
where
    I: RecordStore<Income>,
{
    let records = state.income_store.for_owner(claims.owner())?;
    let bytes = write_csv(&income_sheet(&records))?;

    Ok(csv_attachment("earnings.csv", bytes))
}

/// A route handler for downloading the owner's expense records as a
/// spreadsheet.
pub async fn export_expenses<I, E, T>(
    State(state): State<AppState<I, E, T>>,
    claims: Claims,
) -> Result<impl IntoResponse, Error>
where
    E: RecordStore<Expense>,
{
    let records = state.expense_store.for_owner(claims.owner())?;
    let bytes = write_csv(&expense_sheet(&records))?;

    Ok(csv_attachment("expenses.csv", bytes))
}

/// A route handler for downloading the owner's unified transaction log as a
/// spreadsheet.
pub async fn export_transactions<I, E, T>(
    State(state): State<AppState<I, E, T>>,
    claims: Claims,
) -> Result<impl IntoResponse, Error>
where
    T: TransactionStore,
{
    let records = state
        .transaction_store
        .get_query(TransactionQuery::for_owner(claims.owner()))?;
    let bytes = write_csv(&transaction_sheet(&records))?;

    Ok(csv_attachment("transactions.csv", bytes))
}

fn csv_attachment(filename: &'static str, bytes: Vec<u8>) -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_owned()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    )
}

#[cfg(test)]
mod export_route_tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::{
        models::OwnerID,
        routes::{
            endpoints,
            test_utils::{bearer_token, test_server, test_state},
        },
    };

    #[tokio::test]
    async fn export_expenses_downloads_csv_attachment() {
        let state = test_state();
        let token = bearer_token(&state, OwnerID::new(1));
        let server = test_server(state);

        server
            .post(endpoints::EXPENSE)
            .authorization_bearer(&token)
            .json(&json!({
                "description": "Lunch",
                "amount": 12.5,
                "category": "Food",
                "date": "2024-03-01",
            }))
            .await
            .assert_status(StatusCode::CREATED);

        let response = server
            .get(endpoints::EXPENSES_EXPORT)
            .authorization_bearer(&token)
            .await;

        response.assert_status_ok();
        let content_disposition = response.header("content-disposition");
        assert!(
            content_disposition
                .to_str()
                .unwrap()
                .contains("expenses.csv")
        );

        let text = response.text();
        assert!(text.starts_with("Expenses"));
        assert!(text.contains("2024-03-01,Lunch,Food,12.50"));
        assert!(text.contains("Total"));
    }

    #[tokio::test]
    async fn export_transactions_includes_the_kind_column() {
        let state = test_state();
        let token = bearer_token(&state, OwnerID::new(1));
        let server = test_server(state);

        server
            .post(endpoints::INCOME)
            .authorization_bearer(&token)
            .json(&json!({
                "description": "Pay day",
                "amount": 1000.0,
                "category": "Salary",
                "date": "2024-03-01",
            }))
            .await
            .assert_status(StatusCode::CREATED);

        let text = server
            .get(endpoints::TRANSACTION_EXPORT)
            .authorization_bearer(&token)
            .await
            .text();

        assert!(text.contains("Date,Type,Description,Category,Amount"));
        assert!(text.contains("2024-03-01,income,Pay day,Salary,1000.00"));
    }

    #[tokio::test]
    async fn exports_are_owner_scoped() {
        let state = test_state();
        let token = bearer_token(&state, OwnerID::new(1));
        let other_token = bearer_token(&state, OwnerID::new(2));
        let server = test_server(state);

        server
            .post(endpoints::EXPENSE)
            .authorization_bearer(&token)
            .json(&json!({
                "description": "Secret lunch",
                "amount": 12.5,
                "category": "Food",
                "date": "2024-03-01",
            }))
            .await
            .assert_status(StatusCode::CREATED);

        let text = server
            .get(endpoints::EXPENSES_EXPORT)
            .authorization_bearer(&other_token)
            .await
            .text();

        assert!(!text.contains("Secret lunch"));
    }

    #[tokio::test]
    async fn export_requires_a_token() {
        let server = test_server(test_state());

        let response = server.get(endpoints::TRANSACTION_EXPORT).await;

        response.assert_status(StatusCode::UNAUTHORIZED);
    }
}
