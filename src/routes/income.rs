//! Route handlers for the income record collection.

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
    models::{DatabaseID, Income, IncomeRecord},
    report::{self, INCOME_CATEGORIES},
    stores::{RecordStore, TransactionStore},
};

/// The response body for a successful income creation.
#[derive(Debug, Serialize, Deserialize)]
pub struct IncomeCreated {
    /// The stored record, with its assigned ID.
    pub income: IncomeRecord,
}

/// A route handler for recording a new income.
///
/// Writes the typed record and its transaction mirror via the ledger.
pub async fn create_income<I, E, T>(
    State(state): State<AppState<I, E, T>>,
    claims: Claims,
    Json(submission): Json<RecordSubmission>,
) -> Result<impl IntoResponse, Error>
where
    I: RecordStore<Income>,
    T: TransactionStore,
{
    let AppState {
        mut income_store,
        mut transaction_store,
        ..
    } = state;

    let income = ledger::record_income(
        &mut income_store,
        &mut transaction_store,
        claims.owner(),
        submission,
    )?;

    Ok((StatusCode::CREATED, Json(IncomeCreated { income })))
}

/// A route handler for listing the owner's income records.
pub async fn get_incomes<I, E, T>(
    State(state): State<AppState<I, E, T>>,
    claims: Claims,
) -> Result<impl IntoResponse, Error>
where
    I: RecordStore<Income>,
{
    let incomes = state.income_store.for_owner(claims.owner())?;

    Ok(Json(incomes))
}

/// A route handler for updating an income record.
///
/// The record's transaction mirror is not touched; mirrors are write-once.
///
/// This function will return the status code 404 if the record does not
/// exist or belongs to another owner.
pub async fn update_income<I, E, T>(
    State(state): State<AppState<I, E, T>>,
    claims: Claims,
    Path(income_id): Path<DatabaseID>,
    Json(submission): Json<RecordSubmission>,
) -> Result<impl IntoResponse, Error>
where
    I: RecordStore<Income>,
{
    let mut income_store = state.income_store;

    let fields = submission.validate(claims.owner(), OffsetDateTime::now_utc())?;
    let income = income_store.update(income_id, fields)?;

    Ok(Json(income))
}

/// A route handler for deleting an income record.
///
/// The record's transaction mirror is not touched; mirrors are write-once.
///
/// This function will return the status code 404 if the record does not
/// exist or belongs to another owner.
pub async fn delete_income<I, E, T>(
    State(state): State<AppState<I, E, T>>,
    claims: Claims,
    Path(income_id): Path<DatabaseID>,
) -> Result<impl IntoResponse, Error>
where
    I: RecordStore<Income>,
{
    let mut income_store = state.income_store;

    income_store.delete(income_id, claims.owner())?;

    Ok(StatusCode::NO_CONTENT)
}

/// A route handler for the per-category income status report.
pub async fn get_income_budget_status<I, E, T>(
    State(state): State<AppState<I, E, T>>,
    claims: Claims,
) -> Result<impl IntoResponse, Error>
where
    I: RecordStore<Income>,
{
    let status =
        report::budget_status::<Income, _>(&state.income_store, claims.owner(), &INCOME_CATEGORIES)?;

    Ok(Json(status))
}

/// A route handler for the current calendar month's income total.
pub async fn get_income_monthly_total<I, E, T>(
    State(state): State<AppState<I, E, T>>,
    claims: Claims,
) -> Result<impl IntoResponse, Error>
where
    I: RecordStore<Income>,
{
    let today = OffsetDateTime::now_utc().date();
    let total = report::month_total::<Income, _>(
        &state.income_store,
        claims.owner(),
        today.month(),
        today.year(),
    )?;

    Ok(Json(total))
}

#[cfg(test)]
mod income_route_tests {
    use axum::http::StatusCode;
    use serde_json::json;
    use time::OffsetDateTime;

    use crate::{
        models::{IncomeRecord, OwnerID},
        report::{INCOME_CATEGORIES, MonthTotal},
        routes::{
            endpoints,
            test_utils::{bearer_token, test_server, test_state},
        },
    };

    use super::IncomeCreated;

    #[tokio::test]
    async fn create_income_returns_created_record() {
        let state = test_state();
        let token = bearer_token(&state, OwnerID::new(1));
        let server = test_server(state);

        let response = server
            .post(endpoints::INCOME)
            .authorization_bearer(&token)
            .json(&json!({
                "description": "Pay day",
                "amount": 2500.0,
                "category": "Salary",
                "date": "2024-03-01",
            }))
            .await;

        response.assert_status(StatusCode::CREATED);

        let income = response.json::<IncomeCreated>().income;
        assert!(income.id() > 0);
        assert_eq!(income.owner(), OwnerID::new(1));
        assert_eq!(income.description(), "Pay day");
    }

    #[tokio::test]
    async fn create_income_accepts_title_alias() {
        let state = test_state();
        let token = bearer_token(&state, OwnerID::new(1));
        let server = test_server(state);

        let response = server
            .post(endpoints::INCOME)
            .authorization_bearer(&token)
            .json(&json!({
                "title": "Pay day",
                "amount": 2500.0,
                "category": "Salary",
                "date": "2024-03-01",
            }))
            .await;

        response.assert_status(StatusCode::CREATED);
        assert_eq!(response.json::<IncomeCreated>().income.description(), "Pay day");
    }

    #[tokio::test]
    async fn create_income_rejects_invalid_submission() {
        let state = test_state();
        let token = bearer_token(&state, OwnerID::new(1));
        let server = test_server(state);

        let response = server
            .post(endpoints::INCOME)
            .authorization_bearer(&token)
            .json(&json!({
                "description": "Pay day",
                "amount": -5.0,
                "category": "Salary",
                "date": "2024-03-01",
            }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);

        let body = response.json::<serde_json::Value>();
        assert_eq!(body["fields"][0]["field"], "amount");

        let incomes = server
            .get(endpoints::INCOMES)
            .authorization_bearer(&token)
            .await
            .json::<Vec<IncomeRecord>>();
        assert!(incomes.is_empty());
    }

    #[tokio::test]
    async fn get_incomes_is_owner_scoped() {
        let state = test_state();
        let token = bearer_token(&state, OwnerID::new(1));
        let other_token = bearer_token(&state, OwnerID::new(2));
        let server = test_server(state);

        server
            .post(endpoints::INCOME)
            .authorization_bearer(&token)
            .json(&json!({
                "description": "Pay day",
                "amount": 2500.0,
                "category": "Salary",
                "date": "2024-03-01",
            }))
            .await
            .assert_status(StatusCode::CREATED);

        let own = server
            .get(endpoints::INCOMES)
            .authorization_bearer(&token)
            .await
            .json::<Vec<IncomeRecord>>();
        let foreign = server
            .get(endpoints::INCOMES)
            .authorization_bearer(&other_token)
            .await
            .json::<Vec<IncomeRecord>>();

        assert_eq!(own.len(), 1);
        assert!(foreign.is_empty());
    }

    #[tokio::test]
    async fn update_income_overwrites_fields() {
        let state = test_state();
        let token = bearer_token(&state, OwnerID::new(1));
        let server = test_server(state);

        let income = server
            .post(endpoints::INCOME)
            .authorization_bearer(&token)
            .json(&json!({
                "description": "Pay day",
                "amount": 2500.0,
                "category": "Salary",
                "date": "2024-03-01",
            }))
            .await
            .json::<IncomeCreated>()
            .income;

        let response = server
            .put(&format!("/income/{}", income.id()))
            .authorization_bearer(&token)
            .json(&json!({
                "description": "Pay day + bonus",
                "amount": 3000.0,
                "category": "Salary",
                "date": "2024-03-01",
            }))
            .await;

        response.assert_status_ok();
        assert_eq!(response.json::<IncomeRecord>().description(), "Pay day + bonus");
    }

    #[tokio::test]
    async fn update_income_of_another_owner_is_not_found() {
        let state = test_state();
        let token = bearer_token(&state, OwnerID::new(1));
        let other_token = bearer_token(&state, OwnerID::new(2));
        let server = test_server(state);

        let income = server
            .post(endpoints::INCOME)
            .authorization_bearer(&token)
            .json(&json!({
                "description": "Pay day",
                "amount": 2500.0,
                "category": "Salary",
                "date": "2024-03-01",
            }))
            .await
            .json::<IncomeCreated>()
            .income;

        let response = server
            .put(&format!("/income/{}", income.id()))
            .authorization_bearer(&other_token)
            .json(&json!({
                "description": "hijacked",
                "amount": 1.0,
                "category": "Salary",
                "date": "2024-03-01",
            }))
            .await;

        response.assert_status_not_found();
    }

    #[tokio::test]
    async fn delete_income_removes_record() {
        let state = test_state();
        let token = bearer_token(&state, OwnerID::new(1));
        let server = test_server(state);

        let income = server
            .post(endpoints::INCOME)
            .authorization_bearer(&token)
            .json(&json!({
                "description": "Pay day",
                "amount": 2500.0,
                "category": "Salary",
                "date": "2024-03-01",
            }))
            .await
            .json::<IncomeCreated>()
            .income;

        server
            .delete(&format!("/income/{}", income.id()))
            .authorization_bearer(&token)
            .await
            .assert_status(StatusCode::NO_CONTENT);

        let incomes = server
            .get(endpoints::INCOMES)
            .authorization_bearer(&token)
            .await
            .json::<Vec<IncomeRecord>>();
        assert!(incomes.is_empty());
    }

    #[tokio::test]
    async fn delete_missing_income_is_not_found() {
        let state = test_state();
        let token = bearer_token(&state, OwnerID::new(1));
        let server = test_server(state);

        let response = server
            .delete("/income/999")
            .authorization_bearer(&token)
            .await;

        response.assert_status_not_found();
    }

    #[tokio::test]
    async fn budget_status_with_no_records_lists_every_reference_category() {
        let state = test_state();
        let token = bearer_token(&state, OwnerID::new(1));
        let server = test_server(state);

        let response = server
            .get(endpoints::INCOMES_PER_CATEGORY)
            .authorization_bearer(&token)
            .await;

        response.assert_status_ok();

        let body = response.json::<serde_json::Value>();
        let rows = body.as_array().unwrap();
        assert_eq!(rows.len(), INCOME_CATEGORIES.len());
        for (row, &category) in rows.iter().zip(INCOME_CATEGORIES.iter()) {
            assert_eq!(row["category"], category);
            assert_eq!(row["spent"], 0.0);
            assert_eq!(row["total"], 0.0);
            assert_eq!(row["percentage"], 0.0);
        }
    }

    #[tokio::test]
    async fn monthly_total_sums_current_month() {
        let state = test_state();
        let token = bearer_token(&state, OwnerID::new(1));
        let server = test_server(state);
        let today = OffsetDateTime::now_utc().date();

        server
            .post(endpoints::INCOME)
            .authorization_bearer(&token)
            .json(&json!({
                "description": "Pay day",
                "amount": 2500.0,
                "category": "Salary",
                "date": today.to_string(),
            }))
            .await
            .assert_status(StatusCode::CREATED);

        let total = server
            .get(endpoints::INCOMES_MONTHLY_TOTAL)
            .authorization_bearer(&token)
            .await
            .json::<MonthTotal>();

        assert_eq!(total.total, 2500.0);
        assert_eq!(total.month, u8::from(today.month()));
        assert_eq!(total.year, today.year());
    }
}
