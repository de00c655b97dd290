//! Implements a struct that holds the state of the REST server.

use axum::extract::FromRef;

use crate::auth::TokenKeys;

/// The state of the REST server.
///
/// Generic over the store implementations so that the route handlers and
/// services only depend on the store traits. Use
/// [create_app_state](crate::create_app_state) for an instance backed by
/// SQLite.
#[derive(Clone)]
pub struct AppState<I, E, T> {
    /// The keys used to sign and verify bearer tokens.
    pub token_keys: TokenKeys,
    /// The store for income records.
    pub income_store: I,
    /// The store for expense records.
    pub expense_store: E,
    /// The store for the unified transaction log.
    pub transaction_store: T,
}

impl<I, E, T> AppState<I, E, T> {
    /// Create a new [AppState].
    ///
    /// `token_secret` is the HMAC secret that bearer tokens are signed with.
    pub fn new(token_secret: &str, income_store: I, expense_store: E, transaction_store: T) -> Self {
        Self {
            token_keys: TokenKeys::new(token_secret),
            income_store,
            expense_store,
            transaction_store,
        }
    }
}

// this impl tells the Claims extractor how to access the keys from our state
impl<I, E, T> FromRef<AppState<I, E, T>> for TokenKeys {
    fn from_ref(state: &AppState<I, E, T>) -> Self {
        state.token_keys.clone()
    }
}
