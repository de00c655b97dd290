//! Contains the SQLite implementations of the store traits, plus a
//! convenience type alias and constructor for an [AppState] that uses the
//! SQLite backend.

mod record;
mod transaction;

pub use record::{RecordTable, SqliteRecordStore};
pub use transaction::SqliteTransactionStore;

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Transaction as SqlTransaction, TransactionBehavior};

use crate::{AppState, Error, db::CreateTable, models::{Expense, Income}};

/// An alias for an [AppState] that uses SQLite for the backend.
pub type SqlAppState = AppState<
    SqliteRecordStore<Income>,
    SqliteRecordStore<Expense>,
    SqliteTransactionStore,
>;

/// Add the tables for the domain models to the database.
///
/// # Errors
/// Returns an [Error::SqlError] if a table could not be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction =
        SqlTransaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    SqliteRecordStore::<Income>::create_table(&transaction)?;
    SqliteRecordStore::<Expense>::create_table(&transaction)?;
    SqliteTransactionStore::create_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}

/// Creates an [AppState] instance that uses SQLite for the backend.
///
/// This function will modify the database by adding the tables for the domain
/// models to the database. `token_secret` is the HMAC secret that bearer
/// tokens are signed with.
pub fn create_app_state(
    db_connection: Connection,
    token_secret: &str,
) -> Result<SqlAppState, Error> {
    initialize(&db_connection)?;

    let connection = Arc::new(Mutex::new(db_connection));

    Ok(AppState::new(
        token_secret,
        SqliteRecordStore::new(connection.clone()),
        SqliteRecordStore::new(connection.clone()),
        SqliteTransactionStore::new(connection),
    ))
}
