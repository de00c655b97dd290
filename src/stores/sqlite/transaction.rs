//! Implements a SQLite backed store for the unified transaction log.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Row, params_from_iter, types::Value};

use crate::{
    Error,
    db::{CreateTable, MapRow},
    models::{DatabaseID, NewTransactionRecord, OwnerID, RecordRef, TransactionRecord},
    stores::{
        TransactionStore,
        transaction::{SortOrder, TransactionQuery},
    },
};

const COLUMNS: &str =
    "id, owner, kind, income_ref, expense_ref, description, amount, category, date, created_at";

/// Stores unified transaction log entries in a SQLite database.
#[derive(Debug, Clone)]
pub struct SqliteTransactionStore {
    connection: Arc<Mutex<Connection>>,
}

impl SqliteTransactionStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl TransactionStore for SqliteTransactionStore {
    /// Append a mirror entry to the log.
    ///
    /// # Errors
    /// This function will return an [Error::SqlError] if there is an
    /// unexpected SQL error.
    fn append(&mut self, new_record: NewTransactionRecord) -> Result<TransactionRecord, Error> {
        let record = self
            .connection
            .lock()
            .unwrap()
            .prepare(&format!(
                "INSERT INTO \"transaction\"
                 (owner, kind, income_ref, expense_ref, description, amount, category, date, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                 RETURNING {COLUMNS}"
            ))?
            .query_row(
                (
                    new_record.owner.as_i64(),
                    new_record.source.kind().as_str(),
                    new_record.source.income_ref(),
                    new_record.source.expense_ref(),
                    &new_record.description,
                    new_record.amount,
                    &new_record.category,
                    new_record.date,
                    new_record.created_at,
                ),
                Self::map_row,
            )?;

        Ok(record)
    }

    /// Query for log entries in the database.
    ///
    /// # Errors
    /// This function will return an [Error::SqlError] if there is an SQL error.
    fn get_query(&self, query: TransactionQuery) -> Result<Vec<TransactionRecord>, Error> {
        let mut query_string_parts = vec![format!("SELECT {COLUMNS} FROM \"transaction\"")];
        let mut where_clause_parts = vec!["owner = ?1".to_string()];
        let mut query_parameters = vec![Value::Integer(query.owner.as_i64())];

        if let Some(date_range) = query.date_range {
            where_clause_parts.push(format!(
                "date BETWEEN ?{} AND ?{}",
                query_parameters.len() + 1,
                query_parameters.len() + 2,
            ));
            query_parameters.push(Value::Text(date_range.start().to_string()));
            query_parameters.push(Value::Text(date_range.end().to_string()));
        }

        if let Some(kind) = query.kind {
            where_clause_parts.push(format!("kind = ?{}", query_parameters.len() + 1));
            query_parameters.push(Value::Text(kind.as_str().to_string()));
        }

        query_string_parts.push(String::from("WHERE ") + &where_clause_parts.join(" AND "));

        match query.sort_date {
            Some(SortOrder::Ascending) => query_string_parts.push("ORDER BY date ASC".to_string()),
            Some(SortOrder::Descending) => {
                query_string_parts.push("ORDER BY date DESC".to_string())
            }
            None => {}
        }

        if let Some(limit) = query.limit {
            query_string_parts.push(format!("LIMIT {limit}"));
        }

        let query_string = query_string_parts.join(" ");
        let params = params_from_iter(query_parameters.iter());

        self.connection
            .lock()
            .unwrap()
            .prepare(&query_string)?
            .query_map(params, Self::map_row)?
            .map(|maybe_record| maybe_record.map_err(Error::SqlError))
            .collect()
    }
}

impl CreateTable for SqliteTransactionStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS \"transaction\" (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    owner INTEGER NOT NULL,
                    kind TEXT NOT NULL,
                    income_ref INTEGER,
                    expense_ref INTEGER,
                    description TEXT NOT NULL,
                    amount REAL NOT NULL,
                    category TEXT NOT NULL,
                    date TEXT NOT NULL,
                    created_at TEXT NOT NULL,
                    CHECK ((income_ref IS NULL) <> (expense_ref IS NULL))
                    )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SqliteTransactionStore {
    type ReturnType = TransactionRecord;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        let kind: String = row.get(offset + 2)?;
        let income_ref: Option<DatabaseID> = row.get(offset + 3)?;
        let expense_ref: Option<DatabaseID> = row.get(offset + 4)?;

        let source = match (kind.as_str(), income_ref, expense_ref) {
            ("income", Some(id), None) => RecordRef::Income(id),
            ("expense", None, Some(id)) => RecordRef::Expense(id),
            _ => {
                return Err(rusqlite::Error::FromSqlConversionFailure(
                    offset + 2,
                    rusqlite::types::Type::Text,
                    format!("transaction row tagged '{kind}' must reference exactly one typed record")
                        .into(),
                ));
            }
        };

        Ok(TransactionRecord::new_unchecked(
            row.get(offset)?,
            OwnerID::new(row.get(offset + 1)?),
            source,
            row.get(offset + 5)?,
            row.get(offset + 6)?,
            row.get(offset + 7)?,
            row.get(offset + 8)?,
            row.get(offset + 9)?,
        ))
    }
}
