//! Implements a SQLite backed store for the typed income/expense records.

use std::{
    marker::PhantomData,
    sync::{Arc, Mutex},
};

use rusqlite::{Connection, Row};

use crate::{
    Error,
    db::{CreateTable, MapRow},
    models::{DatabaseID, Expense, Income, NewRecord, OwnerID, Record, RecordKind},
    stores::RecordStore,
};

/// Links a record marker to the SQLite table holding that record flavour.
pub trait RecordTable: RecordKind {
    /// Name of the table holding this record type.
    const TABLE: &'static str;
}

impl RecordTable for Income {
    const TABLE: &'static str = "income";
}

impl RecordTable for Expense {
    const TABLE: &'static str = "expense";
}

/// Stores typed financial records in a SQLite database.
///
/// The marker parameter `K` selects which table the store reads and writes,
/// so the income and expense collections share this one implementation.
#[derive(Debug, Clone)]
pub struct SqliteRecordStore<K> {
    connection: Arc<Mutex<Connection>>,
    record_kind: PhantomData<K>,
}

impl<K> SqliteRecordStore<K> {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self {
            connection,
            record_kind: PhantomData,
        }
    }
}

impl<K: RecordTable> RecordStore<K> for SqliteRecordStore<K> {
    /// Create a new record in the database.
    ///
    /// # Errors
    /// This function will return an [Error::SqlError] if there is an
    /// unexpected SQL error.
    fn create(&mut self, new_record: NewRecord) -> Result<Record<K>, Error> {
        let record = self
            .connection
            .lock()
            .unwrap()
            .prepare(&format!(
                "INSERT INTO {} (owner, description, amount, category, date, notes, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                 RETURNING id, owner, description, amount, category, date, notes, created_at",
                K::TABLE
            ))?
            .query_row(
                (
                    new_record.owner.as_i64(),
                    &new_record.description,
                    new_record.amount,
                    &new_record.category,
                    new_record.date,
                    &new_record.notes,
                    new_record.created_at,
                ),
                Self::map_row,
            )?;

        Ok(record)
    }

    /// Retrieve a record in the database by its `id`.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if `id` does not refer to a stored record,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn get(&self, id: DatabaseID) -> Result<Record<K>, Error> {
        let record = self
            .connection
            .lock()
            .unwrap()
            .prepare(&format!(
                "SELECT id, owner, description, amount, category, date, notes, created_at
                 FROM {} WHERE id = :id",
                K::TABLE
            ))?
            .query_row(&[(":id", &id)], Self::map_row)?;

        Ok(record)
    }

    /// Retrieve the records in the database that belong to `owner`, in the
    /// order they were inserted.
    ///
    /// # Errors
    /// This function will return an [Error::SqlError] if there is an SQL error.
    fn for_owner(&self, owner: OwnerID) -> Result<Vec<Record<K>>, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare(&format!(
                "SELECT id, owner, description, amount, category, date, notes, created_at
                 FROM {} WHERE owner = :owner ORDER BY id",
                K::TABLE
            ))?
            .query_map(&[(":owner", &owner.as_i64())], Self::map_row)?
            .map(|maybe_record| maybe_record.map_err(Error::SqlError))
            .collect()
    }

    /// Overwrite the user-editable fields of the record `id`.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if `id` does not refer to a record owned by
    ///   `fields.owner`,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn update(&mut self, id: DatabaseID, fields: NewRecord) -> Result<Record<K>, Error> {
        let rows_changed = self.connection.lock().unwrap().execute(
            &format!(
                "UPDATE {} SET description = ?1, amount = ?2, category = ?3, date = ?4, notes = ?5
                 WHERE id = ?6 AND owner = ?7",
                K::TABLE
            ),
            (
                &fields.description,
                fields.amount,
                &fields.category,
                fields.date,
                &fields.notes,
                id,
                fields.owner.as_i64(),
            ),
        )?;

        if rows_changed == 0 {
            return Err(Error::NotFound);
        }

        self.get(id)
    }

    /// Delete the record `id` belonging to `owner`.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if `id` does not refer to a record owned by `owner`,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn delete(&mut self, id: DatabaseID, owner: OwnerID) -> Result<(), Error> {
        let rows_changed = self.connection.lock().unwrap().execute(
            &format!("DELETE FROM {} WHERE id = ?1 AND owner = ?2", K::TABLE),
            (id, owner.as_i64()),
        )?;

        if rows_changed == 0 {
            return Err(Error::NotFound);
        }

        Ok(())
    }
}

impl<K: RecordTable> CreateTable for SqliteRecordStore<K> {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            &format!(
                "CREATE TABLE IF NOT EXISTS {} (
                        id INTEGER PRIMARY KEY AUTOINCREMENT,
                        owner INTEGER NOT NULL,
                        description TEXT NOT NULL,
                        amount REAL NOT NULL,
                        category TEXT NOT NULL,
                        date TEXT NOT NULL,
                        notes TEXT,
                        created_at TEXT NOT NULL
                        )",
                K::TABLE
            ),
            (),
        )?;

        Ok(())
    }
}

impl<K> MapRow for SqliteRecordStore<K> {
    type ReturnType = Record<K>;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        Ok(Record::new_unchecked(
            row.get(offset)?,
            OwnerID::new(row.get(offset + 1)?),
            row.get(offset + 2)?,
            row.get(offset + 3)?,
            row.get(offset + 4)?,
            row.get(offset + 5)?,
            row.get(offset + 6)?,
            row.get(offset + 7)?,
        ))
    }
}
