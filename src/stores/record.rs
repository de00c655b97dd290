//! Defines the store trait for the typed income/expense records.

use crate::{
    Error,
    models::{DatabaseID, NewRecord, OwnerID, Record},
};

/// Handles the creation and retrieval of typed financial records.
///
/// The marker parameter `K` selects the record flavour, so one implementation
/// can back both the income and the expense collection (see
/// [SqliteRecordStore](crate::stores::sqlite::SqliteRecordStore)).
pub trait RecordStore<K> {
    /// Persist a validated record draft and return the stored record with its
    /// assigned ID.
    fn create(&mut self, new_record: NewRecord) -> Result<Record<K>, Error>;

    /// Retrieve a record by its `id`.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if `id` does not refer to a stored record.
    fn get(&self, id: DatabaseID) -> Result<Record<K>, Error>;

    /// Retrieve all records belonging to `owner`, in stored (insertion) order.
    ///
    /// An empty vector is returned if the owner has no records.
    fn for_owner(&self, owner: OwnerID) -> Result<Vec<Record<K>>, Error>;

    /// Overwrite the user-editable fields of the record `id` with `fields`.
    ///
    /// The record's transaction mirror, if any, is deliberately left
    /// untouched: mirrors are write-once.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if `id` does not refer to a record owned by
    /// `fields.owner`.
    fn update(&mut self, id: DatabaseID, fields: NewRecord) -> Result<Record<K>, Error>;

    /// Delete the record `id` belonging to `owner`.
    ///
    /// The record's transaction mirror, if any, is deliberately left
    /// untouched: mirrors are write-once.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if `id` does not refer to a record owned by
    /// `owner`.
    fn delete(&mut self, id: DatabaseID, owner: OwnerID) -> Result<(), Error>;
}
