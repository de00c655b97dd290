//! Defines the store trait for the unified transaction log.

use std::ops::RangeInclusive;

use time::Date;

use crate::{
    Error,
    models::{NewTransactionRecord, OwnerID, TransactionKind, TransactionRecord},
};

/// Handles appending to and reading from the unified transaction log.
pub trait TransactionStore {
    /// Append a mirror entry to the log and return it with its assigned ID.
    fn append(&mut self, new_record: NewTransactionRecord) -> Result<TransactionRecord, Error>;

    /// Retrieve log entries from the store in the way defined by `query`.
    fn get_query(&self, query: TransactionQuery) -> Result<Vec<TransactionRecord>, Error>;
}

/// Defines how log entries should be fetched from [TransactionStore::get_query].
///
/// Every query is scoped to a single owner; there is no way to read the log
/// across owners.
pub struct TransactionQuery {
    /// Include only entries belonging to this owner.
    pub owner: OwnerID,
    /// Include entries whose transaction date falls within `date_range` (inclusive).
    pub date_range: Option<RangeInclusive<Date>>,
    /// Include only entries of this kind.
    pub kind: Option<TransactionKind>,
    /// Selects up to the first N (`limit`) entries.
    pub limit: Option<u64>,
    /// Orders entries by date in the order `sort_date`. None returns entries
    /// in the order they are stored.
    pub sort_date: Option<SortOrder>,
}

impl TransactionQuery {
    /// A query for all of `owner`'s log entries in stored order.
    pub fn for_owner(owner: OwnerID) -> Self {
        Self {
            owner,
            date_range: None,
            kind: None,
            limit: None,
            sort_date: None,
        }
    }
}

/// The order to sort log entries in a [TransactionQuery].
pub enum SortOrder {
    /// Sort in order of increasing value.
    Ascending,
    /// Sort in order of decreasing value.
    Descending,
}
