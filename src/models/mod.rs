//! This module defines the domain data types.

pub use owner::OwnerID;
pub use record::{
    Expense, ExpenseRecord, Income, IncomeRecord, LedgerRecord, NewRecord, Record, RecordKind,
};
pub use transaction::{NewTransactionRecord, RecordRef, TransactionKind, TransactionRecord};

mod owner;
mod record;
mod transaction;

/// Alias for the integer type used for mapping to database IDs.
pub type DatabaseID = i64;
