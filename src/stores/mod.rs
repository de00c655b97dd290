//! Contains traits and implementations for objects that store the domain [models](crate::models).

mod record;
mod transaction;

pub mod sqlite;

pub use record::RecordStore;
pub use transaction::{SortOrder, TransactionQuery, TransactionStore};
