//! This file defines the typed financial records: incomes and expenses.
//!
//! The two record flavours have identical shapes but are stored and queried
//! separately, so they are kept as distinct Rust types via marker parameters
//! rather than a runtime tag.

use std::marker::PhantomData;

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::models::{DatabaseID, OwnerID, TransactionKind};

/// Marker type selecting the income flavour of [Record].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Income {}

/// Marker type selecting the expense flavour of [Record].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expense {}

/// Links a record marker to the kind tag written to its transaction mirror.
pub trait RecordKind {
    /// The kind tag for mirrors of this record type.
    const KIND: TransactionKind;
}

impl RecordKind for Income {
    const KIND: TransactionKind = TransactionKind::Income;
}

impl RecordKind for Expense {
    const KIND: TransactionKind = TransactionKind::Expense;
}

/// Read access to the fields the aggregation functions care about.
///
/// Implemented by both typed records and their transaction mirrors so the
/// functions in [crate::aggregate] can operate on either.
pub trait LedgerRecord {
    /// The amount of money earned or spent.
    fn amount(&self) -> f64;

    /// The category the record was filed under.
    fn category(&self) -> &str;

    /// The user-supplied transaction date.
    fn date(&self) -> Date;
}

/// An authoritative financial entry: money earned ([IncomeRecord]) or spent
/// ([ExpenseRecord]).
///
/// Records are created through the ledger write path
/// ([crate::ledger::record_income] and [crate::ledger::record_expense]), which
/// also appends a [TransactionRecord](crate::models::TransactionRecord) mirror
/// for the unified read paths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", bound = "")]
pub struct Record<K> {
    id: DatabaseID,
    owner: OwnerID,
    description: String,
    amount: f64,
    category: String,
    date: Date,
    notes: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    created_at: OffsetDateTime,
    #[serde(skip)]
    kind: PhantomData<K>,
}

/// A record of money earned.
pub type IncomeRecord = Record<Income>;

/// A record of money spent.
pub type ExpenseRecord = Record<Expense>;

impl<K> Record<K> {
    /// Assemble a record from raw parts, skipping validation.
    ///
    /// Intended for use by store implementations mapping database rows that
    /// were validated when first written.
    #[allow(clippy::too_many_arguments)]
    pub fn new_unchecked(
        id: DatabaseID,
        owner: OwnerID,
        description: String,
        amount: f64,
        category: String,
        date: Date,
        notes: Option<String>,
        created_at: OffsetDateTime,
    ) -> Self {
        Self {
            id,
            owner,
            description,
            amount,
            category,
            date,
            notes,
            created_at,
            kind: PhantomData,
        }
    }

    /// The store-assigned ID of the record.
    pub fn id(&self) -> DatabaseID {
        self.id
    }

    /// The owner that the record is scoped to.
    pub fn owner(&self) -> OwnerID {
        self.owner
    }

    /// A text description of what the money was earned from or spent on.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Free-form notes attached on submission, if any.
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    /// When the record was persisted.
    ///
    /// Distinct from [LedgerRecord::date]: the transaction date is
    /// user-supplied and may lie in the past or future, while `created_at` is
    /// system time.
    pub fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }
}

impl<K> LedgerRecord for Record<K> {
    fn amount(&self) -> f64 {
        self.amount
    }

    fn category(&self) -> &str {
        &self.category
    }

    fn date(&self) -> Date {
        self.date
    }
}

/// A validated record draft, ready to be inserted by a
/// [RecordStore](crate::stores::RecordStore).
///
/// Values of this type only come out of
/// [RecordSubmission::validate](crate::ledger::RecordSubmission::validate),
/// so stores can assume the fields are well formed.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRecord {
    /// The owner the record will be scoped to.
    pub owner: OwnerID,
    /// A text description of the transaction. Never empty.
    pub description: String,
    /// The amount of money. Finite and greater than zero.
    pub amount: f64,
    /// The category the record is filed under. Never empty.
    pub category: String,
    /// The user-supplied transaction date.
    pub date: Date,
    /// Optional free-form notes.
    pub notes: Option<String>,
    /// The system time at which the submission was accepted.
    pub created_at: OffsetDateTime,
}
