//! This file defines the unified transaction log entry: a denormalized mirror
//! of an income or expense record, used by the combined read paths
//! (recent-activity feed, 30-day summary, export).

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::models::{DatabaseID, LedgerRecord, OwnerID, Record, RecordKind};

/// Discriminates the two flavours of ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money earned.
    Income,
    /// Money spent.
    Expense,
}

impl TransactionKind {
    /// The lowercase tag used in storage and on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }
}

/// A reference back to the typed record a transaction mirrors.
///
/// The observed wire format carries two nullable fields (`incomeRef`,
/// `expenseRef`) with an exactly-one-of invariant; this sum type makes that
/// invariant structural instead of relying on discipline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordRef {
    /// Points at an [IncomeRecord](crate::models::IncomeRecord).
    Income(DatabaseID),
    /// Points at an [ExpenseRecord](crate::models::ExpenseRecord).
    Expense(DatabaseID),
}

impl RecordRef {
    /// The kind of record this reference points at.
    pub fn kind(&self) -> TransactionKind {
        match self {
            RecordRef::Income(_) => TransactionKind::Income,
            RecordRef::Expense(_) => TransactionKind::Expense,
        }
    }

    /// The referenced income record ID, if this is an income reference.
    pub fn income_ref(&self) -> Option<DatabaseID> {
        match self {
            RecordRef::Income(id) => Some(*id),
            RecordRef::Expense(_) => None,
        }
    }

    /// The referenced expense record ID, if this is an expense reference.
    pub fn expense_ref(&self) -> Option<DatabaseID> {
        match self {
            RecordRef::Income(_) => None,
            RecordRef::Expense(id) => Some(*id),
        }
    }
}

/// An entry in the unified transaction log.
///
/// The descriptive fields are copied verbatim from the typed record at write
/// time and are *not* kept in sync if the typed record is later edited or
/// deleted. Mirrors are write-once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "TransactionRecordWire", try_from = "TransactionRecordWire")]
pub struct TransactionRecord {
    id: DatabaseID,
    owner: OwnerID,
    source: RecordRef,
    description: String,
    amount: f64,
    category: String,
    date: Date,
    created_at: OffsetDateTime,
}

impl TransactionRecord {
    /// Assemble a transaction record from raw parts, skipping validation.
    ///
    /// Intended for use by store implementations mapping database rows.
    #[allow(clippy::too_many_arguments)]
    pub fn new_unchecked(
        id: DatabaseID,
        owner: OwnerID,
        source: RecordRef,
        description: String,
        amount: f64,
        category: String,
        date: Date,
        created_at: OffsetDateTime,
    ) -> Self {
        Self {
            id,
            owner,
            source,
            description,
            amount,
            category,
            date,
            created_at,
        }
    }

    /// The store-assigned ID of the log entry.
    pub fn id(&self) -> DatabaseID {
        self.id
    }

    /// The owner that the entry is scoped to.
    pub fn owner(&self) -> OwnerID {
        self.owner
    }

    /// Whether the entry mirrors an income or an expense.
    pub fn kind(&self) -> TransactionKind {
        self.source.kind()
    }

    /// The reference back to the mirrored typed record.
    pub fn source(&self) -> RecordRef {
        self.source
    }

    /// The description copied from the typed record at write time.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// When the entry was appended to the log.
    pub fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }
}

impl LedgerRecord for TransactionRecord {
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

/// The observed JSON shape of a transaction record, with the tag and both
/// nullable reference fields spelled out.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TransactionRecordWire {
    id: DatabaseID,
    owner: OwnerID,
    #[serde(rename = "type")]
    kind: TransactionKind,
    income_ref: Option<DatabaseID>,
    expense_ref: Option<DatabaseID>,
    description: String,
    amount: f64,
    category: String,
    date: Date,
    #[serde(with = "time::serde::rfc3339")]
    created_at: OffsetDateTime,
}

impl From<TransactionRecord> for TransactionRecordWire {
    fn from(record: TransactionRecord) -> Self {
        Self {
            id: record.id,
            owner: record.owner,
            kind: record.source.kind(),
            income_ref: record.source.income_ref(),
            expense_ref: record.source.expense_ref(),
            description: record.description,
            amount: record.amount,
            category: record.category,
            date: record.date,
            created_at: record.created_at,
        }
    }
}

impl TryFrom<TransactionRecordWire> for TransactionRecord {
    type Error = String;

    fn try_from(wire: TransactionRecordWire) -> Result<Self, Self::Error> {
        let source = match (wire.kind, wire.income_ref, wire.expense_ref) {
            (TransactionKind::Income, Some(id), None) => RecordRef::Income(id),
            (TransactionKind::Expense, None, Some(id)) => RecordRef::Expense(id),
            _ => {
                return Err(format!(
                    "a {} transaction must reference exactly one {} record",
                    wire.kind.as_str(),
                    wire.kind.as_str()
                ));
            }
        };

        Ok(Self {
            id: wire.id,
            owner: wire.owner,
            source,
            description: wire.description,
            amount: wire.amount,
            category: wire.category,
            date: wire.date,
            created_at: wire.created_at,
        })
    }
}

/// A mirror entry ready to be appended by a
/// [TransactionStore](crate::stores::TransactionStore).
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransactionRecord {
    /// The owner the entry is scoped to.
    pub owner: OwnerID,
    /// The reference back to the typed record being mirrored.
    pub source: RecordRef,
    /// Description copied from the typed record.
    pub description: String,
    /// Amount copied from the typed record.
    pub amount: f64,
    /// Category copied from the typed record.
    pub category: String,
    /// Transaction date copied from the typed record.
    pub date: Date,
    /// Creation timestamp copied from the typed record.
    pub created_at: OffsetDateTime,
}

impl NewTransactionRecord {
    /// Build the mirror entry for a typed record, copying the descriptive
    /// fields verbatim.
    pub fn mirroring<K: RecordKind>(record: &Record<K>) -> Self {
        let source = match K::KIND {
            TransactionKind::Income => RecordRef::Income(record.id()),
            TransactionKind::Expense => RecordRef::Expense(record.id()),
        };

        Self {
            owner: record.owner(),
            source,
            description: record.description().to_owned(),
            amount: record.amount(),
            category: record.category().to_owned(),
            date: record.date(),
            created_at: record.created_at(),
        }
    }
}

#[cfg(test)]
mod transaction_record_tests {
    use time::macros::{date, datetime};

    use crate::models::{OwnerID, RecordRef, TransactionRecord};

    fn sample_record() -> TransactionRecord {
        TransactionRecord::new_unchecked(
            7,
            OwnerID::new(3),
            RecordRef::Expense(21),
            "Lunch".to_owned(),
            12.5,
            "Food".to_owned(),
            date!(2024 - 03 - 01),
            datetime!(2024-03-01 12:30:00 UTC),
        )
    }

    #[test]
    fn serialises_tag_and_exactly_one_reference() {
        let json = serde_json::to_value(sample_record()).unwrap();

        assert_eq!(json["type"], "expense");
        assert_eq!(json["expenseRef"], 21);
        assert!(json["incomeRef"].is_null());
        assert_eq!(json["amount"], 12.5);
        assert_eq!(json["date"], "2024-03-01");
    }

    #[test]
    fn round_trips_through_json() {
        let record = sample_record();
        let json = serde_json::to_string(&record).unwrap();

        let deserialised: TransactionRecord = serde_json::from_str(&json).unwrap();

        assert_eq!(record, deserialised);
    }

    #[test]
    fn rejects_mismatched_tag_and_reference() {
        let json = r#"{
            "id": 7,
            "owner": 3,
            "type": "expense",
            "incomeRef": 21,
            "expenseRef": null,
            "description": "Lunch",
            "amount": 12.5,
            "category": "Food",
            "date": "2024-03-01",
            "createdAt": "2024-03-01T12:30:00Z"
        }"#;

        let result = serde_json::from_str::<TransactionRecord>(json);

        assert!(result.is_err());
    }

    #[test]
    fn rejects_both_references_set() {
        let json = r#"{
            "id": 7,
            "owner": 3,
            "type": "income",
            "incomeRef": 21,
            "expenseRef": 22,
            "description": "Salary",
            "amount": 1000.0,
            "category": "Salary",
            "date": "2024-03-01",
            "createdAt": "2024-03-01T12:30:00Z"
        }"#;

        let result = serde_json::from_str::<TransactionRecord>(json);

        assert!(result.is_err());
    }
}
