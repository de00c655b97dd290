//! The ledger write path.
//!
//! Creating an income or expense is a dual write: the typed record is
//! persisted first (so the store can assign its ID), then a denormalized
//! mirror is appended to the unified transaction log. The two writes are not
//! atomic; a failure between them leaves a typed record with no mirror, which
//! is logged and can later be repaired with [reconcile].

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime, format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    Error,
    models::{
        DatabaseID, Expense, ExpenseRecord, Income, IncomeRecord, NewRecord, NewTransactionRecord,
        OwnerID, Record, RecordKind,
    },
    stores::{RecordStore, TransactionQuery, TransactionStore},
};

/// The date format accepted on record submissions, e.g. "2024-03-01".
const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// The fields a client submits to create or update a record.
///
/// Nothing here is trusted: call [RecordSubmission::validate] to turn a
/// submission into a [NewRecord] that the stores will accept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordSubmission {
    /// A text description of the transaction.
    #[serde(alias = "title")]
    pub description: String,
    /// The amount of money, in the implicit single currency.
    pub amount: f64,
    /// The category to file the record under.
    pub category: String,
    /// The transaction date as a "YYYY-MM-DD" string.
    pub date: String,
    /// Optional free-form notes.
    #[serde(default)]
    pub notes: Option<String>,
}

impl RecordSubmission {
    /// Validate the submission for `owner`, producing a draft that is safe to
    /// persist.
    ///
    /// `created_at` is stamped onto the draft so that callers (and tests) can
    /// control the clock.
    ///
    /// # Errors
    /// Returns a [ValidationError] naming every offending field if the
    /// description or category is empty, the amount is not a finite number
    /// greater than zero, or the date is not a valid calendar date.
    pub fn validate(
        self,
        owner: OwnerID,
        created_at: OffsetDateTime,
    ) -> Result<NewRecord, ValidationError> {
        let mut fields = Vec::new();

        let description = self.description.trim().to_owned();
        if description.is_empty() {
            fields.push(FieldError {
                field: "description",
                message: "description must not be empty".to_owned(),
            });
        }

        if !self.amount.is_finite() {
            fields.push(FieldError {
                field: "amount",
                message: "amount must be a finite number".to_owned(),
            });
        } else if self.amount <= 0.0 {
            fields.push(FieldError {
                field: "amount",
                message: "amount must be greater than zero".to_owned(),
            });
        }

        let category = self.category.trim().to_owned();
        if category.is_empty() {
            fields.push(FieldError {
                field: "category",
                message: "category must not be empty".to_owned(),
            });
        }

        let date = match Date::parse(&self.date, DATE_FORMAT) {
            Ok(date) => Some(date),
            Err(_) => {
                fields.push(FieldError {
                    field: "date",
                    message: "date must be a calendar date in YYYY-MM-DD format".to_owned(),
                });
                None
            }
        };

        match (date, fields.is_empty()) {
            (Some(date), true) => Ok(NewRecord {
                owner,
                description,
                amount: self.amount,
                category,
                date,
                notes: self.notes,
                created_at,
            }),
            _ => Err(ValidationError { fields }),
        }
    }
}

/// A single rejected field in a [ValidationError].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldError {
    /// Name of the submitted field that was rejected.
    pub field: &'static str,
    /// Why the field was rejected.
    pub message: String,
}

/// A record submission was rejected before anything was persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Every rejected field, in submission-shape order.
    pub fields: Vec<FieldError>,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let field_names: Vec<&str> = self.fields.iter().map(|error| error.field).collect();

        write!(f, "invalid value for field(s): {}", field_names.join(", "))
    }
}

impl std::error::Error for ValidationError {}

/// Validate and persist an income record, then append its mirror to the
/// unified transaction log.
///
/// # Errors
/// Returns an [Error::Validation] (persisting nothing) if the submission is
/// malformed, or an [Error::SqlError] if the typed-record write fails. A
/// failed *mirror* write does not fail the call: the typed record exists and
/// is returned, and the gap is logged for a later [reconcile] pass.
pub fn record_income<S, T>(
    income_store: &mut S,
    transaction_store: &mut T,
    owner: OwnerID,
    submission: RecordSubmission,
) -> Result<IncomeRecord, Error>
where
    S: RecordStore<Income>,
    T: TransactionStore,
{
    record_entry(income_store, transaction_store, owner, submission)
}

/// Validate and persist an expense record, then append its mirror to the
/// unified transaction log.
///
/// # Errors
/// See [record_income]; the failure semantics are identical.
pub fn record_expense<S, T>(
    expense_store: &mut S,
    transaction_store: &mut T,
    owner: OwnerID,
    submission: RecordSubmission,
) -> Result<ExpenseRecord, Error>
where
    S: RecordStore<Expense>,
    T: TransactionStore,
{
    record_entry(expense_store, transaction_store, owner, submission)
}

fn record_entry<K, S, T>(
    records: &mut S,
    transactions: &mut T,
    owner: OwnerID,
    submission: RecordSubmission,
) -> Result<Record<K>, Error>
where
    K: RecordKind,
    S: RecordStore<K>,
    T: TransactionStore,
{
    let new_record = submission.validate(owner, OffsetDateTime::now_utc())?;

    // The typed record must be written first: the mirror references its ID.
    let record = records.create(new_record)?;

    if let Err(error) = transactions.append(NewTransactionRecord::mirroring(&record)) {
        tracing::error!(
            "{} record {} was created without a transaction mirror: {}",
            K::KIND.as_str(),
            record.id(),
            error
        );
    }

    Ok(record)
}

/// What a [reconcile] pass backfilled.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileSummary {
    /// Number of income records that were missing a mirror.
    pub backfilled_income: usize,
    /// Number of expense records that were missing a mirror.
    pub backfilled_expense: usize,
}

/// Repair the unified transaction log for `owner` by appending mirrors for
/// typed records that lack one.
///
/// The pass is idempotent: records that already have a mirror are left alone,
/// so running it twice in a row backfills nothing the second time. It only
/// fills gaps; it does not re-sync mirrors whose typed record was later
/// edited or deleted.
pub fn reconcile<I, E, T>(
    income_store: &I,
    expense_store: &E,
    transaction_store: &mut T,
    owner: OwnerID,
) -> Result<ReconcileSummary, Error>
where
    I: RecordStore<Income>,
    E: RecordStore<Expense>,
    T: TransactionStore,
{
    let mirrors = transaction_store.get_query(TransactionQuery::for_owner(owner))?;
    let mirrored_incomes: HashSet<DatabaseID> = mirrors
        .iter()
        .filter_map(|mirror| mirror.source().income_ref())
        .collect();
    let mirrored_expenses: HashSet<DatabaseID> = mirrors
        .iter()
        .filter_map(|mirror| mirror.source().expense_ref())
        .collect();

    let mut summary = ReconcileSummary::default();

    for record in income_store.for_owner(owner)? {
        if !mirrored_incomes.contains(&record.id()) {
            transaction_store.append(NewTransactionRecord::mirroring(&record))?;
            summary.backfilled_income += 1;
        }
    }

    for record in expense_store.for_owner(owner)? {
        if !mirrored_expenses.contains(&record.id()) {
            transaction_store.append(NewTransactionRecord::mirroring(&record))?;
            summary.backfilled_expense += 1;
        }
    }

    if summary != ReconcileSummary::default() {
        tracing::info!(
            "backfilled {} income and {} expense mirror(s) for owner {}",
            summary.backfilled_income,
            summary.backfilled_expense,
            owner
        );
    }

    Ok(summary)
}
