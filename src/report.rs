//! The reporting read path.
//!
//! Orchestrates store queries and [aggregate] calls to answer the dashboard,
//! recent-activity, summary, budget-status and top-category requests. All
//! reads are scoped to a single owner; nothing in this module can see across
//! owners.

use serde::{Deserialize, Serialize};
use time::{Date, Duration, Month, OffsetDateTime};

use crate::{
    Error,
    aggregate::{self, CategoryStatus, CategoryTotal, DailyTotal},
    models::{
        DatabaseID, Expense, ExpenseRecord, Income, IncomeRecord, LedgerRecord, OwnerID, Record,
        RecordKind, TransactionKind, TransactionRecord,
    },
    stores::{RecordStore, TransactionQuery, TransactionStore},
};

/// The fixed reference list that expense budget status is reported against.
///
/// The stores accept any category string; this list only controls which rows
/// the status report carries and in what order.
pub const EXPENSE_CATEGORIES: [&str; 6] = [
    "Food",
    "Transport",
    "Entertainment",
    "Bills",
    "Shopping",
    "Other",
];

/// The fixed reference list that income budget status is reported against.
pub const INCOME_CATEGORIES: [&str; 5] = [
    "Salary",
    "Stock Investment",
    "Mutual Funds",
    "Dividend",
    "Other Sources",
];

/// How many entries the combined recent-transactions view carries.
pub const RECENT_TRANSACTION_COUNT: usize = 10;

/// How many categories the top-spending ranking carries.
pub const TOP_CATEGORY_COUNT: usize = 3;

/// The length of the trailing window used by [monthly_summary] and
/// [daily_expense_totals].
pub const TRAILING_WINDOW_DAYS: i64 = 30;

/// Everything the dashboard page needs in one payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    /// All of the owner's income records.
    pub income: Vec<IncomeRecord>,
    /// All of the owner's expense records.
    pub expenses: Vec<ExpenseRecord>,
    /// The most recent entries of the two lists combined, tagged by kind.
    pub recent_transactions: Vec<ActivityEntry>,
}

/// One row of the combined recent-transactions view.
///
/// Built from the typed records (not the transaction log), so it reflects
/// edits and deletes immediately.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEntry {
    /// The ID of the typed record this row was built from.
    pub id: DatabaseID,
    /// Whether the row is an income or an expense.
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// Description of the typed record.
    pub description: String,
    /// Amount of the typed record.
    pub amount: f64,
    /// Category of the typed record.
    pub category: String,
    /// Transaction date of the typed record.
    pub date: Date,
    /// Creation time of the typed record, used as the tie-break when sorting
    /// by date.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl ActivityEntry {
    fn from_record<K: RecordKind>(record: &Record<K>) -> Self {
        Self {
            id: record.id(),
            kind: K::KIND,
            description: record.description().to_owned(),
            amount: record.amount(),
            category: record.category().to_owned(),
            date: record.date(),
            created_at: record.created_at(),
        }
    }
}

/// Fetch the dashboard payload for `owner`.
///
/// The recent-transactions view is the union of the owner's typed records
/// tagged with their kind, sorted by date (newest first, creation time as the
/// tie-break) and truncated to [RECENT_TRANSACTION_COUNT].
pub fn dashboard<I, E>(
    income_store: &I,
    expense_store: &E,
    owner: OwnerID,
) -> Result<Dashboard, Error>
where
    I: RecordStore<Income>,
    E: RecordStore<Expense>,
{
    let income = income_store.for_owner(owner)?;
    let expenses = expense_store.for_owner(owner)?;

    let tagged_union: Vec<ActivityEntry> = income
        .iter()
        .map(ActivityEntry::from_record)
        .chain(expenses.iter().map(ActivityEntry::from_record))
        .collect();
    let recent_transactions = aggregate::recent_n(tagged_union, RECENT_TRANSACTION_COUNT, |entry| {
        (entry.date, entry.created_at)
    });

    Ok(Dashboard {
        income,
        expenses,
        recent_transactions,
    })
}

/// Fetch the `n` most recent unified log entries for `owner`.
///
/// Sorted by date (newest first), with creation time as the tie-break.
pub fn recent_transactions<T: TransactionStore>(
    transaction_store: &T,
    owner: OwnerID,
    n: usize,
) -> Result<Vec<TransactionRecord>, Error> {
    let mirrors = transaction_store.get_query(TransactionQuery::for_owner(owner))?;

    Ok(aggregate::recent_n(mirrors, n, |record| {
        (record.date(), record.created_at())
    }))
}

/// Income and expenses totalled over the trailing 30-day window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySummary {
    /// Sum of income-kind entries in the window.
    pub total_income: f64,
    /// Sum of expense-kind entries in the window.
    pub total_expense: f64,
    /// `total_income - total_expense`; negative when more was spent than
    /// earned.
    pub savings: f64,
}

/// Summarize the unified log over the trailing [TRAILING_WINDOW_DAYS]-day
/// window ending at `today`.
///
/// Despite the route being called "monthly", the window is a trailing 30 days
/// rather than a calendar month; that is the behavior clients were built
/// against.
pub fn monthly_summary<T: TransactionStore>(
    transaction_store: &T,
    owner: OwnerID,
    today: Date,
) -> Result<MonthlySummary, Error> {
    let window_start = today - Duration::days(TRAILING_WINDOW_DAYS);
    let entries = transaction_store.get_query(TransactionQuery {
        date_range: Some(window_start..=today),
        ..TransactionQuery::for_owner(owner)
    })?;

    let mut total_income = 0.0;
    let mut total_expense = 0.0;

    for entry in &entries {
        match entry.kind() {
            TransactionKind::Income => total_income += entry.amount(),
            TransactionKind::Expense => total_expense += entry.amount(),
        }
    }

    Ok(MonthlySummary {
        total_income,
        total_expense,
        savings: total_income - total_expense,
    })
}

/// Compute the per-category budget status for one of `owner`'s record
/// collections.
///
/// `known_categories` fixes the rows and their order; see
/// [aggregate::budget_status] for the percentage semantics.
pub fn budget_status<K, S>(
    store: &S,
    owner: OwnerID,
    known_categories: &[&str],
) -> Result<Vec<CategoryStatus>, Error>
where
    K: RecordKind,
    S: RecordStore<K>,
{
    let records = store.for_owner(owner)?;

    Ok(aggregate::budget_status(&records, known_categories))
}

/// The `n` categories `owner` spent the most on, over the whole expense log.
pub fn top_spending_categories<T: TransactionStore>(
    transaction_store: &T,
    owner: OwnerID,
    n: usize,
) -> Result<Vec<CategoryTotal>, Error> {
    let expenses = transaction_store.get_query(TransactionQuery {
        kind: Some(TransactionKind::Expense),
        ..TransactionQuery::for_owner(owner)
    })?;

    Ok(aggregate::top_categories(&expenses, n))
}

/// Per-day expense totals over the trailing [TRAILING_WINDOW_DAYS]-day window
/// ending at `today`, zero-filled.
pub fn daily_expense_totals<S: RecordStore<Expense>>(
    expense_store: &S,
    owner: OwnerID,
    today: Date,
) -> Result<Vec<DailyTotal>, Error> {
    let window_start = today - Duration::days(TRAILING_WINDOW_DAYS - 1);
    let expenses = expense_store.for_owner(owner)?;

    Ok(aggregate::windowed_daily_sums(&expenses, window_start, today))
}

/// The summed amount of one record collection for a single calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthTotal {
    /// The calendar month, 1 through 12.
    pub month: u8,
    /// The calendar year.
    pub year: i32,
    /// Sum of amounts dated within the month.
    pub total: f64,
}

/// Sum one of `owner`'s record collections over the given calendar month.
pub fn month_total<K, S>(
    store: &S,
    owner: OwnerID,
    month: Month,
    year: i32,
) -> Result<MonthTotal, Error>
where
    K: RecordKind,
    S: RecordStore<K>,
{
    let records = store.for_owner(owner)?;

    Ok(MonthTotal {
        month: u8::from(month),
        year,
        total: aggregate::monthly_total(&records, month, year),
    })
}
