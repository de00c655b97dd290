//! The API endpoint URIs.

/// The route for creating an income record.
pub const INCOME: &str = "/income";
/// The route to access a single income record.
pub const INCOME_ENTRY: &str = "/income/{income_id}";
/// The route for listing an owner's income records.
pub const INCOMES: &str = "/incomes";
/// The route for the per-category income status report.
pub const INCOMES_PER_CATEGORY: &str = "/incomes/total-per-category";
/// The route for the current-calendar-month income total.
pub const INCOMES_MONTHLY_TOTAL: &str = "/incomes/monthly-total";
/// The route for downloading the income spreadsheet.
pub const INCOMES_EXPORT: &str = "/incomes/export";

/// The route for creating an expense record.
pub const EXPENSE: &str = "/expense";
/// The route to access a single expense record.
pub const EXPENSE_ENTRY: &str = "/expense/{expense_id}";
/// The route for listing an owner's expense records.
pub const EXPENSES: &str = "/expenses";
/// The route for the per-category expense status report.
pub const EXPENSES_PER_CATEGORY: &str = "/expenses/total-per-category";
/// The route for the zero-filled daily expense totals over the trailing
/// 30-day window.
pub const EXPENSES_DAILY_TOTALS: &str = "/expenses/daily-totals";
/// The route for the current-calendar-month expense total.
pub const EXPENSES_MONTHLY_TOTAL: &str = "/expenses/monthly-total";
/// The route for downloading the expense spreadsheet.
pub const EXPENSES_EXPORT: &str = "/expenses/export";

/// The route for the recent unified activity feed.
pub const TRANSACTION_RECENT: &str = "/transaction/recent";
/// The route for the trailing 30-day income/expense/savings summary.
pub const TRANSACTION_SUMMARY: &str = "/transaction/summary";
/// The route for backfilling missing transaction mirrors.
pub const TRANSACTION_RECONCILE: &str = "/transaction/reconcile";
/// The route for downloading the unified transaction spreadsheet.
pub const TRANSACTION_EXPORT: &str = "/transaction/export";

/// The route for the owner's top spending categories.
pub const TOP_CATEGORIES: &str = "/top-categories";
/// The route for the combined dashboard payload.
pub const DASHBOARD: &str = "/dashboard";
