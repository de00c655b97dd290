//! Builds the tabular snapshots behind the export endpoints.
//!
//! Sheet building (projecting records to rows) is separate from the byte
//! format: [write_csv] is the one place that knows the download is CSV, so a
//! different spreadsheet writer can be swapped in behind the same [Sheet]
//! type.

use csv::WriterBuilder;

use crate::{
    Error,
    models::{ExpenseRecord, IncomeRecord, LedgerRecord, Record, TransactionRecord},
};

/// A row-set ready to be written out as a spreadsheet.
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    /// The sheet title, written as the first row.
    pub title: String,
    /// The column headers, written as the second row.
    pub headers: Vec<&'static str>,
    /// The data rows. Rows may be shorter than the header row (e.g. spacer
    /// and total rows).
    pub rows: Vec<Vec<String>>,
}

/// Project income records into the "Earnings" sheet.
///
/// Rows are sorted by date (then ID) for a deterministic download, and a
/// total row is appended after a spacer.
pub fn income_sheet(records: &[IncomeRecord]) -> Sheet {
    record_sheet("Earnings", records)
}

/// Project expense records into the "Expenses" sheet.
///
/// Same layout as [income_sheet].
pub fn expense_sheet(records: &[ExpenseRecord]) -> Sheet {
    record_sheet("Expenses", records)
}

fn record_sheet<K>(title: &str, records: &[Record<K>]) -> Sheet {
    let mut sorted: Vec<&Record<K>> = records.iter().collect();
    sorted.sort_by_key(|record| (record.date(), record.id()));

    let mut rows: Vec<Vec<String>> = sorted
        .iter()
        .map(|record| {
            vec![
                record.date().to_string(),
                record.description().to_owned(),
                record.category().to_owned(),
                format_amount(record.amount()),
            ]
        })
        .collect();

    let total: f64 = records.iter().map(LedgerRecord::amount).sum();
    rows.push(vec![String::new()]);
    rows.push(vec![
        "Total".to_owned(),
        String::new(),
        String::new(),
        format_amount(total),
    ]);

    Sheet {
        title: title.to_owned(),
        headers: vec!["Date", "Description", "Category", "Amount"],
        rows,
    }
}

/// Project unified log entries into the "All Transactions" sheet.
///
/// Carries a Type column instead of a total row, since summing incomes and
/// expenses together would be meaningless.
pub fn transaction_sheet(records: &[TransactionRecord]) -> Sheet {
    let mut sorted: Vec<&TransactionRecord> = records.iter().collect();
    sorted.sort_by_key(|record| (record.date(), record.id()));

    let rows = sorted
        .iter()
        .map(|record| {
            vec![
                record.date().to_string(),
                record.kind().as_str().to_owned(),
                record.description().to_owned(),
                record.category().to_owned(),
                format_amount(record.amount()),
            ]
        })
        .collect();

    Sheet {
        title: "All Transactions".to_owned(),
        headers: vec!["Date", "Type", "Description", "Category", "Amount"],
        rows,
    }
}

/// Write a sheet out as CSV bytes for download.
///
/// # Errors
/// Returns an [Error::ExportError] if a row could not be written.
pub fn write_csv(sheet: &Sheet) -> Result<Vec<u8>, Error> {
    let into_export_error = |error: csv::Error| Error::ExportError(error.to_string());

    let mut writer = WriterBuilder::new().flexible(true).from_writer(Vec::new());

    writer
        .write_record([sheet.title.as_str()])
        .map_err(into_export_error)?;
    writer
        .write_record(&sheet.headers)
        .map_err(into_export_error)?;

    for row in &sheet.rows {
        writer.write_record(row).map_err(into_export_error)?;
    }

    writer
        .into_inner()
        .map_err(|error| Error::ExportError(error.to_string()))
}

fn format_amount(amount: f64) -> String {
    format!("{amount:.2}")
}
