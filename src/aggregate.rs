//! Pure aggregation functions over in-memory record sets.
//!
//! Everything in this module is free of I/O and state: callers fetch the
//! (already owner-filtered) records from a store and pass them in, and every
//! call recomputes from scratch. Functions accept anything implementing
//! [LedgerRecord], so they work on typed records and transaction log entries
//! alike.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use time::{Date, Month};

use crate::models::LedgerRecord;

/// Sums record amounts grouped by category.
///
/// Categories are compared by exact, case-sensitive string match. An empty
/// input produces an empty mapping.
pub fn sum_by_category<R: LedgerRecord>(records: &[R]) -> HashMap<String, f64> {
    let mut totals = HashMap::new();

    for record in records {
        *totals.entry(record.category().to_owned()).or_insert(0.0) += record.amount();
    }

    totals
}

/// One row of the per-category budget status report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryStatus {
    /// The reference category the row describes.
    pub category: String,
    /// Total amount recorded under this category.
    pub spent: f64,
    /// The grand total across *all* records, not a per-category limit.
    pub total: f64,
    /// `spent` as a percentage of `total`, rounded to two decimals. Zero when
    /// the grand total is zero.
    pub percentage: f64,
}

/// Computes each known category's share of the grand total.
///
/// `total` on every row is the sum over all of `records` regardless of
/// category, so a category outside `known_categories` still contributes to
/// the denominator. Output rows follow the order of `known_categories`, not
/// magnitude. A zero grand total yields 0% everywhere rather than an error.
pub fn budget_status<R: LedgerRecord>(
    records: &[R],
    known_categories: &[&str],
) -> Vec<CategoryStatus> {
    let category_totals = sum_by_category(records);
    let grand_total: f64 = records.iter().map(LedgerRecord::amount).sum();

    known_categories
        .iter()
        .map(|&category| {
            let spent = category_totals.get(category).copied().unwrap_or(0.0);
            let percentage = if grand_total > 0.0 {
                round_to_two_decimals(spent / grand_total * 100.0)
            } else {
                0.0
            };

            CategoryStatus {
                category: category.to_owned(),
                spent,
                total: grand_total,
                percentage,
            }
        })
        .collect()
}

/// A category paired with its summed amount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    /// The category name as recorded.
    pub category: String,
    /// Total amount recorded under this category.
    pub total: f64,
}

/// The `n` categories with the highest summed amounts, in descending order.
///
/// Ties are broken by the order in which the category first appears in
/// `records`, which makes the result deterministic for a given input.
pub fn top_categories<R: LedgerRecord>(records: &[R], n: usize) -> Vec<CategoryTotal> {
    let mut totals: Vec<CategoryTotal> = Vec::new();
    let mut index_by_category: HashMap<String, usize> = HashMap::new();

    for record in records {
        match index_by_category.get(record.category()) {
            Some(&index) => totals[index].total += record.amount(),
            None => {
                index_by_category.insert(record.category().to_owned(), totals.len());
                totals.push(CategoryTotal {
                    category: record.category().to_owned(),
                    total: record.amount(),
                });
            }
        }
    }

    // The sort is stable, so equal totals keep their first-seen order.
    totals.sort_by(|a, b| {
        b.total
            .partial_cmp(&a.total)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    totals.truncate(n);

    totals
}

/// The summed amount for a single calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyTotal {
    /// The calendar day.
    pub date: Date,
    /// Total amount recorded on that day, zero if nothing was.
    pub total: f64,
}

/// Sums record amounts per calendar day over `[window_start, window_end]`
/// inclusive.
///
/// Every day in the window gets an entry, zero-filled if no records fall on
/// it. Records dated outside the window are ignored. Comparisons are by whole
/// day; there is no time-of-day component to consider.
pub fn windowed_daily_sums<R: LedgerRecord>(
    records: &[R],
    window_start: Date,
    window_end: Date,
) -> Vec<DailyTotal> {
    let mut daily_totals = Vec::new();
    let mut day = window_start;

    while day <= window_end {
        daily_totals.push(DailyTotal {
            date: day,
            total: 0.0,
        });

        match day.next_day() {
            Some(next_day) => day = next_day,
            None => break,
        }
    }

    for record in records {
        let offset = (record.date() - window_start).whole_days();

        if offset >= 0 && (offset as usize) < daily_totals.len() {
            daily_totals[offset as usize].total += record.amount();
        }
    }

    daily_totals
}

/// Sums the amounts of records dated within the given calendar month.
pub fn monthly_total<R: LedgerRecord>(records: &[R], month: Month, year: i32) -> f64 {
    records
        .iter()
        .filter(|record| record.date().month() == month && record.date().year() == year)
        .map(LedgerRecord::amount)
        .sum()
}

/// The `n` most recent items, sorted descending by `sort_key`.
///
/// The sort is stable, so items with equal keys keep their input order;
/// callers wanting a deterministic feed should include a secondary key such
/// as the creation timestamp.
pub fn recent_n<T, K, F>(mut items: Vec<T>, n: usize, sort_key: F) -> Vec<T>
where
    K: Ord,
    F: Fn(&T) -> K,
{
    items.sort_by(|a, b| sort_key(b).cmp(&sort_key(a)));
    items.truncate(n);

    items
}

fn round_to_two_decimals(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod aggregate_tests {
    use time::{Date, macros::date};

    use crate::models::LedgerRecord;

    use super::{
        CategoryTotal, DailyTotal, budget_status, monthly_total, recent_n, sum_by_category,
        top_categories, windowed_daily_sums,
    };

    struct Entry {
        amount: f64,
        category: &'static str,
        date: Date,
    }

    impl LedgerRecord for Entry {
        fn amount(&self) -> f64 {
            self.amount
        }

        fn category(&self) -> &str {
            self.category
        }

        fn date(&self) -> Date {
            self.date
        }
    }

    fn entry(category: &'static str, amount: f64, date: Date) -> Entry {
        Entry {
            amount,
            category,
            date,
        }
    }

    fn sample_entries() -> Vec<Entry> {
        vec![
            entry("Food", 100.0, date!(2024 - 01 - 01)),
            entry("Food", 50.0, date!(2024 - 01 - 02)),
            entry("Transport", 30.0, date!(2024 - 01 - 01)),
        ]
    }

    #[test]
    fn sum_by_category_groups_and_sums() {
        let totals = sum_by_category(&sample_entries());

        assert_eq!(totals.len(), 2);
        assert_eq!(totals["Food"], 150.0);
        assert_eq!(totals["Transport"], 30.0);
    }

    #[test]
    fn sum_by_category_handles_empty_input() {
        let totals = sum_by_category::<Entry>(&[]);

        assert!(totals.is_empty());
    }

    #[test]
    fn sum_by_category_is_case_sensitive() {
        let entries = vec![
            entry("Food", 1.0, date!(2024 - 01 - 01)),
            entry("food", 2.0, date!(2024 - 01 - 01)),
        ];

        let totals = sum_by_category(&entries);

        assert_eq!(totals.len(), 2);
    }

    #[test]
    fn sum_by_category_loses_nothing() {
        let entries = sample_entries();
        let grand_total: f64 = entries.iter().map(|e| e.amount).sum();

        let summed: f64 = sum_by_category(&entries).values().sum();

        assert!((summed - grand_total).abs() < 1e-9);
    }

    #[test]
    fn budget_status_uses_grand_total_as_denominator() {
        let entries = vec![
            entry("Food", 75.0, date!(2024 - 01 - 01)),
            entry("Transport", 25.0, date!(2024 - 01 - 02)),
        ];

        let status = budget_status(&entries, &["Food", "Transport"]);

        assert_eq!(status[0].category, "Food");
        assert_eq!(status[0].spent, 75.0);
        assert_eq!(status[0].total, 100.0);
        assert_eq!(status[0].percentage, 75.0);
        assert_eq!(status[1].percentage, 25.0);
    }

    #[test]
    fn budget_status_counts_unknown_categories_in_total() {
        let entries = vec![
            entry("Food", 50.0, date!(2024 - 01 - 01)),
            entry("Gadgets", 50.0, date!(2024 - 01 - 02)),
        ];

        let status = budget_status(&entries, &["Food"]);

        assert_eq!(status.len(), 1);
        assert_eq!(status[0].total, 100.0);
        assert_eq!(status[0].percentage, 50.0);
    }

    #[test]
    fn budget_status_over_no_records_yields_all_zeroes() {
        let known_categories = ["Food", "Transport", "Entertainment", "Bills", "Shopping"];

        let status = budget_status::<Entry>(&[], &known_categories);

        assert_eq!(status.len(), 5);
        for (row, &category) in status.iter().zip(known_categories.iter()) {
            assert_eq!(row.category, category);
            assert_eq!(row.spent, 0.0);
            assert_eq!(row.total, 0.0);
            assert_eq!(row.percentage, 0.0);
        }
    }

    #[test]
    fn budget_status_percentages_stay_in_bounds() {
        let entries = vec![
            entry("Food", 0.1, date!(2024 - 01 - 01)),
            entry("Transport", 999.9, date!(2024 - 01 - 02)),
            entry("Bills", 33.33, date!(2024 - 01 - 03)),
        ];

        let status = budget_status(&entries, &["Food", "Transport", "Bills", "Shopping"]);

        for row in status {
            assert!(row.percentage >= 0.0, "{} < 0%", row.percentage);
            assert!(row.percentage <= 100.0, "{} > 100%", row.percentage);
        }
    }

    #[test]
    fn budget_status_rounds_percentage_to_two_decimals() {
        let entries = vec![
            entry("Food", 1.0, date!(2024 - 01 - 01)),
            entry("Transport", 2.0, date!(2024 - 01 - 02)),
        ];

        let status = budget_status(&entries, &["Food"]);

        assert_eq!(status[0].percentage, 33.33);
    }

    #[test]
    fn top_categories_sorts_descending_and_truncates() {
        let top = top_categories(&sample_entries(), 1);

        assert_eq!(
            top,
            vec![CategoryTotal {
                category: "Food".to_owned(),
                total: 150.0
            }]
        );
    }

    #[test]
    fn top_categories_breaks_ties_by_first_seen_order() {
        let entries = vec![
            entry("Zoo", 10.0, date!(2024 - 01 - 01)),
            entry("Arcade", 10.0, date!(2024 - 01 - 02)),
        ];

        let top = top_categories(&entries, 2);

        assert_eq!(top[0].category, "Zoo");
        assert_eq!(top[1].category, "Arcade");
    }

    #[test]
    fn top_categories_is_deterministic() {
        let entries = vec![
            entry("Food", 10.0, date!(2024 - 01 - 01)),
            entry("Transport", 10.0, date!(2024 - 01 - 02)),
            entry("Bills", 10.0, date!(2024 - 01 - 03)),
            entry("Food", 5.0, date!(2024 - 01 - 04)),
        ];

        let first = top_categories(&entries, 3);
        let second = top_categories(&entries, 3);

        assert_eq!(first, second);
    }

    #[test]
    fn windowed_daily_sums_zero_fills_empty_window() {
        let start = date!(2024 - 01 - 01);
        let end = date!(2024 - 01 - 07);

        let totals = windowed_daily_sums::<Entry>(&[], start, end);

        assert_eq!(totals.len(), 7);
        for (offset, daily) in totals.iter().enumerate() {
            assert_eq!(daily.date, start + time::Duration::days(offset as i64));
            assert_eq!(daily.total, 0.0);
        }
    }

    #[test]
    fn windowed_daily_sums_sums_same_day_and_excludes_outside() {
        let entries = vec![
            entry("Food", 10.0, date!(2024 - 01 - 02)),
            entry("Transport", 5.0, date!(2024 - 01 - 02)),
            entry("Bills", 99.0, date!(2023 - 12 - 31)),
            entry("Bills", 99.0, date!(2024 - 01 - 04)),
        ];

        let totals = windowed_daily_sums(&entries, date!(2024 - 01 - 01), date!(2024 - 01 - 03));

        assert_eq!(
            totals,
            vec![
                DailyTotal {
                    date: date!(2024 - 01 - 01),
                    total: 0.0
                },
                DailyTotal {
                    date: date!(2024 - 01 - 02),
                    total: 15.0
                },
                DailyTotal {
                    date: date!(2024 - 01 - 03),
                    total: 0.0
                },
            ]
        );
    }

    #[test]
    fn windowed_daily_sums_empty_for_inverted_window() {
        let totals = windowed_daily_sums::<Entry>(&[], date!(2024 - 01 - 07), date!(2024 - 01 - 01));

        assert!(totals.is_empty());
    }

    #[test]
    fn monthly_total_restricts_to_month_and_year() {
        let entries = vec![
            entry("Food", 10.0, date!(2024 - 01 - 15)),
            entry("Food", 20.0, date!(2024 - 01 - 31)),
            entry("Food", 40.0, date!(2024 - 02 - 01)),
            entry("Food", 80.0, date!(2023 - 01 - 15)),
        ];

        let total = monthly_total(&entries, time::Month::January, 2024);

        assert_eq!(total, 30.0);
    }

    #[test]
    fn recent_n_sorts_descending_and_truncates() {
        let entries = vec![
            entry("Food", 1.0, date!(2024 - 01 - 01)),
            entry("Food", 2.0, date!(2024 - 01 - 03)),
            entry("Food", 3.0, date!(2024 - 01 - 02)),
        ];

        let recent = recent_n(entries, 2, |e| e.date);

        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].date, date!(2024 - 01 - 03));
        assert_eq!(recent[1].date, date!(2024 - 01 - 02));
    }

    #[test]
    fn recent_n_keeps_input_order_for_equal_keys() {
        let entries = vec![
            entry("First", 1.0, date!(2024 - 01 - 01)),
            entry("Second", 2.0, date!(2024 - 01 - 01)),
        ];

        let recent = recent_n(entries, 2, |e| e.date);

        assert_eq!(recent[0].category, "First");
        assert_eq!(recent[1].category, "Second");
    }
}
