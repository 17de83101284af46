//! Date policy: strict input parsing, due-date arithmetic, and the near-due
//! warning and reminder rules.
//!
//! All arithmetic is calendar-day based on `NaiveDate`, no timezone handling
//! beyond "start of day".

use chrono::{Days, NaiveDate};

use crate::error::{AppError, Result};
use crate::store::LoanRecord;

/// Format clients use for loan dates.
pub const INPUT_FORMAT: &str = "%d/%m/%Y";

/// Strictly parse a `DD/MM/YYYY` date. Format mismatches and impossible
/// calendar dates (31/02) are both rejected.
pub fn parse_input(text: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), INPUT_FORMAT).map_err(|_| AppError::InvalidDate)
}

/// Pure calendar arithmetic, no timezone shift.
pub fn add_days(date: NaiveDate, n: u64) -> NaiveDate {
    date + Days::new(n)
}

/// Signed whole-day difference `date - today`. Negative means `date` has
/// already passed.
pub fn days_until(date: NaiveDate, today: NaiveDate) -> i64 {
    (date - today).num_days()
}

/// Warning strings for every loan within `window_days` of its due date,
/// already-overdue loans included. Evaluated fresh on each listing.
pub fn near_due_warnings(records: &[LoanRecord], today: NaiveDate, window_days: i64) -> Vec<String> {
    records
        .iter()
        .filter(|r| days_until(r.due_date, today) <= window_days)
        .map(|r| {
            format!(
                "El libro \"{}\" con fecha de vencimiento {} está cerca de su vencimiento.",
                r.name, r.due_date
            )
        })
        .collect()
}

/// A reminder fires exactly when today is `loan_days` after the loan date.
/// Single-day window: if a sweep misses that day, the reminder is never sent.
pub fn due_for_reminder(record: &LoanRecord, today: NaiveDate, loan_days: u64) -> bool {
    days_until(add_days(record.loan_date, loan_days), today) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(loan: NaiveDate, due: NaiveDate) -> LoanRecord {
        LoanRecord {
            name: "Dune".to_string(),
            loan_date: loan,
            due_date: due,
            email: "a@x.com".to_string(),
        }
    }

    #[test]
    fn parses_day_month_year() {
        assert_eq!(parse_input("15/03/2024").unwrap(), date(2024, 3, 15));
    }

    #[test]
    fn rejects_wrong_format() {
        assert!(matches!(parse_input("2024-03-15"), Err(AppError::InvalidDate)));
        assert!(matches!(parse_input(""), Err(AppError::InvalidDate)));
        assert!(matches!(parse_input("tomorrow"), Err(AppError::InvalidDate)));
    }

    #[test]
    fn rejects_impossible_dates() {
        assert!(matches!(parse_input("31/02/2024"), Err(AppError::InvalidDate)));
        assert!(matches!(parse_input("29/02/2023"), Err(AppError::InvalidDate)));
    }

    #[test]
    fn leap_day_is_valid() {
        assert_eq!(parse_input("29/02/2024").unwrap(), date(2024, 2, 29));
    }

    #[test]
    fn add_days_crosses_month_boundaries() {
        assert_eq!(add_days(date(2024, 1, 25), 10), date(2024, 2, 4));
    }

    #[test]
    fn days_until_is_signed() {
        assert_eq!(days_until(date(2024, 1, 11), date(2024, 1, 8)), 3);
        assert_eq!(days_until(date(2024, 1, 11), date(2024, 1, 14)), -3);
    }

    #[test]
    fn warns_inside_window_and_for_overdue() {
        let today = date(2024, 1, 10);
        let records = vec![
            record(date(2024, 1, 1), date(2024, 1, 11)),  // due in 1 day
            record(date(2023, 12, 20), date(2023, 12, 30)), // long overdue
        ];

        let warnings = near_due_warnings(&records, today, 3);
        assert_eq!(warnings.len(), 2);
        assert_eq!(
            warnings[0],
            "El libro \"Dune\" con fecha de vencimiento 2024-01-11 está cerca de su vencimiento."
        );
    }

    #[test]
    fn warning_window_boundary_is_inclusive() {
        let records = vec![record(date(2024, 1, 1), date(2024, 1, 11))];

        assert_eq!(near_due_warnings(&records, date(2024, 1, 8), 3).len(), 1);
        assert!(near_due_warnings(&records, date(2024, 1, 7), 3).is_empty());
    }

    #[test]
    fn reminder_fires_only_on_the_exact_day() {
        let r = record(date(2024, 1, 1), date(2024, 1, 11));

        assert!(due_for_reminder(&r, date(2024, 1, 11), 10));
        assert!(!due_for_reminder(&r, date(2024, 1, 10), 10));
        assert!(!due_for_reminder(&r, date(2024, 1, 12), 10));
    }
}
