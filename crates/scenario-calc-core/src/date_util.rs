//! Calendar-month arithmetic for the monthly orchestrator.

use chrono::{Datelike, NaiveDate};

/// Adds `months` calendar months to `date`, clamping the day-of-month to the
/// last valid day of the resulting month (e.g. Jan 31 + 1 month = Feb 28/29).
pub fn add_months(date: NaiveDate, months: u32) -> NaiveDate {
    let total = date.year() as i64 * 12 + (date.month() as i64 - 1) + months as i64;
    let year = (total.div_euclid(12)) as i32;
    let month = (total.rem_euclid(12)) as u32 + 1;
    let day = date.day().min(days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day).expect("valid calendar date")
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    let first_of_next = NaiveDate::from_ymd_opt(next_year, next_month, 1).expect("valid date");
    let first_of_this = NaiveDate::from_ymd_opt(year, month, 1).expect("valid date");
    (first_of_next - first_of_this).num_days() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn adds_whole_years() {
        let d = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(add_months(d, 12), NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
    }

    #[test]
    fn clamps_day_on_shorter_month() {
        let d = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        assert_eq!(add_months(d, 1), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    }

    #[test]
    fn clamps_day_on_non_leap_february() {
        let d = NaiveDate::from_ymd_opt(2023, 1, 31).unwrap();
        assert_eq!(add_months(d, 1), NaiveDate::from_ymd_opt(2023, 2, 28).unwrap());
    }

    #[test]
    fn zero_months_is_identity() {
        let d = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        assert_eq!(add_months(d, 0), d);
    }

    #[test]
    fn rolls_over_year_boundary_mid_year() {
        let d = NaiveDate::from_ymd_opt(2024, 11, 30).unwrap();
        assert_eq!(add_months(d, 3), NaiveDate::from_ymd_opt(2025, 2, 28).unwrap());
    }
}
