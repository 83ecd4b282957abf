//! Date-key helpers and view ranges.
//!
//! The canonical date key is always `YYYY-MM-DD`, locale-independent.
//! Display formatting (`DD.MM.YYYY`) is layered on top of the key, never
//! part of the index.

use chrono::{Datelike, Duration, NaiveDate};

/// Month headings for the Month view, January first.
pub const MONTH_NAMES: [&str; 12] = [
    "ЯНВАРЬ",
    "ФЕВРАЛЬ",
    "МАРТ",
    "АПРЕЛЬ",
    "МАЙ",
    "ИЮНЬ",
    "ИЮЛЬ",
    "АВГУСТ",
    "СЕНТЯБРЬ",
    "ОКТЯБРЬ",
    "НОЯБРЬ",
    "ДЕКАБРЬ",
];

const WEEKDAY_LONG: [&str; 7] = [
    "Понедельник",
    "Вторник",
    "Среда",
    "Четверг",
    "Пятница",
    "Суббота",
    "Воскресенье",
];

const WEEKDAY_SHORT: [&str; 7] = ["ПН", "ВТ", "СР", "ЧТ", "ПТ", "СБ", "ВС"];

/// Full weekday label for column and day headings.
pub fn weekday_long(date: NaiveDate) -> &'static str {
    WEEKDAY_LONG[date.weekday().num_days_from_monday() as usize]
}

/// Two-letter weekday label for compact headers.
pub fn weekday_short(date: NaiveDate) -> &'static str {
    WEEKDAY_SHORT[date.weekday().num_days_from_monday() as usize]
}

/// Month heading for the month containing `date`.
pub fn month_name(date: NaiveDate) -> &'static str {
    MONTH_NAMES[date.month0() as usize]
}

/// Format a date as a canonical `YYYY-MM-DD` key.
pub fn format_date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Parse the first 10 characters of a string as a date key.
pub fn parse_date_key(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.get(0..10)?, "%Y-%m-%d").ok()
}

/// `YYYY-MM-DD` → `DD.MM.YYYY` for display; malformed input is returned
/// unchanged rather than erroring.
pub fn format_display_date(iso_date: &str) -> String {
    let mut parts = iso_date.splitn(3, '-');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(year), Some(month), Some(day))
            if !year.is_empty() && !month.is_empty() && !day.is_empty() =>
        {
            format!("{day}.{month}.{year}")
        }
        _ => iso_date.to_string(),
    }
}

/// Inclusive date range a calendar view asks the backend for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl ScheduleRange {
    /// Parse `from`/`to` arguments, both `YYYY-MM-DD`.
    pub fn from_args(from: &str, to: &str) -> Result<Self, String> {
        let from = parse_arg(from)?;
        let to = parse_arg(to)?;
        if to < from {
            return Err(format!(
                "Range end {} is before start {}",
                format_date_key(to),
                format_date_key(from)
            ));
        }
        Ok(ScheduleRange { from, to })
    }

    /// The Monday-based week containing `date` (the Week view's range).
    pub fn week_of(date: NaiveDate) -> Self {
        let from = date - Duration::days(date.weekday().num_days_from_monday() as i64);
        ScheduleRange {
            from,
            to: from + Duration::days(6),
        }
    }

    /// The calendar month containing `date` (the Month view's range).
    pub fn month_of(date: NaiveDate) -> Self {
        let from = date.with_day(1).expect("day 1 exists in every month");
        let next_month = if from.month() == 12 {
            NaiveDate::from_ymd_opt(from.year() + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(from.year(), from.month() + 1, 1)
        }
        .expect("first of month is always valid");

        ScheduleRange {
            from,
            to: next_month - Duration::days(1),
        }
    }

    /// A single day (the Day view's range).
    pub fn day_of(date: NaiveDate) -> Self {
        ScheduleRange {
            from: date,
            to: date,
        }
    }

    pub fn from_key(&self) -> String {
        format_date_key(self.from)
    }

    pub fn to_key(&self) -> String {
        format_date_key(self.to)
    }
}

fn parse_arg(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| format!("Invalid date format '{}'. Expected YYYY-MM-DD", value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_key_roundtrip() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 10).unwrap();
        assert_eq!(format_date_key(date), "2024-05-10");
        assert_eq!(parse_date_key("2024-05-10"), Some(date));
        assert_eq!(parse_date_key("2024-05-10T12:00:00Z"), Some(date));
        assert_eq!(parse_date_key("not a date"), None);
        assert_eq!(parse_date_key("2024-13-40"), None);
    }

    #[test]
    fn test_weekday_and_month_labels() {
        // 2024-05-10 is a Friday.
        let date = NaiveDate::from_ymd_opt(2024, 5, 10).unwrap();
        assert_eq!(weekday_long(date), "Пятница");
        assert_eq!(weekday_short(date), "ПТ");
        assert_eq!(month_name(date), "МАЙ");
    }

    #[test]
    fn test_display_date_formatting() {
        assert_eq!(format_display_date("2024-05-10"), "10.05.2024");
        assert_eq!(format_display_date("garbage"), "garbage");
        assert_eq!(format_display_date(""), "");
    }

    #[test]
    fn test_range_from_args_validates() {
        let range = ScheduleRange::from_args("2024-05-01", "2024-05-31").unwrap();
        assert_eq!(range.from_key(), "2024-05-01");
        assert_eq!(range.to_key(), "2024-05-31");

        assert!(ScheduleRange::from_args("01.05.2024", "2024-05-31").is_err());
        assert!(ScheduleRange::from_args("2024-05-31", "2024-05-01").is_err());
    }

    #[test]
    fn test_week_of_starts_on_monday() {
        // 2024-05-10 is a Friday.
        let range = ScheduleRange::week_of(NaiveDate::from_ymd_opt(2024, 5, 10).unwrap());
        assert_eq!(range.from_key(), "2024-05-06");
        assert_eq!(range.to_key(), "2024-05-12");
    }

    #[test]
    fn test_month_of_covers_whole_month() {
        let range = ScheduleRange::month_of(NaiveDate::from_ymd_opt(2024, 2, 15).unwrap());
        assert_eq!(range.from_key(), "2024-02-01");
        assert_eq!(range.to_key(), "2024-02-29");

        let december = ScheduleRange::month_of(NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());
        assert_eq!(december.from_key(), "2023-12-01");
        assert_eq!(december.to_key(), "2023-12-31");
    }
}
