use std::sync::LazyLock;

use chrono::{Duration, NaiveDate};
use regex::Regex;

use crate::error::{Error, Result};

static RE_FILTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\s+([A-Za-z]+)$").unwrap());

/// Unit of a date-window filter. Conversion rates are fixed, not
/// calendar-aware: weeks are 7 days, months 30, years 365.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowUnit {
    Weeks,
    Months,
    Years,
}

impl WindowUnit {
    /// Case-insensitive unit lookup. Anything unrecognized resolves at the
    /// weeks rate (a quirk of the filter grammar, locked by test).
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "months" => WindowUnit::Months,
            "years" => WindowUnit::Years,
            _ => WindowUnit::Weeks,
        }
    }

    pub fn days_per_unit(&self) -> f64 {
        match self {
            WindowUnit::Weeks => 7.0,
            WindowUnit::Months => 30.0,
            WindowUnit::Years => 365.0,
        }
    }
}

/// A parsed `"<number> <unit>"` window filter, e.g. `"2 weeks"`.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub count: i64,
    pub unit: WindowUnit,
    label: String,
}

impl Filter {
    /// Parse a filter string. The number must be a non-negative integer;
    /// fractional window counts only arise internally when a window is split
    /// into sub-windows.
    pub fn parse(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let caps = RE_FILTER
            .captures(trimmed)
            .ok_or_else(|| Error::FilterParse(format!("expected \"<number> <unit>\", got {s:?}")))?;
        let count: i64 = caps[1]
            .parse()
            .map_err(|_| Error::FilterParse(format!("invalid window count in {s:?}")))?;
        Ok(Filter {
            count,
            unit: WindowUnit::parse(&caps[2]),
            label: trimmed.to_string(),
        })
    }

    /// The filter string as supplied by the caller, echoed in payloads.
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn cutoff_from(&self, today: NaiveDate) -> NaiveDate {
        cutoff_date(self.count as f64, self.unit, today)
    }
}

/// Resolve a window count into an absolute cutoff date: `today` minus the
/// window expressed in days. Fractional offsets truncate toward zero before
/// subtraction, so 0.5 weeks is 3.5 days and lands 3 days back.
pub fn cutoff_date(number: f64, unit: WindowUnit, today: NaiveDate) -> NaiveDate {
    let days = (number * unit.days_per_unit()).trunc() as i64;
    today - Duration::days(days)
}

/// Format a cutoff date the way the overview payload reports it,
/// e.g. `Friday 07/31`.
pub fn format_date_since(date: NaiveDate) -> String {
    date.format("%A %m/%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_basic_filters() {
        let f = Filter::parse("2 weeks").unwrap();
        assert_eq!(f.count, 2);
        assert_eq!(f.unit, WindowUnit::Weeks);
        assert_eq!(f.label(), "2 weeks");

        let f = Filter::parse("6 months").unwrap();
        assert_eq!(f.unit, WindowUnit::Months);

        let f = Filter::parse("1 years").unwrap();
        assert_eq!(f.unit, WindowUnit::Years);
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(Filter::parse("3 WEEKS").unwrap().unit, WindowUnit::Weeks);
        assert_eq!(Filter::parse("3 Months").unwrap().unit, WindowUnit::Months);
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let f = Filter::parse("  2 weeks  ").unwrap();
        assert_eq!(f.count, 2);
        assert_eq!(f.label(), "2 weeks");
    }

    #[test]
    fn test_parse_rejects_malformed_input() {
        assert!(Filter::parse("weeks").is_err());
        assert!(Filter::parse("2weeks").is_err());
        assert!(Filter::parse("1.5 weeks").is_err());
        assert!(Filter::parse("two weeks").is_err());
        assert!(Filter::parse("").is_err());
    }

    #[test]
    fn test_unknown_unit_falls_back_to_weeks_rate() {
        // Quirk: "fortnights" is not a unit; it resolves as weeks.
        let f = Filter::parse("2 fortnights").unwrap();
        assert_eq!(f.unit, WindowUnit::Weeks);
        assert_eq!(
            f.cutoff_from(day(2025, 8, 15)),
            day(2025, 8, 1),
            "unknown unit counts at 7 days per unit"
        );
    }

    #[test]
    fn test_cutoff_uses_fixed_conversion_rates() {
        let today = day(2025, 8, 15);
        assert_eq!(cutoff_date(1.0, WindowUnit::Weeks, today), day(2025, 8, 8));
        assert_eq!(cutoff_date(2.0, WindowUnit::Weeks, today), day(2025, 8, 1));
        // Months are always 30 days, never calendar months.
        assert_eq!(cutoff_date(1.0, WindowUnit::Months, today), day(2025, 7, 16));
        // Years are always 365 days, leap years included.
        assert_eq!(cutoff_date(1.0, WindowUnit::Years, today), day(2024, 8, 15));
    }

    #[test]
    fn test_fractional_offsets_truncate_toward_zero() {
        let today = day(2025, 8, 15);
        // 0.5 weeks = 3.5 days, truncated to 3.
        assert_eq!(cutoff_date(0.5, WindowUnit::Weeks, today), day(2025, 8, 12));
        // 1.5 weeks = 10.5 days, truncated to 10.
        assert_eq!(cutoff_date(1.5, WindowUnit::Weeks, today), day(2025, 8, 5));
    }

    #[test]
    fn test_date_since_label_format() {
        assert_eq!(format_date_since(day(2020, 7, 31)), "Friday 07/31");
        assert_eq!(format_date_since(day(2025, 1, 1)), "Wednesday 01/01");
    }
}
