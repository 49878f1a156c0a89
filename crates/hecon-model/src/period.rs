//! Calendar period keys used for time-based grouping and forecasting.

use std::fmt;

use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize, Serializer};

/// Granularity at which timestamps are bucketed into periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Day,
    #[default]
    Month,
    Quarter,
    Year,
}

impl Granularity {
    pub fn as_str(self) -> &'static str {
        match self {
            Granularity::Day => "day",
            Granularity::Month => "month",
            Granularity::Quarter => "quarter",
            Granularity::Year => "year",
        }
    }
}

/// A calendar period at a given granularity.
///
/// Periods of the same granularity order chronologically. Mixing granularities
/// in one series is not meaningful and is never produced by this workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Period {
    Day(NaiveDate),
    Month { year: i32, month: u32 },
    Quarter { year: i32, quarter: u32 },
    Year(i32),
}

impl Period {
    /// Bucket a calendar date into the period containing it.
    pub fn from_date(date: NaiveDate, granularity: Granularity) -> Self {
        match granularity {
            Granularity::Day => Period::Day(date),
            Granularity::Month => Period::Month {
                year: date.year(),
                month: date.month(),
            },
            Granularity::Quarter => Period::Quarter {
                year: date.year(),
                quarter: (date.month() - 1) / 3 + 1,
            },
            Granularity::Year => Period::Year(date.year()),
        }
    }

    pub fn granularity(&self) -> Granularity {
        match self {
            Period::Day(_) => Granularity::Day,
            Period::Month { .. } => Granularity::Month,
            Period::Quarter { .. } => Granularity::Quarter,
            Period::Year(_) => Granularity::Year,
        }
    }

    /// The period immediately following this one.
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Period::Day(date) => Period::Day(date.checked_add_days(Days::new(1)).unwrap_or(date)),
            Period::Month { year, month } if month >= 12 => Period::Month {
                year: year + 1,
                month: 1,
            },
            Period::Month { year, month } => Period::Month {
                year,
                month: month + 1,
            },
            Period::Quarter { year, quarter } if quarter >= 4 => Period::Quarter {
                year: year + 1,
                quarter: 1,
            },
            Period::Quarter { year, quarter } => Period::Quarter {
                year,
                quarter: quarter + 1,
            },
            Period::Year(year) => Period::Year(year + 1),
        }
    }

    /// Calendar month (1-12) when the period resolves to a single month.
    pub fn month(&self) -> Option<u32> {
        match self {
            Period::Day(date) => Some(date.month()),
            Period::Month { month, .. } => Some(*month),
            Period::Quarter { .. } | Period::Year(_) => None,
        }
    }

    /// Day of week for day periods.
    pub fn weekday(&self) -> Option<Weekday> {
        match self {
            Period::Day(date) => Some(date.weekday()),
            _ => None,
        }
    }

    /// Stable text label: `2025-03-14`, `2025-03`, `2025-T1` or `2025`.
    pub fn label(&self) -> String {
        match self {
            Period::Day(date) => date.format("%Y-%m-%d").to_string(),
            Period::Month { year, month } => format!("{year:04}-{month:02}"),
            Period::Quarter { year, quarter } => format!("{year:04}-T{quarter}"),
            Period::Year(year) => format!("{year:04}"),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl Serialize for Period {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn buckets_dates_by_granularity() {
        let d = date(2025, 8, 14);
        assert_eq!(Period::from_date(d, Granularity::Month).label(), "2025-08");
        assert_eq!(Period::from_date(d, Granularity::Quarter).label(), "2025-T3");
        assert_eq!(Period::from_date(d, Granularity::Year).label(), "2025");
        assert_eq!(Period::from_date(d, Granularity::Day).label(), "2025-08-14");
    }

    #[test]
    fn next_rolls_over_year_boundaries() {
        let december = Period::Month {
            year: 2024,
            month: 12,
        };
        assert_eq!(december.next().label(), "2025-01");
        let q4 = Period::Quarter {
            year: 2024,
            quarter: 4,
        };
        assert_eq!(q4.next().label(), "2025-T1");
        assert_eq!(Period::Day(date(2024, 2, 28)).next().label(), "2024-02-29");
    }

    #[test]
    fn calendar_position() {
        let day = Period::Day(date(2025, 5, 3));
        assert_eq!(day.weekday(), Some(Weekday::Sat));
        assert_eq!(day.month(), Some(5));
        assert_eq!(Period::Year(2025).month(), None);
    }

    #[test]
    fn serializes_as_label() {
        let json = serde_json::to_string(&Period::Month {
            year: 2025,
            month: 1,
        })
        .unwrap();
        assert_eq!(json, "\"2025-01\"");
    }
}
