//! ISO week model.
//!
//! The scheduling granularity of the planner is one ISO-8601 week.
//! A [`WeekKey`] is a validated `(iso_year, week)` pair, ordered
//! chronologically, serialized as `"2026-W10"`.
//!
//! # Year Rollover
//! ISO years have 52 or 53 weeks. `previous()` of week 1 is the last week
//! of the preceding ISO year, which is computed from December 28th
//! (always in the last ISO week of its year).

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, PlannerResult};

/// An ISO week: `(iso_year, week_number)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WeekKey {
    year: i32,
    week: u32,
}

/// Number of ISO weeks (52 or 53) in an ISO year.
pub fn weeks_in_year(year: i32) -> u32 {
    NaiveDate::from_ymd_opt(year, 12, 28)
        .map(|d| d.iso_week().week())
        .unwrap_or(52)
}

impl WeekKey {
    /// Creates a week key, rejecting week 0 and weeks past the ISO year end.
    pub fn new(year: i32, week: u32) -> PlannerResult<Self> {
        if week == 0 || week > weeks_in_year(year) {
            return Err(PlannerError::InvalidWeek(format!("{year}-W{week:02}")));
        }
        Ok(Self { year, week })
    }

    /// The ISO week containing a calendar date.
    pub fn from_date(date: NaiveDate) -> Self {
        let iso = date.iso_week();
        Self {
            year: iso.year(),
            week: iso.week(),
        }
    }

    /// ISO year.
    #[inline]
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Week number within the ISO year (1-based).
    #[inline]
    pub fn week(&self) -> u32 {
        self.week
    }

    /// Monday of this week.
    pub fn monday(&self) -> Option<NaiveDate> {
        NaiveDate::from_isoywd_opt(self.year, self.week, Weekday::Mon)
    }

    /// The immediately preceding ISO week.
    pub fn previous(&self) -> Self {
        if self.week > 1 {
            Self {
                year: self.year,
                week: self.week - 1,
            }
        } else {
            Self {
                year: self.year - 1,
                week: weeks_in_year(self.year - 1),
            }
        }
    }

    /// The immediately following ISO week.
    pub fn next(&self) -> Self {
        if self.week < weeks_in_year(self.year) {
            Self {
                year: self.year,
                week: self.week + 1,
            }
        } else {
            Self {
                year: self.year + 1,
                week: 1,
            }
        }
    }

    /// Iterator over up to `count` preceding weeks, most recent first.
    pub fn preceding(&self, count: u32) -> impl Iterator<Item = WeekKey> {
        let mut current = *self;
        (0..count).map(move |_| {
            current = current.previous();
            current
        })
    }
}

impl fmt::Display for WeekKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-W{:02}", self.year, self.week)
    }
}

impl FromStr for WeekKey {
    type Err = PlannerError;

    /// Parses `"2026-W10"` (the `W` may be lowercase).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || PlannerError::InvalidWeek(s.to_string());
        let (year, week) = s.trim().split_once('-').ok_or_else(invalid)?;
        let week = week
            .strip_prefix('W')
            .or_else(|| week.strip_prefix('w'))
            .ok_or_else(invalid)?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let week: u32 = week.parse().map_err(|_| invalid())?;
        WeekKey::new(year, week)
    }
}

impl TryFrom<String> for WeekKey {
    type Error = PlannerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<WeekKey> for String {
    fn from(week: WeekKey) -> Self {
        week.to_string()
    }
}
