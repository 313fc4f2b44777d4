//! Processing periods: the `YYYY-MM` token that scopes one monthly batch.
//!
//! Every document, rank slot, and pipeline run belongs to exactly one period.
//! Re-running a period replaces everything stored under it.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PeriodError {
    #[error("malformed period {0:?}: expected YYYY-MM")]
    Malformed(String),

    #[error("month out of range: {0}")]
    MonthOutOfRange(u32),

    #[error("year out of range: {0}")]
    YearOutOfRange(i32),
}

/// A calendar month, rendered and parsed as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProcessingPeriod {
    year: i32,
    month: u32,
}

impl ProcessingPeriod {
    pub fn new(year: i32, month: u32) -> Result<Self, PeriodError> {
        if !(1..=9999).contains(&year) {
            return Err(PeriodError::YearOutOfRange(year));
        }
        if !(1..=12).contains(&month) {
            return Err(PeriodError::MonthOutOfRange(month));
        }
        Ok(Self { year, month })
    }

    /// The month containing today's local date.
    pub fn current() -> Self {
        let today = chrono::Local::now().date_naive();
        Self {
            year: today.year(),
            month: today.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Number of days in this month (leap years included).
    pub fn days_in_month(&self) -> u32 {
        // `new` bounds year and month, so every step here is in chrono's range.
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .and_then(|first| first.checked_add_months(Months::new(1)))
            .and_then(|next| next.pred_opt())
            .map_or(31, |last| last.day())
    }

    /// First and last day of the month as `YYYYMMDD` strings.
    ///
    /// This is the `efYd` range format of the law.go.kr search API.
    pub fn date_range(&self) -> (String, String) {
        (
            format!("{:04}{:02}01", self.year, self.month),
            format!("{:04}{:02}{:02}", self.year, self.month, self.days_in_month()),
        )
    }
}

impl fmt::Display for ProcessingPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for ProcessingPeriod {
    type Err = PeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let malformed = || PeriodError::Malformed(s.to_string());

        let (year, month) = s.split_once('-').ok_or_else(malformed)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(malformed());
        }
        let year: i32 = year.parse().map_err(|_| malformed())?;
        let month: u32 = month.parse().map_err(|_| malformed())?;
        Self::new(year, month)
    }
}

impl TryFrom<String> for ProcessingPeriod {
    type Error = PeriodError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ProcessingPeriod> for String {
    fn from(period: ProcessingPeriod) -> Self {
        period.to_string()
    }
}
