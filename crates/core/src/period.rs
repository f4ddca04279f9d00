use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Relation of a date to a statement period. Boundaries are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DateStatus {
    Before,
    Within,
    After,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PeriodError {
    #[error("inverted statement period: {start} is after {end}")]
    InvertedRange { start: NaiveDate, end: NaiveDate },
}

/// The inclusive `[start, end]` date range a statement covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementPeriod {
    start: NaiveDate,
    end: NaiveDate,
}

impl StatementPeriod {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, PeriodError> {
        if start > end {
            return Err(PeriodError::InvertedRange { start, end });
        }
        Ok(StatementPeriod { start, end })
    }

    pub fn start(self) -> NaiveDate {
        self.start
    }

    pub fn end(self) -> NaiveDate {
        self.end
    }

    pub fn classify(self, date: NaiveDate) -> DateStatus {
        if date < self.start {
            DateStatus::Before
        } else if date > self.end {
            DateStatus::After
        } else {
            DateStatus::Within
        }
    }

    pub fn contains(self, date: NaiveDate) -> bool {
        self.classify(date) == DateStatus::Within
    }

    /// Clamp a date onto the period: out-of-range dates snap to the nearest
    /// boundary, in-range dates pass through unchanged.
    pub fn clamp(self, date: NaiveDate) -> NaiveDate {
        match self.classify(date) {
            DateStatus::Before => self.start,
            DateStatus::After => self.end,
            DateStatus::Within => date,
        }
    }
}

impl fmt::Display for StatementPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}
