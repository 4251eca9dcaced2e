use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A company paired with its mission count, as returned by rankings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyCount {
    pub company: String,
    pub missions: usize,
}

impl CompanyCount {
    pub fn new(company: impl Into<String>, missions: usize) -> Self {
        Self {
            company: company.into(),
            missions,
        }
    }
}

/// Mission totals per recognized status.
///
/// Serialized with the display labels used by the dashboard, so the JSON
/// object reads `{"Successful": .., "Failed": .., ...}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    #[serde(rename = "Successful")]
    pub successful: usize,
    #[serde(rename = "Failed")]
    pub failed: usize,
    #[serde(rename = "Partial Failure")]
    pub partial_failure: usize,
    #[serde(rename = "Prelaunch Failure")]
    pub prelaunch_failure: usize,
}

impl StatusCounts {
    pub const LABELS: [&'static str; 4] =
        ["Successful", "Failed", "Partial Failure", "Prelaunch Failure"];

    /// Label/count pairs in display order.
    pub fn entries(&self) -> [(&'static str, usize); 4] {
        [
            (Self::LABELS[0], self.successful),
            (Self::LABELS[1], self.failed),
            (Self::LABELS[2], self.partial_failure),
            (Self::LABELS[3], self.prelaunch_failure),
        ]
    }

    pub fn total(&self) -> usize {
        self.successful + self.failed + self.partial_failure + self.prelaunch_failure
    }
}

/// Headline numbers for a single company.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanySummary {
    pub company: String,
    pub missions: usize,
    /// Fraction in `[0, 1]`, rounded to two decimals. `0.0` when `missions` is zero.
    pub success_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RocketUsage {
    pub rocket: String,
    pub missions: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearCount {
    pub year: i32,
    pub missions: usize,
}

/// Earliest and latest launch year, inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearSpan {
    pub first: i32,
    pub last: i32,
}

/// Earliest and latest launch date, inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateSpan {
    pub first: NaiveDateTime,
    pub last: NaiveDateTime,
}
