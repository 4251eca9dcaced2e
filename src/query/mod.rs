//! Read-only aggregate queries over a loaded [`Dataset`].
//!
//! Every operation is a pure function of the dataset and its arguments. Soft
//! failures follow fixed policies instead of erroring:
//!
//! - an unknown company has 0 missions and a success rate of `0.0`
//! - an inverted year range averages to `0.0`
//! - an unparseable date bound yields no missions (see
//!   [`QueryEngine::try_missions_by_date_range`] for the strict form)
//!
//! Rankings break ties by the order in which entries first appear in the
//! source file.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Datelike;
use thiserror::Error;

use crate::dataset::{parse_launch_date, Dataset};
use crate::models::*;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("dataset is empty")]
    EmptyDataset,
    #[error("invalid date bound `{0}`")]
    InvalidDate(String),
}

#[derive(Debug, Clone)]
pub struct QueryEngine {
    dataset: Arc<Dataset>,
}

impl QueryEngine {
    pub fn new(dataset: Arc<Dataset>) -> Self {
        Self { dataset }
    }

    pub fn records(&self) -> &[MissionRecord] {
        self.dataset.records()
    }

    // ============================================================
    // Companies
    // ============================================================

    /// The `n` companies with the most missions, highest first.
    pub fn top_companies_by_mission_count(&self, n: usize) -> Vec<CompanyCount> {
        let mut ranked: Vec<CompanyCount> = self
            .dataset
            .company_frequency()
            .iter()
            .map(|(company, missions)| CompanyCount::new(company, missions))
            .collect();

        // Stable sort keeps first-seen order among equal counts
        ranked.sort_by(|a, b| b.missions.cmp(&a.missions));
        ranked.truncate(n);
        ranked
    }

    pub fn mission_count_by_company(&self, company: &str) -> usize {
        self.dataset.company_frequency().get(company)
    }

    /// Share of a company's missions with status `Success`, rounded to two decimals.
    ///
    /// Returns `0.0` for a company with no missions. That reads as "no data",
    /// not as "every launch failed".
    pub fn success_rate(&self, company: &str) -> f64 {
        let (total, successes) = self
            .records()
            .iter()
            .filter(|r| r.company == company)
            .fold((0usize, 0usize), |(total, successes), r| {
                let hit = usize::from(r.mission_status == MissionStatus::Success);
                (total + 1, successes + hit)
            });

        if total == 0 {
            return 0.0;
        }
        round2(successes as f64 / total as f64)
    }

    /// Distinct company names, alphabetically.
    pub fn companies(&self) -> Vec<String> {
        let mut companies: Vec<String> = self
            .dataset
            .company_frequency()
            .iter()
            .map(|(company, _)| company.to_string())
            .collect();
        companies.sort();
        companies
    }

    pub fn company_summary(&self, company: &str) -> CompanySummary {
        CompanySummary {
            company: company.to_string(),
            missions: self.mission_count_by_company(company),
            success_rate: self.success_rate(company),
        }
    }

    // ============================================================
    // Dates and years
    // ============================================================

    /// Mission names launched within `[start, end]`, in source order.
    ///
    /// Bounds accept full dates or datetimes only (the formats of
    /// [`parse_launch_date`]); partial dates such as `"1957"` or `"1957-10"`
    /// do not parse.
    ///
    /// Returns an empty list if either bound cannot be parsed, which callers
    /// cannot tell apart from a range with no launches.
    pub fn missions_by_date_range(&self, start: &str, end: &str) -> Vec<String> {
        self.try_missions_by_date_range(start, end)
            .unwrap_or_else(|e| {
                tracing::debug!("Ignoring date range query: {}", e);
                Vec::new()
            })
    }

    /// Like [`missions_by_date_range`](Self::missions_by_date_range) but
    /// reports which bound failed to parse.
    pub fn try_missions_by_date_range(
        &self,
        start: &str,
        end: &str,
    ) -> Result<Vec<String>, QueryError> {
        let parse = |raw: &str| {
            parse_launch_date(raw).ok_or_else(|| QueryError::InvalidDate(raw.to_string()))
        };
        let start = parse(start)?;
        let end = parse(end)?;

        Ok(self
            .records()
            .iter()
            .filter(|r| r.date >= start && r.date <= end)
            .map(|r| r.mission.clone())
            .collect())
    }

    pub fn missions_by_year(&self, year: i32) -> usize {
        self.records().iter().filter(|r| r.year() == year).count()
    }

    /// Missions per calendar year over `[start_year, end_year]`, rounded to two decimals.
    ///
    /// Years without launches still count toward the divisor. An inverted
    /// range returns `0.0`.
    pub fn average_missions_per_year(&self, start_year: i32, end_year: i32) -> f64 {
        if start_year > end_year {
            return 0.0;
        }

        let missions = self
            .records()
            .iter()
            .filter(|r| (start_year..=end_year).contains(&r.year()))
            .count();
        let span = i64::from(end_year) - i64::from(start_year) + 1;

        round2(missions as f64 / span as f64)
    }

    /// One entry per year from the first launch year to the last, including
    /// years without launches.
    pub fn missions_per_year(&self) -> Vec<YearCount> {
        let Some(span) = self.year_span() else {
            return Vec::new();
        };

        let mut counts: HashMap<i32, usize> = HashMap::new();
        for record in self.records() {
            *counts.entry(record.year()).or_default() += 1;
        }

        (span.first..=span.last)
            .map(|year| YearCount {
                year,
                missions: counts.get(&year).copied().unwrap_or(0),
            })
            .collect()
    }

    pub fn year_span(&self) -> Option<YearSpan> {
        self.date_span().map(|span| YearSpan {
            first: span.first.year(),
            last: span.last.year(),
        })
    }

    pub fn date_span(&self) -> Option<DateSpan> {
        let mut dates = self.records().iter().map(|r| r.date);
        let first = dates.next()?;
        let (first, last) = dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d)));
        Some(DateSpan { first, last })
    }

    // ============================================================
    // Statuses and rockets
    // ============================================================

    /// Missions per recognized status. Unrecognized statuses are not counted.
    pub fn mission_status_count(&self) -> StatusCounts {
        let mut counts = StatusCounts::default();
        for record in self.records() {
            match record.mission_status {
                MissionStatus::Success => counts.successful += 1,
                MissionStatus::Failure => counts.failed += 1,
                MissionStatus::PartialFailure => counts.partial_failure += 1,
                MissionStatus::PrelaunchFailure => counts.prelaunch_failure += 1,
                MissionStatus::Other(_) => {}
            }
        }
        counts
    }

    /// The rocket flown on the most missions.
    pub fn most_used_rocket(&self) -> Result<String, QueryError> {
        self.most_used_rocket_usage().map(|usage| usage.rocket)
    }

    pub fn most_used_rocket_usage(&self) -> Result<RocketUsage, QueryError> {
        let mut order: Vec<&str> = Vec::new();
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for record in self.records() {
            let count = counts.entry(record.rocket.as_str()).or_insert_with(|| {
                order.push(record.rocket.as_str());
                0
            });
            *count += 1;
        }

        // Strictly greater so the first rocket seen wins a tie
        let mut best: Option<(&str, usize)> = None;
        for rocket in order {
            let count = counts[rocket];
            if best.map_or(true, |(_, top)| count > top) {
                best = Some((rocket, count));
            }
        }

        best.map(|(rocket, missions)| RocketUsage {
            rocket: rocket.to_string(),
            missions,
        })
        .ok_or(QueryError::EmptyDataset)
    }

    pub fn rocket_usage(&self, rocket: &str) -> usize {
        self.records().iter().filter(|r| r.rocket == rocket).count()
    }
}

/// Round to two decimals from the exact binary value of `value`.
///
/// Goes through decimal formatting, which rounds the stored value with ties
/// to even: `1/40` (stored just above 0.025) gives `0.03` and `0.125` gives `0.12`.
pub fn round2(value: f64) -> f64 {
    format!("{:.2}", value).parse().unwrap_or(value)
}
