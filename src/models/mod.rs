//! Domain models for Launch Ledger.
//!
//! # Core Concepts
//!
//! - [`MissionRecord`]: One launch event (company, date, mission, rocket, status).
//! - [`MissionStatus`]: Launch outcome. Four values are recognized by
//!   aggregation; anything else is carried through as [`MissionStatus::Other`].
//!
//! ## Query Results
//!
//! Plain values handed to the presentation layer: [`CompanyCount`],
//! [`StatusCounts`], [`CompanySummary`], [`RocketUsage`], [`YearCount`],
//! [`YearSpan`] and [`DateSpan`].

mod mission;
mod stats;

pub use mission::*;
pub use stats::*;
