use chrono::{Datelike, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// One launch event from the mission dataset.
///
/// Records are produced by the dataset loader and never modified afterwards.
/// Columns of the source file that are not listed here are dropped at load time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissionRecord {
    /// The launching organization.
    pub company: String,
    /// Launch date. Date-only source values are midnight.
    pub date: NaiveDateTime,
    /// Mission or payload name. Not unique across the dataset.
    pub mission: String,
    pub rocket: String,
    pub mission_status: MissionStatus,
}

impl MissionRecord {
    pub fn year(&self) -> i32 {
        self.date.year()
    }
}

/// The outcome of a launch.
///
/// - `Success`: Payload reached its intended orbit
/// - `Failure`: Launch failed
/// - `PartialFailure`: Launch reached orbit but not the intended one
/// - `PrelaunchFailure`: Vehicle was lost before launch
/// - `Other`: Any other spelling found in the source, kept verbatim
///
/// Only the first four are recognized by status counting.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MissionStatus {
    Success,
    Failure,
    PartialFailure,
    PrelaunchFailure,
    Other(String),
}

impl MissionStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Success => "Success",
            Self::Failure => "Failure",
            Self::PartialFailure => "Partial Failure",
            Self::PrelaunchFailure => "Prelaunch Failure",
            Self::Other(raw) => raw,
        }
    }

    /// Parse a raw status cell. Matching is exact; anything else becomes `Other`.
    pub fn from_raw(s: &str) -> Self {
        match s {
            "Success" => Self::Success,
            "Failure" => Self::Failure,
            "Partial Failure" => Self::PartialFailure,
            "Prelaunch Failure" => Self::PrelaunchFailure,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl From<String> for MissionStatus {
    fn from(s: String) -> Self {
        match Self::from_raw(&s) {
            Self::Other(_) => Self::Other(s),
            status => status,
        }
    }
}

impl From<MissionStatus> for String {
    fn from(status: MissionStatus) -> Self {
        match status {
            MissionStatus::Other(raw) => raw,
            status => status.as_str().to_string(),
        }
    }
}
