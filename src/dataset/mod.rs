mod dates;
mod loader;

pub use dates::parse_launch_date;

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use thiserror::Error;

use crate::models::MissionRecord;

/// Errors that abort a dataset load.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to open dataset {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed dataset: {0}")]
    Csv(#[from] csv::Error),
    #[error("dataset is missing required column `{0}`")]
    MissingColumn(&'static str),
    #[error("line {line}: `{column}` is empty")]
    MissingValue { line: u64, column: &'static str },
    #[error("line {line}: unparseable launch date `{value}`")]
    InvalidDate { line: u64, value: String },
    #[error("dataset has no file source to reload from")]
    NoSource,
}

/// Missions per company, computed once when a [`Dataset`] is built.
///
/// Companies are remembered in the order they first appear in the records,
/// which is the order rankings fall back to on equal counts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompanyFrequency {
    counts: HashMap<String, usize>,
    first_seen: Vec<String>,
}

impl CompanyFrequency {
    fn from_records(records: &[MissionRecord]) -> Self {
        let mut freq = Self::default();
        for record in records {
            match freq.counts.get_mut(&record.company) {
                Some(count) => *count += 1,
                None => {
                    freq.counts.insert(record.company.clone(), 1);
                    freq.first_seen.push(record.company.clone());
                }
            }
        }
        freq
    }

    /// Missions for `company`, or 0 if it never launched.
    pub fn get(&self, company: &str) -> usize {
        self.counts.get(company).copied().unwrap_or(0)
    }

    pub fn contains(&self, company: &str) -> bool {
        self.counts.contains_key(company)
    }

    /// `(company, count)` pairs in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.first_seen
            .iter()
            .map(|company| (company.as_str(), self.counts[company]))
    }

    /// Number of distinct companies.
    pub fn len(&self) -> usize {
        self.first_seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.first_seen.is_empty()
    }

    /// Sum of all counts. Always equals the record count of the owning dataset.
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }
}

/// The loaded mission table together with its derived aggregates.
///
/// Immutable once built. Share it as `Arc<Dataset>`; see [`DatasetHandle`]
/// for swapping in a freshly loaded one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    records: Vec<MissionRecord>,
    company_frequency: CompanyFrequency,
}

impl Dataset {
    pub fn from_records(records: Vec<MissionRecord>) -> Self {
        let company_frequency = CompanyFrequency::from_records(&records);
        Self {
            records,
            company_frequency,
        }
    }

    /// Parse a CSV source with a header row.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DatasetError> {
        loader::read_records(reader).map(Self::from_records)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let dataset = Self::from_reader(BufReader::new(file))?;
        tracing::info!(
            records = dataset.len(),
            companies = dataset.company_frequency.len(),
            "Loaded mission dataset from {}",
            path.display()
        );
        Ok(dataset)
    }

    /// Records in source order.
    pub fn records(&self) -> &[MissionRecord] {
        &self.records
    }

    pub fn company_frequency(&self) -> &CompanyFrequency {
        &self.company_frequency
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Process-wide holder of the current dataset.
///
/// Readers take a [`snapshot`](Self::snapshot) and query it without holding
/// the lock. [`reload`](Self::reload) parses the source completely before
/// taking the write lock, so a reader sees either the old table or the new
/// one and never a mix.
#[derive(Debug, Clone)]
pub struct DatasetHandle {
    current: Arc<RwLock<Arc<Dataset>>>,
    source: Option<PathBuf>,
}

impl DatasetHandle {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, DatasetError> {
        let path = path.into();
        let dataset = Dataset::load(&path)?;
        Ok(Self {
            current: Arc::new(RwLock::new(Arc::new(dataset))),
            source: Some(path),
        })
    }

    /// Wrap an already built dataset. Such a handle cannot be reloaded.
    pub fn from_dataset(dataset: Dataset) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(dataset))),
            source: None,
        }
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn snapshot(&self) -> Arc<Dataset> {
        // The guarded value is a plain Arc, so a poisoned lock still holds a
        // complete dataset.
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Re-read the source and publish the result.
    ///
    /// On error the previously published dataset stays in place.
    pub fn reload(&self) -> Result<Arc<Dataset>, DatasetError> {
        let path = self.source.as_ref().ok_or(DatasetError::NoSource)?;
        let fresh = Arc::new(Dataset::load(path)?);

        let mut current = self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *current = fresh.clone();
        Ok(fresh)
    }
}
