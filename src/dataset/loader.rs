use std::collections::HashMap;
use std::io::Read;

use csv::StringRecord;

use super::dates::parse_launch_date;
use super::DatasetError;
use crate::models::{MissionRecord, MissionStatus};

/// A column the loader needs, with the header spellings it accepts.
struct Column {
    name: &'static str,
    aliases: &'static [&'static str],
}

const COMPANY: Column = Column {
    name: "Company",
    aliases: &["company", "companyname"],
};
const DATE: Column = Column {
    name: "Date",
    aliases: &["date", "datum"],
};
const MISSION: Column = Column {
    name: "Mission",
    aliases: &["mission", "detail"],
};
const ROCKET: Column = Column {
    name: "Rocket",
    aliases: &["rocket"],
};
const STATUS: Column = Column {
    name: "MissionStatus",
    aliases: &["missionstatus", "statusmission"],
};

struct ColumnIndex {
    company: usize,
    date: usize,
    mission: usize,
    rocket: usize,
    status: usize,
}

impl ColumnIndex {
    fn resolve(headers: &StringRecord) -> Result<Self, DatasetError> {
        let map: HashMap<String, usize> = headers
            .iter()
            .enumerate()
            .map(|(idx, name)| (normalize_header(name), idx))
            .collect();

        let find = |column: &Column| {
            column
                .aliases
                .iter()
                .find_map(|alias| map.get(*alias).copied())
                .ok_or(DatasetError::MissingColumn(column.name))
        };

        Ok(Self {
            company: find(&COMPANY)?,
            date: find(&DATE)?,
            mission: find(&MISSION)?,
            rocket: find(&ROCKET)?,
            status: find(&STATUS)?,
        })
    }
}

/// Strip a UTF-8 BOM, case and word separators, so `Mission Status`,
/// `mission_status` and `MissionStatus` all resolve to the same column.
fn normalize_header(name: &str) -> String {
    name.trim()
        .trim_start_matches('\u{feff}')
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Read every row of a delimited source into mission records.
///
/// The first unparseable date or empty company aborts the whole read.
pub(super) fn read_records<R: Read>(reader: R) -> Result<Vec<MissionRecord>, DatasetError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let columns = ColumnIndex::resolve(reader.headers()?)?;

    let mut records = Vec::new();
    for (idx, row) in reader.records().enumerate() {
        let row = row?;
        // idx + 2: one for the header row, one for 1-based lines
        let line = row
            .position()
            .map(|p| p.line())
            .unwrap_or(idx as u64 + 2);
        records.push(parse_row(&row, &columns, line)?);
    }

    Ok(records)
}

fn parse_row(
    row: &StringRecord,
    columns: &ColumnIndex,
    line: u64,
) -> Result<MissionRecord, DatasetError> {
    let cell = |idx: usize| row.get(idx).unwrap_or("");

    let company = cell(columns.company);
    if company.is_empty() {
        return Err(DatasetError::MissingValue {
            line,
            column: COMPANY.name,
        });
    }

    let raw_date = cell(columns.date);
    let date = parse_launch_date(raw_date).ok_or_else(|| DatasetError::InvalidDate {
        line,
        value: raw_date.to_string(),
    })?;

    Ok(MissionRecord {
        company: company.to_string(),
        date,
        mission: cell(columns.mission).to_string(),
        rocket: cell(columns.rocket).to_string(),
        mission_status: MissionStatus::from_raw(cell(columns.status)),
    })
}
