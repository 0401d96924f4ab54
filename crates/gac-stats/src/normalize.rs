// Record normalization: schema negotiation, type coercion, and row
// eligibility filtering.
//
// A raw table is first resolved against the column set of its kind. Missing
// required columns fail the whole load with a `SchemaError`; missing optional
// columns are treated as all-blank. Each row is then coerced into a typed
// record, and rows whose required value fields do not survive coercion are
// dropped.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use tracing::{debug, info, warn};

use crate::table::RawTable;

// ---------------------------------------------------------------------------
// Column names (exporter CSV schema)
// ---------------------------------------------------------------------------

pub mod columns {
    pub const PLAYER_NAME: &str = "Player Name";
    pub const DATE: &str = "Date";

    pub const EXIT_VELOCITY: &str = "ExitVelocity";
    pub const LAUNCH_ANGLE: &str = "LaunchAngle";
    pub const EXIT_DIRECTION: &str = "ExitDirection";
    pub const DISTANCE: &str = "Distance";

    pub const PITCH_TYPE: &str = "Pitch Type";
    pub const IS_STRIKE: &str = "Is Strike";
    pub const VELOCITY: &str = "Velocity";
    pub const ZONE_SIDE: &str = "Strike Zone Side";
    pub const ZONE_HEIGHT: &str = "Strike Zone Height";
    pub const HORIZONTAL_BREAK: &str = "HB (trajectory)";
    pub const VERTICAL_BREAK: &str = "VB (trajectory)";
}

use columns::*;

const HITTING_REQUIRED: [&str; 6] = [
    PLAYER_NAME,
    DATE,
    EXIT_VELOCITY,
    LAUNCH_ANGLE,
    EXIT_DIRECTION,
    DISTANCE,
];

const PITCHING_REQUIRED: [&str; 7] = [
    PLAYER_NAME,
    DATE,
    PITCH_TYPE,
    IS_STRIKE,
    VELOCITY,
    ZONE_SIDE,
    ZONE_HEIGHT,
];

const PITCHING_OPTIONAL: [&str; 2] = [HORIZONTAL_BREAK, VERTICAL_BREAK];

/// Literal value of the strike column that marks a strike.
pub const STRIKE_MARKER: &str = "YES";

const NON_STRIKE_MARKER: &str = "NO";

// ---------------------------------------------------------------------------
// Dataset kind
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetKind {
    Hitting,
    Pitching,
}

impl DatasetKind {
    pub fn label(&self) -> &'static str {
        match self {
            DatasetKind::Hitting => "hitting",
            DatasetKind::Pitching => "pitching",
        }
    }

    /// Columns that must be present in the header.
    pub fn required_columns(&self) -> &'static [&'static str] {
        match self {
            DatasetKind::Hitting => &HITTING_REQUIRED,
            DatasetKind::Pitching => &PITCHING_REQUIRED,
        }
    }

    /// Columns synthesized as all-missing when absent from the header.
    pub fn optional_columns(&self) -> &'static [&'static str] {
        match self {
            DatasetKind::Hitting => &[],
            DatasetKind::Pitching => &PITCHING_OPTIONAL,
        }
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// A required column is absent from the table header. Fatal for the dataset.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} data is missing required column(s): {}", .missing.join(", "))]
pub struct SchemaError {
    pub kind: DatasetKind,
    pub missing: Vec<String>,
}

/// A required value failed coercion in one row. The row is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MissingValue {
    pub column: &'static str,
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// One batted-ball (or swing) event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HittingRecord {
    pub player_name: String,
    pub date: Option<NaiveDate>,
    pub exit_velocity: f64,
    pub launch_angle: f64,
    pub exit_direction: f64,
    pub distance: Option<f64>,
}

/// One pitch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PitchingRecord {
    pub player_name: String,
    pub date: Option<NaiveDate>,
    pub pitch_type: String,
    pub is_strike: bool,
    pub velocity: f64,
    pub zone_side: Option<f64>,
    pub zone_height: Option<f64>,
    pub horizontal_break: Option<f64>,
    pub vertical_break: Option<f64>,
}

/// Resolved column positions for a hitting table.
#[derive(Debug, Clone, Copy)]
pub struct HittingColumns {
    player_name: usize,
    date: usize,
    exit_velocity: usize,
    launch_angle: usize,
    exit_direction: usize,
    distance: usize,
}

/// Resolved column positions for a pitching table. Optional columns that are
/// absent resolve to `None` and read as missing in every row.
#[derive(Debug, Clone, Copy)]
pub struct PitchingColumns {
    player_name: usize,
    date: usize,
    pitch_type: usize,
    is_strike: usize,
    velocity: usize,
    zone_side: usize,
    zone_height: usize,
    horizontal_break: Option<usize>,
    vertical_break: Option<usize>,
}

/// A typed event record that can be built from, and written back to, a row of
/// the exporter schema.
pub trait EventRecord: Sized {
    const KIND: DatasetKind;
    type Columns;

    fn resolve_columns(table: &RawTable) -> Result<Self::Columns, SchemaError>;

    fn from_row(columns: &Self::Columns, row: &RowView<'_>) -> Result<Self, MissingValue>;

    /// Cells in the order of `header()`.
    fn to_row(&self) -> Vec<String>;

    fn player_name(&self) -> &str;

    fn header() -> Vec<String> {
        Self::KIND
            .required_columns()
            .iter()
            .chain(Self::KIND.optional_columns())
            .map(|c| c.to_string())
            .collect()
    }
}

impl EventRecord for HittingRecord {
    const KIND: DatasetKind = DatasetKind::Hitting;
    type Columns = HittingColumns;

    fn resolve_columns(table: &RawTable) -> Result<HittingColumns, SchemaError> {
        let [player_name, date, exit_velocity, launch_angle, exit_direction, distance] =
            require_columns(table, Self::KIND, HITTING_REQUIRED)?;
        Ok(HittingColumns {
            player_name,
            date,
            exit_velocity,
            launch_angle,
            exit_direction,
            distance,
        })
    }

    fn from_row(c: &HittingColumns, row: &RowView<'_>) -> Result<Self, MissingValue> {
        Ok(HittingRecord {
            player_name: row.text(c.player_name).unwrap_or_default().to_string(),
            date: row.date(c.date),
            exit_velocity: row.required_number(c.exit_velocity, EXIT_VELOCITY)?,
            launch_angle: row.required_number(c.launch_angle, LAUNCH_ANGLE)?,
            exit_direction: row.required_number(c.exit_direction, EXIT_DIRECTION)?,
            distance: row.number(c.distance),
        })
    }

    fn to_row(&self) -> Vec<String> {
        vec![
            self.player_name.clone(),
            format_date(self.date),
            self.exit_velocity.to_string(),
            self.launch_angle.to_string(),
            self.exit_direction.to_string(),
            format_number(self.distance),
        ]
    }

    fn player_name(&self) -> &str {
        &self.player_name
    }
}

impl EventRecord for PitchingRecord {
    const KIND: DatasetKind = DatasetKind::Pitching;
    type Columns = PitchingColumns;

    fn resolve_columns(table: &RawTable) -> Result<PitchingColumns, SchemaError> {
        let [player_name, date, pitch_type, is_strike, velocity, zone_side, zone_height] =
            require_columns(table, Self::KIND, PITCHING_REQUIRED)?;
        let horizontal_break = table.column_index(HORIZONTAL_BREAK);
        let vertical_break = table.column_index(VERTICAL_BREAK);
        if horizontal_break.is_none() || vertical_break.is_none() {
            debug!("pitching data lacks break columns; treating them as missing");
        }
        Ok(PitchingColumns {
            player_name,
            date,
            pitch_type,
            is_strike,
            velocity,
            zone_side,
            zone_height,
            horizontal_break,
            vertical_break,
        })
    }

    fn from_row(c: &PitchingColumns, row: &RowView<'_>) -> Result<Self, MissingValue> {
        let pitch_type = row.text(c.pitch_type).ok_or(MissingValue { column: PITCH_TYPE })?;
        let is_strike = row.strike(c.is_strike).ok_or(MissingValue { column: IS_STRIKE })?;
        Ok(PitchingRecord {
            player_name: row.text(c.player_name).unwrap_or_default().to_string(),
            date: row.date(c.date),
            pitch_type: pitch_type.to_string(),
            is_strike,
            velocity: row.required_number(c.velocity, VELOCITY)?,
            zone_side: row.number(c.zone_side),
            zone_height: row.number(c.zone_height),
            horizontal_break: c.horizontal_break.and_then(|i| row.number(i)),
            vertical_break: c.vertical_break.and_then(|i| row.number(i)),
        })
    }

    fn to_row(&self) -> Vec<String> {
        let strike = if self.is_strike {
            STRIKE_MARKER
        } else {
            NON_STRIKE_MARKER
        };
        vec![
            self.player_name.clone(),
            format_date(self.date),
            self.pitch_type.clone(),
            strike.to_string(),
            self.velocity.to_string(),
            format_number(self.zone_side),
            format_number(self.zone_height),
            format_number(self.horizontal_break),
            format_number(self.vertical_break),
        ]
    }

    fn player_name(&self) -> &str {
        &self.player_name
    }
}

// ---------------------------------------------------------------------------
// Schema negotiation
// ---------------------------------------------------------------------------

/// Resolve every named column, collecting all missing names before failing.
fn require_columns<const N: usize>(
    table: &RawTable,
    kind: DatasetKind,
    names: [&'static str; N],
) -> Result<[usize; N], SchemaError> {
    let mut found = [0usize; N];
    let mut missing = Vec::new();
    for (slot, name) in found.iter_mut().zip(names) {
        match table.column_index(name) {
            Some(index) => *slot = index,
            None => missing.push(name.to_string()),
        }
    }
    if !missing.is_empty() {
        return Err(SchemaError { kind, missing });
    }
    Ok(found)
}

// ---------------------------------------------------------------------------
// Cell coercion
// ---------------------------------------------------------------------------

/// Accepted date layouts. A trailing time of day is ignored.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%m/%d/%y", "%Y/%m/%d"];

/// Years below this are a 2-digit year misread by a 4-digit pattern.
const MIN_PLAUSIBLE_YEAR: i32 = 1900;

/// Borrowed view of one table row with coercion helpers.
pub struct RowView<'a> {
    table: &'a RawTable,
    index: usize,
}

impl<'a> RowView<'a> {
    pub fn new(table: &'a RawTable, index: usize) -> Self {
        RowView { table, index }
    }

    /// Trimmed cell text, or `None` when blank.
    pub fn text(&self, column: usize) -> Option<&'a str> {
        let value = self.table.cell(self.index, column)?.trim();
        (!value.is_empty()).then_some(value)
    }

    /// Finite number, or `None` when blank or unparseable.
    pub fn number(&self, column: usize) -> Option<f64> {
        parse_number(self.text(column)?)
    }

    pub fn required_number(&self, column: usize, name: &'static str) -> Result<f64, MissingValue> {
        self.number(column).ok_or(MissingValue { column: name })
    }

    pub fn date(&self, column: usize) -> Option<NaiveDate> {
        parse_date(self.text(column)?)
    }

    /// `Some(true)` for the strike marker, `Some(false)` for any other
    /// non-blank value.
    pub fn strike(&self, column: usize) -> Option<bool> {
        self.text(column).map(|v| v == STRIKE_MARKER)
    }
}

pub fn parse_number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let date_part = text.trim().split([' ', 'T']).next()?;
    DATE_FORMATS
        .iter()
        .filter_map(|fmt| NaiveDate::parse_from_str(date_part, fmt).ok())
        .find(|d| d.year() >= MIN_PLAUSIBLE_YEAR)
}

fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

fn format_number(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Dataset
// ---------------------------------------------------------------------------

/// Analysis-ready records of one kind from a single load.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset<R> {
    records: Vec<R>,
    dropped: usize,
}

pub type HittingDataset = Dataset<HittingRecord>;
pub type PitchingDataset = Dataset<PitchingRecord>;

impl<R: EventRecord> Dataset<R> {
    pub fn from_records(records: Vec<R>) -> Self {
        Dataset {
            records,
            dropped: 0,
        }
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Rows discarded during normalization.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Sorted, deduplicated, case-preserving player names. Blank names are
    /// left out.
    pub fn player_names(&self) -> Vec<String> {
        self.records
            .iter()
            .map(|r| r.player_name())
            .filter(|name| !name.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Records whose player name contains `query`, ignoring case. Blank names
    /// never match.
    pub fn matching<'a>(&'a self, query: &str) -> impl Iterator<Item = &'a R> + 'a {
        let needle = query.to_lowercase();
        self.records.iter().filter(move |r| {
            let name = r.player_name();
            !name.is_empty() && name.to_lowercase().contains(&needle)
        })
    }

    /// Records for exactly this player name.
    pub fn for_player<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a R> + 'a {
        self.records.iter().filter(move |r| r.player_name() == name)
    }

    /// The dataset written back out in the exporter schema.
    pub fn to_table(&self) -> RawTable {
        RawTable::new(R::header(), self.records.iter().map(R::to_row).collect())
    }
}

impl<'a, R> IntoIterator for &'a Dataset<R> {
    type Item = &'a R;
    type IntoIter = std::slice::Iter<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

// ---------------------------------------------------------------------------
// Normalization entry points
// ---------------------------------------------------------------------------

/// Normalize a raw table into typed records of kind `R`.
pub fn normalize<R: EventRecord>(table: &RawTable) -> Result<Dataset<R>, SchemaError> {
    let columns = R::resolve_columns(table)?;
    let mut records = Vec::with_capacity(table.len());
    let mut dropped = 0;

    for index in 0..table.len() {
        match R::from_row(&columns, &RowView::new(table, index)) {
            Ok(record) => records.push(record),
            Err(missing) => {
                dropped += 1;
                debug!(
                    "dropping {} row {}: missing or non-numeric {}",
                    R::KIND,
                    index + 1,
                    missing.column
                );
            }
        }
    }

    info!(
        "normalized {} data: {} rows kept, {} dropped",
        R::KIND,
        records.len(),
        dropped
    );
    if records.is_empty() {
        warn!("{} data is empty after cleaning", R::KIND);
    }

    Ok(Dataset { records, dropped })
}

pub fn normalize_hitting(table: &RawTable) -> Result<HittingDataset, SchemaError> {
    normalize(table)
}

pub fn normalize_pitching(table: &RawTable) -> Result<PitchingDataset, SchemaError> {
    normalize(table)
}

/// A normalized dataset of either kind.
#[derive(Debug, Clone, PartialEq)]
pub enum NormalizedDataset {
    Hitting(HittingDataset),
    Pitching(PitchingDataset),
}

impl NormalizedDataset {
    pub fn kind(&self) -> DatasetKind {
        match self {
            NormalizedDataset::Hitting(_) => DatasetKind::Hitting,
            NormalizedDataset::Pitching(_) => DatasetKind::Pitching,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            NormalizedDataset::Hitting(d) => d.len(),
            NormalizedDataset::Pitching(d) => d.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn player_names(&self) -> Vec<String> {
        match self {
            NormalizedDataset::Hitting(d) => d.player_names(),
            NormalizedDataset::Pitching(d) => d.player_names(),
        }
    }
}

/// Normalize a raw table as the given kind.
pub fn normalize_as(table: &RawTable, kind: DatasetKind) -> Result<NormalizedDataset, SchemaError> {
    Ok(match kind {
        DatasetKind::Hitting => NormalizedDataset::Hitting(normalize(table)?),
        DatasetKind::Pitching => NormalizedDataset::Pitching(normalize(table)?),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
