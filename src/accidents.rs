//! Traffic-accident domain constants and dataset preparation
//!
//! Accident records arrive with a `dd/mm/YYYY HH:MM` timestamp. Before a
//! search they get a count column (one accident per row), a period-of-day
//! column and a year column.

use chrono::{Datelike, NaiveDateTime, Timelike};

use crate::{
    dataset::{Dataset, Row, Value},
    Result,
};

/// Column summed to score a subgroup
pub const ACCIDENT_COUNT_COLUMN: &str = "NUM_ACIDENTES";

/// Raw timestamp column of an accident report
pub const TIMESTAMP_COLUMN: &str = "DATA HORA_BOLETIM";

/// Derived period-of-day column
pub const PERIOD_COLUMN: &str = "HORARIO";

/// Derived year column
pub const YEAR_COLUMN: &str = "ANO";

/// Period value for reports filed before `NIGHT_START_HOUR`
pub const DAY: &str = "DIA";

/// Period value for reports filed from `NIGHT_START_HOUR` on
pub const NIGHT: &str = "NOITE";

/// First hour counted as night
pub const NIGHT_START_HOUR: u32 = 18;

/// Identifier, code, coordinate and timestamp columns that never make
/// useful conditions
pub const DEFAULT_EXCLUDED_COLUMNS: &[&str] = &[
    ACCIDENT_COUNT_COLUMN,
    TIMESTAMP_COLUMN,
    "NUMERO_BOLETIM",
    "DATA_INCLUSAO",
    "DATA_ALTERACAO_SMSA",
    "COD_TEMPO",
    "COD_PAVIMENTO",
    "COD_REGIONAL",
    "COORDENADA_X",
    "COORDENADA_Y",
    "HORA_INFORMADA",
    "VALOR_UPS",
    "VALOR_UPS_ANTIGA",
];

/// Format of the report timestamp column
pub const TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M";

/// Parses a `dd/mm/YYYY HH:MM` timestamp into `(year, hour)`
///
/// Impossible calendar dates such as `31/02/2020` are rejected.
pub fn parse_timestamp(raw: &str) -> Option<(i64, u32)> {
    let timestamp = NaiveDateTime::parse_from_str(raw.trim(), TIMESTAMP_FORMAT).ok()?;
    Some((i64::from(timestamp.year()), timestamp.hour()))
}

/// Maps an hour of the day to [`DAY`] or [`NIGHT`]
pub fn period_of_day(hour: u32) -> &'static str {
    if hour >= NIGHT_START_HOUR {
        NIGHT
    } else {
        DAY
    }
}

fn row_timestamp(row: Row<'_>) -> Option<(i64, u32)> {
    match row.get(TIMESTAMP_COLUMN) {
        Some(Value::Text(raw)) => parse_timestamp(raw),
        _ => None,
    }
}

/// Adds the count, period-of-day and year columns
///
/// Rows whose timestamp is missing or malformed get `Null` period and year.
/// Columns that already exist under those names are overwritten, so a
/// prepared dataset can be prepared again.
pub fn prepare(dataset: &Dataset) -> Result<Dataset> {
    dataset.column_index(TIMESTAMP_COLUMN)?;

    let prepared = dataset.with_columns(
        &[ACCIDENT_COUNT_COLUMN, PERIOD_COLUMN, YEAR_COLUMN],
        |row| {
            let (period, year) = match row_timestamp(row) {
                Some((year, hour)) => (Value::from(period_of_day(hour)), Value::Integer(year)),
                None => (Value::Null, Value::Null),
            };
            vec![Value::Integer(1), period, year]
        },
    )?;

    let unparsed = prepared
        .rows()
        .filter(|row| row.get(YEAR_COLUMN) == Some(&Value::Null))
        .count();
    if unparsed > 0 {
        log::warn!(
            "{} of {} reports have no usable timestamp",
            unparsed,
            prepared.len()
        );
    }

    Ok(prepared)
}
