//! Flat-file dataset cache and the in-memory dataset cache owned by a dashboard session.

use std::fs::{self, File};
use std::path::Path;

use itertools::{izip, Itertools};
use log::{debug, info};
use polars::prelude::*;

use crate::config::DataSource;
use crate::entities;
use crate::error::{MacrodashError, MacrodashResult};
use crate::observation::{Observation, YearRange};
use crate::panel::PanelReport;
use crate::COL;

fn observations_to_df(observations: &[Observation]) -> PolarsResult<DataFrame> {
    let codes: Vec<&str> = observations
        .iter()
        .map(|obs| obs.entity_code.as_str())
        .collect();
    let years: Vec<i32> = observations.iter().map(|obs| obs.year).collect();
    let values: Vec<Option<f64>> = observations.iter().map(|obs| obs.value).collect();
    DataFrame::new(vec![
        Series::new(COL::COUNTRY_CODE, codes),
        Series::new(COL::YEAR, years),
        Series::new(COL::UNEMPLOYMENT_RATE, values),
    ])
}

/// Files from older refresh runs carry display names ("Austria") in the code column.
fn entity_code(cell: &str) -> String {
    entities::lookup(cell).map_or_else(|_| cell.trim().to_string(), |entity| entity.code)
}

/// Rows without a year or without a finite value are dropped; row order in the file is
/// irrelevant.
fn df_to_observations(df: &DataFrame) -> PolarsResult<Vec<Observation>> {
    let codes = df.column(COL::COUNTRY_CODE)?.cast(&DataType::String)?;
    let years = df.column(COL::YEAR)?.cast(&DataType::Int32)?;
    let values = df.column(COL::UNEMPLOYMENT_RATE)?.cast(&DataType::Float64)?;

    let observations = izip!(codes.str()?, years.i32()?, values.f64()?)
        .filter_map(|(code, year, value)| match (code, year, value) {
            (Some(code), Some(year), Some(value)) if value.is_finite() => {
                Some(Observation::new(entity_code(code), year, Some(value)))
            }
            _ => None,
        })
        .sorted_by(|a, b| (&a.entity_code, a.year).cmp(&(&b.entity_code, b.year)))
        .collect();
    Ok(observations)
}

/// Write observations as `country_code,Year,Unemployment rate (%)`, creating parent directories.
pub fn write_observations<P: AsRef<Path>>(
    path: P,
    observations: &[Observation],
) -> MacrodashResult<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let sorted = observations
        .iter()
        .sorted_by(|a, b| (&a.entity_code, a.year).cmp(&(&b.entity_code, b.year)))
        .cloned()
        .collect_vec();
    let mut df = observations_to_df(&sorted)?;
    let mut file = File::create(path)?;
    CsvWriter::new(&mut file).include_header(true).finish(&mut df)?;
    info!("Wrote {} rows to {}", df.height(), path.display());
    Ok(())
}

/// Read the cache file back into observations.
pub fn read_observations<P: AsRef<Path>>(path: P) -> MacrodashResult<Vec<Observation>> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(MacrodashError::MissingCache(path.display().to_string()));
    }
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(None)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;
    debug!("Loaded cache with shape: {:?}", df.shape());
    Ok(df_to_observations(&df)?)
}

/// Export the chart series of a panel as `Year,<unemployment>,<group average>`.
pub fn write_chart<P: AsRef<Path>>(path: P, report: &PanelReport) -> MacrodashResult<()> {
    let rows = report.chart_rows();
    let mut df = DataFrame::new(vec![
        Series::new(COL::YEAR, rows.iter().map(|row| row.year).collect_vec()),
        Series::new(
            COL::UNEMPLOYMENT_RATE,
            rows.iter().map(|row| row.entity).collect_vec(),
        ),
        Series::new(
            COL::GROUP_AVERAGE,
            rows.iter().map(|row| row.group).collect_vec(),
        ),
    ])?;
    let mut file = File::create(path.as_ref())?;
    CsvWriter::new(&mut file).include_header(true).finish(&mut df)?;
    Ok(())
}

/// Observations loaded once per dashboard session and reused across renders.
///
/// Owned by the presentation layer; a new session starts with an empty cache.
#[derive(Debug, Default)]
pub struct DatasetCache {
    key: Option<(DataSource, YearRange)>,
    observations: Vec<Observation>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the cached dataset was loaded from `source` over `years`.
    pub fn holds(&self, source: DataSource, years: YearRange) -> bool {
        self.key == Some((source, years))
    }

    pub fn store(
        &mut self,
        source: DataSource,
        years: YearRange,
        observations: Vec<Observation>,
    ) -> &[Observation] {
        debug!("caching {} observations from {source}", observations.len());
        self.key = Some((source, years));
        self.observations = observations;
        &self.observations
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }
}
