//! This module stores the column names of the dataset cache file. Note that these must stay in
//! sync with files produced by earlier refresh runs, since the cache is read back by name!

pub const COUNTRY_CODE: &str = "country_code";
pub const YEAR: &str = "Year";
pub const UNEMPLOYMENT_RATE: &str = "Unemployment rate (%)";

// Columns of the chart series export
pub const GROUP_AVERAGE: &str = "Group average (%)";
