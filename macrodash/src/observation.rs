use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// One (entity, year, value) data point. A missing value is `None`, never zero.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub entity_code: String,
    pub year: i32,
    pub value: Option<f64>,
}

impl Observation {
    pub fn new(entity_code: impl Into<String>, year: i32, value: Option<f64>) -> Self {
        Self {
            entity_code: entity_code.into(),
            year,
            value,
        }
    }
}

/// Inclusive range of years.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    pub start: i32,
    pub end: i32,
}

impl YearRange {
    pub fn new(start: i32, end: i32) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, year: i32) -> bool {
        (self.start..=self.end).contains(&year)
    }
}

impl Display for YearRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}–{}", self.start, self.end)
    }
}
