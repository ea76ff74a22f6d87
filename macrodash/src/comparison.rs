use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::aggregate::AnnualSeries;
use crate::observation::Observation;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Relation {
    Below,
    Above,
    EqualTo,
}

impl Relation {
    /// Exact comparison, no tolerance.
    pub fn of(difference: f64) -> Self {
        if difference < 0.0 {
            Relation::Below
        } else if difference > 0.0 {
            Relation::Above
        } else {
            Relation::EqualTo
        }
    }
}

impl Display for Relation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Relation::Below => "below",
            Relation::Above => "above",
            Relation::EqualTo => "equal to",
        };
        f.write_str(text)
    }
}

/// Entity vs peer-group average for the entity's latest year.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub year: i32,
    pub entity_name: String,
    pub group_name: String,
    pub entity_value: f64,
    pub group_value: f64,
    pub difference: f64,
    pub relation: Relation,
}

impl Display for ComparisonResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "In {}, {}'s unemployment rate was {:.2} percentage points {} the {} average ({:.2}% vs {:.2}%).",
            self.year,
            self.entity_name,
            self.difference.abs(),
            self.relation,
            self.group_name,
            self.entity_value,
            self.group_value
        )
    }
}

/// Why no comparison could be made.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoComparison {
    NoData,
    NoGroupData,
    NoComparableYear(i32),
}

impl Display for NoComparison {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NoComparison::NoData => write!(f, "No data available for this selection."),
            NoComparison::NoGroupData => {
                write!(f, "No peer-group data overlaps this selection.")
            }
            NoComparison::NoComparableYear(year) => {
                write!(f, "Comparison unavailable for {year}.")
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Comparison {
    Available(ComparisonResult),
    Unavailable(NoComparison),
}

impl Comparison {
    pub fn result(&self) -> Option<&ComparisonResult> {
        match self {
            Comparison::Available(result) => Some(result),
            Comparison::Unavailable(_) => None,
        }
    }
}

/// Compare the entity's latest non-missing value with the group average of the same year.
///
/// The entity's latest year is the only candidate: when the group has no average for it, the
/// result is `NoComparableYear` and earlier years are not tried.
pub fn build_comparison(
    entity_series: &[Observation],
    group_average: &AnnualSeries,
    entity_name: &str,
    group_name: &str,
) -> Comparison {
    let points: Vec<(i32, f64)> = entity_series
        .iter()
        .filter_map(|obs| obs.value.map(|value| (obs.year, value)))
        .collect();
    let (Some(first_year), Some(&(year, entity_value))) = (
        points.iter().map(|(year, _)| *year).min(),
        points.iter().max_by_key(|(year, _)| *year),
    ) else {
        return Comparison::Unavailable(NoComparison::NoData);
    };
    if group_average.range(first_year..=year).next().is_none() {
        return Comparison::Unavailable(NoComparison::NoGroupData);
    }
    let Some(&group_value) = group_average.get(&year) else {
        return Comparison::Unavailable(NoComparison::NoComparableYear(year));
    };

    let difference = entity_value - group_value;
    Comparison::Available(ComparisonResult {
        year,
        entity_name: entity_name.into(),
        group_name: group_name.into(),
        entity_value,
        group_value,
        difference,
        relation: Relation::of(difference),
    })
}
