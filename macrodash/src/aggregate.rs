//! Per-entity series selection and cross-entity annual averages.

use std::collections::{BTreeMap, BTreeSet};

use itertools::Itertools;
use log::debug;

use crate::observation::{Observation, YearRange};

/// Annual values keyed by year, ascending.
pub type AnnualSeries = BTreeMap<i32, f64>;

/// All observations of one entity, ascending by year. Missing values are kept; missing years are
/// not interpolated. An empty result means the entity has no data.
pub fn select_entity_series(observations: &[Observation], entity_code: &str) -> Vec<Observation> {
    observations
        .iter()
        .filter(|obs| obs.entity_code == entity_code)
        .sorted_by_key(|obs| obs.year)
        .cloned()
        .collect()
}

/// Restrict observations to a year window.
pub fn within(observations: &[Observation], years: YearRange) -> Vec<Observation> {
    observations
        .iter()
        .filter(|obs| years.contains(obs.year))
        .cloned()
        .collect()
}

/// Unweighted mean across `peer_codes - exclude` for every year with at least one non-missing
/// value. Years without contributors are left out rather than emitted as zero.
///
/// Values are summed per year in ascending entity-code order so that results do not depend on
/// the order of `observations`.
pub fn compute_group_average(
    observations: &[Observation],
    peer_codes: &BTreeSet<String>,
    exclude: &BTreeSet<String>,
) -> AnnualSeries {
    let peers: BTreeSet<&String> = peer_codes.difference(exclude).collect();
    debug!("averaging over {} peers", peers.len());

    let average = observations
        .iter()
        .filter(|obs| peers.contains(&obs.entity_code))
        .filter_map(|obs| obs.value.map(|value| (obs.year, obs.entity_code.as_str(), value)))
        .sorted_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)))
        .chunk_by(|(year, _, _)| *year)
        .into_iter()
        .map(|(year, group)| {
            let (sum, count) = group.fold((0.0, 0usize), |(sum, count), (_, _, value)| {
                (sum + value, count + 1)
            });
            (year, sum / count as f64)
        })
        .collect();
    average
}
