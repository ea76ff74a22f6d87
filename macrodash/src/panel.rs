//! The dashboard panel: one configurable pass over the aggregation engine.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Display;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::aggregate::{self, AnnualSeries};
use crate::comparison::{self, Comparison, NoComparison};
use crate::config::DashboardConfig;
use crate::entities::{self, Entity, PeerGroup};
use crate::observation::{Observation, YearRange};
use crate::summary::{self, SummaryStatistics};

/// Expected empty-result conditions, rendered as informational messages.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Notice {
    NoData,
    NoGroupData,
    NoComparableYear(i32),
    DegenerateStatistics,
}

impl Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Notice::NoData => write!(f, "No data available for this selection."),
            Notice::NoGroupData => write!(f, "No peer-group data overlaps this selection."),
            Notice::NoComparableYear(year) => {
                write!(f, "Comparison unavailable for {year}.")
            }
            Notice::DegenerateStatistics => write!(
                f,
                "Too few observations for a standard deviation or percent change."
            ),
        }
    }
}

impl From<NoComparison> for Notice {
    fn from(value: NoComparison) -> Self {
        match value {
            NoComparison::NoData => Notice::NoData,
            NoComparison::NoGroupData => Notice::NoGroupData,
            NoComparison::NoComparableYear(year) => Notice::NoComparableYear(year),
        }
    }
}

/// A peer group's annual average series.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GroupSeries {
    pub name: String,
    pub average: AnnualSeries,
}

/// Everything the presentation layer needs for one selected entity.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PanelReport {
    pub entity: Entity,
    pub years: YearRange,
    pub series: Vec<Observation>,
    pub group: Option<GroupSeries>,
    pub summary: Option<SummaryStatistics>,
    /// `None` when comparisons are switched off
    pub comparison: Option<Comparison>,
    pub notices: Vec<Notice>,
}

/// One row of the chart: the entity's value and the group average for a year.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChartRow {
    pub year: i32,
    pub entity: Option<f64>,
    pub group: Option<f64>,
}

impl PanelReport {
    pub fn has_data(&self) -> bool {
        !self.notices.contains(&Notice::NoData)
    }

    /// Union of the years of both series, ascending.
    pub fn chart_rows(&self) -> Vec<ChartRow> {
        let mut rows: BTreeMap<i32, ChartRow> = BTreeMap::new();
        for obs in &self.series {
            rows.entry(obs.year)
                .or_insert(ChartRow {
                    year: obs.year,
                    entity: None,
                    group: None,
                })
                .entity = obs.value;
        }
        if let Some(group) = &self.group {
            for (&year, &value) in &group.average {
                rows.entry(year)
                    .or_insert(ChartRow {
                        year,
                        entity: None,
                        group: None,
                    })
                    .group = Some(value);
            }
        }
        rows.into_values().collect()
    }
}

/// The unified panel engine, parameterised by a `DashboardConfig`.
#[derive(Clone, Debug)]
pub struct Panel {
    dashboard: DashboardConfig,
    peer_group: PeerGroup,
    known: BTreeSet<String>,
}

impl Panel {
    pub fn new(dashboard: DashboardConfig) -> Self {
        Self {
            dashboard,
            peer_group: PeerGroup::eu(),
            known: entities::codes(),
        }
    }

    pub fn with_peer_group(mut self, peer_group: PeerGroup) -> Self {
        self.peer_group = peer_group;
        self
    }

    /// Run one full recomputation for `entity`, restricted to `years`.
    pub fn render(
        &self,
        observations: &[Observation],
        entity: &Entity,
        years: YearRange,
    ) -> PanelReport {
        let observations = aggregate::within(observations, years);
        let series = aggregate::select_entity_series(&observations, &entity.code);
        let summary = summary::compute_summary(&series);
        debug!(
            "{}: {} observations in {years}, summary: {}",
            entity.code,
            series.len(),
            summary.is_some()
        );

        let mut notices = vec![];
        match &summary {
            None => notices.push(Notice::NoData),
            Some(stats) if stats.is_degenerate() => notices.push(Notice::DegenerateStatistics),
            Some(_) => {}
        }

        let (group, comparison) = if self.dashboard.compute_comparison {
            let peers = self.peer_group.members(&self.known);
            let average =
                aggregate::compute_group_average(&observations, &peers, &BTreeSet::new());
            let comparison = comparison::build_comparison(
                &series,
                &average,
                &entity.name,
                &self.peer_group.name,
            );
            if let Comparison::Unavailable(reason) = comparison {
                let notice = Notice::from(reason);
                if !notices.contains(&notice) {
                    notices.push(notice);
                }
            }
            let group = GroupSeries {
                name: self.peer_group.name.clone(),
                average,
            };
            (Some(group), Some(comparison))
        } else {
            (None, None)
        };

        PanelReport {
            entity: entity.clone(),
            years,
            series,
            group,
            summary,
            comparison,
            notices,
        }
    }
}
