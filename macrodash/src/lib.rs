use chrono::Datelike;
use log::{debug, info};

use crate::cache::DatasetCache;
use crate::config::{Config, DashboardConfig, DataSource};
use crate::entities::Entity;
use crate::error::MacrodashResult;
use crate::observation::{Observation, YearRange};
use crate::panel::{Panel, PanelReport};
use crate::source::{IndicatorSource, WorldBankClient};

// Re-exports
pub use column_names as COL;

// Modules
pub mod aggregate;
pub mod cache;
pub mod column_names;
pub mod comparison;
pub mod config;
pub mod entities;
pub mod error;
pub mod observation;
pub mod panel;
pub mod source;
pub mod summary;

/// Type for macrodash data access and rendering
pub struct Macrodash {
    pub config: Config,
}

impl Macrodash {
    /// Setup the Macrodash object with default configuration
    pub fn new() -> Self {
        Self::new_with_config(Config::default())
    }

    /// Setup the Macrodash object with custom configuration
    pub fn new_with_config(config: Config) -> Self {
        debug!("config: {config:?}");
        Self { config }
    }

    /// The year window for a dashboard configuration, ending this calendar year.
    pub fn window(&self, dashboard: &DashboardConfig) -> YearRange {
        dashboard.year_range(chrono::Local::now().year())
    }

    /// Fetch every known entity from the remote source.
    pub async fn fetch(&self, years: YearRange) -> MacrodashResult<Vec<Observation>> {
        let client = WorldBankClient::new(&self.config)?;
        client
            .fetch(&self.config.indicator, &entities::codes(), years)
            .await
    }

    /// The offline refresh step: fetch over `years` and overwrite the cache file.
    /// Missing values are not written, matching what the read path keeps.
    pub async fn refresh_cache(&self, years: YearRange) -> MacrodashResult<usize> {
        let observations: Vec<Observation> = self
            .fetch(years)
            .await?
            .into_iter()
            .filter(|obs| obs.value.is_some())
            .collect();
        cache::write_observations(&self.config.cache_path, &observations)?;
        info!(
            "Saved {} observations to {}",
            observations.len(),
            self.config.cache_path
        );
        Ok(observations.len())
    }

    /// Observations for a dashboard session, loaded at most once per source and window.
    pub async fn load<'a>(
        &self,
        dashboard: &DashboardConfig,
        cache: &'a mut DatasetCache,
    ) -> MacrodashResult<&'a [Observation]> {
        let years = self.window(dashboard);
        if cache.holds(dashboard.source, years) {
            debug!("reusing loaded dataset");
            return Ok(cache.observations());
        }
        let observations = match dashboard.source {
            DataSource::Live => self.fetch(years).await?,
            DataSource::Cached => cache::read_observations(&self.config.cache_path)?,
        };
        Ok(cache.store(dashboard.source, years, observations))
    }

    /// One full dashboard pass for the selected entity.
    pub async fn render(
        &self,
        dashboard: &DashboardConfig,
        entity: &Entity,
        cache: &mut DatasetCache,
    ) -> MacrodashResult<PanelReport> {
        let years = self.window(dashboard);
        let observations = self.load(dashboard, cache).await?;
        Ok(Panel::new(dashboard.clone()).render(observations, entity, years))
    }
}

impl Default for Macrodash {
    fn default() -> Self {
        Self::new()
    }
}
