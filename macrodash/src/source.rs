//! Data source adapter for the World Bank indicators API (v2).

use std::collections::BTreeSet;
use std::time::Duration;

use itertools::Itertools;
use log::{debug, info, warn};
use serde::Deserialize;
use serde_json::Value;

use crate::config::Config;
use crate::error::{MacrodashError, MacrodashResult};
use crate::observation::{Observation, YearRange};

/// Anything that can produce observations of an indicator for a set of entities.
///
/// Entities without data simply yield no rows; the year range is inclusive.
pub trait IndicatorSource {
    async fn fetch(
        &self,
        indicator_id: &str,
        entity_codes: &BTreeSet<String>,
        years: YearRange,
    ) -> MacrodashResult<Vec<Observation>>;
}

#[derive(Debug, Deserialize)]
struct PageHeader {
    page: u32,
    pages: u32,
    total: u32,
}

#[derive(Debug, Deserialize)]
struct Reference {
    id: String,
}

#[derive(Debug, Deserialize)]
struct Record {
    country: Reference,
    date: String,
    value: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ApiMessage {
    #[serde(default)]
    key: String,
    #[serde(default)]
    value: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: Vec<ApiMessage>,
}

impl Record {
    /// Records with a date that is not a plain year are dropped.
    fn into_observation(self) -> Option<Observation> {
        match self.date.trim().parse::<i32>() {
            Ok(year) => Some(Observation::new(self.country.id, year, self.value)),
            Err(_) => {
                debug!("dropping record with unparseable date '{}'", self.date);
                None
            }
        }
    }
}

/// Client for `GET {base_url}/country/{codes}/indicator/{id}`.
#[derive(Debug, Clone)]
pub struct WorldBankClient {
    base_url: String,
    per_page: u32,
    client: reqwest::Client,
}

impl WorldBankClient {
    pub fn new(config: &Config) -> MacrodashResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            per_page: config.per_page,
            client,
        })
    }

    fn url(&self, indicator_id: &str, entity_codes: &BTreeSet<String>) -> String {
        format!(
            "{}/country/{}/indicator/{}",
            self.base_url,
            entity_codes.iter().join(";"),
            indicator_id
        )
    }

    /// Request a single page, returning the header and its records.
    async fn fetch_page(
        &self,
        url: &str,
        years: YearRange,
        page: u32,
    ) -> MacrodashResult<(PageHeader, Vec<Record>)> {
        info!("Requesting page {page} of {url}");
        let body = self
            .client
            .get(url)
            .query(&[
                ("format", "json".to_string()),
                ("date", format!("{}:{}", years.start, years.end)),
                ("per_page", self.per_page.to_string()),
                ("page", page.to_string()),
            ])
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        parse_page(&body)
    }
}

/// The API answers with `[header, records]`, `[header, null]` when there is nothing to return,
/// or `[{"message": [...]}]` on a bad request.
fn parse_page(body: &str) -> MacrodashResult<(PageHeader, Vec<Record>)> {
    let mut parts: Vec<Value> = serde_json::from_str(body)?;
    if parts.len() < 2 {
        let first = parts.pop().unwrap_or(Value::Null);
        let message = serde_json::from_value::<ApiErrorBody>(first)
            .map(|body| {
                body.message
                    .iter()
                    .map(|m| format!("{}: {}", m.key, m.value))
                    .join("; ")
            })
            .unwrap_or_else(|_| "unexpected response shape".to_string());
        return Err(MacrodashError::SourceError(message));
    }
    let records = parts.swap_remove(1);
    let header: PageHeader = serde_json::from_value(parts.swap_remove(0))?;
    let records: Option<Vec<Record>> = serde_json::from_value(records)?;
    Ok((header, records.unwrap_or_default()))
}

impl IndicatorSource for WorldBankClient {
    async fn fetch(
        &self,
        indicator_id: &str,
        entity_codes: &BTreeSet<String>,
        years: YearRange,
    ) -> MacrodashResult<Vec<Observation>> {
        if entity_codes.is_empty() {
            return Ok(vec![]);
        }
        let url = self.url(indicator_id, entity_codes);

        let (header, mut records) = self.fetch_page(&url, years, 1).await?;
        debug!(
            "first page: page {} of {}, {} records in total",
            header.page, header.pages, header.total
        );
        for page in 2..=header.pages {
            let (_, more) = self.fetch_page(&url, years, page).await?;
            records.extend(more);
        }

        let observations = records
            .into_iter()
            .filter_map(Record::into_observation)
            .filter(|obs| years.contains(obs.year))
            .collect_vec();
        let returned: BTreeSet<&str> = observations
            .iter()
            .map(|obs| obs.entity_code.as_str())
            .collect();
        let absent = entity_codes
            .iter()
            .filter(|code| !returned.contains(code.as_str()))
            .join(", ");
        if !absent.is_empty() {
            warn!("No {indicator_id} data returned for: {absent}");
        }
        info!("Fetched {} observations", observations.len());
        Ok(observations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    const INDICATOR: &str = "SL.UEM.TOTL.ZS";

    fn record(code: &str, date: &str, value: Option<f64>) -> Value {
        json!({
            "indicator": {"id": INDICATOR, "value": "Unemployment, total (% of total labor force)"},
            "country": {"id": code, "value": code},
            "countryiso3code": "",
            "date": date,
            "value": value,
            "unit": "",
            "obs_status": "",
            "decimal": 1
        })
    }

    fn page(page: u32, pages: u32, records: Vec<Value>) -> String {
        json!([
            {"page": page, "pages": pages, "per_page": 2, "total": 3, "lastupdated": "2025-07-01"},
            records
        ])
        .to_string()
    }

    fn client(server: &MockServer) -> WorldBankClient {
        let config = Config {
            base_url: server.base_url(),
            per_page: 2,
            ..Default::default()
        };
        WorldBankClient::new(&config).unwrap()
    }

    fn codes(codes: &[&str]) -> BTreeSet<String> {
        codes.iter().map(|c| c.to_string()).collect()
    }

    #[tokio::test]
    async fn fetch_should_follow_all_pages() {
        let server = MockServer::start_async().await;
        let first = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path_contains(format!("/indicator/{INDICATOR}"))
                    .query_param("format", "json")
                    .query_param("date", "2019:2021")
                    .query_param("page", "1");
                then.status(200).body(page(
                    1,
                    2,
                    vec![
                        record("AT", "2021", Some(6.0)),
                        record("AT", "2020", None),
                    ],
                ));
            })
            .await;
        let second = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path_contains(format!("/indicator/{INDICATOR}"))
                    .query_param("page", "2");
                then.status(200)
                    .body(page(2, 2, vec![record("BE", "2019", Some(5.4))]));
            })
            .await;

        let observations = client(&server)
            .fetch(INDICATOR, &codes(&["AT", "BE"]), YearRange::new(2019, 2021))
            .await
            .unwrap();

        first.assert_async().await;
        second.assert_async().await;
        assert_eq!(
            observations,
            vec![
                Observation::new("AT", 2021, Some(6.0)),
                Observation::new("AT", 2020, None),
                Observation::new("BE", 2019, Some(5.4)),
            ]
        );
    }

    #[tokio::test]
    async fn entities_without_data_yield_fewer_rows() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path_contains("/indicator/");
                then.status(200).body(
                    json!([{"page": 0, "pages": 0, "per_page": 2, "total": 0}, null]).to_string(),
                );
            })
            .await;

        let observations = client(&server)
            .fetch(INDICATOR, &codes(&["XX"]), YearRange::new(2019, 2021))
            .await
            .unwrap();
        assert!(observations.is_empty());
    }

    #[tokio::test]
    async fn api_messages_become_errors() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path_contains("/indicator/");
                then.status(200).body(
                    json!([{"message": [{"id": "120", "key": "Invalid value", "value": "The provided parameter value is not valid"}]}])
                        .to_string(),
                );
            })
            .await;

        let result = client(&server)
            .fetch(INDICATOR, &codes(&["AT"]), YearRange::new(2019, 2021))
            .await;
        match result {
            Err(MacrodashError::SourceError(message)) => {
                assert!(message.contains("Invalid value"), "got: {message}")
            }
            other => panic!("expected a source error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn http_failures_are_reported() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET);
                then.status(502);
            })
            .await;

        let result = client(&server)
            .fetch(INDICATOR, &codes(&["AT"]), YearRange::new(2019, 2021))
            .await;
        assert!(matches!(result, Err(MacrodashError::FailedConnection(_))));
    }

    #[test]
    fn unparseable_dates_are_dropped() {
        let body = page(
            1,
            1,
            vec![
                record("AT", "2020", Some(5.0)),
                record("AT", "2020Q1", Some(5.1)),
            ],
        );
        let (_, records) = parse_page(&body).unwrap();
        let observations = records
            .into_iter()
            .filter_map(Record::into_observation)
            .collect_vec();
        assert_eq!(observations, vec![Observation::new("AT", 2020, Some(5.0))]);
    }
}
