//! FRED client: fetches series observations from the Federal Reserve
//! Economic Data API and derives summaries and descriptive statistics.
//!
//! The client owns all HTTP concerns; everything below the wire layer
//! (filtering, windowing, statistics) is pure and tested without a network.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{EconError, EconResult};

/// Observations kept for a series summary.
const SUMMARY_WINDOW: usize = 24;
/// Observations echoed back as recent data.
const RECENT_WINDOW: usize = 12;
/// Observations used for statistics.
const STATS_WINDOW: usize = 50;
/// Series compared side by side at most.
const COMPARE_LIMIT: usize = 5;
/// Matches returned from a keyword search.
const SEARCH_LIMIT: usize = 10;

/// Headline series for the indicator dashboard.
pub const KEY_INDICATORS: &[(&str, &str)] = &[
    ("GDP", "Gross Domestic Product"),
    ("UNRATE", "Unemployment Rate"),
    ("CPIAUCSL", "Consumer Price Index"),
    ("DGS10", "10-Year Treasury Rate"),
    ("DEXUSEU", "US/Euro Exchange Rate"),
    ("DFF", "Federal Funds Rate"),
    ("HOUST", "Housing Starts"),
    ("INDPRO", "Industrial Production Index"),
    ("PAYEMS", "Nonfarm Payrolls"),
    ("UMCSENT", "Consumer Sentiment"),
];

// ─── Configuration ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FredConfig {
    pub api_key: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Inclusive observation window requested from the API.
    #[serde(default = "default_observation_start")]
    pub observation_start: String,
    #[serde(default = "default_observation_end")]
    pub observation_end: String,
    #[serde(default = "default_observation_limit")]
    pub observation_limit: usize,
}

fn default_base_url() -> String {
    "https://api.stlouisfed.org/fred".to_string()
}

fn default_observation_start() -> String {
    "2023-01-01".to_string()
}

fn default_observation_end() -> String {
    "2025-12-31".to_string()
}

fn default_observation_limit() -> usize {
    100
}

impl FredConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: default_base_url(),
            observation_start: default_observation_start(),
            observation_end: default_observation_end(),
            observation_limit: default_observation_limit(),
        }
    }
}

// ─── Wire Shapes ────────────────────────────────────────────────────────────

/// Only the fields we read from the FRED JSON responses.
#[derive(Debug, Deserialize)]
struct ObservationsResponse {
    #[serde(default)]
    observations: Vec<RawObservation>,
}

#[derive(Debug, Deserialize)]
struct RawObservation {
    date: String,
    /// Numeric text, or "." for a missing value.
    value: String,
}

impl RawObservation {
    fn parse(&self) -> Option<Observation> {
        if self.value.is_empty() || self.value == "." {
            return None;
        }
        self.value
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(|value| Observation {
                date: self.date.clone(),
                value,
            })
    }
}

#[derive(Debug, Deserialize)]
struct SeriesInfoResponse {
    #[serde(default)]
    seriess: Vec<SeriesInfo>,
}

/// Series metadata as returned by the `series` and `series/search` routes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesInfo {
    pub id: String,
    pub title: String,
    pub units: String,
    pub frequency: String,
    #[serde(default)]
    pub popularity: i64,
    #[serde(default)]
    pub observation_start: String,
    #[serde(default)]
    pub observation_end: String,
}

// ─── Derived Values ─────────────────────────────────────────────────────────

/// One dated, non-missing data point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub date: String,
    pub value: f64,
}

/// Compact view of a series: metadata plus a recent-data window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesSummary {
    pub series_id: String,
    pub title: String,
    pub units: String,
    pub frequency: String,
    pub data_points: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_date: Option<String>,
    pub recent_data: Vec<Observation>,
}

impl SeriesSummary {
    /// Build a summary from filtered observations, keeping the trailing
    /// [`SUMMARY_WINDOW`] points and echoing the last [`RECENT_WINDOW`].
    pub fn from_observations(
        series_id: impl Into<String>,
        info: Option<&SeriesInfo>,
        mut observations: Vec<Observation>,
    ) -> Self {
        let series_id = series_id.into();
        if observations.len() > SUMMARY_WINDOW {
            observations.drain(..observations.len() - SUMMARY_WINDOW);
        }
        let recent_start = observations.len().saturating_sub(RECENT_WINDOW);
        Self {
            title: info.map(|i| i.title.clone()).unwrap_or_else(|| series_id.clone()),
            units: info.map(|i| i.units.clone()).unwrap_or_else(|| "Unknown".into()),
            frequency: info
                .map(|i| i.frequency.clone())
                .unwrap_or_else(|| "Unknown".into()),
            data_points: observations.len(),
            latest_value: observations.last().map(|o| o.value),
            latest_date: observations.last().map(|o| o.date.clone()),
            first_value: observations.first().map(|o| o.value),
            first_date: observations.first().map(|o| o.date.clone()),
            recent_data: observations.split_off(recent_start),
            series_id,
        }
    }
}

/// Descriptive statistics over a series' recent window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesStatistics {
    pub series_id: String,
    pub title: String,
    pub period: String,
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub latest_value: f64,
    pub latest_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change_from_start: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percent_change_from_start: Option<f64>,
    /// Change against the observation 12 points back; needs >12 points.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yoy_change: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yoy_percent_change: Option<f64>,
}

impl SeriesStatistics {
    /// Compute statistics over the trailing [`STATS_WINDOW`] observations.
    /// Errors when there are no valid data points.
    pub fn from_observations(
        series_id: impl Into<String>,
        title: impl Into<String>,
        observations: &[Observation],
    ) -> EconResult<Self> {
        let series_id = series_id.into();
        if observations.is_empty() {
            return Err(EconError::Series {
                series_id,
                message: "no valid data points found".into(),
            });
        }

        let window_start = observations.len().saturating_sub(STATS_WINDOW);
        let window = &observations[window_start..];
        let values: Vec<f64> = window.iter().map(|o| o.value).collect();

        let first = values[0];
        let latest = values[values.len() - 1];

        let (change, percent_change) = if values.len() > 1 {
            let change = latest - first;
            let percent = if first != 0.0 {
                Some(round2(change / first * 100.0))
            } else {
                None
            };
            (Some(round2(change)), percent)
        } else {
            (None, None)
        };

        let (yoy_change, yoy_percent) = if values.len() > RECENT_WINDOW {
            let year_ago = values[values.len() - 1 - RECENT_WINDOW];
            let change = latest - year_ago;
            let percent = if year_ago != 0.0 {
                Some(round2(change / year_ago * 100.0))
            } else {
                None
            };
            (Some(round2(change)), percent)
        } else {
            (None, None)
        };

        Ok(Self {
            series_id,
            title: title.into(),
            period: format!("{} to {}", window[0].date, window[window.len() - 1].date),
            count: values.len(),
            mean: round2(mean(&values)),
            median: round2(median(&values)),
            std_dev: round2(std_dev(&values)),
            min: round2(values.iter().cloned().fold(f64::INFINITY, f64::min)),
            max: round2(values.iter().cloned().fold(f64::NEG_INFINITY, f64::max)),
            latest_value: round2(latest),
            latest_date: window[window.len() - 1].date.clone(),
            change_from_start: change,
            percent_change_from_start: percent_change,
            yoy_change,
            yoy_percent_change: yoy_percent,
        })
    }
}

/// Side-by-side comparison of several series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesComparison {
    pub period: String,
    pub series: Vec<ComparisonRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub id: String,
    pub title: String,
    pub latest_value: f64,
    pub mean: f64,
    pub std_dev: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percent_change: Option<f64>,
}

impl ComparisonRow {
    fn from_statistics(stats: &SeriesStatistics) -> Self {
        Self {
            id: stats.series_id.clone(),
            title: stats.title.chars().take(50).collect(),
            latest_value: stats.latest_value,
            mean: stats.mean,
            std_dev: stats.std_dev,
            percent_change: stats.percent_change_from_start,
        }
    }
}

/// Latest reading for each headline indicator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorDashboard {
    pub timestamp: DateTime<Utc>,
    pub indicators: Vec<IndicatorReading>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorReading {
    pub id: String,
    pub name: String,
    pub value: f64,
    pub date: String,
    pub units: String,
}

// ─── Statistics Helpers ─────────────────────────────────────────────────────

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Population standard deviation.
fn std_dev(values: &[f64]) -> f64 {
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

// ─── Client ─────────────────────────────────────────────────────────────────

/// HTTP client for the FRED API.
pub struct FredClient {
    client: reqwest::Client,
    config: FredConfig,
}

impl FredClient {
    pub fn new(config: FredConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    pub fn with_client(client: reqwest::Client, config: FredConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &FredConfig {
        &self.config
    }

    /// Fetch the filtered observation window for a series.
    async fn observations(&self, series_id: &str) -> EconResult<Vec<Observation>> {
        let url = format!("{}/series/observations", self.config.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("series_id", series_id),
                ("api_key", &self.config.api_key),
                ("file_type", "json"),
                ("observation_start", &self.config.observation_start),
                ("observation_end", &self.config.observation_end),
                ("limit", &self.config.observation_limit.to_string()),
            ])
            .send()
            .await?
            .error_for_status()?;

        let body: ObservationsResponse = response.json().await?;
        Ok(body
            .observations
            .iter()
            .filter_map(RawObservation::parse)
            .collect())
    }

    /// Fetch series metadata; absent metadata is not an error.
    async fn series_info(&self, series_id: &str) -> EconResult<Option<SeriesInfo>> {
        let url = format!("{}/series", self.config.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("series_id", series_id),
                ("api_key", &self.config.api_key),
                ("file_type", "json"),
            ])
            .send()
            .await?
            .error_for_status()?;

        let body: SeriesInfoResponse = response.json().await?;
        Ok(body.seriess.into_iter().next())
    }

    /// Fetch a series and summarize its recent window.
    pub async fn fetch_series(&self, series_id: &str) -> EconResult<SeriesSummary> {
        let observations = self.observations(series_id).await?;
        let info = self.series_info(series_id).await?;
        Ok(SeriesSummary::from_observations(
            series_id,
            info.as_ref(),
            observations,
        ))
    }

    /// Search series by keywords.
    pub async fn search_series(&self, search_text: &str) -> EconResult<Vec<SeriesInfo>> {
        let url = format!("{}/series/search", self.config.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("search_text", search_text),
                ("api_key", &self.config.api_key),
                ("file_type", "json"),
                ("limit", &SEARCH_LIMIT.to_string()),
            ])
            .send()
            .await?
            .error_for_status()?;

        let body: SeriesInfoResponse = response.json().await?;
        Ok(body.seriess.into_iter().take(SEARCH_LIMIT).collect())
    }

    /// Fetch a series and compute descriptive statistics over it.
    pub async fn statistics(&self, series_id: &str) -> EconResult<SeriesStatistics> {
        let observations = self.observations(series_id).await?;
        let info = self.series_info(series_id).await?;
        let title = info
            .map(|i| i.title)
            .unwrap_or_else(|| series_id.to_string());
        SeriesStatistics::from_observations(series_id, title, &observations)
    }

    /// Compare up to [`COMPARE_LIMIT`] series side by side. Series that fail
    /// to resolve are skipped rather than failing the comparison.
    pub async fn compare_series(&self, series_ids: &[String]) -> EconResult<SeriesComparison> {
        let mut rows = Vec::new();
        for series_id in series_ids.iter().take(COMPARE_LIMIT) {
            match self.statistics(series_id).await {
                Ok(stats) => rows.push(ComparisonRow::from_statistics(&stats)),
                Err(e) => {
                    tracing::debug!(%series_id, error = %e, "comparison skips series");
                }
            }
        }
        Ok(SeriesComparison {
            period: format!(
                "{} to {}",
                self.config.observation_start, self.config.observation_end
            ),
            series: rows,
        })
    }

    /// Latest reading for each headline indicator. Indicators that fail to
    /// resolve are skipped.
    pub async fn key_indicators(&self) -> EconResult<IndicatorDashboard> {
        let mut indicators = Vec::new();
        for &(series_id, name) in KEY_INDICATORS {
            let latest = async {
                let observations = self.observations(series_id).await?;
                let info = self.series_info(series_id).await?;
                EconResult::Ok((observations, info))
            }
            .await;

            match latest {
                Ok((observations, info)) => {
                    if let Some(last) = observations.last() {
                        indicators.push(IndicatorReading {
                            id: series_id.to_string(),
                            name: name.to_string(),
                            value: last.value,
                            date: last.date.clone(),
                            units: info
                                .map(|i| i.units)
                                .unwrap_or_else(|| "Unknown".to_string()),
                        });
                    }
                }
                Err(e) => {
                    tracing::debug!(series_id, error = %e, "dashboard skips indicator");
                }
            }
        }
        Ok(IndicatorDashboard {
            timestamp: Utc::now(),
            indicators,
        })
    }
}
