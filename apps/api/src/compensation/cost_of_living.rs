//! Cost-of-living data — pluggable via the `CostOfLivingProvider` trait.
//!
//! `StaticCostOfLivingProvider` serves a compiled-in table (or a JSON file of
//! `CityCostProfile` rows) and falls back to a country average when a city is
//! not tracked. `HttpCostOfLivingProvider` asks a remote service.
//!
//! Indices are relative to New York City = 100.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::reference::normalize_key;

/// `data_source` label of synthesized or explicit country-level rows.
pub const COUNTRY_AVERAGE_SOURCE: &str = "country_average";
const BUILTIN_SOURCE: &str = "builtin_reference";
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityCostProfile {
    /// Empty for a country-level row.
    #[serde(default)]
    pub city: String,
    pub country: String,
    pub cost_of_living_index: f64,
    #[serde(default)]
    pub rent_index: Option<f64>,
    #[serde(default)]
    pub groceries_index: Option<f64>,
    #[serde(default)]
    pub transport_index: Option<f64>,
    #[serde(default)]
    pub utilities_index: Option<f64>,
    #[serde(default)]
    pub average_monthly_net_salary_usd: Option<f64>,
    /// Percent, when the source publishes one.
    #[serde(default)]
    pub income_tax_rate: Option<f64>,
    pub data_source: String,
    #[serde(default)]
    pub sample_size: u32,
    pub last_updated: DateTime<Utc>,
}

impl CityCostProfile {
    pub fn is_country_average(&self) -> bool {
        self.data_source == COUNTRY_AVERAGE_SOURCE
    }

    pub fn age_days(&self, now: DateTime<Utc>) -> i64 {
        (now - self.last_updated).num_days()
    }
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Cost-of-living API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Failed to read cost data from {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Source of per-city cost data. `Ok(None)` means "no data for this place",
/// which callers treat as an expected outcome.
#[async_trait]
pub trait CostOfLivingProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn get_city_data(
        &self,
        city: &str,
        country: &str,
    ) -> Result<Option<CityCostProfile>, ProviderError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Static provider
// ────────────────────────────────────────────────────────────────────────────

/// (city, country, col, rent, groceries, transport, utilities, net monthly USD, samples).
/// An empty city is the country-level row.
type CityRow = (&'static str, &'static str, f64, f64, f64, f64, f64, f64, u32);

const BUILTIN_DATA_DATE: (i32, u32, u32) = (2026, 1, 15);

const BUILTIN_ROWS: &[CityRow] = &[
    ("New York", "United States", 100.0, 100.0, 100.0, 100.0, 100.0, 5200.0, 2400),
    ("San Francisco", "United States", 96.0, 105.0, 98.0, 95.0, 92.0, 7000.0, 1800),
    ("Los Angeles", "United States", 82.0, 80.0, 85.0, 80.0, 90.0, 4700.0, 1500),
    ("Seattle", "United States", 85.0, 78.0, 88.0, 85.0, 95.0, 6000.0, 1200),
    ("Austin", "United States", 70.0, 62.0, 75.0, 70.0, 85.0, 5000.0, 900),
    ("Boston", "United States", 88.0, 90.0, 90.0, 88.0, 95.0, 5500.0, 1100),
    ("Chicago", "United States", 76.0, 60.0, 80.0, 85.0, 90.0, 4500.0, 1300),
    ("Denver", "United States", 72.0, 65.0, 78.0, 72.0, 85.0, 4600.0, 800),
    ("Washington", "United States", 85.0, 85.0, 88.0, 85.0, 90.0, 5800.0, 1000),
    ("Miami", "United States", 80.0, 82.0, 82.0, 78.0, 88.0, 4000.0, 700),
    ("Atlanta", "United States", 70.0, 58.0, 76.0, 70.0, 82.0, 4400.0, 700),
    ("Salt Lake City", "United States", 65.0, 52.0, 72.0, 65.0, 80.0, 4200.0, 350),
    ("", "United States", 70.0, 55.0, 75.0, 70.0, 80.0, 4200.0, 15000),
    ("London", "United Kingdom", 85.0, 85.0, 75.0, 90.0, 95.0, 3700.0, 2200),
    ("Manchester", "United Kingdom", 62.0, 45.0, 60.0, 70.0, 85.0, 2800.0, 600),
    ("Edinburgh", "United Kingdom", 64.0, 48.0, 62.0, 65.0, 82.0, 2900.0, 400),
    ("", "United Kingdom", 62.0, 42.0, 60.0, 70.0, 85.0, 2900.0, 5000),
    ("Toronto", "Canada", 72.0, 65.0, 75.0, 70.0, 75.0, 3800.0, 1500),
    ("Vancouver", "Canada", 75.0, 72.0, 78.0, 72.0, 70.0, 3900.0, 1200),
    ("Montreal", "Canada", 62.0, 45.0, 70.0, 65.0, 60.0, 3200.0, 900),
    ("", "Canada", 63.0, 48.0, 70.0, 65.0, 70.0, 3400.0, 4000),
    ("Berlin", "Germany", 65.0, 45.0, 60.0, 60.0, 95.0, 3100.0, 1400),
    ("Munich", "Germany", 75.0, 62.0, 68.0, 62.0, 98.0, 3700.0, 900),
    ("Hamburg", "Germany", 68.0, 50.0, 63.0, 62.0, 96.0, 3400.0, 600),
    ("", "Germany", 62.0, 38.0, 58.0, 58.0, 92.0, 3000.0, 5000),
    ("Paris", "France", 78.0, 60.0, 75.0, 65.0, 80.0, 3200.0, 1600),
    ("Lyon", "France", 62.0, 38.0, 65.0, 55.0, 75.0, 2600.0, 400),
    ("", "France", 60.0, 32.0, 63.0, 55.0, 75.0, 2500.0, 3000),
    ("Amsterdam", "Netherlands", 78.0, 70.0, 72.0, 68.0, 90.0, 3600.0, 1000),
    ("", "Netherlands", 68.0, 50.0, 68.0, 65.0, 85.0, 3200.0, 2000),
    ("Madrid", "Spain", 55.0, 40.0, 55.0, 45.0, 70.0, 2100.0, 900),
    ("Barcelona", "Spain", 57.0, 44.0, 56.0, 45.0, 70.0, 2200.0, 1000),
    ("", "Spain", 48.0, 28.0, 52.0, 42.0, 70.0, 1800.0, 2500),
    ("Dublin", "Ireland", 75.0, 80.0, 70.0, 72.0, 90.0, 3400.0, 800),
    ("", "Ireland", 65.0, 58.0, 66.0, 65.0, 88.0, 3000.0, 1200),
    ("Zurich", "Switzerland", 120.0, 75.0, 130.0, 120.0, 85.0, 6500.0, 700),
    ("Geneva", "Switzerland", 118.0, 78.0, 128.0, 115.0, 80.0, 6300.0, 500),
    ("", "Switzerland", 112.0, 60.0, 125.0, 110.0, 82.0, 6000.0, 1500),
    ("Stockholm", "Sweden", 68.0, 50.0, 65.0, 60.0, 60.0, 3000.0, 600),
    ("", "Sweden", 62.0, 38.0, 62.0, 58.0, 58.0, 2800.0, 1200),
    ("Warsaw", "Poland", 45.0, 35.0, 42.0, 30.0, 55.0, 1700.0, 800),
    ("", "Poland", 38.0, 25.0, 38.0, 28.0, 55.0, 1400.0, 1800),
    ("Lisbon", "Portugal", 50.0, 42.0, 52.0, 42.0, 60.0, 1500.0, 700),
    ("", "Portugal", 44.0, 30.0, 48.0, 40.0, 58.0, 1300.0, 1300),
    ("Bangalore", "India", 25.0, 12.0, 28.0, 20.0, 30.0, 900.0, 1500),
    ("Mumbai", "India", 28.0, 20.0, 30.0, 22.0, 32.0, 950.0, 1800),
    ("", "India", 22.0, 8.0, 26.0, 18.0, 28.0, 650.0, 6000),
    ("Singapore", "Singapore", 85.0, 90.0, 85.0, 75.0, 70.0, 4500.0, 1200),
    ("Tokyo", "Japan", 70.0, 40.0, 70.0, 65.0, 70.0, 2600.0, 1300),
    ("", "Japan", 60.0, 25.0, 62.0, 55.0, 65.0, 2200.0, 3000),
    ("Sydney", "Australia", 82.0, 70.0, 85.0, 80.0, 75.0, 4300.0, 1400),
    ("Melbourne", "Australia", 75.0, 55.0, 80.0, 75.0, 72.0, 4000.0, 1100),
    ("", "Australia", 72.0, 48.0, 78.0, 72.0, 70.0, 3800.0, 3000),
    ("Dubai", "United Arab Emirates", 62.0, 55.0, 58.0, 55.0, 60.0, 4000.0, 900),
    ("", "United Arab Emirates", 58.0, 48.0, 55.0, 52.0, 58.0, 3700.0, 1200),
    ("Sao Paulo", "Brazil", 38.0, 18.0, 40.0, 30.0, 40.0, 900.0, 900),
    ("", "Brazil", 32.0, 12.0, 36.0, 28.0, 38.0, 750.0, 2500),
    ("Mexico City", "Mexico", 38.0, 20.0, 42.0, 30.0, 35.0, 850.0, 900),
    ("", "Mexico", 32.0, 14.0, 38.0, 26.0, 32.0, 700.0, 2000),
    ("Tel Aviv", "Israel", 82.0, 60.0, 85.0, 60.0, 70.0, 3700.0, 700),
    ("", "Israel", 72.0, 45.0, 78.0, 58.0, 68.0, 3200.0, 1000),
];

fn builtin_profiles() -> Vec<CityCostProfile> {
    let (y, m, d) = BUILTIN_DATA_DATE;
    let last_updated = NaiveDate::from_ymd_opt(y, m, d)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .unwrap_or_default();

    BUILTIN_ROWS
        .iter()
        .map(
            |&(city, country, col, rent, groceries, transport, utilities, net, samples)| {
                CityCostProfile {
                    city: city.to_string(),
                    country: country.to_string(),
                    cost_of_living_index: col,
                    rent_index: Some(rent),
                    groceries_index: Some(groceries),
                    transport_index: Some(transport),
                    utilities_index: Some(utilities),
                    average_monthly_net_salary_usd: Some(net),
                    income_tax_rate: None,
                    data_source: BUILTIN_SOURCE.to_string(),
                    sample_size: samples,
                    last_updated,
                }
            },
        )
        .collect()
}

#[derive(Debug, Clone)]
pub struct StaticCostOfLivingProvider {
    cities: HashMap<(String, String), CityCostProfile>,
    countries: HashMap<String, CityCostProfile>,
}

impl StaticCostOfLivingProvider {
    /// Rows with an empty city are country averages; countries without one get
    /// an average synthesized from their city rows.
    pub fn new(profiles: Vec<CityCostProfile>) -> Self {
        let mut cities = HashMap::new();
        let mut countries = HashMap::new();
        let mut by_country: HashMap<String, Vec<CityCostProfile>> = HashMap::new();

        for profile in profiles {
            let country_key = normalize_key(&profile.country);
            if profile.city.trim().is_empty() {
                countries.insert(
                    country_key,
                    CityCostProfile {
                        data_source: COUNTRY_AVERAGE_SOURCE.to_string(),
                        ..profile
                    },
                );
            } else {
                by_country
                    .entry(country_key.clone())
                    .or_default()
                    .push(profile.clone());
                cities.insert((normalize_key(&profile.city), country_key), profile);
            }
        }

        for (country_key, rows) in by_country {
            countries
                .entry(country_key)
                .or_insert_with(|| average_of(&rows));
        }

        Self { cities, countries }
    }

    pub fn builtin() -> Self {
        Self::new(builtin_profiles())
    }

    pub fn from_json_file(path: &Path) -> Result<Self, ProviderError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ProviderError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let profiles: Vec<CityCostProfile> = serde_json::from_str(&raw)?;
        debug!("Loaded {} cost-of-living rows from {}", profiles.len(), path.display());
        Ok(Self::new(profiles))
    }

    pub fn load(path: Option<&Path>) -> Result<Self, ProviderError> {
        match path {
            Some(path) => Self::from_json_file(path),
            None => Ok(Self::builtin()),
        }
    }

    fn lookup(&self, city: &str, country: &str) -> Option<CityCostProfile> {
        let country_key = normalize_key(country);
        if let Some(profile) = self.cities.get(&(normalize_key(city), country_key.clone())) {
            return Some(profile.clone());
        }
        self.countries.get(&country_key).map(|average| CityCostProfile {
            city: city.to_string(),
            ..average.clone()
        })
    }
}

/// Element-wise mean of a country's city rows; the oldest timestamp wins so
/// staleness is never understated.
fn average_of(rows: &[CityCostProfile]) -> CityCostProfile {
    let n = rows.len().max(1) as f64;
    let mean = |f: fn(&CityCostProfile) -> f64| rows.iter().map(f).sum::<f64>() / n;
    let mean_opt = |f: fn(&CityCostProfile) -> Option<f64>| {
        let values: Vec<f64> = rows.iter().filter_map(f).collect();
        (!values.is_empty()).then(|| values.iter().sum::<f64>() / values.len() as f64)
    };

    CityCostProfile {
        city: String::new(),
        country: rows.first().map(|r| r.country.clone()).unwrap_or_default(),
        cost_of_living_index: mean(|r| r.cost_of_living_index),
        rent_index: mean_opt(|r| r.rent_index),
        groceries_index: mean_opt(|r| r.groceries_index),
        transport_index: mean_opt(|r| r.transport_index),
        utilities_index: mean_opt(|r| r.utilities_index),
        average_monthly_net_salary_usd: mean_opt(|r| r.average_monthly_net_salary_usd),
        income_tax_rate: mean_opt(|r| r.income_tax_rate),
        data_source: COUNTRY_AVERAGE_SOURCE.to_string(),
        sample_size: rows.iter().map(|r| r.sample_size).sum(),
        last_updated: rows
            .iter()
            .map(|r| r.last_updated)
            .min()
            .unwrap_or_default(),
    }
}

#[async_trait]
impl CostOfLivingProvider for StaticCostOfLivingProvider {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn get_city_data(
        &self,
        city: &str,
        country: &str,
    ) -> Result<Option<CityCostProfile>, ProviderError> {
        Ok(self.lookup(city, country))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// HTTP provider
// ────────────────────────────────────────────────────────────────────────────

/// Fetches `GET {base_url}/cities?city=..&country=..`; a 404 means no data.
#[derive(Clone)]
pub struct HttpCostOfLivingProvider {
    client: Client,
    base_url: String,
}

impl HttpCostOfLivingProvider {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ProviderError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let client = Client::builder().timeout(HTTP_TIMEOUT).build()?;
        Ok(Self { client, base_url })
    }
}

#[async_trait]
impl CostOfLivingProvider for HttpCostOfLivingProvider {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn get_city_data(
        &self,
        city: &str,
        country: &str,
    ) -> Result<Option<CityCostProfile>, ProviderError> {
        let response = self
            .client
            .get(format!("{}/cities", self.base_url))
            .query(&[("city", city), ("country", country)])
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            debug!("No cost-of-living data for {city}, {country}");
            return Ok(None);
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!("Cost-of-living API returned {status}: {message}");
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        Ok(Some(serde_json::from_str(&body)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration as ChronoDuration;
    use mockito::Matcher;
    use std::io::Write;

    fn row(city: &str, country: &str, index: f64, samples: u32) -> CityCostProfile {
        CityCostProfile {
            city: city.to_string(),
            country: country.to_string(),
            cost_of_living_index: index,
            rent_index: None,
            groceries_index: None,
            transport_index: None,
            utilities_index: None,
            average_monthly_net_salary_usd: None,
            income_tax_rate: None,
            data_source: "survey".to_string(),
            sample_size: samples,
            last_updated: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_builtin_city_lookup_is_case_insensitive() {
        let provider = StaticCostOfLivingProvider::builtin();
        let profile = provider
            .get_city_data("new york", "UNITED STATES")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(profile.city, "New York");
        assert_eq!(profile.cost_of_living_index, 100.0);
        assert!(!profile.is_country_average());
    }

    #[tokio::test]
    async fn test_untracked_city_gets_country_average() {
        let provider = StaticCostOfLivingProvider::builtin();
        let profile = provider
            .get_city_data("Boise", "United States")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(profile.city, "Boise");
        assert!(profile.is_country_average());
        assert_eq!(profile.cost_of_living_index, 70.0);
    }

    #[tokio::test]
    async fn test_unknown_country_has_no_data() {
        let provider = StaticCostOfLivingProvider::builtin();
        assert!(provider.get_city_data("Springfield", "Narnia").await.unwrap().is_none());
    }

    #[test]
    fn test_country_average_synthesized_from_cities() {
        let mut old = row("Porto", "Portugal", 40.0, 5);
        old.last_updated = Utc::now() - ChronoDuration::days(400);
        let provider =
            StaticCostOfLivingProvider::new(vec![row("Lisbon", "Portugal", 60.0, 20), old.clone()]);

        let avg = provider.lookup("Braga", "portugal").unwrap();
        assert_eq!(avg.cost_of_living_index, 50.0);
        assert_eq!(avg.sample_size, 25);
        assert_eq!(avg.last_updated, old.last_updated);
        assert!(avg.is_country_average());
        assert!(avg.rent_index.is_none());
    }

    #[test]
    fn test_load_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let rows = vec![row("Austin", "United States", 71.5, 50)];
        write!(file, "{}", serde_json::to_string(&rows).unwrap()).unwrap();

        let provider = StaticCostOfLivingProvider::load(Some(file.path())).unwrap();
        assert_eq!(provider.lookup("Austin", "United States").unwrap().cost_of_living_index, 71.5);
        assert!(provider.lookup("Berlin", "Germany").is_none());
    }

    #[test]
    fn test_load_rejects_corrupt_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[{{\"city\": 3}}]").unwrap();
        assert!(matches!(
            StaticCostOfLivingProvider::from_json_file(file.path()),
            Err(ProviderError::Parse(_))
        ));
    }

    #[test]
    fn test_age_days() {
        let mut profile = row("Austin", "United States", 70.0, 10);
        profile.last_updated = Utc::now() - ChronoDuration::days(30);
        assert_eq!(profile.age_days(Utc::now()), 30);
    }

    #[tokio::test]
    async fn test_http_provider_fetches_profile() {
        let mut server = mockito::Server::new_async().await;
        let body = serde_json::to_string(&row("Austin", "United States", 70.0, 900)).unwrap();
        let _mock = server
            .mock("GET", "/cities")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("city".into(), "Austin".into()),
                Matcher::UrlEncoded("country".into(), "United States".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await;

        let provider = HttpCostOfLivingProvider::new(format!("{}/", server.url())).unwrap();
        let profile = provider
            .get_city_data("Austin", "United States")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(profile.cost_of_living_index, 70.0);
        assert_eq!(profile.sample_size, 900);
    }

    #[tokio::test]
    async fn test_http_provider_not_found_is_none() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/cities")
            .match_query(Matcher::Any)
            .with_status(404)
            .create_async()
            .await;

        let provider = HttpCostOfLivingProvider::new(server.url()).unwrap();
        assert!(provider.get_city_data("Nowhere", "Narnia").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_http_provider_server_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/cities")
            .match_query(Matcher::Any)
            .with_status(503)
            .with_body("maintenance")
            .create_async()
            .await;

        let provider = HttpCostOfLivingProvider::new(server.url()).unwrap();
        let err = provider.get_city_data("Austin", "United States").await.unwrap_err();
        assert!(matches!(err, ProviderError::Api { status: 503, ref message } if message == "maintenance"));
    }

    #[tokio::test]
    async fn test_http_provider_bad_json() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/cities")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("{\"unexpected\": true}")
            .create_async()
            .await;

        let provider = HttpCostOfLivingProvider::new(server.url()).unwrap();
        let err = provider.get_city_data("Austin", "United States").await.unwrap_err();
        assert!(matches!(err, ProviderError::Parse(_)));
    }
}
