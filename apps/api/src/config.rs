use std::path::PathBuf;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Every data source is optional; without one the compiled-in tables are used.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// JSON replacement for the built-in country/region/company tables.
    pub reference_data_path: Option<PathBuf>,
    /// JSON list of city cost profiles for the static provider.
    pub cost_data_path: Option<PathBuf>,
    /// Base URL of a remote cost-of-living service; takes precedence over
    /// `cost_data_path`.
    pub cost_of_living_api_url: Option<String>,
    /// JSON map of currency code → USD per unit, applied over the built-in rates.
    pub exchange_rates_path: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key → value source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let optional = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        Ok(Config {
            port: optional("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: optional("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            reference_data_path: optional("REFERENCE_DATA_PATH").map(PathBuf::from),
            cost_data_path: optional("COST_DATA_PATH").map(PathBuf::from),
            cost_of_living_api_url: optional("COST_OF_LIVING_API_URL"),
            exchange_rates_path: optional("EXCHANGE_RATES_PATH").map(PathBuf::from),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.rust_log, "info");
        assert!(config.reference_data_path.is_none());
        assert!(config.cost_of_living_api_url.is_none());
    }

    #[test]
    fn test_values_and_blank_entries() {
        let config = config_from(&[
            ("PORT", "9000"),
            ("COST_DATA_PATH", "/data/costs.json"),
            ("COST_OF_LIVING_API_URL", "  "),
        ])
        .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.cost_data_path, Some(PathBuf::from("/data/costs.json")));
        assert!(config.cost_of_living_api_url.is_none());
    }

    #[test]
    fn test_invalid_port() {
        let err = config_from(&[("PORT", "eighty")]).unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }
}
