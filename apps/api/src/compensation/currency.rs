//! Currency conversion to USD — pluggable via the `CurrencyConverter` trait.
//!
//! Default: `StaticRateConverter` (compiled-in reference rates, optionally
//! overridden from a JSON file of `{"EUR": 1.08, ...}` USD-per-unit rates).

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("Unsupported currency: {0}")]
    UnsupportedCurrency(String),

    #[error("Amount is not a finite number: {0}")]
    NonFiniteAmount(f64),

    #[error("Failed to read exchange rates from {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid exchange rate file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid rate for {currency}: {rate}")]
    InvalidRate { currency: String, rate: f64 },
}

/// Converts amounts in any supported currency into USD.
#[async_trait]
pub trait CurrencyConverter: Send + Sync {
    async fn convert_to_usd(&self, amount: f64, currency: &str) -> Result<f64, ConversionError>;
}

/// USD value of one unit of each currency.
const REFERENCE_RATES: &[(&str, f64)] = &[
    ("USD", 1.0),
    ("EUR", 1.08),
    ("GBP", 1.27),
    ("CAD", 0.74),
    ("AUD", 0.66),
    ("SGD", 0.74),
    ("INR", 0.012),
    ("JPY", 0.0067),
    ("CHF", 1.13),
    ("SEK", 0.095),
    ("PLN", 0.25),
    ("AED", 0.2723),
    ("BRL", 0.20),
    ("MXN", 0.058),
    ("ILS", 0.27),
];

#[derive(Debug, Clone)]
pub struct StaticRateConverter {
    rates: HashMap<String, f64>,
}

impl Default for StaticRateConverter {
    fn default() -> Self {
        Self {
            rates: REFERENCE_RATES
                .iter()
                .map(|(code, rate)| ((*code).to_string(), *rate))
                .collect(),
        }
    }
}

impl StaticRateConverter {
    /// Reference rates with `overrides` applied on top.
    pub fn with_overrides(overrides: HashMap<String, f64>) -> Result<Self, ConversionError> {
        let mut converter = Self::default();
        for (code, rate) in overrides {
            if !rate.is_finite() || rate <= 0.0 {
                return Err(ConversionError::InvalidRate {
                    currency: code,
                    rate,
                });
            }
            converter.rates.insert(code.trim().to_ascii_uppercase(), rate);
        }
        Ok(converter)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, ConversionError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConversionError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let overrides: HashMap<String, f64> = serde_json::from_str(&raw)?;
        debug!("Loaded {} exchange rate overrides from {}", overrides.len(), path.display());
        Self::with_overrides(overrides)
    }

    /// Built-in rates, or built-in rates plus the file's overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConversionError> {
        match path {
            Some(path) => Self::from_json_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn rate(&self, currency: &str) -> Option<f64> {
        self.rates.get(&currency.trim().to_ascii_uppercase()).copied()
    }
}

#[async_trait]
impl CurrencyConverter for StaticRateConverter {
    async fn convert_to_usd(&self, amount: f64, currency: &str) -> Result<f64, ConversionError> {
        if !amount.is_finite() {
            return Err(ConversionError::NonFiniteAmount(amount));
        }
        let rate = self
            .rate(currency)
            .ok_or_else(|| ConversionError::UnsupportedCurrency(currency.to_string()))?;
        Ok(amount * rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_usd_is_identity() {
        let converter = StaticRateConverter::default();
        assert_eq!(converter.convert_to_usd(80_000.0, "USD").await.unwrap(), 80_000.0);
        assert_eq!(converter.convert_to_usd(80_000.0, " usd ").await.unwrap(), 80_000.0);
    }

    #[tokio::test]
    async fn test_converts_with_reference_rate() {
        let converter = StaticRateConverter::default();
        let usd = converter.convert_to_usd(100_000.0, "EUR").await.unwrap();
        assert!((usd - 108_000.0).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_unsupported_currency() {
        let converter = StaticRateConverter::default();
        let err = converter.convert_to_usd(1.0, "XYZ").await.unwrap_err();
        assert!(matches!(err, ConversionError::UnsupportedCurrency(c) if c == "XYZ"));
    }

    #[tokio::test]
    async fn test_non_finite_amount() {
        let converter = StaticRateConverter::default();
        let err = converter.convert_to_usd(f64::NAN, "USD").await.unwrap_err();
        assert!(matches!(err, ConversionError::NonFiniteAmount(_)));
    }

    #[test]
    fn test_overrides_rejected_when_not_positive() {
        let overrides = HashMap::from([("EUR".to_string(), 0.0)]);
        assert!(matches!(
            StaticRateConverter::with_overrides(overrides),
            Err(ConversionError::InvalidRate { .. })
        ));
    }

    #[tokio::test]
    async fn test_overrides_loaded_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"eur": 1.5, "NZD": 0.6}}"#).unwrap();

        let converter = StaticRateConverter::load(Some(file.path())).unwrap();
        assert_eq!(converter.rate("EUR"), Some(1.5));
        assert_eq!(converter.rate("nzd"), Some(0.6));
        assert_eq!(converter.rate("GBP"), Some(1.27));
        assert_eq!(converter.convert_to_usd(10.0, "NZD").await.unwrap(), 6.0);
    }

    #[test]
    fn test_corrupt_and_missing_files() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(matches!(
            StaticRateConverter::from_json_file(file.path()),
            Err(ConversionError::Parse(_))
        ));

        let missing = Path::new("/nonexistent/rates.json");
        assert!(matches!(
            StaticRateConverter::from_json_file(missing),
            Err(ConversionError::Io { .. })
        ));
    }
}
