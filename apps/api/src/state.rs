use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use crate::compensation::{
    CostOfLivingProvider, HttpCostOfLivingProvider, SalaryCalculator, StaticCostOfLivingProvider,
    StaticRateConverter,
};
use crate::config::Config;
use crate::location::LocationResolver;
use crate::reference::ReferenceDataset;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<LocationResolver>,
    /// Holds the pluggable cost-of-living provider and currency converter.
    pub calculator: Arc<SalaryCalculator>,
}

impl AppState {
    /// Loads reference data and wires providers as configured. Fails fast on
    /// a missing or corrupt data file.
    pub fn from_config(config: &Config) -> Result<Self> {
        let dataset = ReferenceDataset::load(config.reference_data_path.as_deref())
            .context("Failed to load reference data")?;
        info!(
            "Reference data loaded: {} countries",
            dataset.countries().len()
        );
        let resolver = Arc::new(LocationResolver::new(Arc::new(dataset)));

        let cost_provider: Arc<dyn CostOfLivingProvider> = match &config.cost_of_living_api_url {
            Some(url) => Arc::new(
                HttpCostOfLivingProvider::new(url.as_str())
                    .context("Failed to build cost-of-living HTTP client")?,
            ),
            None => Arc::new(
                StaticCostOfLivingProvider::load(config.cost_data_path.as_deref())
                    .context("Failed to load cost-of-living data")?,
            ),
        };
        info!("Cost-of-living provider: {}", cost_provider.name());

        let converter = StaticRateConverter::load(config.exchange_rates_path.as_deref())
            .context("Failed to load exchange rates")?;

        let calculator = Arc::new(SalaryCalculator::new(
            resolver.clone(),
            cost_provider,
            Arc::new(converter),
        ));

        Ok(AppState {
            resolver,
            calculator,
        })
    }
}
