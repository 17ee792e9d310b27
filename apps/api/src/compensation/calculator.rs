//! Salary calculator — turns a salary string plus a job location into a
//! tax-, cost-of-living- and family-adjusted analysis.
//!
//! Flow:
//!   1. parse the salary text (no usable amount → `None`)
//!   2. resolve + validate the effective location
//!   3. cost-of-living lookup ∥ currency conversion (`tokio::join!`)
//!   4. normalization, tax, family and comfort math
//!   5. comparisons, recommendations and warnings

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::compensation::comfort::calculate_comfort_score;
use crate::compensation::cost_of_living::{CityCostProfile, CostOfLivingProvider};
use crate::compensation::currency::CurrencyConverter;
use crate::compensation::family::calculate_family_multiplier;
use crate::compensation::models::{
    CurrentSalaryComparison, EnhancedSalaryAnalysis, ExpectedSalaryComparison, FamilyAdjustment,
    SalaryRange,
};
use crate::compensation::salary_parser::parse_salary_string;
use crate::compensation::tax::{declared_tax_table, estimate_tax_rate, estimate_tax_rate_with};
use crate::location::{
    JobLocationContext, LocationResolution, LocationResolver, UserLocationProfile, WorkMode,
    GLOBAL_COUNTRY,
};

/// Annual single-person cost of living at index 100, USD.
pub const BASELINE_COST_AT_INDEX_100: f64 = 40_000.0;
/// Yearly cost of each dependent as a share of the local baseline.
const DEPENDENT_COST_SHARE: f64 = 0.25;
const LOW_COMFORT: f64 = 40.0;
const HIGH_COMFORT: f64 = 80.0;
const STALE_DATA_DAYS: i64 = 365;
const MIN_SAMPLE_SIZE: u32 = 10;
const DEFAULT_CURRENCY: &str = "USD";
/// Country used when a remote role has no location information at all.
const REMOTE_FALLBACK_COUNTRY: &str = "United States";

pub struct SalaryCalculator {
    resolver: Arc<LocationResolver>,
    cost_provider: Arc<dyn CostOfLivingProvider>,
    converter: Arc<dyn CurrencyConverter>,
}

impl SalaryCalculator {
    pub fn new(
        resolver: Arc<LocationResolver>,
        cost_provider: Arc<dyn CostOfLivingProvider>,
        converter: Arc<dyn CurrencyConverter>,
    ) -> Self {
        Self {
            resolver,
            cost_provider,
            converter,
        }
    }

    pub async fn calculate_enhanced_salary(
        &self,
        salary_text: &str,
        job_location: &str,
        work_mode: WorkMode,
        profile: Option<&UserLocationProfile>,
    ) -> Option<EnhancedSalaryAnalysis> {
        let job = JobLocationContext::new(job_location, work_mode);
        self.calculate_for_job(salary_text, &job, profile).await
    }

    /// Like `calculate_enhanced_salary`, with the full job context so the
    /// company name can take part in location resolution.
    pub async fn calculate_for_job(
        &self,
        salary_text: &str,
        job: &JobLocationContext,
        profile: Option<&UserLocationProfile>,
    ) -> Option<EnhancedSalaryAnalysis> {
        let Some(parsed) = parse_salary_string(salary_text) else {
            debug!("No usable salary in '{salary_text}'");
            return None;
        };

        let location = self.determine_effective_location(job, profile);
        let annual = SalaryRange::new(parsed.annual_min(), parsed.annual_max());

        let (cost_profile, normalized) = tokio::join!(
            self.fetch_cost_profile(&location),
            self.annual_to_usd(annual, &parsed.currency),
        );
        let cost_profile = cost_profile?;
        let normalized = normalized?;

        let index = cost_profile.cost_of_living_index;
        if !index.is_finite() || index <= 0.0 {
            warn!(
                "Unusable cost-of-living index {index} for {}",
                location.display_name()
            );
            return None;
        }

        let cost_of_living_adjusted = normalized.scale(100.0 / index);
        let tax_estimate = match declared_tax_table(&location.country, self.resolver.dataset()) {
            Some(table) => estimate_tax_rate_with(normalized.midpoint(), table),
            None => estimate_tax_rate(normalized.midpoint(), &location.country),
        };
        let net = normalized.scale(1.0 - tax_estimate / 100.0);

        let family_size = profile.map_or(1, UserLocationProfile::household_size);
        let dependents = profile.map_or(0, UserLocationProfile::dependents);
        let multiplier = calculate_family_multiplier(family_size, dependents);
        let local_baseline = BASELINE_COST_AT_INDEX_100 * index / 100.0;
        let dependents_cost = DEPENDENT_COST_SHARE * local_baseline * f64::from(dependents);

        let net_mid = net.midpoint();
        let comfort_score = calculate_comfort_score(net_mid, local_baseline, 1.0);
        let family_comfort_score = calculate_comfort_score(net_mid, local_baseline, multiplier);
        let family_savings_potential = net_mid - (local_baseline * multiplier + dependents_cost);

        let mut recommendations = Vec::new();
        let mut warnings = location.warnings.clone();
        let city = location.city.clone();

        let comparison_to_expected = match profile {
            Some(p) => {
                self.compare_to_expected(p, normalized, &mut recommendations, &mut warnings)
                    .await
            }
            None => None,
        };
        let comparison_to_current = match profile {
            Some(p) => {
                self.compare_to_current(p, normalized, &mut recommendations, &mut warnings)
                    .await
            }
            None => None,
        };

        if comfort_score < LOW_COMFORT {
            warnings.push(format!(
                "Low comfort score ({comfort_score:.0}/100): net pay may not cover the cost of living in {city}"
            ));
        } else if comfort_score >= HIGH_COMFORT {
            recommendations.push(format!(
                "Strong purchasing power in {city}: room for savings and long-term financial security"
            ));
        }

        if family_size > 1 && family_comfort_score < LOW_COMFORT {
            warnings.push(format!(
                "Tight budget for a household of {family_size} in {city} (family comfort {family_comfort_score:.0}/100)"
            ));
        }

        if location.is_remote && profile.is_some_and(|p| p.willing_to_relocate) {
            recommendations.push(
                "Remote role: relocating to a lower-cost area would stretch this salary further"
                    .to_string(),
            );
        }

        warnings.extend(data_quality_warnings(&cost_profile, &city));

        info!(
            "Analyzed {}–{} {} ({}) for {}: comfort {comfort_score}, family {family_comfort_score}",
            parsed.min,
            parsed.max,
            parsed.currency,
            parsed.period,
            location.display_name()
        );

        Some(EnhancedSalaryAnalysis {
            original: SalaryRange::new(parsed.min, parsed.max),
            original_currency: parsed.currency,
            pay_period: parsed.period,
            normalized_usd: normalized,
            cost_of_living_adjusted,
            net,
            tax_estimate,
            family_adjustment: FamilyAdjustment {
                family_size,
                dependents,
                multiplier,
                dependents_cost,
                local_baseline,
            },
            comfort_score,
            family_comfort_score,
            family_savings_potential,
            comparison_to_expected,
            comparison_to_current,
            recommendations,
            warnings,
            location,
            cost_profile,
        })
    }

    /// The location whose costs apply: the office for on-site and hybrid
    /// roles, the user's home for remote ones. A location with no known
    /// country is evaluated against United States averages.
    pub fn determine_effective_location(
        &self,
        job: &JobLocationContext,
        profile: Option<&UserLocationProfile>,
    ) -> LocationResolution {
        let mut resolution = self
            .resolver
            .validate_location(self.resolver.resolve_location(job, profile));
        if resolution.country != GLOBAL_COUNTRY {
            return resolution;
        }

        let warning = if resolution.is_global_sentinel() {
            resolution.is_remote = true;
            "No location information available; using United States averages for cost calculations"
                .to_string()
        } else {
            format!(
                "Country of '{}' is unknown; using United States averages for cost calculations",
                resolution.city
            )
        };
        resolution.country = REMOTE_FALLBACK_COUNTRY.to_string();
        resolution.warnings.push(warning);
        resolution
    }

    async fn fetch_cost_profile(&self, location: &LocationResolution) -> Option<CityCostProfile> {
        match self
            .cost_provider
            .get_city_data(&location.city, &location.country)
            .await
        {
            Ok(Some(profile)) => Some(profile),
            Ok(None) => {
                warn!(
                    "No cost-of-living data for {} ({} provider)",
                    location.display_name(),
                    self.cost_provider.name()
                );
                None
            }
            Err(e) => {
                warn!(
                    "Cost-of-living lookup failed for {}: {e}",
                    location.display_name()
                );
                None
            }
        }
    }

    async fn annual_to_usd(&self, annual: SalaryRange, currency: &str) -> Option<SalaryRange> {
        let (min, max) = tokio::join!(
            self.converter.convert_to_usd(annual.min, currency),
            self.converter.convert_to_usd(annual.max, currency),
        );
        match (min, max) {
            (Ok(min), Ok(max)) => Some(SalaryRange::new(min, max)),
            (Err(e), _) | (_, Err(e)) => {
                warn!("Currency conversion failed: {e}");
                None
            }
        }
    }

    /// Converts an amount in the profile's preferred currency.
    async fn profile_amount_to_usd(
        &self,
        profile: &UserLocationProfile,
        amount: f64,
        warnings: &mut Vec<String>,
    ) -> Option<f64> {
        let currency = profile
            .preferred_currency
            .as_deref()
            .unwrap_or(DEFAULT_CURRENCY);
        match self.converter.convert_to_usd(amount, currency).await {
            Ok(usd) => Some(usd),
            Err(e) => {
                warn!("Could not convert profile amount: {e}");
                warnings.push(format!(
                    "Could not convert your {currency} salary figures for comparison"
                ));
                None
            }
        }
    }

    async fn compare_to_expected(
        &self,
        profile: &UserLocationProfile,
        offered: SalaryRange,
        recommendations: &mut Vec<String>,
        warnings: &mut Vec<String>,
    ) -> Option<ExpectedSalaryComparison> {
        let expected = profile.expected_salary?;
        let min = self.profile_amount_to_usd(profile, expected.min, warnings).await?;
        let max = self.profile_amount_to_usd(profile, expected.max, warnings).await?;
        let expected_usd = SalaryRange::new(min, max);

        let meets_minimum = offered.min >= expected_usd.min;
        let percentage_of_minimum = if expected_usd.min > 0.0 {
            round1(offered.midpoint() / expected_usd.min * 100.0)
        } else {
            100.0
        };

        if meets_minimum {
            recommendations.push(format!(
                "Meets your minimum salary expectation ({percentage_of_minimum:.0}% of your minimum at the midpoint)"
            ));
        } else {
            warnings.push(format!(
                "The offered minimum is below your expected minimum (midpoint is {percentage_of_minimum:.0}% of your minimum); consider negotiating"
            ));
        }

        Some(ExpectedSalaryComparison {
            expected_usd,
            meets_minimum,
            percentage_of_minimum,
        })
    }

    async fn compare_to_current(
        &self,
        profile: &UserLocationProfile,
        offered: SalaryRange,
        recommendations: &mut Vec<String>,
        warnings: &mut Vec<String>,
    ) -> Option<CurrentSalaryComparison> {
        let current = profile.current_salary.filter(|c| *c > 0.0)?;
        let current_usd = self.profile_amount_to_usd(profile, current, warnings).await?;

        let increase = offered.midpoint() - current_usd;
        let percentage_increase = round1(increase / current_usd * 100.0);
        let is_raise = increase > 0.0;

        if is_raise {
            recommendations.push(format!(
                "A {percentage_increase:.1}% increase over your current salary"
            ));
        } else {
            warnings.push(format!(
                "The offered midpoint is {:.1}% below your current salary",
                percentage_increase.abs()
            ));
        }

        Some(CurrentSalaryComparison {
            current_usd,
            is_raise,
            increase,
            percentage_increase,
        })
    }
}

fn data_quality_warnings(profile: &CityCostProfile, city: &str) -> Vec<String> {
    let mut warnings = Vec::new();
    let age = profile.age_days(Utc::now());
    if age > STALE_DATA_DAYS {
        warnings.push(format!(
            "Cost-of-living data for {city} is {age} days old and may be outdated"
        ));
    }
    if profile.sample_size < MIN_SAMPLE_SIZE {
        warnings.push(format!(
            "Cost-of-living data for {city} is based on only {} data points",
            profile.sample_size
        ));
    }
    if profile.is_country_average() {
        warnings.push(format!(
            "No city-level cost data for {city}; using {} averages",
            profile.country
        ));
    }
    warnings
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compensation::cost_of_living::{ProviderError, StaticCostOfLivingProvider};
    use crate::compensation::currency::{ConversionError, StaticRateConverter};
    use crate::location::models::{MaritalStatus, SalaryExpectation};
    use crate::reference::ReferenceDataset;
    use async_trait::async_trait;
    use chrono::Duration;

    /// Same index for every city, fresh and well sampled.
    struct FixedIndexProvider {
        index: f64,
    }

    #[async_trait]
    impl CostOfLivingProvider for FixedIndexProvider {
        fn name(&self) -> &'static str {
            "fixed"
        }

        async fn get_city_data(
            &self,
            city: &str,
            country: &str,
        ) -> Result<Option<CityCostProfile>, ProviderError> {
            Ok(Some(CityCostProfile {
                city: city.to_string(),
                country: country.to_string(),
                cost_of_living_index: self.index,
                rent_index: None,
                groceries_index: None,
                transport_index: None,
                utilities_index: None,
                average_monthly_net_salary_usd: None,
                income_tax_rate: None,
                data_source: "test".to_string(),
                sample_size: 100,
                last_updated: Utc::now(),
            }))
        }
    }

    struct FailingProvider;

    #[async_trait]
    impl CostOfLivingProvider for FailingProvider {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn get_city_data(
            &self,
            _city: &str,
            _country: &str,
        ) -> Result<Option<CityCostProfile>, ProviderError> {
            Err(ProviderError::Api {
                status: 500,
                message: "boom".to_string(),
            })
        }
    }

    struct NoRates;

    #[async_trait]
    impl CurrencyConverter for NoRates {
        async fn convert_to_usd(&self, _amount: f64, currency: &str) -> Result<f64, ConversionError> {
            Err(ConversionError::UnsupportedCurrency(currency.to_string()))
        }
    }

    fn resolver() -> Arc<LocationResolver> {
        Arc::new(LocationResolver::new(Arc::new(
            ReferenceDataset::builtin().unwrap(),
        )))
    }

    fn calculator_with(provider: Arc<dyn CostOfLivingProvider>) -> SalaryCalculator {
        SalaryCalculator::new(resolver(), provider, Arc::new(StaticRateConverter::default()))
    }

    fn fixed(index: f64) -> SalaryCalculator {
        calculator_with(Arc::new(FixedIndexProvider { index }))
    }

    #[tokio::test]
    async fn test_end_to_end_at_index_80() {
        let calc = fixed(80.0);
        let analysis = calc
            .calculate_enhanced_salary(
                "$80,000 - $120,000 per year",
                "Austin, Texas, USA",
                WorkMode::Onsite,
                None,
            )
            .await
            .unwrap();

        assert!(analysis.comfort_score > 0.0);
        assert!(analysis.family_comfort_score > 0.0);
        assert!(analysis.net.min < analysis.normalized_usd.min);
        assert_eq!(analysis.normalized_usd, SalaryRange::new(80_000.0, 120_000.0));
        assert_eq!(analysis.location.city, "Austin");
        assert_eq!(analysis.family_adjustment.local_baseline, 32_000.0);
        assert_eq!(analysis.family_adjustment.multiplier, 1.0);
        assert_eq!(analysis.comfort_score, analysis.family_comfort_score);
        assert!(analysis.comparison_to_expected.is_none());
        assert!((0.0..=60.0).contains(&analysis.tax_estimate));
    }

    #[tokio::test]
    async fn test_unparseable_salary_is_none() {
        let calc = fixed(100.0);
        for text in ["", "Competitive", "DOE"] {
            assert!(calc
                .calculate_enhanced_salary(text, "Berlin, Germany", WorkMode::Onsite, None)
                .await
                .is_none());
        }
    }

    #[tokio::test]
    async fn test_cost_of_living_adjustment_direction() {
        let expensive = fixed(180.0)
            .calculate_enhanced_salary("$100,000", "Zurich", WorkMode::Onsite, None)
            .await
            .unwrap();
        assert!(expensive.cost_of_living_adjusted.min < expensive.normalized_usd.min);

        let cheap = fixed(40.0)
            .calculate_enhanced_salary("$100,000", "Bangalore", WorkMode::Onsite, None)
            .await
            .unwrap();
        assert!(cheap.cost_of_living_adjusted.min > cheap.normalized_usd.min);
    }

    #[tokio::test]
    async fn test_larger_family_lowers_family_comfort() {
        let calc = fixed(100.0);
        let single = UserLocationProfile {
            family_size: Some(1),
            ..Default::default()
        };
        let family = UserLocationProfile {
            family_size: Some(5),
            dependents: Some(3),
            ..Default::default()
        };

        let a = calc
            .calculate_enhanced_salary("$90,000", "Chicago, IL", WorkMode::Onsite, Some(&single))
            .await
            .unwrap();
        let b = calc
            .calculate_enhanced_salary("$90,000", "Chicago, IL", WorkMode::Onsite, Some(&family))
            .await
            .unwrap();

        assert!(a.family_comfort_score > b.family_comfort_score);
        assert_eq!(a.comfort_score, b.comfort_score);
        assert!(b.family_comfort_score < b.comfort_score);
        assert_eq!(b.family_adjustment.dependents_cost, 0.25 * 40_000.0 * 3.0);
        assert!(b.family_savings_potential < a.family_savings_potential);
    }

    #[tokio::test]
    async fn test_remote_role_uses_user_location() {
        let calc = calculator_with(Arc::new(StaticCostOfLivingProvider::builtin()));
        let profile = UserLocationProfile::at("Lisbon, Portugal");

        let analysis = calc
            .calculate_enhanced_salary("€60,000", "San Francisco, CA", WorkMode::Remote, Some(&profile))
            .await
            .unwrap();

        assert_eq!(analysis.location.city, "Lisbon");
        assert_eq!(analysis.cost_profile.cost_of_living_index, 50.0);
        assert_eq!(analysis.original_currency, "EUR");
        assert!((analysis.normalized_usd.min - 64_800.0).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_remote_worker_in_untracked_city_gets_country_average() {
        let calc = calculator_with(Arc::new(StaticCostOfLivingProvider::builtin()));
        let profile = UserLocationProfile::at("Boise, ID");

        let analysis = calc
            .calculate_enhanced_salary("$100,000", "Remote", WorkMode::Remote, Some(&profile))
            .await
            .unwrap();

        assert_eq!(analysis.location.city, "Boise");
        assert_eq!(analysis.location.country, "United States");
        assert_eq!(analysis.location.confidence, 0.9);
        assert_eq!(analysis.cost_profile.cost_of_living_index, 70.0);
        assert!(analysis.cost_profile.is_country_average());
    }

    #[tokio::test]
    async fn test_untracked_city_without_country_uses_us_averages() {
        let calc = calculator_with(Arc::new(StaticCostOfLivingProvider::builtin()));
        let profile = UserLocationProfile::at("Boise");

        let analysis = calc
            .calculate_enhanced_salary("$100,000", "Remote", WorkMode::Remote, Some(&profile))
            .await
            .unwrap();

        assert_eq!(analysis.location.city, "Boise");
        assert_eq!(analysis.location.country, "United States");
        assert_eq!(analysis.cost_profile.cost_of_living_index, 70.0);
        assert!(analysis
            .warnings
            .iter()
            .any(|w| w.contains("Country of 'Boise' is unknown")));
    }

    #[tokio::test]
    async fn test_tax_follows_reference_tax_table() {
        use std::io::Write;

        let json = r#"{
            "countries": [{
                "name": "Freedonia",
                "default_city": "Capital City",
                "major_cities": ["Capital City"],
                "tax_table": "de"
            }]
        }"#;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        let dataset = ReferenceDataset::from_json_file(file.path()).unwrap();

        let calc = SalaryCalculator::new(
            Arc::new(LocationResolver::new(Arc::new(dataset))),
            Arc::new(FixedIndexProvider { index: 100.0 }),
            Arc::new(StaticRateConverter::default()),
        );
        let analysis = calc
            .calculate_enhanced_salary("$80,000", "Capital City, Freedonia", WorkMode::Onsite, None)
            .await
            .unwrap();

        assert_eq!(analysis.location.country, "Freedonia");
        assert_eq!(analysis.tax_estimate, estimate_tax_rate(80_000.0, "Germany"));
        assert_ne!(analysis.tax_estimate, estimate_tax_rate(80_000.0, "United States"));
    }

    #[tokio::test]
    async fn test_remote_without_any_location_uses_us_sentinel() {
        let calc = fixed(100.0);
        let loc = calc.determine_effective_location(
            &JobLocationContext::new("Remote", WorkMode::Remote),
            None,
        );
        assert_eq!(loc.city, "Remote");
        assert_eq!(loc.country, "United States");
        assert!(loc.is_remote);
        assert!(loc.warnings.iter().any(|w| w.contains("United States averages")));
    }

    #[tokio::test]
    async fn test_onsite_uses_job_location_even_with_profile() {
        let calc = fixed(100.0);
        let profile = UserLocationProfile::at("Denver");
        let loc = calc.determine_effective_location(
            &JobLocationContext::new("Seattle, WA", WorkMode::Onsite),
            Some(&profile),
        );
        assert_eq!(loc.city, "Seattle");
    }

    #[tokio::test]
    async fn test_company_name_participates_in_resolution() {
        let calc = fixed(100.0);
        let job = JobLocationContext::new("Main campus", WorkMode::Onsite).with_company("Spotify");
        let analysis = calc.calculate_for_job("SEK 720,000", &job, None).await.unwrap();
        assert_eq!(analysis.location.city, "Stockholm");
        assert!((analysis.normalized_usd.max - 68_400.0).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_missing_cost_data_is_none() {
        let calc = calculator_with(Arc::new(StaticCostOfLivingProvider::builtin()));
        assert!(calc
            .calculate_enhanced_salary("$90,000", "Springfield, Narnia", WorkMode::Onsite, None)
            .await
            .is_none());

        let failing = calculator_with(Arc::new(FailingProvider));
        assert!(failing
            .calculate_enhanced_salary("$90,000", "Berlin, Germany", WorkMode::Onsite, None)
            .await
            .is_none());
    }

    #[tokio::test]
    async fn test_unsupported_currency_or_bad_index_is_none() {
        let calc = SalaryCalculator::new(
            resolver(),
            Arc::new(FixedIndexProvider { index: 100.0 }),
            Arc::new(NoRates),
        );
        assert!(calc
            .calculate_enhanced_salary("CHF 90,000", "Zurich", WorkMode::Onsite, None)
            .await
            .is_none());

        let zero = fixed(0.0);
        assert!(zero
            .calculate_enhanced_salary("$90,000", "Berlin, Germany", WorkMode::Onsite, None)
            .await
            .is_none());
    }

    #[tokio::test]
    async fn test_hourly_pay_is_annualized() {
        let calc = fixed(100.0);
        let analysis = calc
            .calculate_enhanced_salary("$50/hr", "New York, NY", WorkMode::Onsite, None)
            .await
            .unwrap();
        assert_eq!(analysis.normalized_usd.min, 104_000.0);
        assert_eq!(analysis.original.min, 50.0);
    }

    #[tokio::test]
    async fn test_comfort_thresholds_drive_messages() {
        let calc = fixed(100.0);
        let low = calc
            .calculate_enhanced_salary("$30,000", "New York, NY", WorkMode::Onsite, None)
            .await
            .unwrap();
        assert!(low.comfort_score < 40.0);
        assert!(low.warnings.iter().any(|w| w.contains("Low comfort score")));

        let high = calc
            .calculate_enhanced_salary("$300,000", "New York, NY", WorkMode::Onsite, None)
            .await
            .unwrap();
        assert!(high.comfort_score >= 80.0);
        assert!(high.recommendations.iter().any(|r| r.contains("savings")));
    }

    #[tokio::test]
    async fn test_family_budget_warning() {
        let calc = fixed(100.0);
        let profile = UserLocationProfile {
            marital_status: Some(MaritalStatus::Married),
            dependents: Some(3),
            ..Default::default()
        };
        let analysis = calc
            .calculate_enhanced_salary("$70,000", "New York, NY", WorkMode::Onsite, Some(&profile))
            .await
            .unwrap();
        assert_eq!(analysis.family_adjustment.family_size, 2);
        assert!(analysis.family_comfort_score < 40.0);
        assert!(analysis.warnings.iter().any(|w| w.contains("household of 2")));
        assert!(analysis.family_savings_potential < 0.0);
    }

    #[tokio::test]
    async fn test_relocation_suggestion_for_remote_roles() {
        let calc = fixed(100.0);
        let profile = UserLocationProfile {
            current_location: Some("Denver".to_string()),
            willing_to_relocate: true,
            ..Default::default()
        };
        let analysis = calc
            .calculate_enhanced_salary("$120,000", "Remote", WorkMode::Remote, Some(&profile))
            .await
            .unwrap();
        assert!(analysis.location.is_remote);
        assert!(analysis.recommendations.iter().any(|r| r.contains("relocating")));
    }

    #[tokio::test]
    async fn test_expected_and_current_comparisons() {
        let calc = fixed(100.0);
        let profile = UserLocationProfile {
            expected_salary: Some(SalaryExpectation {
                min: 90_000.0,
                max: 110_000.0,
            }),
            current_salary: Some(80_000.0),
            ..Default::default()
        };
        let analysis = calc
            .calculate_enhanced_salary(
                "$80,000 - $120,000",
                "Boston, MA",
                WorkMode::Onsite,
                Some(&profile),
            )
            .await
            .unwrap();

        let expected = analysis.comparison_to_expected.unwrap();
        assert!(!expected.meets_minimum);
        assert_eq!(expected.percentage_of_minimum, 111.1);

        let current = analysis.comparison_to_current.unwrap();
        assert!(current.is_raise);
        assert_eq!(current.increase, 20_000.0);
        assert_eq!(current.percentage_increase, 25.0);
        assert!(analysis.warnings.iter().any(|w| w.contains("expected minimum")));
        assert!(analysis.recommendations.iter().any(|r| r.contains("25.0% increase")));
    }

    #[tokio::test]
    async fn test_profile_amounts_converted_from_preferred_currency() {
        let calc = fixed(100.0);
        let profile = UserLocationProfile {
            expected_salary: Some(SalaryExpectation {
                min: 50_000.0,
                max: 60_000.0,
            }),
            preferred_currency: Some("GBP".to_string()),
            ..Default::default()
        };
        let analysis = calc
            .calculate_enhanced_salary("£70,000", "London, UK", WorkMode::Onsite, Some(&profile))
            .await
            .unwrap();
        let expected = analysis.comparison_to_expected.unwrap();
        assert!((expected.expected_usd.min - 63_500.0).abs() < 1e-6);
        assert!(expected.meets_minimum);
    }

    #[test]
    fn test_data_quality_warnings() {
        let mut profile = CityCostProfile {
            city: "Boise".to_string(),
            country: "United States".to_string(),
            cost_of_living_index: 60.0,
            rent_index: None,
            groceries_index: None,
            transport_index: None,
            utilities_index: None,
            average_monthly_net_salary_usd: None,
            income_tax_rate: None,
            data_source: "country_average".to_string(),
            sample_size: 4,
            last_updated: Utc::now() - Duration::days(400),
        };
        let warnings = data_quality_warnings(&profile, "Boise");
        assert_eq!(warnings.len(), 3);
        assert!(warnings[0].contains("days old"));
        assert!(warnings[1].contains("only 4 data points"));
        assert!(warnings[2].contains("United States averages"));

        profile.data_source = "survey".to_string();
        profile.sample_size = 50;
        profile.last_updated = Utc::now();
        assert!(data_quality_warnings(&profile, "Boise").is_empty());
    }

    #[tokio::test]
    async fn test_location_warnings_carried_into_analysis() {
        let calc = fixed(100.0);
        let analysis = calc
            .calculate_enhanced_salary("$90,000", "Leipzig, Germany", WorkMode::Onsite, None)
            .await
            .unwrap();
        assert_eq!(analysis.location.city, "Berlin");
        assert!(analysis.warnings.iter().any(|w| w.contains("Leipzig")));
    }
}
