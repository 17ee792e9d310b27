//! Location resolver — runs the stage pipeline and post-validates results.
//!
//! Flow: remote → hybrid → region → structured parse → major-city scan →
//! company HQ → terminal fallback. First stage to resolve wins.

use std::sync::Arc;

use tracing::debug;

use crate::location::keywords::{strip_hybrid_keywords, strip_remote_keywords};
use crate::location::models::{
    clamp_confidence, JobLocationContext, LocationResolution, UserLocationProfile, Warnings,
    WorkMode,
};
use crate::location::stages::{
    alternative, default_stages, home_location, terminal_fallback, ResolutionContext,
    ResolutionStrategy, StageOutcome,
};
use crate::reference::ReferenceDataset;

/// Penalty when the resolved country is missing from the reference data.
const UNKNOWN_COUNTRY_PENALTY: f64 = 0.2;
/// Penalty when an on-site city has no city-specific data.
const NON_MAJOR_CITY_PENALTY: f64 = 0.1;
/// Lowest confidence a validated resolution can carry.
pub const MIN_CONFIDENCE: f64 = 0.05;
const MAX_ALTERNATIVES: usize = 5;

pub struct LocationResolver {
    dataset: Arc<ReferenceDataset>,
    stages: Vec<Box<dyn ResolutionStrategy>>,
}

impl LocationResolver {
    pub fn new(dataset: Arc<ReferenceDataset>) -> Self {
        Self {
            dataset,
            stages: default_stages(),
        }
    }

    pub fn dataset(&self) -> &ReferenceDataset {
        &self.dataset
    }

    /// Resolves a job's location text into a canonical location.
    pub fn resolve_location(
        &self,
        job: &JobLocationContext,
        profile: Option<&UserLocationProfile>,
    ) -> LocationResolution {
        let ctx = ResolutionContext {
            job,
            profile,
            dataset: &self.dataset,
        };
        let mut warnings = Warnings::default();

        for stage in &self.stages {
            match stage.attempt(&ctx, &mut warnings) {
                StageOutcome::Resolved(candidate) => {
                    debug!(
                        "Resolved '{}' ({}) via {} stage → {}, {}",
                        job.location,
                        job.work_mode,
                        stage.name(),
                        candidate.city,
                        candidate.country
                    );
                    return candidate.into_resolution(&job.location, warnings);
                }
                StageOutcome::Continue => {}
                StageOutcome::Terminal => {
                    debug!("{} stage short-circuited to terminal fallback", stage.name());
                    break;
                }
            }
        }

        debug!("No stage resolved '{}'; using terminal fallback", job.location);
        terminal_fallback(&ctx).into_resolution(&job.location, warnings)
    }

    /// Sanity-checks a resolution against the reference data, lowering
    /// confidence (never below `MIN_CONFIDENCE`) and adding warnings.
    pub fn validate_location(&self, resolution: LocationResolution) -> LocationResolution {
        if resolution.is_global_sentinel() {
            return resolution;
        }

        let mut validated = resolution;
        let mut confidence = validated.confidence;

        match self.dataset.find_country(&validated.country) {
            Some(country) => validated.country = country.name.clone(),
            None => {
                confidence -= UNKNOWN_COUNTRY_PENALTY;
                validated.warnings.push(format!(
                    "Country '{}' is not in the reference data; cost estimates may be unavailable",
                    validated.country
                ));
            }
        }

        if !validated.is_remote
            && !self
                .dataset
                .is_major_city(&validated.city, &validated.country)
        {
            confidence -= NON_MAJOR_CITY_PENALTY;
            validated.warnings.push(format!(
                "No city-specific data for '{}'; country averages will be used instead",
                validated.city
            ));
        }

        validated.confidence = clamp_confidence(confidence, MIN_CONFIDENCE);
        validated
    }

    /// Candidate locations for a bare city name shared by several countries,
    /// the user's home country first. Empty when there is nothing to choose.
    pub fn get_location_alternatives(
        &self,
        job: &JobLocationContext,
        profile: Option<&UserLocationProfile>,
    ) -> Vec<LocationResolution> {
        let city = strip_remote_keywords(&strip_hybrid_keywords(&job.location));
        if city.is_empty() || city.contains(',') || self.dataset.find_country(&city).is_some() {
            return Vec::new();
        }

        let mut countries = self.dataset.find_major_city_countries(&city);
        if countries.len() < 2 {
            return Vec::new();
        }

        if let Some(home) = profile.and_then(|p| home_location(p, &self.dataset)) {
            // stable: the rest keep dataset order
            countries.sort_by_key(|c| !c.name.eq_ignore_ascii_case(&home.country));
        }

        let is_remote = job.work_mode == WorkMode::Remote;
        countries
            .into_iter()
            .take(MAX_ALTERNATIVES)
            .map(|country| alternative(&self.dataset, &job.location, &city, country, is_remote))
            .collect()
    }
}
