//! The ordered resolution stages. Each stage is a `ResolutionStrategy`; the
//! resolver tries them in order and the first `Resolved` outcome wins.

use crate::location::keywords::{
    contains_phrase, find_country_mention, find_timezone_hint, has_hybrid_keyword,
    has_remote_keyword, strip_hybrid_keywords,
};
use crate::location::models::{
    clamp_confidence, JobLocationContext, LocationResolution, ResolutionStage,
    UserLocationProfile, Warnings, WorkMode, GLOBAL_COUNTRY, REMOTE_CITY,
};
use crate::reference::{normalize_key, CountryProfile, ReferenceDataset, RegionLevel, Subdivision};

// ────────────────────────────────────────────────────────────────────────────
// Confidence calibration
// ────────────────────────────────────────────────────────────────────────────

const REMOTE_USER_PROFILE: f64 = 0.9;
const REMOTE_HINT: f64 = 0.7;
const REMOTE_DEFAULT: f64 = 0.5;
const HYBRID_PENALTY: f64 = 0.1;
const HYBRID_FLOOR: f64 = 0.5;
const HYBRID_USER_PROFILE: f64 = 0.6;
const REGION_USER_COUNTRY: f64 = 0.8;
const REGION_DEFAULT: f64 = 0.7;
const REGION_CONTINENT: f64 = 0.5;
const COUNTRY_ONLY: f64 = 0.8;
const MAJOR_CITY: f64 = 0.85;
const CITY_COUNTRY_MAJOR: f64 = 0.9;
const CITY_COUNTRY_DEFAULT: f64 = 0.75;
const CITY_STATE_COUNTRY_MAJOR: f64 = 0.95;
const CITY_STATE_COUNTRY_DEFAULT: f64 = 0.8;
const UNVERIFIED_COUNTRY: f64 = 0.6;
const COMPANY_HEADQUARTERS: f64 = 0.7;
const TERMINAL_USER_PROFILE: f64 = 0.3;
const TERMINAL_UNKNOWN: f64 = 0.2;
pub(crate) const ALTERNATIVE: f64 = 0.8;

// ────────────────────────────────────────────────────────────────────────────
// Stage plumbing
// ────────────────────────────────────────────────────────────────────────────

/// Everything a stage may read. Borrowed for the duration of one resolution.
pub(crate) struct ResolutionContext<'a> {
    pub job: &'a JobLocationContext,
    pub profile: Option<&'a UserLocationProfile>,
    pub dataset: &'a ReferenceDataset,
}

impl<'a> ResolutionContext<'a> {
    pub fn text(&self) -> &'a str {
        self.job.location.trim()
    }

    pub fn home(&self) -> Option<HomeLocation> {
        self.profile.and_then(|p| home_location(p, self.dataset))
    }
}

/// A stage's answer before it is stamped with the original input and the
/// accumulated warnings.
#[derive(Debug, Clone)]
pub(crate) struct Candidate {
    pub city: String,
    pub country: String,
    pub state: Option<String>,
    pub is_remote: bool,
    pub confidence: f64,
    pub stage: ResolutionStage,
    pub alternatives: Vec<LocationResolution>,
    pub notes: Warnings,
}

impl Candidate {
    fn new(
        city: impl Into<String>,
        country: impl Into<String>,
        state: Option<String>,
        confidence: f64,
        stage: ResolutionStage,
    ) -> Self {
        Self {
            city: city.into(),
            country: country.into(),
            state,
            is_remote: false,
            confidence,
            stage,
            alternatives: Vec::new(),
            notes: Warnings::default(),
        }
    }

    fn remote(mut self) -> Self {
        self.is_remote = true;
        self
    }

    fn note(mut self, warning: impl Into<String>) -> Self {
        self.notes.push(warning);
        self
    }

    fn global_sentinel(confidence: f64, stage: ResolutionStage) -> Self {
        Self::new(REMOTE_CITY, GLOBAL_COUNTRY, None, confidence, stage)
    }

    /// Stamps the candidate; `accumulated` warnings come first, then the
    /// candidate's own notes.
    pub fn into_resolution(self, original_input: &str, accumulated: Warnings) -> LocationResolution {
        let mut warnings = accumulated;
        warnings.append(self.notes);
        LocationResolution {
            city: self.city,
            country: self.country,
            state: self.state,
            is_remote: self.is_remote,
            confidence: clamp_confidence(self.confidence, 0.0),
            original_input: original_input.to_string(),
            stage: self.stage,
            alternatives: self.alternatives,
            warnings: warnings.into_vec(),
        }
    }
}

pub(crate) enum StageOutcome {
    Resolved(Candidate),
    /// Not applicable; try the next stage.
    Continue,
    /// Skip the remaining stages and go straight to the terminal fallback.
    Terminal,
}

pub(crate) trait ResolutionStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    fn attempt(&self, ctx: &ResolutionContext<'_>, warnings: &mut Warnings) -> StageOutcome;
}

/// The pipeline in precedence order. The terminal fallback is not a member: it
/// always succeeds and is applied by the resolver.
pub(crate) fn default_stages() -> Vec<Box<dyn ResolutionStrategy>> {
    vec![
        Box::new(RemoteStage),
        Box::new(HybridStage),
        Box::new(RegionStage),
        Box::new(StructuredStage),
        Box::new(MajorCityScanStage),
        Box::new(CompanyHeadquartersStage),
    ]
}

// ────────────────────────────────────────────────────────────────────────────
// User home location
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct HomeLocation {
    pub city: String,
    pub state: Option<String>,
    pub country: String,
}

/// Where the user lives, as far as the profile lets us tell. The city is kept
/// as written (canonical spelling when it is a tracked city); the country comes
/// from the profile, a country or state segment, or the major-city tables, and
/// is `Global` when none of those apply.
pub(crate) fn home_location(
    profile: &UserLocationProfile,
    dataset: &ReferenceDataset,
) -> Option<HomeLocation> {
    let declared_country = non_empty(profile.current_country.as_deref());
    let declared_state = non_empty(profile.current_state.as_deref());

    let Some(location) = non_empty(profile.current_location.as_deref()) else {
        let country = dataset.find_country(declared_country?)?;
        return Some(HomeLocation {
            city: country.default_city.clone(),
            state: declared_state.map(str::to_string),
            country: country.name.clone(),
        });
    };

    let segments: Vec<&str> = location
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    let (&city, rest) = segments.split_first()?;

    // Only a country name was given.
    if rest.is_empty() && declared_country.is_none() {
        if let Some(country) = dataset.find_country(city) {
            return Some(HomeLocation {
                city: country.default_city.clone(),
                state: declared_state.map(str::to_string),
                country: country.name.clone(),
            });
        }
    }

    let named_country = declared_country
        .or_else(|| rest.last().copied().filter(|s| dataset.find_country(s).is_some()))
        .map(|name| {
            dataset
                .find_country(name)
                .map_or_else(|| name.to_string(), |c| c.name.clone())
        });

    let subdivision = rest
        .iter()
        .copied()
        .chain(declared_state)
        .filter(|s| dataset.find_country(s).is_none())
        .find_map(|s| home_subdivision(s, city, named_country.as_deref(), dataset));

    let country = named_country
        .or_else(|| subdivision.map(|sub| sub.country.clone()))
        .or_else(|| {
            dataset
                .find_major_city_countries(city)
                .first()
                .map(|c| c.name.clone())
        })
        .or_else(|| rest.last().map(|s| s.to_string()))
        .unwrap_or_else(|| GLOBAL_COUNTRY.to_string());

    let city = dataset
        .canonical_city(city, &country)
        .unwrap_or(city)
        .to_string();
    let state = declared_state
        .map(str::to_string)
        .or_else(|| subdivision.map(|sub| sub.name.clone()));

    Some(HomeLocation { city, state, country })
}

/// A state or province in the user's location text, restricted to `country`
/// when one is already known.
fn home_subdivision<'a>(
    text: &str,
    city: &str,
    country: Option<&str>,
    dataset: &'a ReferenceDataset,
) -> Option<&'a Subdivision> {
    match country {
        Some(country) => dataset
            .find_subdivisions(text)
            .into_iter()
            .find(|sub| sub.country.eq_ignore_ascii_case(country)),
        None => pick_subdivision(text, city, dataset),
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn home_candidate(home: HomeLocation, confidence: f64, stage: ResolutionStage) -> Candidate {
    Candidate::new(home.city, home.country, home.state, confidence, stage)
}

// ────────────────────────────────────────────────────────────────────────────
// Stage 1: remote
// ────────────────────────────────────────────────────────────────────────────

pub(crate) struct RemoteStage;

/// A declared hybrid role is never treated as remote, and "partially remote"
/// style text counts as hybrid.
fn is_remote_context(job: &JobLocationContext) -> bool {
    match job.work_mode {
        WorkMode::Remote => true,
        WorkMode::Hybrid => false,
        WorkMode::Onsite => {
            has_remote_keyword(&job.location) && !has_hybrid_keyword(&job.location)
        }
    }
}

impl ResolutionStrategy for RemoteStage {
    fn name(&self) -> &'static str {
        "remote"
    }

    fn attempt(&self, ctx: &ResolutionContext<'_>, _warnings: &mut Warnings) -> StageOutcome {
        if !is_remote_context(ctx.job) {
            return StageOutcome::Continue;
        }

        if let Some(home) = ctx.home() {
            return StageOutcome::Resolved(
                home_candidate(home, REMOTE_USER_PROFILE, ResolutionStage::UserProfile).remote(),
            );
        }

        let text = ctx.text();
        if let Some((abbr, tz)) = find_timezone_hint(text, ctx.dataset) {
            return StageOutcome::Resolved(
                Candidate::new(
                    tz.city.clone(),
                    tz.country.clone(),
                    None,
                    REMOTE_HINT,
                    ResolutionStage::RegionMapping,
                )
                .remote()
                .note(format!(
                    "Remote role: location inferred from the {abbr} timezone ({})",
                    tz.city
                )),
            );
        }

        if let Some(country) = find_country_mention(text, ctx.dataset) {
            return StageOutcome::Resolved(
                Candidate::new(
                    country.default_city.clone(),
                    country.name.clone(),
                    None,
                    REMOTE_HINT,
                    ResolutionStage::RegionMapping,
                )
                .remote()
                .note(format!(
                    "Remote role in {}: using {} as the reference city",
                    country.name, country.default_city
                )),
            );
        }

        StageOutcome::Resolved(
            Candidate::global_sentinel(REMOTE_DEFAULT, ResolutionStage::RemoteDefault)
                .remote()
                .note("Remote role with no location hints; add your location to your profile for local cost data"),
        )
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Stage 2: hybrid
// ────────────────────────────────────────────────────────────────────────────

pub(crate) struct HybridStage;

impl ResolutionStrategy for HybridStage {
    fn name(&self) -> &'static str {
        "hybrid"
    }

    fn attempt(&self, ctx: &ResolutionContext<'_>, warnings: &mut Warnings) -> StageOutcome {
        let text = ctx.text();
        if ctx.job.work_mode != WorkMode::Hybrid && !has_hybrid_keyword(text) {
            return StageOutcome::Continue;
        }

        let office = strip_hybrid_keywords(text);
        let home_country = ctx.home().map(|h| h.country);
        if let Some(mut candidate) = parse_structured(&office, ctx.dataset, home_country.as_deref()) {
            candidate.is_remote = false;
            candidate.confidence = (candidate.confidence - HYBRID_PENALTY).max(HYBRID_FLOOR);
            let city = candidate.city.clone();
            return StageOutcome::Resolved(candidate.note(format!(
                "Hybrid role: calculations use the office location ({city})"
            )));
        }

        if let Some(home) = ctx.home() {
            return StageOutcome::Resolved(
                home_candidate(home, HYBRID_USER_PROFILE, ResolutionStage::UserProfile).note(
                    "Hybrid role without a recognizable office location; using your location. Confirm the actual office location",
                ),
            );
        }

        warnings.push("Hybrid role without a recognizable office location");
        StageOutcome::Terminal
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Stage 3: vague / regional text
// ────────────────────────────────────────────────────────────────────────────

pub(crate) struct RegionStage;

impl ResolutionStrategy for RegionStage {
    fn name(&self) -> &'static str {
        "region"
    }

    fn attempt(&self, ctx: &ResolutionContext<'_>, _warnings: &mut Warnings) -> StageOutcome {
        let text = ctx.text();
        let Some(region) = ctx.dataset.find_region_default(text) else {
            return StageOutcome::Continue;
        };

        if let Some(home) = ctx.home().filter(|h| region.contains_country(&h.country)) {
            let note = format!(
                "'{text}' is a regional posting; using your location in {}",
                home.country
            );
            return StageOutcome::Resolved(
                home_candidate(home, REGION_USER_COUNTRY, ResolutionStage::RegionMapping).note(note),
            );
        }

        let confidence = match region.level {
            RegionLevel::Continent => REGION_CONTINENT,
            RegionLevel::Country | RegionLevel::CountryGroup => REGION_DEFAULT,
        };
        StageOutcome::Resolved(
            Candidate::new(
                region.default_city.clone(),
                region.default_country.clone(),
                None,
                confidence,
                ResolutionStage::RegionMapping,
            )
            .note(format!(
                "'{text}' is a regional posting; using {} as the reference city",
                region.default_city
            )),
        )
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Stage 4: structured "City, State, Country" parse
// ────────────────────────────────────────────────────────────────────────────

pub(crate) struct StructuredStage;

impl ResolutionStrategy for StructuredStage {
    fn name(&self) -> &'static str {
        "structured"
    }

    fn attempt(&self, ctx: &ResolutionContext<'_>, _warnings: &mut Warnings) -> StageOutcome {
        let home_country = ctx.home().map(|h| h.country);
        match parse_structured(ctx.text(), ctx.dataset, home_country.as_deref()) {
            Some(candidate) => StageOutcome::Resolved(candidate),
            None => StageOutcome::Continue,
        }
    }
}

/// Parses comma-separated location text. `preferred_country` breaks ties when
/// a bare city name is a major city in several countries.
pub(crate) fn parse_structured(
    text: &str,
    dataset: &ReferenceDataset,
    preferred_country: Option<&str>,
) -> Option<Candidate> {
    let segments: Vec<&str> = text
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    match segments.as_slice() {
        [] => None,
        [single] => parse_single_segment(single, dataset, preferred_country),
        [city, region] => {
            if let Some(country) = dataset.find_country(region) {
                return Some(city_in_country(
                    city,
                    country,
                    None,
                    dataset,
                    CITY_COUNTRY_MAJOR,
                    CITY_COUNTRY_DEFAULT,
                ));
            }
            if let Some(sub) = pick_subdivision(region, city, dataset) {
                let country = dataset.find_country(&sub.country)?;
                return Some(city_in_country(
                    city,
                    country,
                    Some(sub.name.clone()),
                    dataset,
                    CITY_COUNTRY_MAJOR,
                    CITY_COUNTRY_DEFAULT,
                ));
            }
            Some(unverified(city, region, None))
        }
        [city, middle @ .., last] => {
            let state = middle.first().map(|s| {
                pick_subdivision(s, city, dataset)
                    .map(|sub| sub.name.clone())
                    .unwrap_or_else(|| s.to_string())
            });
            match dataset.find_country(last) {
                Some(country) => Some(city_in_country(
                    city,
                    country,
                    state,
                    dataset,
                    CITY_STATE_COUNTRY_MAJOR,
                    CITY_STATE_COUNTRY_DEFAULT,
                )),
                None => Some(unverified(city, last, state)),
            }
        }
    }
}

fn parse_single_segment(
    segment: &str,
    dataset: &ReferenceDataset,
    preferred_country: Option<&str>,
) -> Option<Candidate> {
    if let Some(country) = dataset.find_country(segment) {
        return Some(Candidate::new(
            country.default_city.clone(),
            country.name.clone(),
            None,
            COUNTRY_ONLY,
            ResolutionStage::ExactMatch,
        ));
    }

    let matches = dataset.find_major_city_countries(segment);
    let chosen = matches
        .iter()
        .position(|c| preferred_country.is_some_and(|p| c.name.eq_ignore_ascii_case(p)))
        .unwrap_or(0);
    let country = *matches.get(chosen)?;
    let city = dataset
        .canonical_city(segment, &country.name)
        .unwrap_or(segment)
        .to_string();

    let mut candidate = Candidate::new(
        city.clone(),
        country.name.clone(),
        None,
        MAJOR_CITY,
        ResolutionStage::MajorCity,
    );
    if matches.len() > 1 {
        candidate.alternatives = matches
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != chosen)
            .map(|(_, c)| alternative(dataset, segment, segment, c, false))
            .collect();
        candidate = candidate.note(format!(
            "'{segment}' is a major city in several countries; assumed {city}, {}",
            country.name
        ));
    }
    Some(candidate)
}

fn city_in_country(
    city: &str,
    country: &CountryProfile,
    state: Option<String>,
    dataset: &ReferenceDataset,
    major_confidence: f64,
    default_confidence: f64,
) -> Candidate {
    match dataset.canonical_city(city, &country.name) {
        Some(canonical) => Candidate::new(
            canonical,
            country.name.clone(),
            state,
            major_confidence,
            ResolutionStage::ExactMatch,
        ),
        None => Candidate::new(
            country.default_city.clone(),
            country.name.clone(),
            None,
            default_confidence,
            ResolutionStage::ExactMatch,
        )
        .note(format!(
            "'{city}' is not a tracked city in {}; using {} instead",
            country.name, country.default_city
        )),
    }
}

fn unverified(city: &str, country: &str, state: Option<String>) -> Candidate {
    Candidate::new(city, country, state, UNVERIFIED_COUNTRY, ResolutionStage::Fallback)
        .note(format!("Could not verify country '{country}'; using the location as written"))
}

/// Resolves a state/province name or code; ambiguous codes ("WA") prefer the
/// country that lists `city` as a major city.
fn pick_subdivision<'a>(
    text: &str,
    city: &str,
    dataset: &'a ReferenceDataset,
) -> Option<&'a Subdivision> {
    let candidates = dataset.find_subdivisions(text);
    candidates
        .iter()
        .find(|s| dataset.is_major_city(city, &s.country))
        .or_else(|| candidates.first())
        .copied()
}

pub(crate) fn alternative(
    dataset: &ReferenceDataset,
    original_input: &str,
    city: &str,
    country: &CountryProfile,
    is_remote: bool,
) -> LocationResolution {
    let city = dataset
        .canonical_city(city, &country.name)
        .unwrap_or(city)
        .to_string();
    LocationResolution {
        city,
        country: country.name.clone(),
        state: None,
        is_remote,
        confidence: ALTERNATIVE,
        original_input: original_input.to_string(),
        stage: ResolutionStage::MajorCity,
        alternatives: Vec::new(),
        warnings: Vec::new(),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Stage 5: major city named somewhere in free text
// ────────────────────────────────────────────────────────────────────────────

pub(crate) struct MajorCityScanStage;

impl ResolutionStrategy for MajorCityScanStage {
    fn name(&self) -> &'static str {
        "major_city"
    }

    fn attempt(&self, ctx: &ResolutionContext<'_>, _warnings: &mut Warnings) -> StageOutcome {
        let normalized = normalize_key(ctx.text());
        let found = ctx
            .dataset
            .major_cities_longest_first()
            .into_iter()
            .find(|(city, _)| contains_phrase(&normalized, &normalize_key(city)));

        match found {
            Some((city, country)) => StageOutcome::Resolved(Candidate::new(
                city,
                country.name.clone(),
                None,
                MAJOR_CITY,
                ResolutionStage::MajorCity,
            )),
            None => StageOutcome::Continue,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Stage 6: company headquarters
// ────────────────────────────────────────────────────────────────────────────

pub(crate) struct CompanyHeadquartersStage;

impl ResolutionStrategy for CompanyHeadquartersStage {
    fn name(&self) -> &'static str {
        "company_headquarters"
    }

    fn attempt(&self, ctx: &ResolutionContext<'_>, _warnings: &mut Warnings) -> StageOutcome {
        let Some(company) = non_empty(ctx.job.company_name.as_deref()) else {
            return StageOutcome::Continue;
        };
        let Some(hq) = ctx.dataset.find_company(company) else {
            return StageOutcome::Continue;
        };

        StageOutcome::Resolved(
            Candidate::new(
                hq.city.clone(),
                hq.country.clone(),
                hq.state.clone(),
                COMPANY_HEADQUARTERS,
                ResolutionStage::Fallback,
            )
            .note(format!(
                "Location inferred from {} headquarters in {}",
                hq.company, hq.city
            )),
        )
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Stage 7: terminal fallback
// ────────────────────────────────────────────────────────────────────────────

pub(crate) fn terminal_fallback(ctx: &ResolutionContext<'_>) -> Candidate {
    let text = ctx.text();
    match ctx.home() {
        Some(home) => home_candidate(home, TERMINAL_USER_PROFILE, ResolutionStage::Fallback).note(
            format!("Could not resolve '{text}'; falling back to your profile location"),
        ),
        None => Candidate::global_sentinel(TERMINAL_UNKNOWN, ResolutionStage::Fallback)
            .note(format!("Could not determine a location from '{text}'")),
    }
}
