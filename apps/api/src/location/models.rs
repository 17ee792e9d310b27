use std::fmt;

use serde::{Deserialize, Serialize};

/// City used by the "no usable location" sentinel.
pub const REMOTE_CITY: &str = "Remote";
/// Country used by the "no usable location" sentinel.
pub const GLOBAL_COUNTRY: &str = "Global";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkMode {
    Remote,
    Hybrid,
    #[serde(alias = "on-site", alias = "on_site")]
    Onsite,
}

impl fmt::Display for WorkMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remote => write!(f, "remote"),
            Self::Hybrid => write!(f, "hybrid"),
            Self::Onsite => write!(f, "onsite"),
        }
    }
}

/// The location-related part of a job posting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobLocationContext {
    pub location: String,
    pub work_mode: WorkMode,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub job_title: Option<String>,
}

impl JobLocationContext {
    pub fn new(location: impl Into<String>, work_mode: WorkMode) -> Self {
        Self {
            location: location.into(),
            work_mode,
            company_name: None,
            job_title: None,
        }
    }

    #[cfg(test)]
    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company_name = Some(company.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaritalStatus {
    Single,
    Married,
    DomesticPartnership,
    Divorced,
    Widowed,
}

impl MaritalStatus {
    /// Whether the household has a second adult by default.
    pub fn is_partnered(self) -> bool {
        matches!(self, Self::Married | Self::DomesticPartnership)
    }
}

/// Annual salary expectation, in the profile's preferred currency.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SalaryExpectation {
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UserLocationProfile {
    pub current_location: Option<String>,
    pub current_country: Option<String>,
    pub current_state: Option<String>,
    pub family_size: Option<u32>,
    pub dependents: Option<u32>,
    pub marital_status: Option<MaritalStatus>,
    pub expected_salary: Option<SalaryExpectation>,
    /// Annual, in `preferred_currency`.
    pub current_salary: Option<f64>,
    pub preferred_currency: Option<String>,
    pub willing_to_relocate: bool,
}

impl UserLocationProfile {
    #[cfg(test)]
    pub fn at(location: impl Into<String>) -> Self {
        Self {
            current_location: Some(location.into()),
            ..Self::default()
        }
    }

    /// Household size; a partnered user with no declared size counts as two.
    pub fn household_size(&self) -> u32 {
        match (self.family_size, self.marital_status) {
            (Some(size), _) => size.max(1),
            (None, Some(status)) if status.is_partnered() => 2,
            _ => 1,
        }
    }

    pub fn dependents(&self) -> u32 {
        self.dependents.unwrap_or(0)
    }
}

/// Which tier of the resolution pipeline produced a location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionStage {
    ExactMatch,
    RegionMapping,
    MajorCity,
    UserProfile,
    Fallback,
    RemoteDefault,
}

impl fmt::Display for ResolutionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::ExactMatch => "exact_match",
            Self::RegionMapping => "region_mapping",
            Self::MajorCity => "major_city",
            Self::UserProfile => "user_profile",
            Self::Fallback => "fallback",
            Self::RemoteDefault => "remote_default",
        };
        write!(f, "{label}")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationResolution {
    pub city: String,
    pub country: String,
    pub state: Option<String>,
    pub is_remote: bool,
    /// 0.0 – 1.0
    pub confidence: f64,
    pub original_input: String,
    pub stage: ResolutionStage,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alternatives: Vec<LocationResolution>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl LocationResolution {
    /// True for the `Remote/Global` "nothing usable" result.
    pub fn is_global_sentinel(&self) -> bool {
        self.city == REMOTE_CITY && self.country == GLOBAL_COUNTRY
    }

    pub fn display_name(&self) -> String {
        match &self.state {
            Some(state) => format!("{}, {}, {}", self.city, state, self.country),
            None => format!("{}, {}", self.city, self.country),
        }
    }
}

/// Advisory messages collected while resolving or analysing. Appending is the
/// only operation; nothing is ever removed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Warnings(Vec<String>);

impl Warnings {
    pub fn push(&mut self, warning: impl Into<String>) {
        self.0.push(warning.into());
    }

    /// Concatenates `other` after the existing messages.
    pub fn append(&mut self, other: Warnings) {
        self.0.extend(other.0);
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

impl Extend<String> for Warnings {
    fn extend<I: IntoIterator<Item = String>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl FromIterator<String> for Warnings {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Rounds to two decimals and clamps into `[floor, 1.0]`.
pub(crate) fn clamp_confidence(value: f64, floor: f64) -> f64 {
    if !value.is_finite() {
        return floor;
    }
    ((value * 100.0).round() / 100.0).clamp(floor, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_work_mode_serde_accepts_on_site_spelling() {
        let mode: WorkMode = serde_json::from_str(r#""on-site""#).unwrap();
        assert_eq!(mode, WorkMode::Onsite);
        let mode: WorkMode = serde_json::from_str(r#""remote""#).unwrap();
        assert_eq!(mode, WorkMode::Remote);
    }

    #[test]
    fn test_stage_serializes_snake_case() {
        let json = serde_json::to_string(&ResolutionStage::RemoteDefault).unwrap();
        assert_eq!(json, r#""remote_default""#);
        assert_eq!(ResolutionStage::UserProfile.to_string(), "user_profile");
    }

    #[test]
    fn test_household_size_defaults() {
        assert_eq!(UserLocationProfile::default().household_size(), 1);

        let married = UserLocationProfile {
            marital_status: Some(MaritalStatus::Married),
            ..Default::default()
        };
        assert_eq!(married.household_size(), 2);

        let declared = UserLocationProfile {
            family_size: Some(4),
            marital_status: Some(MaritalStatus::Married),
            ..Default::default()
        };
        assert_eq!(declared.household_size(), 4);

        let zero = UserLocationProfile {
            family_size: Some(0),
            ..Default::default()
        };
        assert_eq!(zero.household_size(), 1);
    }

    #[test]
    fn test_profile_deserializes_with_missing_fields() {
        let profile: UserLocationProfile =
            serde_json::from_str(r#"{"current_location": "Austin, TX"}"#).unwrap();
        assert_eq!(profile.current_location.as_deref(), Some("Austin, TX"));
        assert!(!profile.willing_to_relocate);
        assert_eq!(profile.dependents(), 0);
    }

    #[test]
    fn test_warnings_append_preserves_order() {
        let mut first: Warnings = vec!["a".to_string()].into_iter().collect();
        let mut second = Warnings::default();
        second.push("b");
        second.push("c");
        first.append(second);
        assert_eq!(first.into_vec(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_clamp_confidence() {
        assert_eq!(clamp_confidence(0.9 - 0.1, 0.0), 0.8);
        assert_eq!(clamp_confidence(-0.3, 0.05), 0.05);
        assert_eq!(clamp_confidence(1.7, 0.0), 1.0);
        assert_eq!(clamp_confidence(f64::NAN, 0.05), 0.05);
    }

    #[test]
    fn test_sentinel_detection() {
        let res = LocationResolution {
            city: REMOTE_CITY.to_string(),
            country: GLOBAL_COUNTRY.to_string(),
            state: None,
            is_remote: true,
            confidence: 0.5,
            original_input: "Remote".to_string(),
            stage: ResolutionStage::RemoteDefault,
            alternatives: vec![],
            warnings: vec![],
        };
        assert!(res.is_global_sentinel());
        assert_eq!(res.display_name(), "Remote, Global");
    }
}
