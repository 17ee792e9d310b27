use serde::{Deserialize, Serialize};

use crate::compensation::cost_of_living::CityCostProfile;
use crate::compensation::salary_parser::PayPeriod;
use crate::location::LocationResolution;

/// Annual amounts unless stated otherwise. Always `min <= max`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SalaryRange {
    pub min: f64,
    pub max: f64,
}

impl SalaryRange {
    pub fn new(a: f64, b: f64) -> Self {
        if a <= b {
            Self { min: a, max: b }
        } else {
            Self { min: b, max: a }
        }
    }

    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }

    /// Multiplies both ends by a non-negative factor.
    pub fn scale(&self, factor: f64) -> Self {
        Self::new(self.min * factor, self.max * factor)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FamilyAdjustment {
    pub family_size: u32,
    pub dependents: u32,
    pub multiplier: f64,
    /// Annual USD.
    pub dependents_cost: f64,
    /// Annual single-person cost of living at this location, USD.
    pub local_baseline: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpectedSalaryComparison {
    /// Expected range converted to annual USD.
    pub expected_usd: SalaryRange,
    pub meets_minimum: bool,
    /// Offered midpoint as a percentage of the expected minimum.
    pub percentage_of_minimum: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentSalaryComparison {
    pub current_usd: f64,
    pub is_raise: bool,
    /// Offered midpoint minus current salary, USD.
    pub increase: f64,
    pub percentage_increase: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnhancedSalaryAnalysis {
    /// As written, in `original_currency` per `pay_period`.
    pub original: SalaryRange,
    pub original_currency: String,
    pub pay_period: PayPeriod,
    /// Annualized, USD.
    pub normalized_usd: SalaryRange,
    /// Normalized scaled to a cost-of-living index of 100.
    pub cost_of_living_adjusted: SalaryRange,
    /// Normalized after the estimated effective tax.
    pub net: SalaryRange,
    /// Effective rate, percent.
    pub tax_estimate: f64,
    pub family_adjustment: FamilyAdjustment,
    /// 0 – 100, single person.
    pub comfort_score: f64,
    /// 0 – 100, whole household.
    pub family_comfort_score: f64,
    /// Net midpoint left after household costs; negative means a shortfall.
    pub family_savings_potential: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison_to_expected: Option<ExpectedSalaryComparison>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison_to_current: Option<CurrentSalaryComparison>,
    pub recommendations: Vec<String>,
    pub warnings: Vec<String>,
    pub location: LocationResolution,
    pub cost_profile: CityCostProfile,
}
