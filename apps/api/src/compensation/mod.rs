//! Compensation analysis: salary parsing, currency normalization, tax, family
//! and comfort math on top of a resolved location.

pub mod calculator;
pub mod comfort;
pub mod cost_of_living;
pub mod currency;
pub mod family;
pub mod handlers;
pub mod models;
pub mod salary_parser;
pub mod tax;

pub use calculator::SalaryCalculator;
pub use cost_of_living::{
    CostOfLivingProvider, HttpCostOfLivingProvider, StaticCostOfLivingProvider,
};
pub use currency::StaticRateConverter;
