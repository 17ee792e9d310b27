//! Location resolution: turns free-form job-location text, the declared work
//! mode and the user's profile into a canonical city/country with a
//! calibrated confidence.

pub mod handlers;
pub mod keywords;
pub mod models;
pub mod resolver;
mod stages;

pub use models::{
    JobLocationContext, LocationResolution, UserLocationProfile, WorkMode, GLOBAL_COUNTRY,
};
pub use resolver::LocationResolver;
