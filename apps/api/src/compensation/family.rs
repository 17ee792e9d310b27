//! Household cost multiplier relative to a single adult.

/// Added per additional household member.
const PER_MEMBER: f64 = 0.3;
/// Extra weight per dependent on top of the member cost (childcare, schooling).
const PER_DEPENDENT: f64 = 0.1;
pub const MAX_MULTIPLIER: f64 = 3.0;

/// `1 + 0.3 × max(size − 1, dependents) + 0.1 × dependents`, capped at 3.
///
/// A size of zero counts as a single adult, and dependents beyond the declared
/// household size still count as members.
pub fn calculate_family_multiplier(family_size: u32, dependents: u32) -> f64 {
    let additional_members = family_size.saturating_sub(1).max(dependents);
    let multiplier =
        1.0 + PER_MEMBER * f64::from(additional_members) + PER_DEPENDENT * f64::from(dependents);
    multiplier.min(MAX_MULTIPLIER)
}
