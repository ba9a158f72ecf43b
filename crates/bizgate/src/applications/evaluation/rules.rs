use super::super::domain::{EligibilityRule, EligibilityStatus, UserProfile};
use super::super::fields::profile_value;

pub const NO_RULES_DETAIL: &str =
    "no eligibility rules defined; eligibility cannot be confirmed automatically";

/// Rule-based eligibility. Absence of rules never counts as eligible.
pub(crate) fn assess_rules(
    profile: &UserProfile,
    rules: &[EligibilityRule],
) -> (EligibilityStatus, Vec<String>) {
    if rules.is_empty() {
        return (EligibilityStatus::Unknown, vec![NO_RULES_DETAIL.to_string()]);
    }

    let details: Vec<String> = rules
        .iter()
        .filter_map(|rule| {
            let field = rule.requires_field.as_deref()?;
            if profile_value(profile, field).is_present() {
                return None;
            }
            let label = if rule.description.trim().is_empty() {
                rule.id.as_str()
            } else {
                rule.description.trim()
            };
            Some(format!("{label}: profile field '{field}' is not provided"))
        })
        .collect();

    if details.is_empty() {
        (EligibilityStatus::Eligible, details)
    } else {
        (EligibilityStatus::Unknown, details)
    }
}
