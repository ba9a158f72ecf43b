mod gates;
mod rules;

pub(crate) use gates::{activity_matches, legal_form_allowed, missing_fields};
pub use rules::NO_RULES_DETAIL;

use super::domain::{ApplicationSpec, EligibilityStatus, EvaluationResult, UserProfile};

/// Stateless evaluator comparing a profile against an application spec.
#[derive(Debug, Clone, Copy, Default)]
pub struct EligibilityEvaluator;

impl EligibilityEvaluator {
    pub fn evaluate(&self, spec: &ApplicationSpec, profile: &UserProfile) -> EvaluationResult {
        let missing_fields = gates::missing_fields(profile, &spec.required_fields);
        let missing_attachments =
            gates::missing_attachments(&profile.attachments, &spec.required_attachments);

        let (mut eligibility, mut details) = rules::assess_rules(profile, &spec.eligibility_rules);

        let legal_form_allowed =
            gates::legal_form_allowed(&profile.legal_form, &spec.allowed_legal_forms);
        if !legal_form_allowed {
            eligibility = EligibilityStatus::Unknown;
            details.push(format!(
                "legal form '{}' is not among the allowed forms ({})",
                profile.legal_form.trim(),
                spec.allowed_legal_forms.join(", ")
            ));
        }

        let activity_matched = gates::activity_matches(profile, &spec.required_activity_keywords);
        if !activity_matched {
            eligibility = EligibilityStatus::Unknown;
            details.push(format!(
                "activity does not match any of: {}",
                spec.required_activity_keywords.join(", ")
            ));
        }

        EvaluationResult {
            missing_fields,
            missing_attachments,
            eligibility,
            details,
            legal_form_allowed,
            activity_matched,
        }
    }
}
