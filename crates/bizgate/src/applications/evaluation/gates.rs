use super::super::domain::{Attachments, UserProfile};
use super::super::fields::{attachment_value, profile_value};

/// Required field names the profile does not fill, in spec order.
pub(crate) fn missing_fields(profile: &UserProfile, required: &[String]) -> Vec<String> {
    required
        .iter()
        .filter(|name| !profile_value(profile, name).is_present())
        .cloned()
        .collect()
}

pub(crate) fn missing_attachments(attachments: &Attachments, required: &[String]) -> Vec<String> {
    required
        .iter()
        .filter(|name| attachment_value(attachments, name).is_none())
        .cloned()
        .collect()
}

/// Case-insensitive membership; an empty allow-list admits every form.
pub(crate) fn legal_form_allowed(legal_form: &str, allowed: &[String]) -> bool {
    if allowed.is_empty() {
        return true;
    }
    let form = legal_form.trim().to_uppercase();
    allowed
        .iter()
        .any(|candidate| candidate.trim().to_uppercase() == form)
}

/// Case-insensitive substring match against the activity description and OKED codes.
/// An empty keyword list always passes.
pub(crate) fn activity_matches(profile: &UserProfile, keywords: &[String]) -> bool {
    if keywords.is_empty() {
        return true;
    }
    let haystack =
        format!("{} {}", profile.activity_type, profile.oked_codes.join(" ")).to_lowercase();
    keywords
        .iter()
        .map(|keyword| keyword.trim().to_lowercase())
        .filter(|keyword| !keyword.is_empty())
        .any(|keyword| haystack.contains(&keyword))
}
