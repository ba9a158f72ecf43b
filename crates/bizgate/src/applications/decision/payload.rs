use super::super::domain::{ApplicationSpec, PrefilledPayload, UserProfile};
use super::super::fields::{attachment_value, profile_value};

/// Every spec field (required and optional) the profile fills, plus every required attachment
/// the profile references, keyed by the name the spec declares.
pub fn build_payload(spec: &ApplicationSpec, profile: &UserProfile) -> PrefilledPayload {
    let mut payload = PrefilledPayload::default();

    for name in spec.required_fields.iter().chain(&spec.optional_fields) {
        if payload.fields.contains_key(name) {
            continue;
        }
        if let Some(value) = profile_value(profile, name).render() {
            payload.fields.insert(name.clone(), value);
        }
    }

    for name in &spec.required_attachments {
        if let Some(reference) = attachment_value(&profile.attachments, name) {
            payload
                .attachments
                .insert(name.clone(), reference.to_string());
        }
    }

    payload
}
