//! SMS bodies asking the applicant to complete an application.

use super::domain::{ApplicationSpec, EvaluationResult, SpecKind, StatusHint};

const COMPACT_LIST_LIMIT: usize = 4;
const GENERIC_MISSING: &str = "Qo'shimcha ma'lumot kerak";
const UNTITLED: &str = "Ariza";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmsStyle {
    /// Full lists, title and completion link only.
    Plain,
    /// Lists capped at four entries, with status notes and the service link.
    Compact,
}

impl SmsStyle {
    pub fn for_kind(kind: SpecKind) -> Self {
        match kind {
            SpecKind::Benefit => SmsStyle::Plain,
            SpecKind::Tax => SmsStyle::Compact,
        }
    }
}

/// Everything the composer needs to know about one application.
#[derive(Debug, Clone, Copy)]
pub struct NotificationContext<'a> {
    pub title: &'a str,
    pub missing_fields: &'a [String],
    pub missing_attachments: &'a [String],
    pub requires_digital_signature: bool,
    pub status_unclear: bool,
    pub service_url: Option<&'a str>,
}

impl<'a> NotificationContext<'a> {
    pub fn new(spec: &'a ApplicationSpec, evaluation: &'a EvaluationResult) -> Self {
        Self {
            title: &spec.title,
            missing_fields: &evaluation.missing_fields,
            missing_attachments: &evaluation.missing_attachments,
            requires_digital_signature: spec.requires_digital_signature,
            status_unclear: spec.status_hint == StatusHint::Unclear,
            service_url: spec.service_url.as_deref(),
        }
    }
}

/// Compose the SMS body. Never fails: empty inputs fall back to generic wording.
pub fn compose_sms(
    context: &NotificationContext<'_>,
    completion_url: &str,
    style: SmsStyle,
) -> String {
    let limit = match style {
        SmsStyle::Plain => None,
        SmsStyle::Compact => Some(COMPACT_LIST_LIMIT),
    };

    let mut clauses = Vec::new();
    if let Some(fields) = join_names(context.missing_fields, limit) {
        clauses.push(format!("maydonlar: {fields}"));
    }
    if let Some(attachments) = join_names(context.missing_attachments, limit) {
        clauses.push(format!("hujjatlar: {attachments}"));
    }

    let title = match context.title.trim() {
        "" => UNTITLED,
        title => title,
    };
    let mut sentences = vec![title.to_string()];
    if clauses.is_empty() {
        sentences.push(GENERIC_MISSING.to_string());
    } else {
        sentences.push(format!("Kerakli ma'lumotlar ({})", clauses.join("; ")));
    }

    if style == SmsStyle::Compact {
        if context.requires_digital_signature {
            sentences.push("ERI talab qilinadi".to_string());
        }
        if context.status_unclear {
            sentences.push("Xizmat holati aniq emas".to_string());
        }
        let service_url = context
            .service_url
            .map(str::trim)
            .filter(|url| !url.is_empty());
        if let Some(service_url) = service_url {
            sentences.push(format!("Xizmat: {service_url}"));
        }
    }

    let completion_url = completion_url.trim();
    if !completion_url.is_empty() {
        sentences.push(format!("To'ldirish: {completion_url}"));
    }

    sentences.join(". ")
}

fn join_names(names: &[String], limit: Option<usize>) -> Option<String> {
    let names: Vec<&str> = names
        .iter()
        .map(|name| name.trim())
        .filter(|name| !name.is_empty())
        .collect();
    if names.is_empty() {
        return None;
    }

    let shown = limit.map_or(names.len(), |limit| limit.min(names.len()));
    let mut joined = names[..shown].join(", ");
    if shown < names.len() {
        joined.push_str(&format!(" +{}", names.len() - shown));
    }
    Some(joined)
}
