//! Catalog of open government programmes and the quick scan of a profile against them.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{SpecId, UserProfile};
use super::evaluation::{activity_matches, legal_form_allowed, missing_fields};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Opportunity {
    pub id: SpecId,
    pub title: String,
    pub platform: String,
    pub published_at: String,
    pub deadline: String,
    pub target_regions: Vec<String>,
    pub required_fields: Vec<String>,
    pub required_activity_keywords: Vec<String>,
    pub allowed_legal_forms: Vec<String>,
}

/// First failing check for an opportunity, in the order the scanner applies them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanReason {
    RequiredFieldsMissing,
    LegalFormNotSupported,
    ActivityNotMatched,
    Eligible,
}

impl ScanReason {
    pub const fn as_str(self) -> &'static str {
        match self {
            ScanReason::RequiredFieldsMissing => "required_fields_missing",
            ScanReason::LegalFormNotSupported => "legal_form_not_supported",
            ScanReason::ActivityNotMatched => "activity_not_matched",
            ScanReason::Eligible => "eligible",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpportunityStatus {
    pub opportunity: Opportunity,
    pub eligible: bool,
    pub missing_fields: Vec<String>,
    pub reason: ScanReason,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanResponse {
    pub generated_at: DateTime<Utc>,
    pub total: usize,
    pub items: Vec<OpportunityStatus>,
}

/// Application prepared from profile data for an opportunity the profile fully qualifies for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoApplicationDraft {
    pub application_id: String,
    pub opportunity_id: SpecId,
    pub title: String,
    pub platform: String,
    pub status: String,
    pub submitted_at: DateTime<Utc>,
    pub payload: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmsEvent {
    pub to_phone: String,
    pub message: String,
    pub related_opportunity_id: SpecId,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub generated_at: DateTime<Utc>,
    pub auto_submitted: Vec<AutoApplicationDraft>,
    pub pending_user_input: Vec<OpportunityStatus>,
    pub sms_queue: Vec<SmsEvent>,
}

pub const UNKNOWN_RECIPIENT: &str = "unknown";

#[derive(Debug, Clone)]
pub struct OpportunityScanner {
    catalog: Vec<Opportunity>,
}

impl Default for OpportunityScanner {
    fn default() -> Self {
        Self::new(standard_catalog())
    }
}

impl OpportunityScanner {
    pub fn new(catalog: Vec<Opportunity>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &[Opportunity] {
        &self.catalog
    }

    pub fn status_for(profile: &UserProfile, opportunity: &Opportunity) -> OpportunityStatus {
        let missing = missing_fields(profile, &opportunity.required_fields);
        let reason = if !missing.is_empty() {
            ScanReason::RequiredFieldsMissing
        } else if !legal_form_allowed(&profile.legal_form, &opportunity.allowed_legal_forms) {
            ScanReason::LegalFormNotSupported
        } else if !activity_matches(profile, &opportunity.required_activity_keywords) {
            ScanReason::ActivityNotMatched
        } else {
            ScanReason::Eligible
        };

        OpportunityStatus {
            opportunity: opportunity.clone(),
            eligible: reason == ScanReason::Eligible,
            missing_fields: missing,
            reason,
        }
    }

    pub fn scan(&self, profile: &UserProfile) -> ScanResponse {
        let items: Vec<OpportunityStatus> = self
            .catalog
            .iter()
            .map(|opportunity| Self::status_for(profile, opportunity))
            .collect();

        ScanResponse {
            generated_at: Utc::now(),
            total: items.len(),
            items,
        }
    }

    /// Draft every qualifying opportunity and queue one SMS per opportunity that needs input.
    pub fn analyze(&self, profile: &UserProfile) -> AnalyzeResponse {
        let now = Utc::now();
        let mut response = AnalyzeResponse {
            generated_at: now,
            auto_submitted: Vec::new(),
            pending_user_input: Vec::new(),
            sms_queue: Vec::new(),
        };

        for status in self.scan(profile).items {
            let opportunity = &status.opportunity;
            if status.eligible {
                response.auto_submitted.push(AutoApplicationDraft {
                    application_id: format!("draft-{}-{}", opportunity.id.0, now.timestamp()),
                    opportunity_id: opportunity.id.clone(),
                    title: opportunity.title.clone(),
                    platform: opportunity.platform.clone(),
                    status: "submitted".to_string(),
                    submitted_at: now,
                    payload: draft_payload(profile),
                });
                continue;
            }

            let missing = if status.missing_fields.is_empty() {
                status.reason.as_str().to_string()
            } else {
                status.missing_fields.join(", ")
            };
            let to_phone = match profile.phone.trim() {
                "" => UNKNOWN_RECIPIENT.to_string(),
                phone => phone.to_string(),
            };
            response.sms_queue.push(SmsEvent {
                to_phone,
                message: format!(
                    "Auto ariza uchun qo'shimcha ma'lumot kerak: {}. Yetishmayotgan: {missing}.",
                    opportunity.title
                ),
                related_opportunity_id: opportunity.id.clone(),
                created_at: now,
            });
            response.pending_user_input.push(status);
        }

        response
    }
}

fn draft_payload(profile: &UserProfile) -> BTreeMap<String, String> {
    [
        ("business_name", &profile.business_name),
        ("tin", &profile.tin),
        ("legal_form", &profile.legal_form),
        ("activity_type", &profile.activity_type),
        ("director_name", &profile.director_name),
        ("phone", &profile.phone),
        ("email", &profile.email),
        ("address", &profile.address),
        ("submitted_by", &profile.user_name),
    ]
    .into_iter()
    .map(|(key, value)| (key.to_string(), value.trim().to_string()))
    .collect()
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

pub fn standard_catalog() -> Vec<Opportunity> {
    vec![
        Opportunity {
            id: SpecId("app-2026-001".to_string()),
            title: "Ayollar tadbirkorligi uchun subsidiya".to_string(),
            platform: "my.gov.uz".to_string(),
            published_at: "2026-02-11T09:00:00Z".to_string(),
            deadline: "2026-03-15".to_string(),
            target_regions: strings(&["all"]),
            required_fields: strings(&[
                "business_name",
                "tin",
                "legal_form",
                "director_name",
                "phone",
                "activity_type",
            ]),
            required_activity_keywords: strings(&["ishlab chiqarish", "xizmat", "savdo"]),
            allowed_legal_forms: strings(&["YTT", "MCHJ"]),
        },
        Opportunity {
            id: SpecId("app-2026-002".to_string()),
            title: "Eksportyorlar uchun aylanma mablag' krediti".to_string(),
            platform: "lex.uz".to_string(),
            published_at: "2026-02-12T07:30:00Z".to_string(),
            deadline: "2026-02-28".to_string(),
            target_regions: strings(&["all"]),
            required_fields: strings(&[
                "business_name",
                "tin",
                "legal_form",
                "phone",
                "email",
                "address",
                "activity_type",
            ]),
            required_activity_keywords: strings(&["eksport", "logistika", "ishlab chiqarish"]),
            allowed_legal_forms: strings(&["MCHJ"]),
        },
        Opportunity {
            id: SpecId("app-2026-003".to_string()),
            title: "Yangi YTT uchun soliq imtiyozi arizasi".to_string(),
            platform: "soliq.uz".to_string(),
            published_at: "2026-02-10T13:00:00Z".to_string(),
            deadline: "2026-04-01".to_string(),
            target_regions: strings(&["all"]),
            required_fields: strings(&["business_name", "tin", "legal_form", "phone"]),
            required_activity_keywords: Vec::new(),
            allowed_legal_forms: strings(&["YTT"]),
        },
    ]
}
