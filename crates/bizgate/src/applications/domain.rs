use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of an application spec (benefit, tax relief, opportunity).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpecId(pub String);

/// Identifier of the business owner an application belongs to.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl fmt::Display for SpecId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Business owner profile as submitted by the client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserProfile {
    #[serde(alias = "name", alias = "userName")]
    pub user_name: String,
    #[serde(alias = "businessName")]
    pub business_name: String,
    pub tin: String,
    #[serde(alias = "legalForm")]
    pub legal_form: String,
    #[serde(alias = "directorName")]
    pub director_name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub region: String,
    #[serde(alias = "activityType")]
    pub activity_type: String,
    #[serde(alias = "okedCodes")]
    pub oked_codes: Vec<String>,
    #[serde(alias = "employeeCount")]
    pub employee_count: Option<u32>,
    #[serde(alias = "annualTurnover")]
    pub annual_turnover: Option<u64>,
    #[serde(alias = "consentAutoSubmit")]
    pub consent_auto_submit: bool,
    pub attachments: Attachments,
}

/// Named file references attached to a profile. Values are storage keys or URLs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Attachments {
    pub charter: Option<String>,
    #[serde(alias = "registrationCertificate")]
    pub registration_certificate: Option<String>,
    #[serde(alias = "taxCertificate")]
    pub tax_certificate: Option<String>,
    #[serde(alias = "financialStatement")]
    pub financial_statement: Option<String>,
    #[serde(alias = "businessPlan")]
    pub business_plan: Option<String>,
    #[serde(alias = "passportCopy")]
    pub passport_copy: Option<String>,
    pub other: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecKind {
    #[default]
    Benefit,
    Tax,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmitChannel {
    #[default]
    Direct,
    #[serde(alias = "manualLink")]
    ManualLink,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusHint {
    #[default]
    Valid,
    Unclear,
    Inactive,
}

/// A single eligibility condition. When `requires_field` names a profile field that is absent,
/// eligibility becomes unknown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityRule {
    pub id: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, alias = "requiresField")]
    pub requires_field: Option<String>,
}

/// What a benefit or tax application needs from the applicant and how it is submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationSpec {
    pub id: SpecId,
    pub title: String,
    #[serde(default)]
    pub kind: SpecKind,
    #[serde(default, alias = "submitChannel")]
    pub submit_channel: SubmitChannel,
    #[serde(default, alias = "requiredFields")]
    pub required_fields: Vec<String>,
    #[serde(default, alias = "optionalFields")]
    pub optional_fields: Vec<String>,
    #[serde(default, alias = "requiredAttachments")]
    pub required_attachments: Vec<String>,
    #[serde(default, alias = "eligibilityRules")]
    pub eligibility_rules: Vec<EligibilityRule>,
    #[serde(default, alias = "allowedLegalForms")]
    pub allowed_legal_forms: Vec<String>,
    #[serde(default, alias = "requiredActivityKeywords")]
    pub required_activity_keywords: Vec<String>,
    #[serde(default, alias = "statusHint")]
    pub status_hint: StatusHint,
    #[serde(default)]
    pub platform: String,
    #[serde(default, alias = "serviceUrl")]
    pub service_url: Option<String>,
    #[serde(default, alias = "requiresDigitalSignature")]
    pub requires_digital_signature: bool,
    #[serde(default)]
    pub deadline: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EligibilityStatus {
    Eligible,
    Unknown,
}

/// Evaluator output. Derived on demand, never stored on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub missing_fields: Vec<String>,
    pub missing_attachments: Vec<String>,
    pub eligibility: EligibilityStatus,
    pub details: Vec<String>,
    pub legal_form_allowed: bool,
    pub activity_matched: bool,
}

impl EvaluationResult {
    pub fn has_missing_data(&self) -> bool {
        !self.missing_fields.is_empty() || !self.missing_attachments.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DecisionKind {
    AutoSubmit,
    ManualOnly,
    SendSms,
}

impl DecisionKind {
    pub const fn label(self) -> &'static str {
        match self {
            DecisionKind::AutoSubmit => "AUTO_SUBMIT",
            DecisionKind::ManualOnly => "MANUAL_ONLY",
            DecisionKind::SendSms => "SEND_SMS",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasonCode {
    ManualLinkOnly,
    ServiceInactive,
    DigitalSignatureRequired,
    ConsentMissing,
    RequiredDataMissing,
    EligibilityUnconfirmed,
    ReadyForSubmission,
}

impl ReasonCode {
    pub const fn message(self) -> &'static str {
        match self {
            ReasonCode::ManualLinkOnly => "submission is link-only",
            ReasonCode::ServiceInactive => "service is inactive",
            ReasonCode::DigitalSignatureRequired => "submission requires a digital signature",
            ReasonCode::ConsentMissing => "no consent for automatic submission",
            ReasonCode::RequiredDataMissing => "required data/attachments missing",
            ReasonCode::EligibilityUnconfirmed => "eligibility cannot be auto-confirmed",
            ReasonCode::ReadyForSubmission => "all checks passed",
        }
    }
}

/// Profile values matching the spec, ready to prefill a submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrefilledPayload {
    pub fields: BTreeMap<String, String>,
    pub attachments: BTreeMap<String, String>,
}

/// Router output for one spec/profile pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    pub application_id: SpecId,
    pub kind: DecisionKind,
    pub reason: ReasonCode,
    pub reason_message: String,
    pub warnings: Vec<String>,
    pub evaluation: EvaluationResult,
    pub payload: PrefilledPayload,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sms: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Decided,
    Submitted,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Decided => "decided",
            ApplicationStatus::Submitted => "submitted",
        }
    }
}

/// Stored state of one user's application, keyed by (user, application).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationRecord {
    pub application_id: SpecId,
    pub user_id: UserId,
    pub title: String,
    pub status: ApplicationStatus,
    pub decision: Option<DecisionKind>,
    pub tracking_id: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// Outbound SMS handed to the delivery collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmsMessage {
    pub message_id: String,
    pub to_phone: String,
    pub body: String,
    pub application_id: Option<SpecId>,
    pub user_id: Option<UserId>,
    pub queued_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditEventKind {
    Ingestion,
    Decision,
    Submission,
    Notification,
}

/// Append-only audit log entry. `sequence` is assigned by the recorder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub sequence: u64,
    pub kind: AuditEventKind,
    pub application_id: Option<SpecId>,
    pub user_id: Option<UserId>,
    pub recorded_at: DateTime<Utc>,
    pub decision: Option<DecisionKind>,
}

impl AuditEntry {
    pub fn new(kind: AuditEventKind) -> Self {
        Self {
            sequence: 0,
            kind,
            application_id: None,
            user_id: None,
            recorded_at: Utc::now(),
            decision: None,
        }
    }

    pub fn for_application(mut self, application_id: &SpecId) -> Self {
        self.application_id = Some(application_id.clone());
        self
    }

    pub fn for_user(mut self, user_id: &UserId) -> Self {
        self.user_id = Some(user_id.clone());
        self
    }

    pub fn with_decision(mut self, decision: DecisionKind) -> Self {
        self.decision = Some(decision);
        self
    }
}

/// Body of the decision endpoints. Either a stored spec id or an inline spec is required.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DecisionRequest {
    #[serde(alias = "specId", alias = "application_id")]
    pub spec_id: Option<SpecId>,
    pub spec: Option<ApplicationSpec>,
    #[serde(alias = "userId")]
    pub user_id: Option<UserId>,
    pub profile: UserProfile,
    /// Overrides `profile.consent_auto_submit` when given.
    pub consent: Option<bool>,
    #[serde(alias = "completionUrl")]
    pub completion_url: Option<String>,
}

/// Portal an application is handed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionChannel {
    Direct,
    MyGov,
}

impl SubmissionChannel {
    pub const fn tracking_prefix(self) -> &'static str {
        match self {
            SubmissionChannel::Direct => "APP",
            SubmissionChannel::MyGov => "MYGOV",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubmitRequest {
    #[serde(alias = "applicationId")]
    pub application_id: SpecId,
    #[serde(alias = "userId")]
    pub user_id: UserId,
    #[serde(default)]
    pub payload: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    pub tracking_id: String,
    pub application_id: SpecId,
    pub channel: SubmissionChannel,
    pub status: ApplicationStatus,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SmsRequest {
    #[serde(alias = "toPhone")]
    pub to_phone: String,
    pub message: String,
    #[serde(default, alias = "userId")]
    pub user_id: Option<UserId>,
    #[serde(default, alias = "applicationId")]
    pub application_id: Option<SpecId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmsReceipt {
    pub message_id: String,
    pub status: String,
    pub queued_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AnalyzeRequest {
    pub profile: UserProfile,
    #[serde(alias = "userId")]
    pub user_id: Option<UserId>,
}
