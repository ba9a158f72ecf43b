//! Benefit and tax application routing: profile evaluation, decision guards, SMS composition,
//! opportunity scanning and the audit trail around them.

pub mod decision;
pub mod domain;
pub mod evaluation;
pub mod fields;
pub mod notify;
pub mod opportunities;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use decision::{build_payload, guard_order, route, DecisionRouter, Guard};
pub use domain::{
    AnalyzeRequest, ApplicationRecord, ApplicationSpec, ApplicationStatus, Attachments,
    AuditEntry, AuditEventKind, Decision, DecisionKind, DecisionRequest, EligibilityRule,
    EligibilityStatus, EvaluationResult, PrefilledPayload, ReasonCode, SmsMessage, SmsReceipt,
    SmsRequest, SpecId, SpecKind, StatusHint, SubmissionChannel, SubmissionReceipt, SubmitChannel,
    SubmitRequest, UserId, UserProfile,
};
pub use evaluation::{EligibilityEvaluator, NO_RULES_DETAIL};
pub use notify::{compose_sms, NotificationContext, SmsStyle};
pub use opportunities::{
    standard_catalog, AnalyzeResponse, AutoApplicationDraft, Opportunity, OpportunityScanner,
    OpportunityStatus, ScanReason, ScanResponse, SmsEvent,
};
pub use repository::{
    ApplicationRepository, AuditRecorder, NotificationOutbox, OutboxError, RepositoryError,
    UserApplicationsView,
};
pub use router::application_router;
pub use service::{ApplicationService, ApplicationServiceError};
