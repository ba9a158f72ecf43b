use serde::Serialize;

use super::domain::{ApplicationRecord, ApplicationSpec, AuditEntry, SmsMessage, SpecId, UserId};

/// Storage abstraction for ingested specs and per-user application state.
pub trait ApplicationRepository: Send + Sync {
    /// Store a spec, replacing any previous version with the same id.
    fn put_spec(&self, spec: ApplicationSpec) -> Result<(), RepositoryError>;
    fn fetch_spec(&self, id: &SpecId) -> Result<Option<ApplicationSpec>, RepositoryError>;
    /// Insert or replace the record keyed by (user, application).
    fn upsert_application(&self, record: ApplicationRecord) -> Result<(), RepositoryError>;
    fn fetch_application(
        &self,
        user_id: &UserId,
        application_id: &SpecId,
    ) -> Result<Option<ApplicationRecord>, RepositoryError>;
    fn applications_for(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<ApplicationRecord>, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Hand-off point for outbound SMS. Delivery itself happens elsewhere.
pub trait NotificationOutbox: Send + Sync {
    fn enqueue(&self, message: SmsMessage) -> Result<(), OutboxError>;
}

#[derive(Debug, thiserror::Error)]
pub enum OutboxError {
    #[error("sms outbox unavailable: {0}")]
    Transport(String),
}

/// Append-only event log. Implementations assign the sequence number.
pub trait AuditRecorder: Send + Sync {
    fn append(&self, entry: AuditEntry) -> Result<AuditEntry, RepositoryError>;
    /// Entries whose user id matches, in insertion order.
    fn entries_for_user(&self, user_id: &UserId) -> Result<Vec<AuditEntry>, RepositoryError>;
}

/// What the status endpoint exposes for one user.
#[derive(Debug, Clone, Serialize)]
pub struct UserApplicationsView {
    pub user_id: UserId,
    pub applications: Vec<ApplicationRecord>,
    pub events: Vec<AuditEntry>,
}
