use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use super::decision::DecisionRouter;
use super::domain::{
    AnalyzeRequest, ApplicationRecord, ApplicationSpec, ApplicationStatus, AuditEntry,
    AuditEventKind, Decision, DecisionKind, DecisionRequest, SmsMessage, SmsReceipt, SmsRequest,
    SpecId, SpecKind, SubmissionChannel, SubmissionReceipt, SubmitRequest, UserId, UserProfile,
};
use super::opportunities::{AnalyzeResponse, OpportunityScanner, ScanResponse};
use super::repository::{
    ApplicationRepository, AuditRecorder, NotificationOutbox, OutboxError, RepositoryError,
    UserApplicationsView,
};
use crate::config::NotificationConfig;

/// Service composing spec storage, the decision router, the SMS outbox and the audit log.
pub struct ApplicationService<R, N, A> {
    repository: Arc<R>,
    outbox: Arc<N>,
    audit: Arc<A>,
    router: DecisionRouter,
    scanner: OpportunityScanner,
    completion_url: String,
}

impl<R, N, A> ApplicationService<R, N, A>
where
    R: ApplicationRepository + 'static,
    N: NotificationOutbox + 'static,
    A: AuditRecorder + 'static,
{
    pub fn new(
        repository: Arc<R>,
        outbox: Arc<N>,
        audit: Arc<A>,
        config: &NotificationConfig,
    ) -> Self {
        Self {
            repository,
            outbox,
            audit,
            router: DecisionRouter::new(),
            scanner: OpportunityScanner::default(),
            completion_url: config.completion_url.clone(),
        }
    }

    pub fn with_scanner(mut self, scanner: OpportunityScanner) -> Self {
        self.scanner = scanner;
        self
    }

    pub fn scanner(&self) -> &OpportunityScanner {
        &self.scanner
    }

    /// Store an application spec so later decisions can reference it by id.
    pub fn ingest(&self, spec: ApplicationSpec) -> Result<SpecId, ApplicationServiceError> {
        validate_spec(&spec)?;
        let id = spec.id.clone();
        self.repository.put_spec(spec)?;
        self.audit
            .append(AuditEntry::new(AuditEventKind::Ingestion).for_application(&id))?;
        info!(spec_id = %id, "application spec ingested");
        Ok(id)
    }

    /// Evaluate the profile against the referenced spec and route it. `forced_kind` pins the
    /// guard order regardless of what the spec declares.
    pub fn decide(
        &self,
        request: DecisionRequest,
        forced_kind: Option<SpecKind>,
    ) -> Result<Decision, ApplicationServiceError> {
        let mut spec = self.resolve_spec(&request)?;
        if let Some(kind) = forced_kind {
            spec.kind = kind;
        }

        let consent = request
            .consent
            .unwrap_or(request.profile.consent_auto_submit);
        let completion_url = request
            .completion_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .unwrap_or(self.completion_url.as_str());

        let decision = self
            .router
            .decide(&spec, &request.profile, consent, completion_url);

        let mut entry = AuditEntry::new(AuditEventKind::Decision)
            .for_application(&spec.id)
            .with_decision(decision.kind);
        if let Some(user_id) = request.user_id.as_ref().filter(|id| !id.0.trim().is_empty()) {
            self.record_decision(user_id, &spec, decision.kind)?;
            entry = entry.for_user(user_id);
        }
        self.audit.append(entry)?;

        info!(
            spec_id = %spec.id,
            decision = decision.kind.label(),
            reason = decision.reason.message(),
            "application routed"
        );
        Ok(decision)
    }

    /// Hand a prefilled application to a portal and record the tracking id.
    pub fn submit(
        &self,
        request: SubmitRequest,
        channel: SubmissionChannel,
    ) -> Result<SubmissionReceipt, ApplicationServiceError> {
        require("application_id", &request.application_id.0)?;
        require("user_id", &request.user_id.0)?;

        let tracking_id = tracking_id(channel);
        let submitted_at = Utc::now();
        let previous = self
            .repository
            .fetch_application(&request.user_id, &request.application_id)?;
        let title = match previous.as_ref() {
            Some(record) => record.title.clone(),
            None => self
                .repository
                .fetch_spec(&request.application_id)?
                .map(|spec| spec.title)
                .unwrap_or_default(),
        };

        self.repository.upsert_application(ApplicationRecord {
            application_id: request.application_id.clone(),
            user_id: request.user_id.clone(),
            title,
            status: ApplicationStatus::Submitted,
            decision: previous.and_then(|record| record.decision),
            tracking_id: Some(tracking_id.clone()),
            updated_at: submitted_at,
        })?;
        self.audit.append(
            AuditEntry::new(AuditEventKind::Submission)
                .for_application(&request.application_id)
                .for_user(&request.user_id),
        )?;

        info!(
            application_id = %request.application_id,
            tracking_id = %tracking_id,
            fields = request.payload.len(),
            "application submitted"
        );
        Ok(SubmissionReceipt {
            tracking_id,
            application_id: request.application_id,
            channel,
            status: ApplicationStatus::Submitted,
            submitted_at,
        })
    }

    /// Queue an outbound SMS for the delivery collaborator.
    pub fn notify_sms(&self, request: SmsRequest) -> Result<SmsReceipt, ApplicationServiceError> {
        require("to_phone", &request.to_phone)?;
        require("message", &request.message)?;

        let message = SmsMessage {
            message_id: format!("sms-{}", Uuid::new_v4().simple()),
            to_phone: request.to_phone.trim().to_string(),
            body: request.message.trim().to_string(),
            application_id: request.application_id,
            user_id: request.user_id,
            queued_at: Utc::now(),
        };
        let receipt = SmsReceipt {
            message_id: message.message_id.clone(),
            status: "queued".to_string(),
            queued_at: message.queued_at,
        };
        self.enqueue(message)?;
        Ok(receipt)
    }

    pub fn status(
        &self,
        user_id: &UserId,
    ) -> Result<UserApplicationsView, ApplicationServiceError> {
        require("user_id", &user_id.0)?;
        Ok(UserApplicationsView {
            user_id: user_id.clone(),
            applications: self.repository.applications_for(user_id)?,
            events: self.audit.entries_for_user(user_id)?,
        })
    }

    pub fn scan(&self, profile: &UserProfile) -> ScanResponse {
        self.scanner.scan(profile)
    }

    /// Scan the catalog, record every auto-submitted draft and queue the follow-up SMS.
    pub fn analyze(
        &self,
        request: AnalyzeRequest,
    ) -> Result<AnalyzeResponse, ApplicationServiceError> {
        let response = self.scanner.analyze(&request.profile);
        let user_id = request.user_id.filter(|id| !id.0.trim().is_empty());

        for draft in &response.auto_submitted {
            let mut entry = AuditEntry::new(AuditEventKind::Submission)
                .for_application(&draft.opportunity_id)
                .with_decision(DecisionKind::AutoSubmit);
            if let Some(user_id) = &user_id {
                self.repository.upsert_application(ApplicationRecord {
                    application_id: draft.opportunity_id.clone(),
                    user_id: user_id.clone(),
                    title: draft.title.clone(),
                    status: ApplicationStatus::Submitted,
                    decision: Some(DecisionKind::AutoSubmit),
                    tracking_id: Some(draft.application_id.clone()),
                    updated_at: draft.submitted_at,
                })?;
                entry = entry.for_user(user_id);
            }
            self.audit.append(entry)?;
        }

        for sms in &response.sms_queue {
            self.enqueue(SmsMessage {
                message_id: format!("sms-{}", Uuid::new_v4().simple()),
                to_phone: sms.to_phone.clone(),
                body: sms.message.clone(),
                application_id: Some(sms.related_opportunity_id.clone()),
                user_id: user_id.clone(),
                queued_at: sms.created_at,
            })?;
        }

        info!(
            submitted = response.auto_submitted.len(),
            pending = response.pending_user_input.len(),
            "opportunities analyzed"
        );
        Ok(response)
    }

    fn resolve_spec(
        &self,
        request: &DecisionRequest,
    ) -> Result<ApplicationSpec, ApplicationServiceError> {
        let spec_id = request
            .spec_id
            .as_ref()
            .filter(|id| !id.0.trim().is_empty());

        match (spec_id, &request.spec) {
            (Some(id), _) => self
                .repository
                .fetch_spec(id)?
                .ok_or_else(|| ApplicationServiceError::SpecNotFound(id.clone())),
            (None, Some(spec)) => {
                validate_spec(spec)?;
                Ok(spec.clone())
            }
            (None, None) => Err(ApplicationServiceError::InvalidRequest(
                "either spec_id or spec is required".to_string(),
            )),
        }
    }

    fn record_decision(
        &self,
        user_id: &UserId,
        spec: &ApplicationSpec,
        decision: DecisionKind,
    ) -> Result<(), ApplicationServiceError> {
        let previous = self.repository.fetch_application(user_id, &spec.id)?;
        let (status, tracking_id) = match previous {
            // A decision never moves an already submitted application back.
            Some(record) if record.status == ApplicationStatus::Submitted => {
                (record.status, record.tracking_id)
            }
            _ => (ApplicationStatus::Decided, None),
        };

        self.repository.upsert_application(ApplicationRecord {
            application_id: spec.id.clone(),
            user_id: user_id.clone(),
            title: spec.title.clone(),
            status,
            decision: Some(decision),
            tracking_id,
            updated_at: Utc::now(),
        })?;
        Ok(())
    }

    fn enqueue(&self, message: SmsMessage) -> Result<(), ApplicationServiceError> {
        let mut entry = AuditEntry::new(AuditEventKind::Notification);
        if let Some(application_id) = &message.application_id {
            entry = entry.for_application(application_id);
        }
        if let Some(user_id) = &message.user_id {
            entry = entry.for_user(user_id);
        }

        debug!(message_id = %message.message_id, "sms queued");
        self.outbox.enqueue(message)?;
        self.audit.append(entry)?;
        Ok(())
    }
}

fn validate_spec(spec: &ApplicationSpec) -> Result<(), ApplicationServiceError> {
    require("id", &spec.id.0)?;
    require("title", &spec.title)
}

fn require(name: &str, value: &str) -> Result<(), ApplicationServiceError> {
    if value.trim().is_empty() {
        return Err(ApplicationServiceError::InvalidRequest(format!(
            "{name} must not be empty"
        )));
    }
    Ok(())
}

fn tracking_id(channel: SubmissionChannel) -> String {
    let token = Uuid::new_v4().simple().to_string().to_uppercase();
    format!("{}-{}", channel.tracking_prefix(), &token[..12])
}

/// Error raised by the application service.
#[derive(Debug, thiserror::Error)]
pub enum ApplicationServiceError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("application spec '{0}' not found")]
    SpecNotFound(SpecId),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Outbox(#[from] OutboxError),
}
