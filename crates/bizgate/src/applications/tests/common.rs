use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::applications::domain::{
    ApplicationRecord, ApplicationSpec, Attachments, AuditEntry, EligibilityRule, SmsMessage,
    SpecId, SpecKind, UserId, UserProfile,
};
use crate::applications::repository::{
    ApplicationRepository, AuditRecorder, NotificationOutbox, OutboxError, RepositoryError,
};
use crate::applications::{application_router, ApplicationService};
use crate::config::NotificationConfig;

pub(super) const COMPLETION_URL: &str = "https://my.gov.uz/complete";

pub(super) fn complete_profile() -> UserProfile {
    UserProfile {
        user_name: "Dilnoza Karimova".to_string(),
        business_name: "Baraka Savdo".to_string(),
        tin: "301234567".to_string(),
        legal_form: "YTT".to_string(),
        director_name: "Dilnoza Karimova".to_string(),
        phone: "+998901234567".to_string(),
        email: "info@baraka.uz".to_string(),
        address: "Toshkent, Chilonzor 7".to_string(),
        region: "Toshkent".to_string(),
        activity_type: "Oziq-ovqat savdo".to_string(),
        oked_codes: vec!["47110".to_string()],
        employee_count: Some(4),
        annual_turnover: Some(350_000_000),
        consent_auto_submit: true,
        attachments: Attachments {
            charter: Some("files/charter.pdf".to_string()),
            registration_certificate: Some("files/guvohnoma.pdf".to_string()),
            ..Attachments::default()
        },
    }
}

/// Benefit spec every field of `complete_profile` satisfies, with one satisfiable rule.
pub(super) fn benefit_spec() -> ApplicationSpec {
    ApplicationSpec {
        id: SpecId("benefit-2026-011".to_string()),
        title: "Kichik biznes uchun subsidiya".to_string(),
        kind: SpecKind::Benefit,
        submit_channel: Default::default(),
        required_fields: vec![
            "business_name".to_string(),
            "tin".to_string(),
            "phone".to_string(),
        ],
        optional_fields: vec!["email".to_string(), "annual_turnover".to_string()],
        required_attachments: vec!["charter".to_string()],
        eligibility_rules: vec![EligibilityRule {
            id: "registered".to_string(),
            description: "Business must be registered".to_string(),
            requires_field: Some("tin".to_string()),
        }],
        allowed_legal_forms: vec!["YTT".to_string(), "MCHJ".to_string()],
        required_activity_keywords: Vec::new(),
        status_hint: Default::default(),
        platform: "my.gov.uz".to_string(),
        service_url: Some("https://my.gov.uz/services/subsidy".to_string()),
        requires_digital_signature: false,
        deadline: Some("2026-12-31".to_string()),
    }
}

pub(super) fn tax_spec() -> ApplicationSpec {
    ApplicationSpec {
        id: SpecId("tax-2026-003".to_string()),
        title: "Soliq imtiyozi".to_string(),
        kind: SpecKind::Tax,
        platform: "soliq.uz".to_string(),
        service_url: Some("https://soliq.uz/imtiyoz".to_string()),
        ..benefit_spec()
    }
}

pub(super) fn user() -> UserId {
    UserId("user-42".to_string())
}

pub(super) fn notification_config() -> NotificationConfig {
    NotificationConfig {
        completion_url: COMPLETION_URL.to_string(),
    }
}

pub(super) type MemoryService = ApplicationService<MemoryRepository, MemoryOutbox, MemoryAudit>;

pub(super) fn build_service() -> (
    MemoryService,
    Arc<MemoryRepository>,
    Arc<MemoryOutbox>,
    Arc<MemoryAudit>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let outbox = Arc::new(MemoryOutbox::default());
    let audit = Arc::new(MemoryAudit::default());
    let service = ApplicationService::new(
        repository.clone(),
        outbox.clone(),
        audit.clone(),
        &notification_config(),
    );
    (service, repository, outbox, audit)
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) specs: Arc<Mutex<HashMap<SpecId, ApplicationSpec>>>,
    pub(super) records: Arc<Mutex<BTreeMap<(UserId, SpecId), ApplicationRecord>>>,
}

impl ApplicationRepository for MemoryRepository {
    fn put_spec(&self, spec: ApplicationSpec) -> Result<(), RepositoryError> {
        let mut guard = self.specs.lock().expect("repository mutex poisoned");
        guard.insert(spec.id.clone(), spec);
        Ok(())
    }

    fn fetch_spec(&self, id: &SpecId) -> Result<Option<ApplicationSpec>, RepositoryError> {
        let guard = self.specs.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn upsert_application(&self, record: ApplicationRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let key = (record.user_id.clone(), record.application_id.clone());
        guard.insert(key, record);
        Ok(())
    }

    fn fetch_application(
        &self,
        user_id: &UserId,
        application_id: &SpecId,
    ) -> Result<Option<ApplicationRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .get(&(user_id.clone(), application_id.clone()))
            .cloned())
    }

    fn applications_for(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<ApplicationRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .filter(|record| &record.user_id == user_id)
            .cloned()
            .collect())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryOutbox {
    messages: Arc<Mutex<Vec<SmsMessage>>>,
}

impl MemoryOutbox {
    pub(super) fn messages(&self) -> Vec<SmsMessage> {
        self.messages.lock().expect("outbox mutex poisoned").clone()
    }
}

impl NotificationOutbox for MemoryOutbox {
    fn enqueue(&self, message: SmsMessage) -> Result<(), OutboxError> {
        self.messages
            .lock()
            .expect("outbox mutex poisoned")
            .push(message);
        Ok(())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryAudit {
    entries: Arc<Mutex<Vec<AuditEntry>>>,
}

impl MemoryAudit {
    pub(super) fn entries(&self) -> Vec<AuditEntry> {
        self.entries.lock().expect("audit mutex poisoned").clone()
    }
}

impl AuditRecorder for MemoryAudit {
    fn append(&self, mut entry: AuditEntry) -> Result<AuditEntry, RepositoryError> {
        let mut guard = self.entries.lock().expect("audit mutex poisoned");
        entry.sequence = guard.len() as u64 + 1;
        guard.push(entry.clone());
        Ok(entry)
    }

    fn entries_for_user(&self, user_id: &UserId) -> Result<Vec<AuditEntry>, RepositoryError> {
        let guard = self.entries.lock().expect("audit mutex poisoned");
        Ok(guard
            .iter()
            .filter(|entry| entry.user_id.as_ref() == Some(user_id))
            .cloned()
            .collect())
    }
}

pub(super) struct UnavailableRepository;

impl ApplicationRepository for UnavailableRepository {
    fn put_spec(&self, _spec: ApplicationSpec) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch_spec(&self, _id: &SpecId) -> Result<Option<ApplicationSpec>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn upsert_application(&self, _record: ApplicationRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch_application(
        &self,
        _user_id: &UserId,
        _application_id: &SpecId,
    ) -> Result<Option<ApplicationRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn applications_for(
        &self,
        _user_id: &UserId,
    ) -> Result<Vec<ApplicationRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn json_request(uri: &str, body: &Value) -> axum::http::Request<axum::body::Body> {
    axum::http::Request::post(uri)
        .header(axum::http::header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from(
            serde_json::to_vec(body).expect("serialize body"),
        ))
        .expect("request builds")
}

pub(super) fn application_router_with_service(service: MemoryService) -> axum::Router {
    application_router(Arc::new(service))
}
