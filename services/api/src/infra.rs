use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use bizgate::applications::{
    ApplicationRecord, ApplicationRepository, ApplicationSpec, AuditEntry, AuditRecorder,
    NotificationOutbox, OutboxError, RepositoryError, SmsMessage, SpecId, UserId,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-lifetime store for specs and per-user application records.
#[derive(Default, Clone)]
pub(crate) struct InMemoryApplicationRepository {
    specs: Arc<Mutex<HashMap<SpecId, ApplicationSpec>>>,
    records: Arc<Mutex<BTreeMap<(UserId, SpecId), ApplicationRecord>>>,
}

impl ApplicationRepository for InMemoryApplicationRepository {
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
pub(crate) struct InMemoryOutbox {
    messages: Arc<Mutex<Vec<SmsMessage>>>,
}

impl NotificationOutbox for InMemoryOutbox {
    fn enqueue(&self, message: SmsMessage) -> Result<(), OutboxError> {
        let mut guard = self.messages.lock().expect("outbox mutex poisoned");
        guard.push(message);
        Ok(())
    }
}

impl InMemoryOutbox {
    pub(crate) fn messages(&self) -> Vec<SmsMessage> {
        self.messages.lock().expect("outbox mutex poisoned").clone()
    }
}

/// Append-only audit log. Sequence numbers start at 1 and follow insertion order.
#[derive(Default, Clone)]
pub(crate) struct InMemoryAuditLog {
    entries: Arc<Mutex<Vec<AuditEntry>>>,
}

impl AuditRecorder for InMemoryAuditLog {
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
