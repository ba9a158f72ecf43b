use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{
    AnalyzeRequest, ApplicationSpec, DecisionRequest, SmsRequest, SpecKind, SubmissionChannel,
    SubmitRequest, UserId, UserProfile,
};
use super::repository::{ApplicationRepository, AuditRecorder, NotificationOutbox};
use super::service::{ApplicationService, ApplicationServiceError};

type SharedService<R, N, A> = Arc<ApplicationService<R, N, A>>;

/// Router builder exposing opportunity scans, decisions, submissions and SMS hand-off.
pub fn application_router<R, N, A>(service: SharedService<R, N, A>) -> Router
where
    R: ApplicationRepository + 'static,
    N: NotificationOutbox + 'static,
    A: AuditRecorder + 'static,
{
    Router::new()
        .route("/api/auto-applications/new", get(scan_handler::<R, N, A>))
        .route(
            "/api/auto-applications/analyze",
            post(analyze_handler::<R, N, A>),
        )
        .route("/api/benefits/ingest", post(ingest_handler::<R, N, A>))
        .route("/api/benefits/decision", post(decision_handler::<R, N, A>))
        .route("/api/tax/decide", post(tax_decision_handler::<R, N, A>))
        .route("/api/submit", post(submit_handler::<R, N, A>))
        .route("/api/mygov/submit", post(mygov_submit_handler::<R, N, A>))
        .route("/api/notify/sms", post(sms_handler::<R, N, A>))
        .route("/api/benefits/status", get(status_handler::<R, N, A>))
        .with_state(service)
}

/// Flat profile fields accepted on the scan query string.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ScanQuery {
    pub user_name: String,
    pub region: String,
    pub business_name: String,
    pub tin: String,
    pub legal_form: String,
    pub activity_type: String,
    pub director_name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub employee_count: Option<u32>,
}

impl From<ScanQuery> for UserProfile {
    fn from(query: ScanQuery) -> Self {
        UserProfile {
            user_name: query.user_name,
            region: query.region,
            business_name: query.business_name,
            tin: query.tin,
            legal_form: query.legal_form,
            activity_type: query.activity_type,
            director_name: query.director_name,
            phone: query.phone,
            email: query.email,
            address: query.address,
            employee_count: query.employee_count,
            ..UserProfile::default()
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusQuery {
    #[serde(default)]
    pub user_id: Option<String>,
}

pub(crate) async fn scan_handler<R, N, A>(
    State(service): State<SharedService<R, N, A>>,
    Query(query): Query<ScanQuery>,
) -> Response
where
    R: ApplicationRepository + 'static,
    N: NotificationOutbox + 'static,
    A: AuditRecorder + 'static,
{
    let profile = UserProfile::from(query);
    (StatusCode::OK, Json(service.scan(&profile))).into_response()
}

pub(crate) async fn analyze_handler<R, N, A>(
    State(service): State<SharedService<R, N, A>>,
    Json(request): Json<AnalyzeRequest>,
) -> Response
where
    R: ApplicationRepository + 'static,
    N: NotificationOutbox + 'static,
    A: AuditRecorder + 'static,
{
    match service.analyze(request) {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn ingest_handler<R, N, A>(
    State(service): State<SharedService<R, N, A>>,
    Json(spec): Json<ApplicationSpec>,
) -> Response
where
    R: ApplicationRepository + 'static,
    N: NotificationOutbox + 'static,
    A: AuditRecorder + 'static,
{
    match service.ingest(spec) {
        Ok(id) => {
            let payload = json!({
                "id": id,
                "status": "stored",
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn decision_handler<R, N, A>(
    State(service): State<SharedService<R, N, A>>,
    Json(request): Json<DecisionRequest>,
) -> Response
where
    R: ApplicationRepository + 'static,
    N: NotificationOutbox + 'static,
    A: AuditRecorder + 'static,
{
    match service.decide(request, None) {
        Ok(decision) => (StatusCode::OK, Json(decision)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn tax_decision_handler<R, N, A>(
    State(service): State<SharedService<R, N, A>>,
    Json(request): Json<DecisionRequest>,
) -> Response
where
    R: ApplicationRepository + 'static,
    N: NotificationOutbox + 'static,
    A: AuditRecorder + 'static,
{
    match service.decide(request, Some(SpecKind::Tax)) {
        Ok(decision) => (StatusCode::OK, Json(decision)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn submit_handler<R, N, A>(
    State(service): State<SharedService<R, N, A>>,
    Json(request): Json<SubmitRequest>,
) -> Response
where
    R: ApplicationRepository + 'static,
    N: NotificationOutbox + 'static,
    A: AuditRecorder + 'static,
{
    submit_through(&service, request, SubmissionChannel::Direct)
}

pub(crate) async fn mygov_submit_handler<R, N, A>(
    State(service): State<SharedService<R, N, A>>,
    Json(request): Json<SubmitRequest>,
) -> Response
where
    R: ApplicationRepository + 'static,
    N: NotificationOutbox + 'static,
    A: AuditRecorder + 'static,
{
    submit_through(&service, request, SubmissionChannel::MyGov)
}

fn submit_through<R, N, A>(
    service: &ApplicationService<R, N, A>,
    request: SubmitRequest,
    channel: SubmissionChannel,
) -> Response
where
    R: ApplicationRepository + 'static,
    N: NotificationOutbox + 'static,
    A: AuditRecorder + 'static,
{
    match service.submit(request, channel) {
        Ok(receipt) => (StatusCode::OK, Json(receipt)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn sms_handler<R, N, A>(
    State(service): State<SharedService<R, N, A>>,
    Json(request): Json<SmsRequest>,
) -> Response
where
    R: ApplicationRepository + 'static,
    N: NotificationOutbox + 'static,
    A: AuditRecorder + 'static,
{
    match service.notify_sms(request) {
        Ok(receipt) => (StatusCode::OK, Json(receipt)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn status_handler<R, N, A>(
    State(service): State<SharedService<R, N, A>>,
    Query(query): Query<StatusQuery>,
) -> Response
where
    R: ApplicationRepository + 'static,
    N: NotificationOutbox + 'static,
    A: AuditRecorder + 'static,
{
    let user_id = UserId(query.user_id.unwrap_or_default());
    match service.status(&user_id) {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: ApplicationServiceError) -> Response {
    let status = match &error {
        ApplicationServiceError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        ApplicationServiceError::SpecNotFound(_) => StatusCode::NOT_FOUND,
        ApplicationServiceError::Repository(_) | ApplicationServiceError::Outbox(_) => {
            tracing::error!(error = %error, "application request failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    let payload = json!({
        "error": error.to_string(),
    });
    (status, Json(payload)).into_response()
}
