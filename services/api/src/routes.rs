use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};
use bizgate::applications::{
    application_router, ApplicationRepository, ApplicationService, AuditRecorder,
    NotificationOutbox,
};
use bizgate::feeds::{news_router, ContextService, FeedSource, NewsService};
use serde_json::json;
use std::sync::Arc;

/// Full HTTP surface: feed endpoints, application endpoints and operational probes.
pub(crate) fn api_router<S, R, N, A>(
    news: Arc<NewsService<S>>,
    context: Arc<ContextService>,
    applications: Arc<ApplicationService<R, N, A>>,
) -> Router
where
    S: FeedSource + 'static,
    R: ApplicationRepository + 'static,
    N: NotificationOutbox + 'static,
    A: AuditRecorder + 'static,
{
    news_router(news, context)
        .merge(application_router(applications))
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{InMemoryApplicationRepository, InMemoryAuditLog, InMemoryOutbox};
    use axum::body::Body;
    use axum::http::Request;
    use bizgate::config::{ContextConfig, FeedConfig, NotificationConfig};
    use bizgate::feeds::FeedError;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use serde_json::Value;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tower::ServiceExt;

    struct StaticFeed;

    impl FeedSource for StaticFeed {
        async fn fetch(&self) -> Result<String, FeedError> {
            Ok("<rss><channel>\
                <item><title>YATT uchun soliq imtiyozi</title><link>/docs/11</link></item>\
                <item><title>Ob-havo</title><link>/docs/12</link></item>\
                </channel></rss>"
                .to_string())
        }
    }

    fn app(ready: bool) -> (Router, InMemoryOutbox) {
        let feed_config = FeedConfig::default();
        let news = Arc::new(NewsService::new(StaticFeed, &feed_config));
        let context =
            Arc::new(ContextService::new(&ContextConfig::default()).expect("http client builds"));
        let outbox = InMemoryOutbox::default();
        let applications = Arc::new(ApplicationService::new(
            Arc::new(InMemoryApplicationRepository::default()),
            Arc::new(outbox.clone()),
            Arc::new(InMemoryAuditLog::default()),
            &NotificationConfig::default(),
        ));

        let state = AppState {
            readiness: Arc::new(AtomicBool::new(false)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        };
        state.readiness.store(ready, Ordering::Release);

        let router = api_router(news, context, applications).layer(Extension(state));
        (router, outbox)
    }

    async fn read_json_body(response: axum::response::Response) -> Value {
        let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .expect("read body");
        serde_json::from_slice(&body).expect("json payload")
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).expect("request builds")
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let (router, _) = app(true);
        let response = router
            .oneshot(get_request("/health"))
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(read_json_body(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn readiness_follows_flag() {
        let (router, _) = app(false);
        let response = router
            .oneshot(get_request("/ready"))
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let (router, _) = app(true);
        let response = router
            .oneshot(get_request("/ready"))
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn metrics_are_plain_text() {
        let (router, _) = app(true);
        let response = router
            .oneshot(get_request("/metrics"))
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/plain; version=0.0.4"
        );
    }

    #[tokio::test]
    async fn news_and_application_routes_share_one_router() {
        let (router, outbox) = app(true);

        let news = router
            .clone()
            .oneshot(get_request("/api/news/lex"))
            .await
            .expect("route executes");
        let news = read_json_body(news).await;
        assert_eq!(news["total"], 1);
        assert_eq!(news["items"][0]["link"], "https://lex.uz/docs/11");

        let sms = router
            .oneshot(
                Request::post("/api/notify/sms")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        json!({ "to_phone": "+998901234567", "message": "salom" }).to_string(),
                    ))
                    .expect("request builds"),
            )
            .await
            .expect("route executes");
        assert_eq!(sms.status(), StatusCode::OK);
        assert_eq!(outbox.messages().len(), 1);
    }
}
