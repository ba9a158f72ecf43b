use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryApplicationRepository, InMemoryAuditLog, InMemoryOutbox};
use crate::routes::api_router;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use bizgate::applications::ApplicationService;
use bizgate::config::AppConfig;
use bizgate::error::AppError;
use bizgate::feeds::{ContextService, HttpFeedSource, NewsService};
use bizgate::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let feed_source = HttpFeedSource::new(&config.feed)?;
    let news = Arc::new(NewsService::new(feed_source, &config.feed));
    let context = Arc::new(ContextService::new(&config.context)?);
    let applications = Arc::new(ApplicationService::new(
        Arc::new(InMemoryApplicationRepository::default()),
        Arc::new(InMemoryOutbox::default()),
        Arc::new(InMemoryAuditLog::default()),
        &config.notifications,
    ));

    let app = api_router(news, context, applications)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        feed = %config.feed.rss_url,
        cache_ttl_secs = config.feed.cache_ttl_secs,
        "bizgate api ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
