use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub feed: FeedConfig,
    pub context: ContextConfig,
    pub notifications: NotificationConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let defaults = FeedConfig::default();
        let feed = FeedConfig {
            rss_url: env::var("LEX_RSS_URL").unwrap_or(defaults.rss_url),
            base_url: env::var("LEX_BASE_URL")
                .map(|value| value.trim_end_matches('/').to_string())
                .unwrap_or(defaults.base_url),
            cache_ttl_secs: read_number("FEED_CACHE_TTL_SECS", defaults.cache_ttl_secs)?,
            fetch_timeout_secs: read_number("FEED_FETCH_TIMEOUT_SECS", defaults.fetch_timeout_secs)?,
            fetch_attempts: read_number("FEED_FETCH_ATTEMPTS", defaults.fetch_attempts)?.max(1),
        };

        let context = ContextConfig {
            fetch_timeout_secs: read_number(
                "CONTEXT_FETCH_TIMEOUT_SECS",
                ContextConfig::default().fetch_timeout_secs,
            )?,
            ..ContextConfig::default()
        };

        let notifications = NotificationConfig {
            completion_url: env::var("SMS_COMPLETION_URL")
                .unwrap_or_else(|_| NotificationConfig::default().completion_url),
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            feed,
            context,
            notifications,
        })
    }
}

fn read_number<T>(key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidNumber { key }),
        Err(_) => Ok(default),
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Upstream legal-news feed and cache window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedConfig {
    pub rss_url: String,
    pub base_url: String,
    pub cache_ttl_secs: u64,
    pub fetch_timeout_secs: u64,
    pub fetch_attempts: u32,
}

impl FeedConfig {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            rss_url: "https://lex.uz/rss".to_string(),
            base_url: "https://lex.uz".to_string(),
            cache_ttl_secs: 600,
            fetch_timeout_secs: 15,
            fetch_attempts: 1,
        }
    }
}

/// Single-document context fetches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextConfig {
    pub fetch_timeout_secs: u64,
    pub snippet_limit: usize,
}

impl ContextConfig {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            fetch_timeout_secs: 20,
            snippet_limit: 4000,
        }
    }
}

/// Fallback link appended to outbound SMS when neither the caller nor the spec supplies one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationConfig {
    pub completion_url: String,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            completion_url: "https://my.gov.uz".to_string(),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidNumber { key: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidNumber { key } => {
                write!(f, "{key} must be a non-negative integer")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidNumber { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}
