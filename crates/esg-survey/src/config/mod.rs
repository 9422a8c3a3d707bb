use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

const PLACEHOLDER_MARKER: &str = "...";

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
    pub gateway: GatewayConfig,
    pub narrative: NarrativeConfig,
    pub admin: AdminConfig,
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

        let timeout_secs = env::var("SURVEY_HTTP_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse::<u64>()
            .ok()
            .filter(|secs| *secs > 0)
            .ok_or(ConfigError::InvalidTimeout)?;

        let gateway = GatewayConfig {
            sheet_url: non_empty_var("SURVEY_SHEET_URL"),
            local_store: non_empty_var("SURVEY_LOCAL_STORE").map(PathBuf::from),
            timeout: Duration::from_secs(timeout_secs),
        };

        let narrative = NarrativeConfig {
            api_key: non_empty_var("NARRATIVE_API_KEY").or_else(|| non_empty_var("API_KEY")),
            model: env::var("NARRATIVE_MODEL").unwrap_or_else(|_| "gemini-2.5-flash".to_string()),
            endpoint: env::var("NARRATIVE_ENDPOINT").unwrap_or_else(|_| {
                "https://generativelanguage.googleapis.com/v1beta".to_string()
            }),
            timeout: Duration::from_secs(timeout_secs),
        };

        let passcode = env::var("ADMIN_PASSCODE").unwrap_or_else(|_| "0741".to_string());
        if passcode.chars().count() != 4 {
            return Err(ConfigError::InvalidPasscode);
        }

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            gateway,
            narrative,
            admin: AdminConfig { passcode },
        })
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
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

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Where submissions go and how long remote calls may take.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub sheet_url: Option<String>,
    pub local_store: Option<PathBuf>,
    pub timeout: Duration,
}

impl GatewayConfig {
    /// The remote sheet URL, unless it is missing or still the deployment placeholder.
    pub fn remote_url(&self) -> Option<&str> {
        self.sheet_url
            .as_deref()
            .filter(|url| !url.contains(PLACEHOLDER_MARKER))
    }
}

#[derive(Debug, Clone)]
pub struct NarrativeConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub endpoint: String,
    pub timeout: Duration,
}

/// Static dashboard lock. Not an authentication mechanism.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    pub passcode: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidTimeout,
    InvalidPasscode,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidTimeout => {
                write!(f, "SURVEY_HTTP_TIMEOUT_SECS must be a positive integer")
            }
            ConfigError::InvalidPasscode => {
                write!(f, "ADMIN_PASSCODE must be exactly 4 characters")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidTimeout
            | ConfigError::InvalidPasscode => None,
        }
    }
}
