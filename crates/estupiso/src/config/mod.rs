use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::reviews::{CooldownPolicy, MonthArithmetic, DEFAULT_COOLDOWN_MONTHS};

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
    pub matching: MatchingConfig,
    pub reviews: ReviewConfig,
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

        let affinity_table = env::var("ESTUPISO_AFFINITY_TABLE")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        let cooldown_months = match env::var("ESTUPISO_REVIEW_COOLDOWN_MONTHS") {
            Ok(raw) => raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|months| *months > 0)
                .ok_or(ConfigError::InvalidCooldown { value: raw })?,
            Err(_) => DEFAULT_COOLDOWN_MONTHS,
        };

        let month_arithmetic = match env::var("ESTUPISO_REVIEW_MONTH_ARITHMETIC") {
            Ok(raw) => parse_month_arithmetic(&raw)
                .ok_or(ConfigError::InvalidMonthArithmetic { value: raw })?,
            Err(_) => MonthArithmetic::default(),
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            matching: MatchingConfig { affinity_table },
            reviews: ReviewConfig {
                cooldown_months,
                month_arithmetic,
            },
        })
    }
}

fn parse_month_arithmetic(raw: &str) -> Option<MonthArithmetic> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "thirty_day" | "30d" | "approximate" => Some(MonthArithmetic::ThirtyDay),
        "calendar" => Some(MonthArithmetic::Calendar),
        _ => None,
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

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Where the compatibility engine sources its field-of-study affinity groups.
#[derive(Debug, Clone, Default)]
pub struct MatchingConfig {
    /// JSON file overriding the built-in affinity table.
    pub affinity_table: Option<PathBuf>,
}

/// Review cooldown dials.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewConfig {
    pub cooldown_months: u32,
    pub month_arithmetic: MonthArithmetic,
}

impl ReviewConfig {
    pub fn cooldown_policy(&self) -> CooldownPolicy {
        CooldownPolicy::new(self.cooldown_months, self.month_arithmetic)
    }
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            cooldown_months: DEFAULT_COOLDOWN_MONTHS,
            month_arithmetic: MonthArithmetic::default(),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidCooldown { value: String },
    InvalidMonthArithmetic { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidCooldown { value } => write!(
                f,
                "ESTUPISO_REVIEW_COOLDOWN_MONTHS must be a positive integer (found '{value}')"
            ),
            ConfigError::InvalidMonthArithmetic { value } => write!(
                f,
                "ESTUPISO_REVIEW_MONTH_ARITHMETIC must be 'thirty_day' or 'calendar' (found '{value}')"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidCooldown { .. }
            | ConfigError::InvalidMonthArithmetic { .. } => None,
        }
    }
}
