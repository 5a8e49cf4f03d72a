use crate::processing::fraud::{
    FraudConfig, DEFAULT_LOOKUP_COUNTRY, DEFAULT_PRICE_FLOOR_RATIO, DEFAULT_SUSPICION_THRESHOLD,
};
use crate::processing::pipeline::PipelineConfig;
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

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
    pub processing: ProcessingConfig,
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

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            processing: ProcessingConfig::from_env()?,
        })
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

/// Defaults applied to every processing request.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessingConfig {
    pub default_country: String,
    pub suspicion_threshold: u32,
    pub price_floor_ratio: f64,
    pub drop_suspicious: bool,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            default_country: DEFAULT_LOOKUP_COUNTRY.to_string(),
            suspicion_threshold: DEFAULT_SUSPICION_THRESHOLD,
            price_floor_ratio: DEFAULT_PRICE_FLOOR_RATIO,
            drop_suspicious: false,
        }
    }
}

impl ProcessingConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let default_country = env::var("LISTINGS_DEFAULT_COUNTRY")
            .ok()
            .map(|code| code.trim().to_ascii_uppercase())
            .filter(|code| !code.is_empty())
            .unwrap_or(defaults.default_country);

        let suspicion_threshold = match env::var("LISTINGS_SUSPICION_THRESHOLD") {
            Ok(raw) => raw
                .trim()
                .parse::<u32>()
                .map_err(|_| ConfigError::InvalidThreshold(raw))?,
            Err(_) => defaults.suspicion_threshold,
        };

        let price_floor_ratio = match env::var("LISTINGS_PRICE_FLOOR_RATIO") {
            Ok(raw) => raw
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|ratio| ratio.is_finite() && *ratio >= 0.0)
                .ok_or(ConfigError::InvalidPriceFloorRatio(raw))?,
            Err(_) => defaults.price_floor_ratio,
        };

        let drop_suspicious = match env::var("LISTINGS_DROP_SUSPICIOUS") {
            Ok(raw) => parse_flag(&raw).ok_or(ConfigError::InvalidFlag {
                name: "LISTINGS_DROP_SUSPICIOUS",
                value: raw,
            })?,
            Err(_) => defaults.drop_suspicious,
        };

        Ok(Self {
            default_country,
            suspicion_threshold,
            price_floor_ratio,
            drop_suspicious,
        })
    }

    pub fn fraud_config(&self) -> FraudConfig {
        let mut fraud = FraudConfig::default()
            .with_threshold(self.suspicion_threshold)
            .with_price_floor_ratio(self.price_floor_ratio);
        fraud.default_country = self.default_country.clone();
        fraud
    }

    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            fraud: self.fraud_config(),
            check_fraud: true,
            drop_suspicious: self.drop_suspicious,
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidThreshold(String),
    InvalidPriceFloorRatio(String),
    InvalidFlag { name: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => write!(f, "APP_HOST must be an IP or localhost"),
            ConfigError::InvalidThreshold(value) => write!(
                f,
                "LISTINGS_SUSPICION_THRESHOLD must be a non-negative integer (got '{}')",
                value
            ),
            ConfigError::InvalidPriceFloorRatio(value) => write!(
                f,
                "LISTINGS_PRICE_FLOOR_RATIO must be a non-negative number (got '{}')",
                value
            ),
            ConfigError::InvalidFlag { name, value } => {
                write!(f, "{} must be true or false (got '{}')", name, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidThreshold(_)
            | ConfigError::InvalidPriceFloorRatio(_)
            | ConfigError::InvalidFlag { .. } => None,
        }
    }
}
