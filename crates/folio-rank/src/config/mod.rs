use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

use crate::scoring::ScoreOptions;

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
    pub scoring: ScoringConfig,
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

        let scoring = ScoringConfig::load()?;

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            scoring,
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

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Deployment-wide defaults for score output shaping. Individual preview
/// requests may still override these per call.
#[derive(Debug, Clone, Copy)]
pub struct ScoringConfig {
    pub output_min: f64,
    pub output_max: f64,
    pub decimal_places: u32,
}

impl ScoringConfig {
    fn load() -> Result<Self, ConfigError> {
        let output_min = parse_scale_var("APP_SCORE_SCALE_MIN", 0.0)?;
        let output_max = parse_scale_var("APP_SCORE_SCALE_MAX", 10.0)?;
        if output_max <= output_min {
            return Err(ConfigError::InvalidScoreScale {
                output_min,
                output_max,
            });
        }

        let decimal_places = match env::var("APP_SCORE_DECIMALS") {
            Ok(raw) => raw
                .trim()
                .parse::<u32>()
                .map_err(|_| ConfigError::InvalidScoreDecimals)?,
            Err(_) => 2,
        };

        Ok(Self {
            output_min,
            output_max,
            decimal_places,
        })
    }

    pub fn options(&self) -> ScoreOptions {
        ScoreOptions {
            normalize_output: true,
            output_min: self.output_min,
            output_max: self.output_max,
            decimal_places: self.decimal_places,
        }
    }
}

fn parse_scale_var(name: &'static str, default: f64) -> Result<f64, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<f64>()
            .map_err(|_| ConfigError::InvalidScaleBound { var: name }),
        Err(_) => Ok(default),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidScaleBound { var: &'static str },
    InvalidScoreScale { output_min: f64, output_max: f64 },
    InvalidScoreDecimals,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidScaleBound { var } => {
                write!(f, "{var} must be a number")
            }
            ConfigError::InvalidScoreScale {
                output_min,
                output_max,
            } => write!(
                f,
                "APP_SCORE_SCALE_MAX ({output_max}) must be greater than APP_SCORE_SCALE_MIN ({output_min})"
            ),
            ConfigError::InvalidScoreDecimals => {
                write!(f, "APP_SCORE_DECIMALS must be a non-negative integer")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        env::remove_var("APP_ENV");
        env::remove_var("APP_HOST");
        env::remove_var("APP_PORT");
        env::remove_var("APP_LOG_LEVEL");
        env::remove_var("APP_SCORE_SCALE_MIN");
        env::remove_var("APP_SCORE_SCALE_MAX");
        env::remove_var("APP_SCORE_DECIMALS");
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.scoring.output_min, 0.0);
        assert_eq!(config.scoring.output_max, 10.0);
        assert_eq!(config.scoring.decimal_places, 2);
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
    }

    #[test]
    fn committee_scale_can_be_configured() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_SCORE_SCALE_MIN", "1");
        env::set_var("APP_SCORE_SCALE_MAX", "5");
        let config = AppConfig::load().expect("config loads");
        let options = config.scoring.options();
        assert_eq!(options.output_min, 1.0);
        assert_eq!(options.output_max, 5.0);
        reset_env();
    }

    #[test]
    fn rejects_a_degenerate_score_scale() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_SCORE_SCALE_MIN", "5");
        env::set_var("APP_SCORE_SCALE_MAX", "5");
        let result = AppConfig::load();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidScoreScale { .. })
        ));
        reset_env();
    }
}
