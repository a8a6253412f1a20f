//! Application configuration structs
//!
//! Loads configuration from environment variables.

use serde::Deserialize;
use std::env;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub database: DatabaseConfig,
    pub engine: EngineSettings,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_env")]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Engine tuning knobs
#[derive(Debug, Clone, Deserialize)]
pub struct EngineSettings {
    /// Competition window length
    #[serde(default = "default_season_length_days")]
    pub season_length_days: i64,
    /// How often the rollover sweeper checks for due seasons
    #[serde(default = "default_rollover_sweep_secs")]
    pub rollover_sweep_secs: u64,
    /// Fixed offset shifting event timestamps into community local time
    #[serde(default)]
    pub utc_offset_hours: i8,
    /// Broadcast bus depth for engine events
    #[serde(default = "default_event_bus_capacity")]
    pub event_bus_capacity: usize,
    /// Write-behind queue depth
    #[serde(default = "default_persist_queue_capacity")]
    pub persist_queue_capacity: usize,
    /// Worker id baked into engine-minted season ids
    #[serde(default)]
    pub worker_id: u16,
}

impl EngineSettings {
    #[must_use]
    pub fn season_length(&self) -> chrono::Duration {
        chrono::Duration::days(self.season_length_days)
    }

    #[must_use]
    pub fn sweep_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.rollover_sweep_secs)
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            season_length_days: default_season_length_days(),
            rollover_sweep_secs: default_rollover_sweep_secs(),
            utc_offset_hours: 0,
            event_bus_capacity: default_event_bus_capacity(),
            persist_queue_capacity: default_persist_queue_capacity(),
            worker_id: 0,
        }
    }
}

// Default value functions
fn default_app_name() -> String {
    "podium".to_string()
}

fn default_env() -> Environment {
    Environment::Development
}

fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    5
}

fn default_season_length_days() -> i64 {
    14
}

fn default_rollover_sweep_secs() -> u64 {
    60
}

fn default_event_bus_capacity() -> usize {
    1024
}

fn default_persist_queue_capacity() -> usize {
    4096
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Ok(Self {
            app: AppSettings {
                name: env::var("APP_NAME").unwrap_or_else(|_| default_app_name()),
                env: env::var("APP_ENV")
                    .ok()
                    .and_then(|s| match s.to_lowercase().as_str() {
                        "production" => Some(Environment::Production),
                        "staging" => Some(Environment::Staging),
                        "development" => Some(Environment::Development),
                        _ => None,
                    })
                    .unwrap_or_default(),
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").map_err(|_| ConfigError::MissingVar("DATABASE_URL"))?,
                max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(default_max_connections),
                min_connections: env::var("DATABASE_MIN_CONNECTIONS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(default_min_connections),
            },
            engine: EngineSettings {
                season_length_days: env::var("SEASON_LENGTH_DAYS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(default_season_length_days),
                rollover_sweep_secs: env::var("ROLLOVER_SWEEP_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(default_rollover_sweep_secs),
                utc_offset_hours: match env::var("UTC_OFFSET_HOURS").ok() {
                    Some(raw) => {
                        let offset: i8 = raw
                            .parse()
                            .map_err(|_| ConfigError::InvalidValue("UTC_OFFSET_HOURS", raw.clone()))?;
                        if !(-12..=14).contains(&offset) {
                            return Err(ConfigError::InvalidValue("UTC_OFFSET_HOURS", raw));
                        }
                        offset
                    }
                    None => 0,
                },
                event_bus_capacity: env::var("EVENT_BUS_CAPACITY")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(default_event_bus_capacity),
                persist_queue_capacity: env::var("PERSIST_QUEUE_CAPACITY")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(default_persist_queue_capacity),
                worker_id: env::var("WORKER_ID")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(0),
            },
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
