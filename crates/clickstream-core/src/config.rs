//! Generation configuration.
//!
//! A run is fully described by a [`GenerationConfig`]: population sizes, the
//! date window sessions fall into, the seed, the shard count, and the
//! session boundary policy. Configurations can be written as YAML:
//!
//! ```yaml
//! num_users: 200
//! num_sessions: 500
//! num_products: 50
//! start_date: "2024-01-01"
//! end_date: "2025-05-25"
//! seed: 7
//! workers: 4
//! session_boundary: stretch
//! ```
//!
//! Every field is optional and falls back to the defaults below.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

pub const DEFAULT_NUM_USERS: u64 = 500;
pub const DEFAULT_NUM_SESSIONS: u64 = 1000;
pub const DEFAULT_NUM_PRODUCTS: u64 = 100;
pub const DEFAULT_START_DATE: &str = "2024-01-01";
pub const DEFAULT_END_DATE: &str = "2025-05-25";
pub const DEFAULT_SEED: u64 = 42;

/// Error type for configuration problems.
///
/// All of these are raised before any generation work begins.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Error reading configuration file
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    /// Error parsing YAML
    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// A population count was zero
    #[error("{field} must be greater than zero")]
    ZeroCount { field: &'static str },

    /// A date could not be parsed
    #[error("Invalid {field} '{value}': expected an ISO date such as 2024-01-01")]
    InvalidDate { field: &'static str, value: String },

    /// The window does not span at least one whole day
    #[error("Date window {start}..{end} must span at least one day")]
    EmptyWindow { start: NaiveDate, end: NaiveDate },
}

/// How the journey walker treats a session's nominal `end_time`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionBoundary {
    /// `end_time` is advisory pacing only; journeys may run past it.
    #[default]
    Overrun,
    /// Stop starting new product visits and checkout steps once the clock
    /// reaches `end_time`.
    Truncate,
    /// Like `Overrun`, but the stored `end_time` is pushed out to the last
    /// event so every event lies inside the session.
    Stretch,
}

impl SessionBoundary {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionBoundary::Overrun => "overrun",
            SessionBoundary::Truncate => "truncate",
            SessionBoundary::Stretch => "stretch",
        }
    }
}

impl fmt::Display for SessionBoundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SessionBoundary {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "overrun" => Ok(SessionBoundary::Overrun),
            "truncate" => Ok(SessionBoundary::Truncate),
            "stretch" => Ok(SessionBoundary::Stretch),
            other => Err(format!(
                "unknown session boundary '{other}' (expected overrun, truncate or stretch)"
            )),
        }
    }
}

/// Full configuration for one generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub num_users: u64,
    pub num_sessions: u64,
    pub num_products: u64,
    /// First day of the window (inclusive), ISO date.
    pub start_date: String,
    /// Last day of the window (exclusive), ISO date.
    pub end_date: String,
    /// Random seed for deterministic generation (same seed = same data)
    pub seed: u64,
    /// Number of session shards generated in parallel
    pub workers: usize,
    pub session_boundary: SessionBoundary,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            num_users: DEFAULT_NUM_USERS,
            num_sessions: DEFAULT_NUM_SESSIONS,
            num_products: DEFAULT_NUM_PRODUCTS,
            start_date: DEFAULT_START_DATE.to_string(),
            end_date: DEFAULT_END_DATE.to_string(),
            seed: DEFAULT_SEED,
            workers: 1,
            session_boundary: SessionBoundary::default(),
        }
    }
}

impl GenerationConfig {
    /// Load a configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse a configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: GenerationConfig = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Check the configuration and resolve the date window.
    pub fn validate(&self) -> Result<GenerationWindow, ConfigError> {
        for (field, value) in [
            ("num_users", self.num_users),
            ("num_sessions", self.num_sessions),
            ("num_products", self.num_products),
            ("workers", self.workers as u64),
        ] {
            if value == 0 {
                return Err(ConfigError::ZeroCount { field });
            }
        }

        let start = parse_date("start_date", &self.start_date)?;
        let end = parse_date("end_date", &self.end_date)?;
        GenerationWindow::new(start, end)
    }
}

/// Parse an ISO date, accepting a full ISO datetime and keeping its date.
fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, ConfigError> {
    let trimmed = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S") {
        return Ok(dt.date());
    }
    Err(ConfigError::InvalidDate {
        field,
        value: value.to_string(),
    })
}

/// A validated `[start, end)` date window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl GenerationWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ConfigError> {
        if (end - start).num_days() < 1 {
            return Err(ConfigError::EmptyWindow { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of whole days a random date can fall on.
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}
