use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub monitor: MonitorConfig,
    pub api: ApiConfig,
    pub rate_limit: RateLimitConfig,
    pub audio: AudioConfig,
    pub ui: UiConfig,
    pub monitoring: MonitoringConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MonitorConfig {
    /// NHL web API team id of the monitored team (Buffalo = 7).
    pub team_id: u32,
    /// Courtesy delay between consecutive live-game polls.
    pub poll_interval_seconds: u64,
    /// How long before the scheduled start the countdown wait returns.
    pub start_offset_seconds: u64,
    /// Local hour at which the daily loop wakes to look for the next game.
    pub rollover_hour: u32,
}

impl MonitorConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_seconds)
    }

    pub fn start_offset(&self) -> Duration {
        Duration::from_secs(self.start_offset_seconds)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub request_timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    pub requests_per_second: u32,
    pub burst_size: u32,
    pub max_retries: u32,
    pub backoff_base_ms: u64,
    pub backoff_max_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AudioConfig {
    pub enabled: bool,
    pub song_book_path: String,
    /// Clip played when the countdown wait ends, just before puck drop.
    pub warmup_clip: Option<String>,
    /// Clip played when the opponent scores.
    pub opponent_goal_clip: Option<String>,
    /// Upper bound on how long a goal clip keeps the monitor suspended.
    pub goal_hold_seconds: u64,
}

impl AudioConfig {
    pub fn goal_hold(&self) -> Duration {
        Duration::from_secs(self.goal_hold_seconds)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UiConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MonitoringConfig {
    pub log_level: String,
}

/// Secrets loaded exclusively from environment variables.
/// Not serializable, not stored in config files.
pub struct Secrets {
    pub webhook_url: Option<String>,
}

impl Secrets {
    pub fn from_env() -> Self {
        Self {
            webhook_url: std::env::var("GOALHORN_WEBHOOK_URL").ok(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file, overlaying environment variables
    /// for secrets.
    pub fn load(path: &Path) -> Result<(Self, Secrets)> {
        dotenvy::dotenv().ok();

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: AppConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        let secrets = Secrets::from_env();

        Ok((config, secrets))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_default_config() {
        let contents = std::fs::read_to_string("config/default.toml")
            .expect("config/default.toml should exist");
        let config: AppConfig = toml::from_str(&contents).expect("should parse");
        assert_eq!(config.monitor.team_id, 7);
        assert_eq!(config.monitor.poll_interval_seconds, 10);
        assert_eq!(config.monitor.rollover_hour, 4);
        assert_eq!(config.api.base_url, "https://api-web.nhle.com");
        assert!(config.audio.enabled);
    }

    #[test]
    fn test_duration_helpers() {
        let monitor = MonitorConfig {
            team_id: 7,
            poll_interval_seconds: 10,
            start_offset_seconds: 15,
            rollover_hour: 4,
        };
        assert_eq!(monitor.poll_interval(), Duration::from_secs(10));
        assert_eq!(monitor.start_offset(), Duration::from_secs(15));
    }
}
