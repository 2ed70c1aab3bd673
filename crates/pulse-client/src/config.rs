use std::path::PathBuf;
use std::time::Duration;

/// Client settings, read from the environment (and `.env`, if present).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_base: String,
    pub snapshot_path: PathBuf,
    pub mirror_enabled: bool,
    pub mirror_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: "http://localhost:5000/api".into(),
            snapshot_path: PathBuf::from("cinemapulse-session.db"),
            mirror_enabled: true,
            mirror_timeout: Duration::from_secs(5),
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let mirror_enabled = match get("PULSE_MIRROR").as_deref() {
            Some("off" | "0" | "false") => false,
            _ => defaults.mirror_enabled,
        };
        let mirror_timeout = get("PULSE_MIRROR_TIMEOUT_SECS")
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.mirror_timeout);

        Self {
            api_base: get("PULSE_API_BASE").unwrap_or(defaults.api_base),
            snapshot_path: get("PULSE_SNAPSHOT_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.snapshot_path),
            mirror_enabled,
            mirror_timeout,
        }
    }
}
