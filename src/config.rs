use std::{path::PathBuf, time::Duration};

use crate::{collection::WalkOptions, session::SessionSettings, subtitle::RetrySettings};

pub const DEFAULT_CREDENTIALS_FILE: &str = "credentials.json";

/// Runtime knobs resolved from defaults, then environment, then CLI flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub credentials_file: PathBuf,
    pub max_attempts: u32,
    pub retry_delay: Duration,
    pub part_pause: Duration,
    pub login_poll_interval: Duration,
    pub probe_timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            credentials_file: PathBuf::from(DEFAULT_CREDENTIALS_FILE),
            max_attempts: 3,
            retry_delay: Duration::from_secs(2),
            part_pause: Duration::from_secs(1),
            login_poll_interval: Duration::from_secs(2),
            probe_timeout: Duration::from_secs(5),
        }
    }
}

impl Settings {
    /// Defaults overridden by `BILISUB_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let value = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let secs = |key: &str, default: Duration| {
            value(key)
                .and_then(|v| v.parse::<u64>().ok())
                .map(Duration::from_secs)
                .unwrap_or(default)
        };

        Self {
            credentials_file: value("BILISUB_CREDENTIALS")
                .map(PathBuf::from)
                .unwrap_or(defaults.credentials_file),
            max_attempts: value("BILISUB_MAX_ATTEMPTS")
                .and_then(|v| v.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(defaults.max_attempts),
            retry_delay: secs("BILISUB_RETRY_DELAY_SECS", defaults.retry_delay),
            part_pause: secs("BILISUB_PART_PAUSE_SECS", defaults.part_pause),
            login_poll_interval: secs("BILISUB_LOGIN_POLL_SECS", defaults.login_poll_interval),
            probe_timeout: secs("BILISUB_PROBE_TIMEOUT_SECS", defaults.probe_timeout),
        }
    }

    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            login_poll_interval: self.login_poll_interval,
            probe_timeout: self.probe_timeout,
        }
    }

    pub fn retry_settings(&self) -> RetrySettings {
        RetrySettings {
            max_attempts: self.max_attempts,
            delay: self.retry_delay,
        }
    }

    pub fn walk_options(
        &self,
        preferred_language: Option<String>,
        part: Option<usize>,
        merge: bool,
    ) -> WalkOptions {
        WalkOptions {
            preferred_language,
            part,
            merge,
            retry: self.retry_settings(),
            part_pause: self.part_pause,
        }
    }
}
