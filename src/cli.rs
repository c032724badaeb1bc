use std::path::PathBuf;

use clap::Parser;

use crate::config::Settings;

/// Download and extract subtitles for a video or every part of a collection.
#[derive(Debug, Parser)]
#[command(name = "bilisub", version)]
pub struct Cli {
    /// BV id, av id or video URL
    pub media_id: String,

    /// Directory for extracted text
    #[arg(short, long, default_value = "output")]
    pub output: PathBuf,

    /// Directory for raw subtitle JSON
    #[arg(long, default_value = "input")]
    pub json_dir: PathBuf,

    /// Preferred subtitle language code, e.g. zh-CN, en, ai-zh
    #[arg(long)]
    pub lan: Option<String>,

    /// Only process this part (1-based)
    #[arg(short, long, value_parser = clap::value_parser!(u64).range(1..))]
    pub part: Option<u64>,

    /// Also write all parts into one merged text file
    #[arg(long)]
    pub merge: bool,

    /// Credential file (overrides BILISUB_CREDENTIALS)
    #[arg(long)]
    pub credentials: Option<PathBuf>,

    /// Lookup attempts per part (overrides BILISUB_MAX_ATTEMPTS)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub attempts: Option<u32>,

    /// Seconds between lookup attempts (overrides BILISUB_RETRY_DELAY_SECS)
    #[arg(long)]
    pub delay: Option<u64>,
}

impl Cli {
    /// Apply flag overrides on top of `settings`.
    pub fn apply(&self, mut settings: Settings) -> Settings {
        if let Some(path) = &self.credentials {
            settings.credentials_file = path.clone();
        }
        if let Some(attempts) = self.attempts {
            settings.max_attempts = attempts;
        }
        if let Some(delay) = self.delay {
            settings.retry_delay = std::time::Duration::from_secs(delay);
        }
        settings
    }

    pub fn part_index(&self) -> Option<usize> {
        self.part.map(|p| p as usize)
    }
}
