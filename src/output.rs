//! Writing raw and extracted subtitle artifacts to disk.

use std::path::{Path, PathBuf};

use crate::Result;

const FORBIDDEN_CHARS: &[char] = &['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

/// Writes `<name>.json` under `raw_dir` and `<name>.txt` under `text_dir`.
#[derive(Debug, Clone)]
pub struct ArtifactWriter {
    raw_dir: PathBuf,
    text_dir: PathBuf,
}

impl ArtifactWriter {
    pub fn new(raw_dir: impl Into<PathBuf>, text_dir: impl Into<PathBuf>) -> Self {
        Self {
            raw_dir: raw_dir.into(),
            text_dir: text_dir.into(),
        }
    }

    pub async fn write_raw(&self, name: &str, body: &str) -> Result<PathBuf> {
        write_file(&self.raw_dir, &format!("{name}.json"), body).await
    }

    pub async fn write_text(&self, name: &str, text: &str) -> Result<PathBuf> {
        write_file(&self.text_dir, &format!("{name}.txt"), text).await
    }
}

/// Drop characters that are not allowed in file names on common platforms.
pub fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| !FORBIDDEN_CHARS.contains(c) && !c.is_control())
        .collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        "untitled".to_string()
    } else {
        cleaned.to_string()
    }
}

async fn write_file(dir: &Path, file_name: &str, contents: &str) -> Result<PathBuf> {
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(file_name);
    tokio::fs::write(&path, contents).await?;
    tracing::debug!("Wrote {}", path.display());
    Ok(path)
}
