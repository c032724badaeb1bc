use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::Result;

use super::CredentialBundle;

/// Flat file holding one [`CredentialBundle`] as JSON.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

/// On-disk shape; every field optional so a partial file is detected
/// instead of failing to parse.
#[derive(Debug, Deserialize)]
struct StoredCredentials {
    #[serde(rename = "SESSDATA")]
    session_token: Option<String>,
    #[serde(rename = "bili_jct")]
    csrf_token: Option<String>,
    #[serde(rename = "DedeUserID")]
    user_id: Option<String>,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored bundle. A missing, non-UTF-8, unparseable or
    /// incomplete file yields `Ok(None)`; only other read failures are errors.
    ///
    /// Besides JSON, a raw browser `Cookie` header line is accepted.
    pub async fn load(&self) -> Result<Option<CredentialBundle>> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("No credential file at {}", self.path.display());
                return Ok(None);
            }
            Err(e) if e.kind() == std::io::ErrorKind::InvalidData => {
                tracing::warn!("Credential file {} is not UTF-8", self.path.display());
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let raw = raw.trim();
        let bundle = if raw.starts_with('{') {
            match serde_json::from_str::<StoredCredentials>(raw) {
                Ok(stored) => Some(CredentialBundle::new(
                    stored.session_token.unwrap_or_default(),
                    stored.csrf_token.unwrap_or_default(),
                    stored.user_id.unwrap_or_default(),
                )),
                Err(e) => {
                    tracing::warn!("Credential file {} is not valid: {e}", self.path.display());
                    None
                }
            }
        } else {
            CredentialBundle::from_cookie_header(raw)
        };

        match bundle {
            Some(bundle) if bundle.is_usable() => Ok(Some(bundle)),
            _ => {
                tracing::warn!(
                    "Credential file {} lacks SESSDATA or bili_jct",
                    self.path.display()
                );
                Ok(None)
            }
        }
    }

    /// Overwrite the store with `bundle` via a temp file and rename.
    pub async fn save(&self, bundle: &CredentialBundle) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_string_pretty(bundle)?;
        let tmp_path = self.path.with_extension("tmp");
        tokio::fs::write(&tmp_path, json + "\n").await?;
        tokio::fs::rename(&tmp_path, &self.path).await?;
        tracing::info!("Saved credentials to {}", self.path.display());
        Ok(())
    }
}
