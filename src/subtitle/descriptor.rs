use serde::{Deserialize, Serialize};

/// One subtitle track offered for a part.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtitleDescriptor {
    #[serde(default)]
    pub lan: String,
    #[serde(default)]
    pub lan_doc: String,
    #[serde(default)]
    pub subtitle_url: Option<String>,
}

impl SubtitleDescriptor {
    /// Absolute download URL, if the track has one. Protocol-relative URLs
    /// get an `https:` scheme.
    pub fn resource_url(&self) -> Option<String> {
        let url = self.subtitle_url.as_deref()?.trim();
        if url.is_empty() {
            None
        } else if url.starts_with("//") {
            Some(format!("https:{url}"))
        } else {
            Some(url.to_string())
        }
    }
}

/// Pick the track to download: the preferred language when it has a URL,
/// otherwise the first track with a URL.
pub fn select<'a>(
    descriptors: &'a [SubtitleDescriptor],
    preferred: Option<&str>,
) -> Option<&'a SubtitleDescriptor> {
    preferred
        .and_then(|lan| {
            descriptors
                .iter()
                .find(|d| d.lan == lan && d.resource_url().is_some())
        })
        .or_else(|| descriptors.iter().find(|d| d.resource_url().is_some()))
}
