use serde::Deserialize;

use crate::{Error, Result};

#[derive(Debug, Deserialize)]
struct SubtitleBody {
    #[serde(default)]
    body: Vec<SubtitleLine>,
}

#[derive(Debug, Deserialize)]
struct SubtitleLine {
    #[serde(default)]
    content: Option<String>,
}

/// Plain text of a downloaded subtitle document: one line per cue.
pub fn extract_text(raw: &str) -> Result<String> {
    let doc: SubtitleBody =
        serde_json::from_str(raw).map_err(|e| Error::invalid_response("subtitle body", e))?;
    let lines: Vec<String> = doc.body.into_iter().filter_map(|line| line.content).collect();
    Ok(lines.join("\n"))
}
