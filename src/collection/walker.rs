use std::{path::PathBuf, time::Duration};

use url::Url;

use crate::{
    Error, Result,
    output::{ArtifactWriter, sanitize_file_name},
    session::Session,
    subtitle::{RetrySettings, extract_text, locate_subtitle},
    transport::Transport,
};

use super::{MediaId, MediaInfo, PartDescriptor, resolve_parts};

#[derive(Debug, Clone)]
pub struct WalkOptions {
    pub preferred_language: Option<String>,
    /// Restrict the walk to this 1-based part.
    pub part: Option<usize>,
    /// Also write all parts' text into one file.
    pub merge: bool,
    pub retry: RetrySettings,
    /// Pause between parts.
    pub part_pause: Duration,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            preferred_language: None,
            part: None,
            merge: false,
            retry: RetrySettings::default(),
            part_pause: Duration::from_secs(1),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PartOutcome {
    pub part: PartDescriptor,
    pub text_path: Option<PathBuf>,
    /// Why the part produced nothing, when it did not.
    pub skipped: Option<String>,
}

#[derive(Debug, Clone)]
pub struct WalkReport {
    pub title: String,
    pub outcomes: Vec<PartOutcome>,
    pub merged: Option<PathBuf>,
}

impl WalkReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.text_path.is_some()).count()
    }

    /// Fail with [`Error::NoSubtitle`] when no selected part produced text.
    pub fn into_result(self) -> Result<Self> {
        if self.succeeded() == 0 {
            Err(Error::NoSubtitle(self.title))
        } else {
            Ok(self)
        }
    }
}

/// Fetch subtitles for every selected part of `media`.
///
/// A part without subtitles, or failing with a non-fatal error, is skipped;
/// fatal errors (see [`Error::is_fatal`]) end the walk.
pub async fn walk<T: Transport>(
    session: &mut Session<T>,
    media: &MediaId,
    writer: &ArtifactWriter,
    options: &WalkOptions,
) -> Result<WalkReport> {
    let info = resolve_parts(session, media).await?;
    let parts = select_parts(&info, options.part)?;

    let mut outcomes = Vec::with_capacity(parts.len());
    let mut texts = Vec::new();

    for (i, part) in parts.into_iter().enumerate() {
        if i > 0 {
            tokio::time::sleep(options.part_pause).await;
        }

        let name = artifact_name(&info, &part);
        match process_part(session, &info, &part, &name, writer, options).await {
            Ok(Some((path, text))) => {
                texts.push((part.clone(), text));
                outcomes.push(PartOutcome {
                    part,
                    text_path: Some(path),
                    skipped: None,
                });
            }
            Ok(None) => {
                tracing::warn!("P{} {}: no subtitle available", part.index, part.title);
                outcomes.push(PartOutcome {
                    part,
                    text_path: None,
                    skipped: Some("no subtitle available".to_string()),
                });
            }
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                tracing::warn!("P{} {}: skipped after error: {e}", part.index, part.title);
                outcomes.push(PartOutcome {
                    part,
                    text_path: None,
                    skipped: Some(e.to_string()),
                });
            }
        }
    }

    let merged = if options.merge && outcomes.len() > 1 && !texts.is_empty() {
        let path = writer
            .write_text(&sanitize_file_name(&info.title), &merge_texts(&texts))
            .await?;
        session.presenter().report_artifact_path("Merged text", &path);
        Some(path)
    } else {
        None
    };

    Ok(WalkReport {
        title: info.title,
        outcomes,
        merged,
    })
}

fn select_parts(info: &MediaInfo, selector: Option<usize>) -> Result<Vec<PartDescriptor>> {
    match selector {
        None => Ok(info.parts.clone()),
        Some(index) => info
            .parts
            .iter()
            .find(|p| p.index == index)
            .cloned()
            .map(|p| vec![p])
            .ok_or(Error::PartOutOfRange {
                requested: index,
                available: info.parts.len(),
            }),
    }
}

fn artifact_name(info: &MediaInfo, part: &PartDescriptor) -> String {
    if info.is_collection() {
        format!("{:02}_{}", part.index, sanitize_file_name(&part.title))
    } else {
        sanitize_file_name(&part.title)
    }
}

fn merge_texts(texts: &[(PartDescriptor, String)]) -> String {
    texts
        .iter()
        .map(|(part, text)| format!("--- Part {} {} ---\n{}\n", part.index, part.title, text))
        .collect::<Vec<_>>()
        .join("\n")
}

async fn process_part<T: Transport>(
    session: &mut Session<T>,
    info: &MediaInfo,
    part: &PartDescriptor,
    name: &str,
    writer: &ArtifactWriter,
    options: &WalkOptions,
) -> Result<Option<(PathBuf, String)>> {
    let located = locate_subtitle(
        session,
        info.aid,
        part.cid,
        options.preferred_language.as_deref(),
        &options.retry,
    )
    .await?;
    let Some(url) = located.url else {
        return Ok(None);
    };

    session.presenter().list_subtitles(part, &located.descriptors);
    tracing::info!("P{}: downloading {url}", part.index);

    let raw = session.get_text(Url::parse(&url)?).await?;
    let raw_path = writer.write_raw(name, &raw).await?;
    session.presenter().report_artifact_path("Subtitle JSON", &raw_path);

    let text = extract_text(&raw)?;
    let text_path = writer.write_text(name, &text).await?;
    session.presenter().report_artifact_path("Subtitle text", &text_path);

    Ok(Some((text_path, text)))
}
