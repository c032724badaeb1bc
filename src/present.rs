//! Operator-facing output the core calls without knowing about terminals.

pub mod terminal;
#[cfg(test)]
pub(crate) mod recording;

pub use terminal::TerminalPresenter;

use std::path::Path;

use crate::{collection::PartDescriptor, subtitle::SubtitleDescriptor};

pub trait Presenter {
    /// Show the login challenge URL so the operator can scan it.
    fn present_challenge(&self, url: &str);

    /// Show the subtitle tracks found for a part.
    fn list_subtitles(&self, part: &PartDescriptor, descriptors: &[SubtitleDescriptor]);

    /// Point the operator at a file that was written.
    fn report_artifact_path(&self, label: &str, path: &Path);
}
