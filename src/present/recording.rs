use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use crate::{collection::PartDescriptor, subtitle::SubtitleDescriptor};

use super::Presenter;

/// Presenter that records calls; clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct RecordingPresenter {
    pub challenges: Arc<Mutex<Vec<String>>>,
    pub artifacts: Arc<Mutex<Vec<(String, PathBuf)>>>,
    pub listings: Arc<Mutex<Vec<usize>>>,
}

impl RecordingPresenter {
    pub fn challenge_count(&self) -> usize {
        self.challenges.lock().unwrap().len()
    }

    pub fn artifacts(&self) -> Vec<(String, PathBuf)> {
        self.artifacts.lock().unwrap().clone()
    }
}

impl Presenter for RecordingPresenter {
    fn present_challenge(&self, url: &str) {
        self.challenges.lock().unwrap().push(url.to_string());
    }

    fn list_subtitles(&self, part: &PartDescriptor, _descriptors: &[SubtitleDescriptor]) {
        self.listings.lock().unwrap().push(part.index);
    }

    fn report_artifact_path(&self, label: &str, path: &Path) {
        self.artifacts
            .lock()
            .unwrap()
            .push((label.to_string(), path.to_path_buf()));
    }
}
