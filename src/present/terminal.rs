use std::path::Path;

use qrcode::{QrCode, render::unicode};

use crate::{collection::PartDescriptor, subtitle::SubtitleDescriptor};

use super::Presenter;

/// Renders the QR code as unicode blocks on stderr and prints file paths as
/// OSC 8 hyperlinks when `hyperlinks` is set.
#[derive(Debug, Clone)]
pub struct TerminalPresenter {
    hyperlinks: bool,
}

impl TerminalPresenter {
    pub fn new(hyperlinks: bool) -> Self {
        Self { hyperlinks }
    }
}

impl Default for TerminalPresenter {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Presenter for TerminalPresenter {
    fn present_challenge(&self, url: &str) {
        match render_qr(url) {
            Some(code) => eprintln!("\n{code}\n"),
            None => tracing::warn!("Could not render QR code, open the URL instead"),
        }
        eprintln!("Scan with the mobile app to log in: {url}");
    }

    fn list_subtitles(&self, part: &PartDescriptor, descriptors: &[SubtitleDescriptor]) {
        println!("Available subtitles for P{} {}:", part.index, part.title);
        for descriptor in descriptors {
            println!("  {} - {}", descriptor.lan, descriptor.lan_doc);
        }
    }

    fn report_artifact_path(&self, label: &str, path: &Path) {
        let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
        if self.hyperlinks {
            println!("{label}: {}", hyperlink(&absolute));
        } else {
            println!("{label}: {}", absolute.display());
        }
    }
}

fn render_qr(data: &str) -> Option<String> {
    let code = QrCode::new(data.as_bytes()).ok()?;
    Some(
        code.render::<unicode::Dense1x2>()
            .dark_color(unicode::Dense1x2::Light)
            .light_color(unicode::Dense1x2::Dark)
            .quiet_zone(true)
            .build(),
    )
}

fn hyperlink(path: &Path) -> String {
    let shown = path.display();
    match url::Url::from_file_path(path) {
        Ok(target) => format!("\x1b]8;;{target}\x1b\\{shown}\x1b]8;;\x1b\\"),
        Err(()) => shown.to_string(),
    }
}
