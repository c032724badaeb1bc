//! Resolving a media id to its parts and fetching subtitles part by part.

pub mod media_id;
pub mod parts;
pub mod walker;

pub use media_id::MediaId;
pub use parts::{MediaInfo, PartDescriptor, resolve_parts};
pub use walker::{PartOutcome, WalkOptions, WalkReport, walk};
