pub mod descriptor;
pub mod extract;
pub mod locator;

pub use descriptor::{SubtitleDescriptor, select};
pub use extract::extract_text;
pub use locator::{Located, RetrySettings, locate_subtitle};
