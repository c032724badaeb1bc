//! Remote endpoints and the JSON shapes they return.

pub mod endpoints;
pub mod envelope;
pub mod types;

pub use envelope::{Envelope, NOT_LOGGED_IN};
