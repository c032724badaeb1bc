pub mod client;
pub mod request;
#[cfg(test)]
pub(crate) mod scripted;

pub use client::HttpTransport;
pub use request::ApiRequest;

use crate::Result;
use std::future::Future;

/// Outbound HTTP seam. Implementations return the body of a successful
/// response and map non-2xx statuses to [`crate::Error::FetchFailed`].
pub trait Transport {
    fn get(&self, request: ApiRequest) -> impl Future<Output = Result<String>>;
}
