use std::time::Duration;

use url::Url;

/// A single GET request as seen by a [`super::Transport`].
#[derive(Clone)]
pub struct ApiRequest {
    pub url: Url,
    pub cookie: Option<String>,
    pub timeout: Option<Duration>,
}

impl ApiRequest {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            cookie: None,
            timeout: None,
        }
    }

    pub fn with_cookie(mut self, cookie: Option<String>) -> Self {
        self.cookie = cookie;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

impl std::fmt::Debug for ApiRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiRequest")
            .field("url", &self.url.as_str())
            .field("cookie", &self.cookie.as_ref().map(|_| "[REDACTED]"))
            .field("timeout", &self.timeout)
            .finish()
    }
}
