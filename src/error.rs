#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to fetch URL: {url} - {reason}")]
    FetchFailed { url: String, reason: String },

    #[error("Fetch timeout for URL: {0}")]
    FetchTimeout(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid response from {endpoint}: {reason}")]
    InvalidResponse { endpoint: String, reason: String },

    #[error("API error {code}: {message}")]
    Api { code: i64, message: String },

    #[error("Still not logged in after re-authenticating")]
    AuthRejected,

    #[error("Login QR code expired, run again to get a fresh one")]
    LoginExpired,

    #[error("Invalid signing key material: {0}")]
    InvalidKeyMaterial(String),

    #[error("Invalid media id: {0}")]
    InvalidMediaId(String),

    #[error("Part {requested} out of range, item has {available} part(s)")]
    PartOutOfRange { requested: usize, available: usize },

    #[error("No subtitle available for {0}")]
    NoSubtitle(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::FetchFailed { .. } => "FETCH_FAILED",
            Self::FetchTimeout(_) => "FETCH_TIMEOUT",
            Self::InvalidUrl(_) => "INVALID_URL",
            Self::InvalidResponse { .. } => "INVALID_RESPONSE",
            Self::Api { .. } => "API_ERROR",
            Self::AuthRejected => "AUTH_REJECTED",
            Self::LoginExpired => "LOGIN_EXPIRED",
            Self::InvalidKeyMaterial(_) => "INVALID_KEY_MATERIAL",
            Self::InvalidMediaId(_) => "INVALID_MEDIA_ID",
            Self::PartOutOfRange { .. } => "PART_OUT_OF_RANGE",
            Self::NoSubtitle(_) => "NO_SUBTITLE",
            Self::Io(_) => "IO_ERROR",
        }
    }

    /// Whether the error must stop a collection walk instead of skipping
    /// the current part.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::AuthRejected | Self::LoginExpired | Self::Io(_)
        )
    }

    pub(crate) fn invalid_response(endpoint: &str, reason: impl std::fmt::Display) -> Self {
        Self::InvalidResponse {
            endpoint: endpoint.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(e: url::ParseError) -> Self {
        Self::InvalidUrl(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::FetchTimeout(e.url().map(|u| u.to_string()).unwrap_or_default())
        } else {
            Self::FetchFailed {
                url: e.url().map(|u| u.to_string()).unwrap_or_default(),
                reason: e.to_string(),
            }
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::invalid_response("json", e)
    }
}
