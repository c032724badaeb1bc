use serde::{Deserialize, Serialize};
use url::Url;

use crate::{Error, Result};

const SESSION_COOKIE: &str = "SESSDATA";
const CSRF_COOKIE: &str = "bili_jct";
const USER_ID_COOKIE: &str = "DedeUserID";

/// The cookies needed to act as a logged-in account. Replaced wholesale,
/// never patched field by field.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialBundle {
    #[serde(rename = "SESSDATA")]
    pub session_token: String,
    #[serde(rename = "bili_jct")]
    pub csrf_token: String,
    #[serde(rename = "DedeUserID", default)]
    pub user_id: String,
}

impl std::fmt::Debug for CredentialBundle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialBundle")
            .field("session_token", &"[REDACTED]")
            .field("csrf_token", &"[REDACTED]")
            .field("user_id", &self.user_id)
            .finish()
    }
}

impl CredentialBundle {
    pub fn new(
        session_token: impl Into<String>,
        csrf_token: impl Into<String>,
        user_id: impl Into<String>,
    ) -> Self {
        Self {
            session_token: session_token.into(),
            csrf_token: csrf_token.into(),
            user_id: user_id.into(),
        }
    }

    /// Both tokens must be present and non-empty.
    pub fn is_usable(&self) -> bool {
        !self.session_token.trim().is_empty() && !self.csrf_token.trim().is_empty()
    }

    /// Value for the `Cookie` request header.
    pub fn cookie_header(&self) -> String {
        let mut cookie = format!(
            "{SESSION_COOKIE}={}; {CSRF_COOKIE}={}",
            self.session_token, self.csrf_token
        );
        if !self.user_id.is_empty() {
            cookie.push_str(&format!("; {USER_ID_COOKIE}={}", self.user_id));
        }
        cookie
    }

    /// Parse a browser `Cookie` header line such as `a=1; SESSDATA=x; ...`.
    /// Returns `None` unless the result is usable.
    pub fn from_cookie_header(header: &str) -> Option<Self> {
        let mut bundle = Self::new("", "", "");
        for pair in header.split(';') {
            let Some((name, value)) = pair.trim().split_once('=') else {
                continue;
            };
            let value = value.trim().to_string();
            match name.trim() {
                SESSION_COOKIE => bundle.session_token = value,
                CSRF_COOKIE => bundle.csrf_token = value,
                USER_ID_COOKIE => bundle.user_id = value,
                _ => {}
            }
        }
        bundle.is_usable().then_some(bundle)
    }

    /// Extract the bundle from the cross-domain URL the QR poll endpoint
    /// returns on success; the cookies travel as query parameters. Values are
    /// kept percent-encoded, the form the browser sends them back in.
    pub fn from_login_url(url: &str) -> Result<Self> {
        let url = Url::parse(url)?;
        let mut bundle = Self::new("", "", "");
        for pair in url.query().unwrap_or_default().split('&') {
            let Some((name, value)) = pair.split_once('=') else {
                continue;
            };
            match name {
                SESSION_COOKIE => bundle.session_token = value.to_string(),
                CSRF_COOKIE => bundle.csrf_token = value.to_string(),
                USER_ID_COOKIE => bundle.user_id = value.to_string(),
                _ => {}
            }
        }
        if !bundle.is_usable() {
            return Err(Error::invalid_response(
                "qrcode/poll",
                "login URL is missing SESSDATA or bili_jct",
            ));
        }
        Ok(bundle)
    }
}
