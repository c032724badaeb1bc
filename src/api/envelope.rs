use serde::{Deserialize, de::DeserializeOwned};

use crate::{Error, Result};

/// Business code for "not logged in", delivered inside an HTTP 200.
pub const NOT_LOGGED_IN: i64 = -101;

/// The `{code, message, data}` wrapper every JSON endpoint returns.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope {
    pub code: i64,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

impl Envelope {
    pub fn parse(endpoint: &str, body: &str) -> Result<Self> {
        serde_json::from_str(body).map_err(|e| Error::invalid_response(endpoint, e))
    }

    pub fn is_ok(&self) -> bool {
        self.code == 0
    }

    pub fn is_not_logged_in(&self) -> bool {
        self.code == NOT_LOGGED_IN
    }

    /// Fail with [`Error::Api`] unless the business code is zero.
    pub fn ensure_ok(self) -> Result<Self> {
        if self.is_ok() {
            Ok(self)
        } else {
            Err(Error::Api {
                code: self.code,
                message: self.message,
            })
        }
    }

    /// Decode `data` into a typed payload.
    pub fn data_as<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        let data = self
            .data
            .clone()
            .ok_or_else(|| Error::invalid_response(endpoint, "missing data"))?;
        serde_json::from_value(data).map_err(|e| Error::invalid_response(endpoint, e))
    }
}
