use crate::{Error, Result};
use reqwest::{
    Client,
    header::{COOKIE, HeaderMap, HeaderValue, REFERER, USER_AGENT},
};

use super::{ApiRequest, Transport};

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/114.0.0.0 Safari/537.36";
const PLATFORM_REFERER: &str = "https://www.bilibili.com/";

/// reqwest-backed transport presenting itself as a desktop browser.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
        headers.insert(REFERER, HeaderValue::from_static(PLATFORM_REFERER));

        let client = Client::builder().default_headers(headers).build()?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    async fn get(&self, request: ApiRequest) -> Result<String> {
        tracing::debug!("GET {}", request.url.path());

        let url = request.url.to_string();
        let mut builder = self.client.get(request.url);

        if let Some(cookie) = &request.cookie {
            let value = HeaderValue::from_str(cookie).map_err(|e| Error::FetchFailed {
                url: url.clone(),
                reason: format!("Invalid cookie header: {e}"),
            })?;
            builder = builder.header(COOKIE, value);
        }

        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(Error::FetchFailed {
                url,
                reason: format!("HTTP {status}"),
            });
        }

        Ok(response.text().await?)
    }
}
