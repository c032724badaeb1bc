use url::Url;

use crate::{
    Error, Result,
    api::{Envelope, endpoints, types::NavData},
    transport::{ApiRequest, Transport},
};

use super::MixingKey;

/// The two rotating fragments published by the nav endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyMaterial {
    pub img_key: String,
    pub sub_key: String,
}

impl KeyMaterial {
    /// Extract fragments from the `wbi_img` URLs: each is the file stem.
    pub fn from_urls(img_url: &str, sub_url: &str) -> Result<Self> {
        Ok(Self {
            img_key: file_stem(img_url)?,
            sub_key: file_stem(sub_url)?,
        })
    }

    pub fn mixing_key(&self) -> Result<MixingKey> {
        MixingKey::derive(&self.img_key, &self.sub_key)
    }
}

/// Fetch the current fragments. The call is made without credentials; the
/// endpoint answers -101 for anonymous callers but still includes `wbi_img`.
pub async fn fetch_key_material<T: Transport>(transport: &T) -> Result<KeyMaterial> {
    let body = transport
        .get(ApiRequest::new(Url::parse(endpoints::NAV)?))
        .await?;
    let envelope = Envelope::parse("nav", &body)?;
    let nav: NavData = envelope.data_as("nav")?;
    let keys = KeyMaterial::from_urls(&nav.wbi_img.img_url, &nav.wbi_img.sub_url)?;
    tracing::debug!("Fetched WBI key material");
    Ok(keys)
}

fn file_stem(url: &str) -> Result<String> {
    let name = url.rsplit('/').next().unwrap_or(url);
    let stem = name.split('.').next().unwrap_or(name);
    if stem.is_empty() {
        return Err(Error::InvalidKeyMaterial(format!("no file name in {url}")));
    }
    Ok(stem.to_string())
}
