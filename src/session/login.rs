use std::time::Duration;

use url::Url;

use crate::{
    Error, Result,
    api::{
        Envelope, endpoints,
        types::{QrGenerate, QrPoll},
    },
    present::Presenter,
    transport::{ApiRequest, Transport},
};

use super::CredentialBundle;

/// State reported by the QR poll endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QrStatus {
    Confirmed,
    Expired,
    ScannedUnconfirmed,
    NotScanned,
    Other(i64),
}

impl QrStatus {
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => Self::Confirmed,
            86038 => Self::Expired,
            86090 => Self::ScannedUnconfirmed,
            86101 => Self::NotScanned,
            other => Self::Other(other),
        }
    }
}

/// Run the interactive QR login until it is confirmed or expires.
///
/// Polls every `poll_interval` with no upper bound; the operator stops a
/// stuck login with Ctrl-C.
pub async fn qr_login<T: Transport>(
    transport: &T,
    presenter: &dyn Presenter,
    poll_interval: Duration,
) -> Result<CredentialBundle> {
    let body = transport
        .get(ApiRequest::new(Url::parse(endpoints::QR_GENERATE)?))
        .await?;
    let challenge: QrGenerate = Envelope::parse("qrcode/generate", &body)?
        .ensure_ok()?
        .data_as("qrcode/generate")?;

    tracing::info!("Waiting for QR code login");
    presenter.present_challenge(&challenge.url);

    let mut poll_url = Url::parse(endpoints::QR_POLL)?;
    poll_url
        .query_pairs_mut()
        .append_pair("qrcode_key", &challenge.qrcode_key);

    let mut last_status = None;
    loop {
        let body = transport.get(ApiRequest::new(poll_url.clone())).await?;
        let poll: QrPoll = Envelope::parse("qrcode/poll", &body)?
            .ensure_ok()?
            .data_as("qrcode/poll")?;

        let status = QrStatus::from_code(poll.code);
        match status {
            QrStatus::Confirmed => {
                let bundle = CredentialBundle::from_login_url(&poll.url)?;
                tracing::info!("Logged in as user {}", bundle.user_id);
                return Ok(bundle);
            }
            QrStatus::Expired => return Err(Error::LoginExpired),
            _ if last_status == Some(status) => {}
            QrStatus::ScannedUnconfirmed => {
                tracing::info!("QR code scanned, confirm the login on your device")
            }
            QrStatus::NotScanned => tracing::debug!("QR code not scanned yet"),
            QrStatus::Other(code) => {
                tracing::debug!("Unexpected QR status {code}: {}", poll.message)
            }
        }
        last_status = Some(status);

        tokio::time::sleep(poll_interval).await;
    }
}
