use std::time::Duration;

use url::Url;

use crate::{
    Error, Result,
    api::{Envelope, endpoints, types::NavData},
    present::Presenter,
    transport::{ApiRequest, Transport},
};

use super::{CredentialBundle, CredentialStore, login::qr_login};

/// Timing knobs for the session lifecycle.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub login_poll_interval: Duration,
    pub probe_timeout: Duration,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            login_poll_interval: Duration::from_secs(2),
            probe_timeout: Duration::from_secs(5),
        }
    }
}

/// An authenticated session over a [`Transport`].
///
/// After [`Session::open`] returns, the session always holds a usable
/// [`CredentialBundle`].
pub struct Session<T> {
    transport: T,
    store: CredentialStore,
    presenter: Box<dyn Presenter>,
    settings: SessionSettings,
    credentials: CredentialBundle,
    logins: usize,
}

impl<T: Transport> Session<T> {
    /// Restore persisted credentials, falling back to QR login when they are
    /// missing, incomplete or rejected by the liveness probe.
    pub async fn open(
        transport: T,
        store: CredentialStore,
        presenter: Box<dyn Presenter>,
        settings: SessionSettings,
    ) -> Result<Self> {
        let restored = match store.load().await? {
            Some(bundle) => {
                if probe(&transport, &bundle, settings.probe_timeout).await {
                    tracing::info!("Restored session for user {}", bundle.user_id);
                    Some(bundle)
                } else {
                    tracing::warn!("Stored credentials were rejected, logging in again");
                    None
                }
            }
            None => None,
        };

        let mut logins = 0;
        let credentials = match restored {
            Some(bundle) => bundle,
            None => {
                logins += 1;
                login_and_persist(&transport, &store, presenter.as_ref(), &settings).await?
            }
        };

        Ok(Self {
            transport,
            store,
            presenter,
            settings,
            credentials,
            logins,
        })
    }

    /// Replace the current credentials through a blocking QR login.
    pub async fn relogin(&mut self) -> Result<()> {
        self.credentials = login_and_persist(
            &self.transport,
            &self.store,
            self.presenter.as_ref(),
            &self.settings,
        )
        .await?;
        self.logins += 1;
        Ok(())
    }

    /// Authenticated JSON GET. A "not logged in" reply triggers one
    /// re-login and one resend; a second such reply is [`Error::AuthRejected`].
    ///
    /// Other non-zero business codes are returned to the caller untouched.
    pub async fn get_json(&mut self, url: Url) -> Result<Envelope> {
        let endpoint = url.path().to_string();
        let envelope = self.send_json(&url, &endpoint).await?;
        if !envelope.is_not_logged_in() {
            return Ok(envelope);
        }

        tracing::warn!("Session expired while calling {endpoint}, logging in again");
        self.relogin().await?;

        let envelope = self.send_json(&url, &endpoint).await?;
        if envelope.is_not_logged_in() {
            return Err(Error::AuthRejected);
        }
        Ok(envelope)
    }

    /// Authenticated GET for raw resource bodies.
    pub async fn get_text(&self, url: Url) -> Result<String> {
        self.transport
            .get(ApiRequest::new(url).with_cookie(Some(self.credentials.cookie_header())))
            .await
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn presenter(&self) -> &dyn Presenter {
        self.presenter.as_ref()
    }

    pub fn credentials(&self) -> &CredentialBundle {
        &self.credentials
    }

    /// Interactive logins performed so far, including the one at open.
    pub fn login_count(&self) -> usize {
        self.logins
    }

    async fn send_json(&self, url: &Url, endpoint: &str) -> Result<Envelope> {
        let body = self
            .transport
            .get(ApiRequest::new(url.clone()).with_cookie(Some(self.credentials.cookie_header())))
            .await?;
        Envelope::parse(endpoint, &body)
    }
}

async fn login_and_persist<T: Transport>(
    transport: &T,
    store: &CredentialStore,
    presenter: &dyn Presenter,
    settings: &SessionSettings,
) -> Result<CredentialBundle> {
    let bundle = qr_login(transport, presenter, settings.login_poll_interval).await?;
    store.save(&bundle).await?;
    Ok(bundle)
}

/// Ask the nav endpoint whether `bundle` is still logged in. Only -101 or an
/// explicit `isLogin: false` rejects it; any other failed probe keeps the
/// credentials and the guarded request path catches them if stale.
async fn probe<T: Transport>(transport: &T, bundle: &CredentialBundle, timeout: Duration) -> bool {
    let url = match Url::parse(endpoints::NAV) {
        Ok(url) => url,
        Err(_) => return true,
    };
    let request = ApiRequest::new(url)
        .with_cookie(Some(bundle.cookie_header()))
        .with_timeout(timeout);

    let body = match transport.get(request).await {
        Ok(body) => body,
        Err(e) => {
            tracing::warn!("Liveness probe failed ({}), keeping stored credentials", e.error_code());
            return true;
        }
    };

    match Envelope::parse("nav", &body) {
        Ok(envelope) if envelope.is_not_logged_in() => false,
        Ok(envelope) if envelope.is_ok() => match envelope.data_as::<NavData>("nav") {
            Ok(nav) => nav.is_login,
            Err(e) => {
                tracing::warn!("Liveness probe returned garbage: {e}");
                true
            }
        },
        Ok(envelope) => {
            tracing::warn!(
                "Liveness probe answered code {} ({}), keeping stored credentials",
                envelope.code,
                envelope.message
            );
            true
        }
        Err(e) => {
            tracing::warn!("Liveness probe returned garbage: {e}");
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        present::recording::RecordingPresenter,
        session::login::tests::{GENERATE_PATH, POLL_PATH, generate_body, poll_body},
        transport::scripted::{Reply, ScriptedTransport, nav_body, not_logged_in},
    };
    use serde_json::json;

    const NAV_PATH: &str = "/x/web-interface/nav";
    const VIEW_PATH: &str = "/x/web-interface/view";

    fn with_login(transport: ScriptedTransport) -> ScriptedTransport {
        transport
            .on(GENERATE_PATH, generate_body())
            .on(POLL_PATH, poll_body(0))
    }

    fn view_ok() -> serde_json::Value {
        json!({ "code": 0, "message": "0", "data": { "aid": 1, "cid": 2, "title": "t" } })
    }

    fn view_url() -> Url {
        Url::parse("https://api.bilibili.com/x/web-interface/view?bvid=BV1xx411c7mD").unwrap()
    }

    async fn open_with(
        transport: ScriptedTransport,
        stored: Option<&str>,
    ) -> (Session<ScriptedTransport>, RecordingPresenter, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        if let Some(contents) = stored {
            std::fs::write(&path, contents).unwrap();
        }
        let presenter = RecordingPresenter::default();
        let session = Session::open(
            transport,
            CredentialStore::new(path),
            Box::new(presenter.clone()),
            SessionSettings::default(),
        )
        .await
        .unwrap();
        (session, presenter, dir)
    }

    const STORED: &str = r#"{"SESSDATA":"stored","bili_jct":"stored-jct","DedeUserID":"7"}"#;

    #[tokio::test(start_paused = true)]
    async fn test_open_restores_live_credentials() {
        let transport = ScriptedTransport::new().on(NAV_PATH, nav_body(0, true));
        let (session, presenter, _dir) = open_with(transport, Some(STORED)).await;

        assert_eq!(session.login_count(), 0);
        assert_eq!(presenter.challenge_count(), 0);
        assert_eq!(session.credentials().session_token, "stored");
        let requests = session.transport().requests_to(NAV_PATH);
        let probe = &requests[0];
        assert!(probe.cookie.as_deref().unwrap().contains("SESSDATA=stored"));
        assert_eq!(probe.timeout, Some(Duration::from_secs(5)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_open_without_file_logs_in_and_persists() {
        let transport = with_login(ScriptedTransport::new());
        let (session, presenter, dir) = open_with(transport, None).await;

        assert_eq!(session.login_count(), 1);
        assert_eq!(presenter.challenge_count(), 1);
        let saved = std::fs::read_to_string(dir.path().join("credentials.json")).unwrap();
        assert!(saved.contains("fresh-jct"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_open_missing_csrf_field_logs_in() {
        let transport = with_login(ScriptedTransport::new().on(NAV_PATH, nav_body(0, true)));
        let (session, _presenter, _dir) =
            open_with(transport, Some(r#"{"SESSDATA":"stored","DedeUserID":"7"}"#)).await;

        assert_eq!(session.login_count(), 1);
        assert_eq!(session.credentials().session_token, "fresh");
        assert!(session.transport().requests_to(NAV_PATH).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_open_rejected_credentials_logs_in() {
        let transport = with_login(ScriptedTransport::new().on(NAV_PATH, nav_body(-101, false)));
        let (session, _presenter, _dir) = open_with(transport, Some(STORED)).await;

        assert_eq!(session.login_count(), 1);
        assert_eq!(session.credentials().csrf_token, "fresh-jct");
    }

    #[tokio::test(start_paused = true)]
    async fn test_open_probe_timeout_keeps_credentials() {
        let transport = ScriptedTransport::new().push(NAV_PATH, Reply::Timeout);
        let (session, _presenter, _dir) = open_with(transport, Some(STORED)).await;

        assert_eq!(session.login_count(), 0);
        assert_eq!(session.credentials().session_token, "stored");
    }

    #[tokio::test(start_paused = true)]
    async fn test_open_nav_business_error_keeps_credentials() {
        let transport = with_login(
            ScriptedTransport::new().on(NAV_PATH, json!({ "code": -412, "message": "请求被拦截" })),
        );
        let (session, presenter, dir) = open_with(transport, Some(STORED)).await;

        assert_eq!(session.login_count(), 0);
        assert_eq!(presenter.challenge_count(), 0);
        assert_eq!(session.credentials().session_token, "stored");
        let saved = std::fs::read_to_string(dir.path().join("credentials.json")).unwrap();
        assert_eq!(saved, STORED);
    }

    #[tokio::test(start_paused = true)]
    async fn test_open_nav_is_login_false_logs_in() {
        let transport = with_login(ScriptedTransport::new().on(NAV_PATH, nav_body(0, false)));
        let (session, _presenter, _dir) = open_with(transport, Some(STORED)).await;

        assert_eq!(session.login_count(), 1);
        assert_eq!(session.credentials().session_token, "fresh");
    }

    #[tokio::test(start_paused = true)]
    async fn test_open_invalid_utf8_file_logs_in() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        std::fs::write(&path, b"\xff\xfe{\"SESSDATA\":1}").unwrap();
        let presenter = RecordingPresenter::default();
        let session = Session::open(
            with_login(ScriptedTransport::new()),
            CredentialStore::new(&path),
            Box::new(presenter.clone()),
            SessionSettings::default(),
        )
        .await
        .unwrap();

        assert_eq!(session.login_count(), 1);
        assert_eq!(presenter.challenge_count(), 1);
        assert!(std::fs::read_to_string(&path).unwrap().contains("fresh-jct"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_get_json_relogs_once_then_retries() {
        let transport = with_login(
            ScriptedTransport::new()
                .on(NAV_PATH, nav_body(0, true))
                .on(VIEW_PATH, not_logged_in())
                .on(VIEW_PATH, view_ok()),
        );
        let (mut session, presenter, _dir) = open_with(transport, Some(STORED)).await;

        let envelope = session.get_json(view_url()).await.unwrap();

        assert!(envelope.is_ok());
        assert_eq!(session.login_count(), 1);
        assert_eq!(presenter.challenge_count(), 1);
        let calls = session.transport().requests_to(VIEW_PATH);
        assert_eq!(calls.len(), 2);
        assert!(calls[0].cookie.as_deref().unwrap().contains("SESSDATA=stored"));
        assert!(calls[1].cookie.as_deref().unwrap().contains("SESSDATA=fresh"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_get_json_second_auth_failure_is_fatal() {
        let transport = with_login(
            ScriptedTransport::new()
                .on(NAV_PATH, nav_body(0, true))
                .on(VIEW_PATH, not_logged_in()),
        );
        let (mut session, _presenter, _dir) = open_with(transport, Some(STORED)).await;

        let err = session.get_json(view_url()).await.unwrap_err();

        assert!(matches!(err, Error::AuthRejected));
        assert_eq!(session.login_count(), 1);
        assert_eq!(session.transport().requests_to(VIEW_PATH).len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_get_json_passes_business_errors_through() {
        let transport = ScriptedTransport::new()
            .on(NAV_PATH, nav_body(0, true))
            .on(VIEW_PATH, json!({ "code": -404, "message": "啥都木有" }));
        let (mut session, _presenter, _dir) = open_with(transport, Some(STORED)).await;

        let envelope = session.get_json(view_url()).await.unwrap();
        assert_eq!(envelope.code, -404);
        assert_eq!(session.login_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_transport_errors_are_not_auth_failures() {
        let transport = ScriptedTransport::new()
            .on(NAV_PATH, nav_body(0, true))
            .push(VIEW_PATH, Reply::Fail("HTTP 502 Bad Gateway".into()));
        let (mut session, _presenter, _dir) = open_with(transport, Some(STORED)).await;

        let err = session.get_json(view_url()).await.unwrap_err();
        assert!(matches!(err, Error::FetchFailed { .. }));
        assert_eq!(session.login_count(), 0);
    }
}
