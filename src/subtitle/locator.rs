use std::time::Duration;

use url::Url;

use crate::{
    Result,
    api::{endpoints, types::PlayerData},
    session::Session,
    transport::Transport,
    wbi::{self, ParamValue},
};

use super::{SubtitleDescriptor, select};

/// Budget for waiting on subtitles that are not generated yet.
#[derive(Debug, Clone)]
pub struct RetrySettings {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(2),
        }
    }
}

/// Outcome of a lookup: the chosen URL, if any, and every track offered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Located {
    pub url: Option<String>,
    pub descriptors: Vec<SubtitleDescriptor>,
}

impl Located {
    fn none() -> Self {
        Self::default()
    }
}

/// Find a downloadable subtitle for part `cid` of item `aid`.
///
/// An empty or unusable track list is retried up to `max_attempts` times
/// with `delay` between attempts. A non-zero business code ends the lookup
/// at once. Each attempt is signed with a fresh `wts`.
pub async fn locate_subtitle<T: Transport>(
    session: &mut Session<T>,
    aid: i64,
    cid: i64,
    preferred: Option<&str>,
    retry: &RetrySettings,
) -> Result<Located> {
    let key = wbi::fetch_key_material(session.transport())
        .await?
        .mixing_key()?;

    let base_params = [
        ("aid".to_string(), ParamValue::Int(aid)),
        ("cid".to_string(), ParamValue::Int(cid)),
        ("isGaiaAvoided".to_string(), ParamValue::from("false")),
        (
            "web_location".to_string(),
            ParamValue::from(endpoints::PLAYER_WEB_LOCATION),
        ),
    ];

    for attempt in 1..=retry.max_attempts {
        if attempt > 1 {
            tokio::time::sleep(retry.delay).await;
        }

        let signed = wbi::sign_now(base_params.clone(), &key);
        let url = Url::parse(&format!(
            "{}?{}",
            endpoints::PLAYER_WBI_V2,
            signed.to_query()
        ))?;
        let envelope = session.get_json(url).await?;

        if !envelope.is_ok() {
            tracing::warn!(
                "Subtitle lookup for cid {cid} rejected with code {}: {}",
                envelope.code,
                envelope.message
            );
            return Ok(Located::none());
        }

        let player: PlayerData = match envelope.data_as("player/wbi/v2") {
            Ok(player) => player,
            Err(e) => {
                tracing::warn!("Undecodable player payload for cid {cid}: {e}");
                PlayerData::default()
            }
        };
        let descriptors = player.subtitle.subtitles;
        if let Some(chosen) = select(&descriptors, preferred) {
            let url = chosen.resource_url();
            tracing::debug!("Selected {} subtitle for cid {cid}", chosen.lan);
            return Ok(Located { url, descriptors });
        }

        tracing::warn!(
            "Attempt {attempt}/{} found no subtitle for cid {cid}",
            retry.max_attempts
        );
    }

    Ok(Located::none())
}
