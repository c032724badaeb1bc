use url::Url;

use crate::{
    Result,
    api::{endpoints, types::ViewData},
    session::Session,
    transport::Transport,
};

use super::MediaId;

/// One playable unit of an item. `index` is 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartDescriptor {
    pub cid: i64,
    pub index: usize,
    pub title: String,
}

#[derive(Debug, Clone)]
pub struct MediaInfo {
    pub aid: i64,
    pub title: String,
    pub parts: Vec<PartDescriptor>,
}

impl MediaInfo {
    pub fn is_collection(&self) -> bool {
        self.parts.len() > 1
    }

    fn from_view(view: ViewData) -> Self {
        let parts = if view.pages.len() > 1 {
            view.pages
                .into_iter()
                .map(|page| PartDescriptor {
                    cid: page.cid,
                    index: page.page,
                    title: page.part,
                })
                .collect()
        } else {
            vec![PartDescriptor {
                cid: view.cid,
                index: 1,
                title: view.title.clone(),
            }]
        };

        Self {
            aid: view.aid,
            title: view.title,
            parts,
        }
    }
}

/// Look up the item's internal id, title and parts.
pub async fn resolve_parts<T: Transport>(
    session: &mut Session<T>,
    media: &MediaId,
) -> Result<MediaInfo> {
    let mut url = Url::parse(endpoints::VIEW)?;
    let (key, value) = media.query_pair();
    url.query_pairs_mut().append_pair(key, &value);

    let view: ViewData = session
        .get_json(url)
        .await?
        .ensure_ok()?
        .data_as("view")?;
    let info = MediaInfo::from_view(view);
    tracing::info!("{media}: \"{}\" with {} part(s)", info.title, info.parts.len());
    Ok(info)
}
