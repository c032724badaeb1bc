use serde::Deserialize;

use crate::subtitle::SubtitleDescriptor;

#[derive(Debug, Clone, Deserialize)]
pub struct NavData {
    #[serde(rename = "isLogin", default)]
    pub is_login: bool,
    pub wbi_img: WbiImg,
}

/// The two image URLs whose file stems are the WBI key fragments.
#[derive(Debug, Clone, Deserialize)]
pub struct WbiImg {
    pub img_url: String,
    pub sub_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QrGenerate {
    pub url: String,
    pub qrcode_key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QrPoll {
    pub code: i64,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ViewData {
    pub aid: i64,
    pub cid: i64,
    pub title: String,
    #[serde(default)]
    pub pages: Vec<ViewPage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ViewPage {
    pub cid: i64,
    pub page: usize,
    #[serde(default)]
    pub part: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlayerData {
    #[serde(default)]
    pub subtitle: PlayerSubtitle,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlayerSubtitle {
    #[serde(default)]
    pub subtitles: Vec<SubtitleDescriptor>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_payloads_ignore_unread_fields() {
        let poll: QrPoll = serde_json::from_value(json!({
            "code": 0,
            "message": "",
            "url": "https://passport.example/cross?SESSDATA=a",
            "refresh_token": "r",
            "timestamp": 1
        }))
        .unwrap();
        assert_eq!(poll.url, "https://passport.example/cross?SESSDATA=a");

        let view: ViewData = serde_json::from_value(json!({
            "bvid": "BV1xx411c7mD",
            "aid": 170001,
            "cid": 279786,
            "title": "Item"
        }))
        .unwrap();
        assert_eq!(view.aid, 170001);
        assert!(view.pages.is_empty());
    }
}
