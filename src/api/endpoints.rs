/// Account info; also publishes the WBI key fragments, logged in or not.
pub const NAV: &str = "https://api.bilibili.com/x/web-interface/nav";

pub const QR_GENERATE: &str =
    "https://passport.bilibili.com/x/passport-login/web/qrcode/generate";

pub const QR_POLL: &str = "https://passport.bilibili.com/x/passport-login/web/qrcode/poll";

pub const VIEW: &str = "https://api.bilibili.com/x/web-interface/view";

/// WBI-signed player info carrying the subtitle list.
pub const PLAYER_WBI_V2: &str = "https://api.bilibili.com/x/player/wbi/v2";

/// `web_location` value the web player sends to the player endpoint.
pub const PLAYER_WEB_LOCATION: &str = "1315873";
