use std::{collections::VecDeque, sync::Mutex};

use crate::{Error, Result};

use super::{ApiRequest, Transport};

#[derive(Debug, Clone)]
pub enum Reply {
    Body(String),
    Fail(String),
    Timeout,
}

struct Route {
    path: String,
    query_needle: Option<String>,
    replies: VecDeque<Reply>,
}

impl Route {
    fn matches(&self, request: &ApiRequest) -> bool {
        if request.url.path() != self.path {
            return false;
        }
        match &self.query_needle {
            Some(needle) => request.url.query().unwrap_or_default().contains(needle.as_str()),
            None => true,
        }
    }
}

/// Transport answering from per-route queues. The last reply of a queue
/// repeats once the queue is drained. Routes with a query needle take
/// precedence over plain path routes.
#[derive(Default)]
pub struct ScriptedTransport {
    routes: Mutex<Vec<Route>>,
    log: Mutex<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(self, path: &str, body: serde_json::Value) -> Self {
        self.push(path, Reply::Body(body.to_string()))
    }

    /// Answer requests to `path` whose query contains `needle`.
    pub fn on_query(self, path: &str, needle: &str, body: serde_json::Value) -> Self {
        self.push_route(path, Some(needle), Reply::Body(body.to_string()))
    }

    pub fn on_text(self, path: &str, body: &str) -> Self {
        self.push(path, Reply::Body(body.to_string()))
    }

    pub fn push(self, path: &str, reply: Reply) -> Self {
        self.push_route(path, None, reply)
    }

    fn push_route(self, path: &str, needle: Option<&str>, reply: Reply) -> Self {
        {
            let mut routes = self.routes.lock().unwrap();
            let needle = needle.map(String::from);
            match routes
                .iter_mut()
                .find(|r| r.path == path && r.query_needle == needle)
            {
                Some(route) => route.replies.push_back(reply),
                None => routes.push(Route {
                    path: path.to_string(),
                    query_needle: needle,
                    replies: VecDeque::from([reply]),
                }),
            }
        }
        self
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.log.lock().unwrap().clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<ApiRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.url.path() == path)
            .collect()
    }
}

impl Transport for ScriptedTransport {
    async fn get(&self, request: ApiRequest) -> Result<String> {
        let url = request.url.to_string();

        let reply = {
            let mut routes = self.routes.lock().unwrap();
            let index = routes
                .iter()
                .position(|r| r.query_needle.is_some() && r.matches(&request))
                .or_else(|| routes.iter().position(|r| r.matches(&request)));
            index.and_then(|i| {
                let replies = &mut routes[i].replies;
                if replies.len() > 1 {
                    replies.pop_front()
                } else {
                    replies.front().cloned()
                }
            })
        };
        self.log.lock().unwrap().push(request);

        match reply {
            Some(Reply::Body(body)) => Ok(body),
            Some(Reply::Fail(reason)) => Err(Error::FetchFailed { url, reason }),
            Some(Reply::Timeout) => Err(Error::FetchTimeout(url)),
            None => Err(Error::FetchFailed {
                url,
                reason: "HTTP 404 Not Found".to_string(),
            }),
        }
    }
}

/// Nav payload carrying the reference WBI key fragments.
pub fn nav_body(code: i64, is_login: bool) -> serde_json::Value {
    serde_json::json!({
        "code": code,
        "message": if code == 0 { "0" } else { "账号未登录" },
        "data": {
            "isLogin": is_login,
            "wbi_img": {
                "img_url": "https://i0.hdslb.com/bfs/wbi/7cd084941338484aae1ad9425b84077c.png",
                "sub_url": "https://i0.hdslb.com/bfs/wbi/4932caff0ff746eab6f01bf08b70ac45.png"
            }
        }
    })
}

pub fn not_logged_in() -> serde_json::Value {
    serde_json::json!({ "code": -101, "message": "账号未登录", "ttl": 1 })
}
