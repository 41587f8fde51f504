//! 测试用的脚本化传输层：按完整 URL（含查询串）返回预设响应并记录调用。

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};

use super::network::{HttpResponse, HttpTransport, TransportError};

#[derive(Debug, Clone)]
pub(crate) enum Reply {
    Response(HttpResponse),
    Error(String),
}

impl Reply {
    pub(crate) fn status(status: u16) -> Self {
        Reply::Response(HttpResponse {
            status,
            body: Vec::new(),
        })
    }

    pub(crate) fn json(status: u16, body: &str) -> Self {
        Reply::Response(HttpResponse {
            status,
            body: body.as_bytes().to_vec(),
        })
    }

    pub(crate) fn bytes(body: Vec<u8>) -> Self {
        Reply::Response(HttpResponse { status: 200, body })
    }

    pub(crate) fn transport_error(msg: &str) -> Self {
        Reply::Error(msg.to_string())
    }
}

/// 队列中只剩最后一个响应时会一直重复它；未登记的 URL 返回 404。
#[derive(Default)]
pub(crate) struct ScriptedTransport {
    routes: RefCell<HashMap<String, VecDeque<Reply>>>,
    calls: RefCell<Vec<String>>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn script(&self, url: &str, replies: impl IntoIterator<Item = Reply>) {
        self.routes
            .borrow_mut()
            .insert(url.to_string(), replies.into_iter().collect());
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub(crate) fn calls_to(&self, url: &str) -> usize {
        self.calls.borrow().iter().filter(|c| c.as_str() == url).count()
    }

    fn full_url(url: &str, query: &[(&str, String)]) -> String {
        if query.is_empty() {
            return url.to_string();
        }
        let pairs: Vec<String> = query.iter().map(|(k, v)| format!("{k}={v}")).collect();
        format!("{url}?{}", pairs.join("&"))
    }
}

impl HttpTransport for ScriptedTransport {
    fn get(&self, url: &str, query: &[(&str, String)]) -> Result<HttpResponse, TransportError> {
        let full = Self::full_url(url, query);
        self.calls.borrow_mut().push(full.clone());

        let mut routes = self.routes.borrow_mut();
        let reply = match routes.get_mut(&full) {
            Some(queue) if queue.len() > 1 => queue.pop_front(),
            Some(queue) => queue.front().cloned(),
            None => None,
        };

        match reply {
            Some(Reply::Response(resp)) => Ok(resp),
            Some(Reply::Error(msg)) => Err(TransportError(msg)),
            None => Ok(HttpResponse {
                status: 404,
                body: Vec::new(),
            }),
        }
    }
}
