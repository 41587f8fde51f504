//! 固定次数的重试请求：首个 200 即返回，不做退避、不区分状态码。

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use super::network::{HttpResponse, HttpTransport, TransportError};

pub const REQUEST_ATTEMPTS_LIMIT: u32 = 3;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("GET request to '{url}' failed after {attempts} attempts")]
    Exhausted { url: String, attempts: u32 },
    #[error("response from '{url}' is not valid JSON: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

pub struct ResilientFetcher<T> {
    transport: T,
    attempts: u32,
}

impl<T: HttpTransport> ResilientFetcher<T> {
    pub fn new(transport: T) -> Self {
        Self::with_attempts(transport, REQUEST_ATTEMPTS_LIMIT)
    }

    pub fn with_attempts(transport: T, attempts: u32) -> Self {
        Self {
            transport,
            attempts: attempts.max(1),
        }
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// GET 并解析 JSON。
    ///
    /// 传输异常与非 200 状态都计为一次失败；拿到 200 后 JSON 解析失败直接返回，不再重试。
    pub fn get_json(&self, url: &str, query: &[(&str, String)]) -> Result<Value, FetchError> {
        for attempt in 1..=self.attempts {
            debug!(target: "fetcher", "请求 '{}'，第 {} 次尝试", url, attempt);

            match self.transport.get(url, query) {
                Ok(resp) if resp.is_ok() => {
                    return serde_json::from_slice(&resp.body).map_err(|source| {
                        FetchError::Decode {
                            url: url.to_string(),
                            source,
                        }
                    });
                }
                Ok(resp) => {
                    debug!(
                        target: "fetcher",
                        "GET '{}' 状态码 {}（第 {} 次尝试）", url, resp.status, attempt
                    );
                }
                Err(err) => {
                    warn!(
                        target: "fetcher",
                        "GET '{}' 请求失败: {}（第 {} 次尝试）", url, err, attempt
                    );
                }
            }
        }

        Err(FetchError::Exhausted {
            url: url.to_string(),
            attempts: self.attempts,
        })
    }

    /// 单次 GET，用于页面图片：失败由调用方按页记录并跳过。
    pub fn get_once(&self, url: &str) -> Result<HttpResponse, TransportError> {
        self.transport.get(url, &[])
    }
}
