use reqwest::blocking::Client;
use reqwest::header::{
    ACCEPT, ACCEPT_LANGUAGE, CONNECTION, HeaderMap, HeaderName, HeaderValue, ORIGIN, REFERER,
    USER_AGENT,
};
use thiserror::Error;
use tracing::debug;

use crate::base_system::context::Config;

const SITE_ORIGIN: &str = "https://mangalib.me";
const SITE_ID: &str = "1";

/// 一次 GET 的原始结果；状态码判断留给调用方。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// 传输层异常（连接失败、超时、读取响应体失败等）。
#[derive(Debug, Error)]
#[error("{0}")]
pub struct TransportError(pub String);

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        TransportError(err.to_string())
    }
}

pub trait HttpTransport {
    fn get(&self, url: &str, query: &[(&str, String)]) -> Result<HttpResponse, TransportError>;
}

impl<T: HttpTransport + ?Sized> HttpTransport for &T {
    fn get(&self, url: &str, query: &[(&str, String)]) -> Result<HttpResponse, TransportError> {
        (**self).get(url, query)
    }
}

/// 基于 reqwest 的阻塞客户端，带浏览器风格的默认请求头。
pub struct BrowserTransport {
    client: Client,
}

impl BrowserTransport {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/json, text/plain, image/*, */*"),
        );
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_static("ru-RU,ru;q=0.9,en-US;q=0.8,en;q=0.7"),
        );
        headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
        headers.insert(ORIGIN, HeaderValue::from_static(SITE_ORIGIN));
        headers.insert(REFERER, HeaderValue::from_static("https://mangalib.me/"));
        headers.insert(
            HeaderName::from_static("site-id"),
            HeaderValue::from_static(SITE_ID),
        );
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .unwrap_or(HeaderValue::from_static("Mozilla/5.0")),
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout())
            .connect_timeout(config.connect_timeout())
            .build()?;

        Ok(Self { client })
    }
}

impl HttpTransport for BrowserTransport {
    fn get(&self, url: &str, query: &[(&str, String)]) -> Result<HttpResponse, TransportError> {
        let resp = self.client.get(url).query(query).send()?;
        let status = resp.status().as_u16();
        debug!(target: "network", "GET '{}' STATUS {}", url, status);
        let body = resp.bytes()?.to_vec();
        Ok(HttpResponse { status, body })
    }
}
