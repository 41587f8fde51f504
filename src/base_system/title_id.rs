//! 作品链接解析：从 MangaLib 目录页链接中提取 `{id}--{slug}`。

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;
use url::Url;

static RE_TITLE: OnceLock<Regex> = OnceLock::new();

fn re_title() -> &'static Regex {
    RE_TITLE.get_or_init(|| Regex::new(r"/manga/(\d+--[^/?#]+)").expect("compile RE_TITLE"))
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TitleIdError {
    #[error("'{0}' 不是有效的链接")]
    InvalidUrl(String),
    #[error("链接中没有作品标识（/manga/<id>--<slug>）: {0}")]
    MalformedIdentifier(String),
}

/// 作品标识，形如 `7965--chainsaw-man`；所有接口路径都基于它拼接。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TitleId(String);

impl TitleId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn numeric_id(&self) -> &str {
        self.0.split("--").next().unwrap_or(&self.0)
    }

    pub fn slug(&self) -> &str {
        self.0.split_once("--").map(|(_, s)| s).unwrap_or("")
    }
}

impl fmt::Display for TitleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn parse_title_id(input: &str) -> Result<TitleId, TitleIdError> {
    let trimmed = input.trim();

    let parsed = Url::parse(trimmed).map_err(|_| TitleIdError::InvalidUrl(trimmed.to_string()))?;
    let has_host = parsed.host_str().is_some_and(|h| !h.is_empty());
    if !matches!(parsed.scheme(), "http" | "https") || !has_host {
        return Err(TitleIdError::InvalidUrl(trimmed.to_string()));
    }

    // 只用 Url 校验结构；标识从原始输入中提取，`Url::path()` 会把非 ASCII 字符转义
    re_title()
        .captures(trimmed)
        .and_then(|caps| caps.get(1))
        .map(|m| TitleId(m.as_str().to_string()))
        .ok_or_else(|| TitleIdError::MalformedIdentifier(trimmed.to_string()))
}
