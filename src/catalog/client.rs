use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::models::{ChapterList, ChapterPages, ChapterRecord, Envelope, TitleStats};
use crate::base_system::context::Config;
use crate::base_system::title_id::TitleId;
use crate::network_parser::fetcher::{FetchError, ResilientFetcher};
use crate::network_parser::network::HttpTransport;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("unexpected response layout from '{url}': {source}")]
    Schema {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

fn normalize_base(base: &str) -> String {
    base.trim().trim_end_matches('/').to_string()
}

/// MangaLib 目录接口：作品信息、章节表、章节页面。
pub struct CatalogClient<T> {
    fetcher: ResilientFetcher<T>,
    api_base: String,
    image_base: String,
}

impl<T: HttpTransport> CatalogClient<T> {
    pub fn new(fetcher: ResilientFetcher<T>, api_base: &str, image_base: &str) -> Self {
        Self {
            fetcher,
            api_base: normalize_base(api_base),
            image_base: normalize_base(image_base),
        }
    }

    pub fn from_config(transport: T, config: &Config) -> Self {
        Self::new(
            ResilientFetcher::with_attempts(transport, config.request_attempts),
            &config.api_base_url,
            &config.image_base_url,
        )
    }

    pub fn fetcher(&self) -> &ResilientFetcher<T> {
        &self.fetcher
    }

    pub fn title_stats(&self, id: &TitleId) -> Result<TitleStats, CatalogError> {
        info!(target: "catalog", "获取作品信息: {}", id);
        let url = format!("{}/{}", self.api_base, id);
        let data = self.fetcher.get_json(&url, &[])?;
        let envelope: Envelope<TitleStats> = decode(&url, data)?;
        Ok(envelope.data)
    }

    /// 章节表；响应为空或缺少 `data` 时返回 `None`（视为“没有可下载的章节”）。
    pub fn chapter_list(&self, id: &TitleId) -> Result<Option<ChapterList>, CatalogError> {
        let url = format!("{}/{}/chapters", self.api_base, id);
        let data = self.fetcher.get_json(&url, &[])?;

        let chapters = match data.get("data") {
            Some(Value::Null) | None => {
                warn!(target: "catalog", "{} 没有可用章节", id);
                return Ok(None);
            }
            Some(raw) => raw.clone(),
        };

        let records: Vec<ChapterRecord> = decode(&url, chapters)?;
        debug!(target: "catalog", "{} 共 {} 条章节记录", id, records.len());
        Ok(Some(records.into_iter().collect()))
    }

    /// 章节页面的绝对地址，顺序即页码顺序。
    pub fn chapter_pages(
        &self,
        id: &TitleId,
        volume: &str,
        number: &str,
    ) -> Result<Vec<String>, CatalogError> {
        let url = format!("{}/{}/chapter", self.api_base, id);
        let query = [("number", number.to_string()), ("volume", volume.to_string())];
        let data = self.fetcher.get_json(&url, &query)?;

        let envelope: Envelope<ChapterPages> = decode(&url, data)?;
        Ok(envelope
            .data
            .pages
            .iter()
            .map(|p| self.page_url(&p.url))
            .collect())
    }

    pub fn page_url(&self, path: &str) -> String {
        let path = path.trim();
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        format!("{}/{}", self.image_base, path.trim_start_matches('/'))
    }
}

fn decode<D: DeserializeOwned>(url: &str, value: Value) -> Result<D, CatalogError> {
    serde_json::from_value(value).map_err(|source| CatalogError::Schema {
        url: url.to_string(),
        source,
    })
}
