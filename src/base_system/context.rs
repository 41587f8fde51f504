//! 全局配置结构（Config）与默认值。
//!
//! 该模块同时提供生成 `config.yml` 的字段元信息。

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::config::{ConfigError, ConfigSpec, FieldMeta};

pub const DEFAULT_API_BASE_URL: &str = "https://api2.mangalib.me/api/manga";
pub const DEFAULT_IMAGE_BASE_URL: &str = "https://img2.imglib.info/";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // 接口配置
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_image_base_url")]
    pub image_base_url: String,

    // 网络配置
    #[serde(default = "default_request_attempts")]
    pub request_attempts: u32,
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    // 导出配置
    #[serde(default = "default_pdf_dpi")]
    pub pdf_dpi: f32,
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            image_base_url: default_image_base_url(),
            request_attempts: default_request_attempts(),
            request_timeout: default_request_timeout(),
            connect_timeout: default_connect_timeout(),
            user_agent: default_user_agent(),
            pdf_dpi: default_pdf_dpi(),
            jpeg_quality: default_jpeg_quality(),
        }
    }
}

impl Config {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout.max(1))
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout.max(1))
    }
}

impl ConfigSpec for Config {
    const FILE_NAME: &'static str = "config.yml";

    fn fields() -> &'static [FieldMeta] {
        static FIELDS: [FieldMeta; 8] = [
            FieldMeta {
                name: "api_base_url",
                description: "MangaLib 接口根地址（标题/章节/页面元数据）",
            },
            FieldMeta {
                name: "image_base_url",
                description: "图片服务器根地址，页面路径会拼接在其后",
            },
            FieldMeta {
                name: "request_attempts",
                description: "接口请求最大尝试次数（无退避，首次成功即返回）",
            },
            FieldMeta {
                name: "request_timeout",
                description: "请求超时时间（秒）",
            },
            FieldMeta {
                name: "connect_timeout",
                description: "连接超时时间（秒）",
            },
            FieldMeta {
                name: "user_agent",
                description: "请求使用的浏览器 User-Agent",
            },
            FieldMeta {
                name: "pdf_dpi",
                description: "导出 PDF 时每页的分辨率（DPI）",
            },
            FieldMeta {
                name: "jpeg_quality",
                description: "导出 PDF 时页面图片的 JPEG 质量（1-100）",
            },
        ];
        &FIELDS
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.request_attempts == 0 {
            return Err(ConfigError::Validation(
                "request_attempts 必须大于 0".to_string(),
            ));
        }
        if !(self.pdf_dpi.is_finite() && self.pdf_dpi > 0.0) {
            return Err(ConfigError::Validation("pdf_dpi 必须大于 0".to_string()));
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(ConfigError::Validation(
                "jpeg_quality 取值范围为 1-100".to_string(),
            ));
        }
        if self.api_base_url.trim().is_empty() || self.image_base_url.trim().is_empty() {
            return Err(ConfigError::Validation("接口地址不能为空".to_string()));
        }
        Ok(())
    }
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_image_base_url() -> String {
    DEFAULT_IMAGE_BASE_URL.to_string()
}

fn default_request_attempts() -> u32 {
    3
}

fn default_request_timeout() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120 Safari/537.36".to_string()
}

fn default_pdf_dpi() -> f32 {
    100.0
}

fn default_jpeg_quality() -> u8 {
    90
}
