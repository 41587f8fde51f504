//! 下载流程模块入口。
//!
//! 子模块：
//! - `models`     ：数据模型（DownloadOptions / DownloadTarget / DownloadReport）
//! - `plan`       ：`--chapters` 参数解析
//! - `store`      ：已有输出快照（断点续传）
//! - `progress`   ：CLI 进度条
//! - `downloader` ：下载主流程编排

pub mod downloader;
pub mod models;
pub mod plan;
pub(crate) mod progress;
pub mod store;
