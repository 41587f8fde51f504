//! MangaLib 目录接口客户端。
//!
//! 子模块：
//! - `models`：接口返回结构（TitleStats / ChapterRecord / ChapterList）
//! - `client`：三个只读接口：作品信息、章节表、章节页面

pub mod client;
pub mod models;
