//! 导出：页面图片处理与章节 PDF 合并。

pub mod image_utils;
pub mod pdf;
