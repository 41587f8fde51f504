//! 断点续传记录：当前以输出目录本身作为“已完成”清单。
//!
//! 每章开始时取一次快照，章节处理过程中不再重新扫描。

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::Path;

use super::models::DownloadTarget;
use crate::export::image_utils::{has_extension, is_page_file};

pub trait ProgressStore {
    fn snapshot(&self, target: &DownloadTarget) -> io::Result<ChapterSnapshot>;
}

/// 某一章节开始处理时已有的输出。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChapterSnapshot {
    pages: HashSet<String>,
    documents: HashSet<String>,
}

impl ChapterSnapshot {
    pub fn new(
        pages: impl IntoIterator<Item = String>,
        documents: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            pages: pages.into_iter().collect(),
            documents: documents.into_iter().collect(),
        }
    }

    /// `page` 为 1 起的页码，与文件名主干按字符串比较。
    pub fn has_page(&self, page: usize) -> bool {
        self.pages.contains(&page.to_string())
    }

    pub fn has_document(&self, name: &str) -> bool {
        self.documents.contains(name)
    }

    pub fn has_all_pages(&self, total: usize) -> bool {
        total > 0 && (1..=total).all(|p| self.has_page(p))
    }
}

/// 基于目录列表的实现。
#[derive(Debug, Clone, Copy, Default)]
pub struct DirProgressStore;

impl ProgressStore for DirProgressStore {
    fn snapshot(&self, target: &DownloadTarget) -> io::Result<ChapterSnapshot> {
        let pages = list_stems(&target.chapter_dir(), is_page_file)?;
        let documents = if target.pdf_mode {
            list_stems(&target.manga_dir, |p| has_extension(p, &["pdf"]))?
        } else {
            Vec::new()
        };
        Ok(ChapterSnapshot::new(pages, documents))
    }
}

fn list_stems(dir: &Path, keep: impl Fn(&Path) -> bool) -> io::Result<Vec<String>> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => return Err(err),
    };

    let mut stems = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if !path.is_file() || !keep(&path) {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            stems.push(stem.to_string());
        }
    }
    Ok(stems)
}
