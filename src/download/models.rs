//! 数据模型：下载选项、章节目标与结果汇总。

use std::path::{Path, PathBuf};

use crate::base_system::chapter_name::sanitize_chapter_name;
use crate::catalog::models::ChapterRecord;

#[derive(Debug, Clone)]
pub struct DownloadOptions {
    pub output_dir: PathBuf,
    pub as_pdf: bool,
    pub simple_names: bool,
    pub show_progress: bool,
}

impl Default for DownloadOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("Manga"),
            as_pdf: false,
            simple_names: false,
            show_progress: false,
        }
    }
}

/// 单个章节的落盘位置。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTarget {
    pub manga_dir: PathBuf,
    pub display_name: String,
    pub pdf_mode: bool,
}

impl DownloadTarget {
    pub fn new(manga_dir: &Path, chapter: &ChapterRecord, options: &DownloadOptions) -> Self {
        Self {
            manga_dir: manga_dir.to_path_buf(),
            display_name: chapter_display_name(chapter, options.simple_names),
            pdf_mode: options.as_pdf,
        }
    }

    /// 章节图片目录（PDF 模式下只在读取旧的图片目录时使用）。
    pub fn chapter_dir(&self) -> PathBuf {
        self.manga_dir.join(&self.display_name)
    }

    pub fn pdf_path(&self) -> PathBuf {
        self.manga_dir.join(format!("{}.pdf", self.display_name))
    }

    /// 本章输出所在目录：图片模式为章节目录，PDF 模式为作品目录。
    pub fn directory_path(&self) -> PathBuf {
        if self.pdf_mode {
            self.manga_dir.clone()
        } else {
            self.chapter_dir()
        }
    }
}

/// `chapter-{number}`，或 `Chapter {number}[ - {清洗后的章节名}]`。
pub fn chapter_display_name(chapter: &ChapterRecord, simple: bool) -> String {
    if simple {
        return format!("chapter-{}", chapter.number);
    }
    let mut name = format!("Chapter {}", chapter.number);
    let raw = chapter.name.trim();
    if !raw.is_empty() {
        name.push_str(" - ");
        name.push_str(&sanitize_chapter_name(raw));
    }
    name
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChapterOutcome {
    /// 图片模式：新保存 / 已存在跳过 / 失败的页数。
    Pages {
        saved: usize,
        skipped: usize,
        failed: usize,
    },
    /// PDF 模式：写入的页数与失败页数；一页都没拿到时不生成文件。
    Exported {
        pages: usize,
        failed: usize,
        path: Option<PathBuf>,
    },
    /// PDF 模式：由已有的完整图片目录合并而来。
    Assembled { path: PathBuf },
    AlreadyExported,
    NotFound,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterReport {
    pub index: u32,
    pub outcome: ChapterOutcome,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadReport {
    /// 章节表为空时为 true：正常结束，没有可下载内容。
    pub no_chapters: bool,
    pub chapters: Vec<ChapterReport>,
}

impl DownloadReport {
    pub fn outcome(&self, index: u32) -> Option<&ChapterOutcome> {
        self.chapters
            .iter()
            .find(|c| c.index == index)
            .map(|c| &c.outcome)
    }

    pub fn not_found(&self) -> Vec<u32> {
        self.chapters
            .iter()
            .filter(|c| c.outcome == ChapterOutcome::NotFound)
            .map(|c| c.index)
            .collect()
    }

    pub fn failed(&self) -> usize {
        self.chapters
            .iter()
            .filter(|c| matches!(c.outcome, ChapterOutcome::Failed(_)))
            .count()
    }

    pub fn failed_pages(&self) -> usize {
        self.chapters
            .iter()
            .map(|c| match c.outcome {
                ChapterOutcome::Pages { failed, .. } | ChapterOutcome::Exported { failed, .. } => {
                    failed
                }
                _ => 0,
            })
            .sum()
    }
}
