//! 下载主流程编排：解析作品 → 章节表 → 逐章下载（图片落盘或合并为 PDF）。
//!
//! 章节之间互相隔离：单章失败只记录日志并写入报告，不会中断后续章节。

use std::fs;
use std::path::{Path, PathBuf};

use image::RgbImage;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use super::models::{
    ChapterOutcome, ChapterReport, DownloadOptions, DownloadReport, DownloadTarget,
};
use super::progress::PageProgress;
use super::store::{ChapterSnapshot, ProgressStore};
use crate::base_system::chapter_name::manga_dir_name;
use crate::base_system::fs_utils::write_atomic;
use crate::base_system::title_id::{TitleId, TitleIdError, parse_title_id};
use crate::catalog::client::{CatalogClient, CatalogError};
use crate::catalog::models::ChapterList;
use crate::export::image_utils::{decode_page, page_extension};
use crate::export::pdf::{ExportError, PdfAssembler};
use crate::network_parser::network::HttpTransport;

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("no chapters selected")]
    EmptyChapterList,
    #[error(transparent)]
    TitleId(#[from] TitleIdError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("chapter {0} not found")]
    ChapterNotFound(u32),
    #[error("chapter {chapter}, page {page}: {reason}")]
    PageDownload {
        chapter: u32,
        page: usize,
        reason: String,
    },
    #[error(transparent)]
    Export(#[from] ExportError),
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> DownloadError + '_ {
    move |source| DownloadError::Io {
        path: path.to_path_buf(),
        source,
    }
}

pub struct MangaDownloader<'a, T> {
    catalog: &'a CatalogClient<T>,
    store: &'a dyn ProgressStore,
    assembler: PdfAssembler,
}

impl<'a, T: HttpTransport> MangaDownloader<'a, T> {
    pub fn new(
        catalog: &'a CatalogClient<T>,
        store: &'a dyn ProgressStore,
        assembler: PdfAssembler,
    ) -> Self {
        Self {
            catalog,
            store,
            assembler,
        }
    }

    /// 按用户序号下载章节。
    ///
    /// 作品信息或章节表拿不到时整体失败；章节表为空时正常返回 `no_chapters = true`。
    pub fn run(
        &self,
        title_url: &str,
        chapters: &[u32],
        options: &DownloadOptions,
    ) -> Result<DownloadReport, DownloadError> {
        if chapters.is_empty() {
            return Err(DownloadError::EmptyChapterList);
        }

        let id = parse_title_id(title_url)?;
        let stats = self.catalog.title_stats(&id)?;
        debug!(target: "download", "作品 id={} slug={}", id.numeric_id(), id.slug());
        let title_name = match stats.name.trim() {
            "" => id.slug(),
            name => name,
        };
        let manga_dir = options.output_dir.join(manga_dir_name(title_name));

        let Some(list) = self.catalog.chapter_list(&id)? else {
            warn!(target: "download", "'{}' 没有章节可下载", title_name);
            return Ok(DownloadReport {
                no_chapters: true,
                chapters: Vec::new(),
            });
        };
        info!(
            target: "download",
            "'{}' 共 {} 章，本次请求 {} 章", title_name, list.len(), chapters.len()
        );

        fs::create_dir_all(&manga_dir).map_err(io_error(&manga_dir))?;

        let mut report = DownloadReport::default();
        for &index in chapters {
            let outcome = match self.download_chapter(&id, &manga_dir, &list, index, options) {
                Ok(outcome) => outcome,
                Err(DownloadError::ChapterNotFound(i)) => {
                    warn!(target: "download", "章节 {} 不存在，跳过", i);
                    ChapterOutcome::NotFound
                }
                Err(err) => {
                    error!(target: "download", "章节 {} 下载失败: {}", index, err);
                    ChapterOutcome::Failed(err.to_string())
                }
            };
            report.chapters.push(ChapterReport { index, outcome });
        }

        info!(
            target: "download",
            "下载结束：{} 章，未找到 {}，失败 {}，失败页 {}",
            report.chapters.len(),
            report.not_found().len(),
            report.failed(),
            report.failed_pages()
        );
        Ok(report)
    }

    fn download_chapter(
        &self,
        id: &TitleId,
        manga_dir: &Path,
        list: &ChapterList,
        index: u32,
        options: &DownloadOptions,
    ) -> Result<ChapterOutcome, DownloadError> {
        let record = list.get(index).ok_or(DownloadError::ChapterNotFound(index))?;
        let target = DownloadTarget::new(manga_dir, record, options);
        info!(target: "download", "开始处理章节 {}: {}", index, target.display_name);

        if !target.pdf_mode {
            let dir = target.chapter_dir();
            fs::create_dir_all(&dir).map_err(io_error(&dir))?;
        }

        let snapshot = self
            .store
            .snapshot(&target)
            .map_err(io_error(&target.directory_path()))?;

        if target.pdf_mode && snapshot.has_document(&target.display_name) {
            info!(target: "download", "{}.pdf 已存在，跳过", target.display_name);
            return Ok(ChapterOutcome::AlreadyExported);
        }

        let pages = self
            .catalog
            .chapter_pages(id, &record.volume, &record.number)?;
        debug!(target: "download", "章节 {} 共 {} 页", index, pages.len());

        if target.pdf_mode {
            self.export_chapter(index, &target, &snapshot, &pages, options)
        } else {
            self.save_pages(index, &target, &snapshot, &pages, options)
        }
    }

    fn save_pages(
        &self,
        index: u32,
        target: &DownloadTarget,
        snapshot: &ChapterSnapshot,
        pages: &[String],
        options: &DownloadOptions,
    ) -> Result<ChapterOutcome, DownloadError> {
        let dir = target.chapter_dir();
        let progress = PageProgress::new(options.show_progress, pages.len(), &target.display_name);
        let (mut saved, mut skipped, mut failed) = (0, 0, 0);

        for (i, url) in pages.iter().enumerate() {
            let page = i + 1;
            if snapshot.has_page(page) {
                skipped += 1;
                progress.inc();
                continue;
            }

            match self.fetch_page(index, page, url) {
                Ok(bytes) => {
                    let path = dir.join(format!("{page}{}", page_extension(url)));
                    write_atomic(&path, &bytes).map_err(io_error(&path))?;
                    saved += 1;
                }
                Err(err) => {
                    warn!(target: "download", "{}", err);
                    failed += 1;
                }
            }
            progress.inc();
        }
        progress.finish();

        info!(
            target: "download",
            "{}：新增 {} 页，已存在 {} 页，失败 {} 页", target.display_name, saved, skipped, failed
        );
        Ok(ChapterOutcome::Pages {
            saved,
            skipped,
            failed,
        })
    }

    fn export_chapter(
        &self,
        index: u32,
        target: &DownloadTarget,
        snapshot: &ChapterSnapshot,
        pages: &[String],
        options: &DownloadOptions,
    ) -> Result<ChapterOutcome, DownloadError> {
        // 之前以图片模式下载过的完整章节，直接合并；合并失败则改为重新下载
        if snapshot.has_all_pages(pages.len()) {
            info!(target: "download", "{} 图片已齐全，直接合并", target.display_name);
            match self.assembler.assemble_directory(
                &target.chapter_dir(),
                &target.display_name,
                pages.len(),
            ) {
                Ok(path) => return Ok(ChapterOutcome::Assembled { path }),
                Err(err) => warn!(
                    target: "download",
                    "{} 本地图片合并失败，改为重新下载: {}", target.display_name, err
                ),
            }
        }

        let progress = PageProgress::new(options.show_progress, pages.len(), &target.display_name);
        let mut images: Vec<RgbImage> = Vec::with_capacity(pages.len());
        let mut failed = 0;

        for (i, url) in pages.iter().enumerate() {
            let page = i + 1;
            let decoded = self.fetch_page(index, page, url).and_then(|bytes| {
                decode_page(&bytes).map_err(|e| DownloadError::PageDownload {
                    chapter: index,
                    page,
                    reason: format!("decode failed: {e}"),
                })
            });
            match decoded {
                Ok(img) => images.push(img),
                Err(err) => {
                    warn!(target: "download", "{}", err);
                    failed += 1;
                }
            }
            progress.inc();
        }
        progress.finish();

        if images.is_empty() {
            warn!(target: "download", "{} 没有可用页面，未生成 PDF", target.display_name);
            return Ok(ChapterOutcome::Exported {
                pages: 0,
                failed,
                path: None,
            });
        }

        let path = target.pdf_path();
        self.assembler.assemble_images(&images, &path)?;
        Ok(ChapterOutcome::Exported {
            pages: images.len(),
            failed,
            path: Some(path),
        })
    }

    /// 单次请求，不重试。
    fn fetch_page(&self, chapter: u32, page: usize, url: &str) -> Result<Vec<u8>, DownloadError> {
        let failure = |reason: String| DownloadError::PageDownload {
            chapter,
            page,
            reason,
        };
        match self.catalog.fetcher().get_once(url) {
            Ok(resp) if resp.is_ok() => Ok(resp.body),
            Ok(resp) => Err(failure(format!("HTTP {} for {}", resp.status, url))),
            Err(err) => Err(failure(format!("{err} ({url})"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::download::store::DirProgressStore;
    use crate::export::image_utils::png_fixture;
    use crate::network_parser::fetcher::ResilientFetcher;
    use crate::network_parser::testing::{Reply, ScriptedTransport};

    const API: &str = "https://api.test/api/manga";
    const IMG: &str = "https://img.test";
    const TITLE_URL: &str = "https://mangalib.me/ru/manga/7965--chainsaw-man";

    fn catalog(transport: &ScriptedTransport) -> CatalogClient<&ScriptedTransport> {
        CatalogClient::new(ResilientFetcher::new(transport), API, IMG)
    }

    fn script_title(transport: &ScriptedTransport, name: &str, chapters: &str) {
        transport.script(
            &format!("{API}/7965--chainsaw-man"),
            [Reply::json(
                200,
                &format!(r#"{{"data":{{"id":7965,"name":"{name}"}}}}"#),
            )],
        );
        transport.script(
            &format!("{API}/7965--chainsaw-man/chapters"),
            [Reply::json(200, chapters)],
        );
    }

    /// 登记一章的页面列表，返回各页的完整图片地址。
    fn script_pages(transport: &ScriptedTransport, number: &str, count: usize) -> Vec<String> {
        let paths: Vec<String> = (1..=count)
            .map(|p| format!("manga/cm/{number}/{p}.png"))
            .collect();
        let body = paths
            .iter()
            .map(|p| format!(r#"{{"url":"{p}"}}"#))
            .collect::<Vec<_>>()
            .join(",");
        transport.script(
            &format!("{API}/7965--chainsaw-man/chapter?number={number}&volume=1"),
            [Reply::json(200, &format!(r#"{{"data":{{"pages":[{body}]}}}}"#))],
        );
        paths.iter().map(|p| format!("{IMG}/{p}")).collect()
    }

    fn one_chapter() -> &'static str {
        r#"{"data":[{"index":1,"volume":1,"number":1,"name":null}]}"#
    }

    fn options(root: &Path, as_pdf: bool) -> DownloadOptions {
        DownloadOptions {
            output_dir: root.join("Manga"),
            as_pdf,
            ..DownloadOptions::default()
        }
    }

    fn page_fetches(transport: &ScriptedTransport) -> usize {
        transport
            .calls()
            .iter()
            .filter(|c| c.starts_with(IMG))
            .count()
    }

    #[test]
    fn empty_selection_fails_before_any_request() {
        let transport = ScriptedTransport::new();
        let catalog = catalog(&transport);
        let downloader =
            MangaDownloader::new(&catalog, &DirProgressStore, PdfAssembler::new(100.0, 90));

        let err = downloader
            .run(TITLE_URL, &[], &DownloadOptions::default())
            .unwrap_err();
        assert!(matches!(err, DownloadError::EmptyChapterList));
        assert!(transport.calls().is_empty());
    }

    #[test]
    fn malformed_url_fails_before_any_request() {
        let transport = ScriptedTransport::new();
        let catalog = catalog(&transport);
        let downloader =
            MangaDownloader::new(&catalog, &DirProgressStore, PdfAssembler::new(100.0, 90));

        let err = downloader
            .run("https://mangalib.me/ru/people/1", &[1], &DownloadOptions::default())
            .unwrap_err();
        assert!(matches!(err, DownloadError::TitleId(_)));
        assert!(transport.calls().is_empty());
    }

    #[test]
    fn end_to_end_image_download() {
        let root = tempfile::tempdir().unwrap();
        let transport = ScriptedTransport::new();
        script_title(&transport, "Chainsaw-Man", one_chapter());
        for url in script_pages(&transport, "1", 3) {
            transport.script(&url, [Reply::bytes(b"page".to_vec())]);
        }

        let catalog = catalog(&transport);
        let downloader =
            MangaDownloader::new(&catalog, &DirProgressStore, PdfAssembler::new(100.0, 90));
        let report = downloader.run(TITLE_URL, &[1], &options(root.path(), false)).unwrap();

        let chapter_dir = root.path().join("Manga/chainsaw-man/Chapter 1");
        for p in 1..=3 {
            assert_eq!(fs::read(chapter_dir.join(format!("{p}.png"))).unwrap(), b"page");
        }
        assert_eq!(
            report.outcome(1),
            Some(&ChapterOutcome::Pages {
                saved: 3,
                skipped: 0,
                failed: 0
            })
        );
    }

    #[test]
    fn missing_index_is_reported_and_others_continue() {
        let root = tempfile::tempdir().unwrap();
        let transport = ScriptedTransport::new();
        script_title(&transport, "Chainsaw-Man", one_chapter());
        for url in script_pages(&transport, "1", 1) {
            transport.script(&url, [Reply::bytes(b"p".to_vec())]);
        }

        let catalog = catalog(&transport);
        let downloader =
            MangaDownloader::new(&catalog, &DirProgressStore, PdfAssembler::new(100.0, 90));
        let report = downloader
            .run(TITLE_URL, &[5, 1], &options(root.path(), false))
            .unwrap();

        assert_eq!(report.not_found(), vec![5]);
        assert!(matches!(
            report.outcome(1),
            Some(ChapterOutcome::Pages { saved: 1, .. })
        ));
    }

    #[test]
    fn existing_pages_are_not_fetched_again() {
        let root = tempfile::tempdir().unwrap();
        let transport = ScriptedTransport::new();
        script_title(&transport, "Chainsaw-Man", one_chapter());
        let urls = script_pages(&transport, "1", 3);
        for url in &urls {
            transport.script(url, [Reply::bytes(b"new".to_vec())]);
        }

        let chapter_dir = root.path().join("Manga/chainsaw-man/Chapter 1");
        fs::create_dir_all(&chapter_dir).unwrap();
        fs::write(chapter_dir.join("1.jpg"), b"old").unwrap();
        fs::write(chapter_dir.join("2.jpg"), b"old").unwrap();

        let catalog = catalog(&transport);
        let downloader =
            MangaDownloader::new(&catalog, &DirProgressStore, PdfAssembler::new(100.0, 90));
        let report = downloader.run(TITLE_URL, &[1], &options(root.path(), false)).unwrap();

        assert_eq!(page_fetches(&transport), 1);
        assert_eq!(transport.calls_to(&urls[2]), 1);
        assert_eq!(
            report.outcome(1),
            Some(&ChapterOutcome::Pages {
                saved: 1,
                skipped: 2,
                failed: 0
            })
        );
    }

    #[test]
    fn failed_page_is_skipped_without_retry() {
        let root = tempfile::tempdir().unwrap();
        let transport = ScriptedTransport::new();
        script_title(&transport, "Chainsaw-Man", one_chapter());
        let urls = script_pages(&transport, "1", 2);
        transport.script(&urls[0], [Reply::status(403)]);
        transport.script(&urls[1], [Reply::bytes(b"ok".to_vec())]);

        let catalog = catalog(&transport);
        let downloader =
            MangaDownloader::new(&catalog, &DirProgressStore, PdfAssembler::new(100.0, 90));
        let report = downloader.run(TITLE_URL, &[1], &options(root.path(), false)).unwrap();

        assert_eq!(transport.calls_to(&urls[0]), 1);
        let chapter_dir = root.path().join("Manga/chainsaw-man/Chapter 1");
        assert!(!chapter_dir.join("1.png").exists());
        assert!(chapter_dir.join("2.png").exists());
        assert_eq!(report.failed_pages(), 1);
    }

    #[test]
    fn exhausted_page_list_fails_only_that_chapter() {
        let root = tempfile::tempdir().unwrap();
        let transport = ScriptedTransport::new();
        script_title(
            &transport,
            "Chainsaw-Man",
            r#"{"data":[
                {"index":1,"volume":"1","number":"1","name":""},
                {"index":2,"volume":"1","number":"2","name":""}
            ]}"#,
        );
        transport.script(
            &format!("{API}/7965--chainsaw-man/chapter?number=1&volume=1"),
            [Reply::status(500)],
        );
        for url in script_pages(&transport, "2", 1) {
            transport.script(&url, [Reply::bytes(b"p".to_vec())]);
        }

        let catalog = catalog(&transport);
        let downloader =
            MangaDownloader::new(&catalog, &DirProgressStore, PdfAssembler::new(100.0, 90));
        let report = downloader
            .run(TITLE_URL, &[1, 2], &options(root.path(), false))
            .unwrap();

        assert_eq!(report.failed(), 1);
        assert!(matches!(report.outcome(1), Some(ChapterOutcome::Failed(_))));
        assert!(matches!(
            report.outcome(2),
            Some(ChapterOutcome::Pages { saved: 1, .. })
        ));
    }

    #[test]
    fn empty_chapter_list_ends_quietly() {
        let root = tempfile::tempdir().unwrap();
        let transport = ScriptedTransport::new();
        script_title(&transport, "Chainsaw-Man", "{}");

        let catalog = catalog(&transport);
        let downloader =
            MangaDownloader::new(&catalog, &DirProgressStore, PdfAssembler::new(100.0, 90));
        let report = downloader.run(TITLE_URL, &[1], &options(root.path(), false)).unwrap();

        assert!(report.no_chapters);
        assert!(report.chapters.is_empty());
    }

    #[test]
    fn blank_title_name_falls_back_to_slug() {
        let root = tempfile::tempdir().unwrap();
        let transport = ScriptedTransport::new();
        script_title(&transport, " ", one_chapter());
        script_pages(&transport, "1", 0);

        let catalog = catalog(&transport);
        let downloader =
            MangaDownloader::new(&catalog, &DirProgressStore, PdfAssembler::new(100.0, 90));
        downloader.run(TITLE_URL, &[1], &options(root.path(), false)).unwrap();

        assert!(root.path().join("Manga/chainsaw-man/Chapter 1").is_dir());
    }

    #[test]
    fn pdf_mode_exports_decoded_pages() {
        let root = tempfile::tempdir().unwrap();
        let transport = ScriptedTransport::new();
        script_title(&transport, "Chainsaw-Man", one_chapter());
        let urls = script_pages(&transport, "1", 3);
        transport.script(&urls[0], [Reply::bytes(png_fixture(20, 30, [0, 0, 0, 0]))]);
        transport.script(&urls[1], [Reply::bytes(b"not an image".to_vec())]);
        transport.script(&urls[2], [Reply::bytes(png_fixture(10, 10, [9, 9, 9, 255]))]);

        let catalog = catalog(&transport);
        let downloader =
            MangaDownloader::new(&catalog, &DirProgressStore, PdfAssembler::new(100.0, 90));
        let report = downloader.run(TITLE_URL, &[1], &options(root.path(), true)).unwrap();

        let pdf = root.path().join("Manga/chainsaw-man/Chapter 1.pdf");
        assert_eq!(
            report.outcome(1),
            Some(&ChapterOutcome::Exported {
                pages: 2,
                failed: 1,
                path: Some(pdf.clone()),
            })
        );
        let doc = lopdf::Document::load(&pdf).unwrap();
        assert_eq!(doc.get_pages().len(), 2);
        assert!(!root.path().join("Manga/chainsaw-man/Chapter 1").exists());
    }

    #[test]
    fn pdf_rerun_fetches_nothing() {
        let root = tempfile::tempdir().unwrap();
        let transport = ScriptedTransport::new();
        script_title(&transport, "Chainsaw-Man", one_chapter());
        script_pages(&transport, "1", 2);

        let manga_dir = root.path().join("Manga/chainsaw-man");
        fs::create_dir_all(&manga_dir).unwrap();
        fs::write(manga_dir.join("Chapter 1.pdf"), b"%PDF-1.5").unwrap();

        let catalog = catalog(&transport);
        let downloader =
            MangaDownloader::new(&catalog, &DirProgressStore, PdfAssembler::new(100.0, 90));
        let report = downloader.run(TITLE_URL, &[1], &options(root.path(), true)).unwrap();

        assert_eq!(report.outcome(1), Some(&ChapterOutcome::AlreadyExported));
        assert_eq!(page_fetches(&transport), 0);
        assert_eq!(
            transport.calls_to(&format!("{API}/7965--chainsaw-man/chapter?number=1&volume=1")),
            0
        );
    }

    #[test]
    fn pdf_mode_assembles_complete_image_directory() {
        let root = tempfile::tempdir().unwrap();
        let transport = ScriptedTransport::new();
        script_title(&transport, "Chainsaw-Man", one_chapter());
        script_pages(&transport, "1", 2);

        let chapter_dir = root.path().join("Manga/chainsaw-man/Chapter 1");
        fs::create_dir_all(&chapter_dir).unwrap();
        fs::write(chapter_dir.join("1.png"), png_fixture(8, 8, [1, 1, 1, 255])).unwrap();
        fs::write(chapter_dir.join("2.png"), png_fixture(8, 8, [2, 2, 2, 255])).unwrap();

        let catalog = catalog(&transport);
        let downloader =
            MangaDownloader::new(&catalog, &DirProgressStore, PdfAssembler::new(100.0, 90));
        let report = downloader.run(TITLE_URL, &[1], &options(root.path(), true)).unwrap();

        let pdf = root.path().join("Manga/chainsaw-man/Chapter 1.pdf");
        assert_eq!(
            report.outcome(1),
            Some(&ChapterOutcome::Assembled { path: pdf.clone() })
        );
        assert_eq!(page_fetches(&transport), 0);
        assert!(pdf.is_file());
        assert!(!chapter_dir.exists());
    }

    #[test]
    fn unreadable_local_images_fall_back_to_download() {
        let root = tempfile::tempdir().unwrap();
        let transport = ScriptedTransport::new();
        script_title(&transport, "Chainsaw-Man", one_chapter());
        for url in script_pages(&transport, "1", 2) {
            transport.script(&url, [Reply::bytes(png_fixture(8, 8, [3, 3, 3, 255]))]);
        }

        // 第 1 页是扩展名不符的 PNG，第 2 页是当初保存下来的错误页面
        let chapter_dir = root.path().join("Manga/chainsaw-man/Chapter 1");
        fs::create_dir_all(&chapter_dir).unwrap();
        fs::write(chapter_dir.join("1.jpg"), png_fixture(8, 8, [1, 1, 1, 255])).unwrap();
        fs::write(chapter_dir.join("2.jpg"), b"<html>503</html>").unwrap();

        let catalog = catalog(&transport);
        let downloader =
            MangaDownloader::new(&catalog, &DirProgressStore, PdfAssembler::new(100.0, 90));
        let pdf = root.path().join("Manga/chainsaw-man/Chapter 1.pdf");

        let report = downloader.run(TITLE_URL, &[1], &options(root.path(), true)).unwrap();
        assert_eq!(
            report.outcome(1),
            Some(&ChapterOutcome::Exported {
                pages: 2,
                failed: 0,
                path: Some(pdf.clone()),
            })
        );
        assert_eq!(page_fetches(&transport), 2);
        assert!(pdf.is_file());

        let report = downloader.run(TITLE_URL, &[1], &options(root.path(), true)).unwrap();
        assert_eq!(report.outcome(1), Some(&ChapterOutcome::AlreadyExported));
        assert_eq!(page_fetches(&transport), 2);
    }

    #[test]
    fn transport_error_skips_page_in_image_mode() {
        let root = tempfile::tempdir().unwrap();
        let transport = ScriptedTransport::new();
        script_title(&transport, "Chainsaw-Man", one_chapter());
        let urls = script_pages(&transport, "1", 3);
        transport.script(&urls[0], [Reply::bytes(b"p1".to_vec())]);
        transport.script(&urls[1], [Reply::transport_error("connection reset")]);
        transport.script(&urls[2], [Reply::bytes(b"p3".to_vec())]);

        let catalog = catalog(&transport);
        let downloader =
            MangaDownloader::new(&catalog, &DirProgressStore, PdfAssembler::new(100.0, 90));
        let report = downloader.run(TITLE_URL, &[1], &options(root.path(), false)).unwrap();

        assert_eq!(
            report.outcome(1),
            Some(&ChapterOutcome::Pages {
                saved: 2,
                skipped: 0,
                failed: 1
            })
        );
        assert_eq!(transport.calls_to(&urls[1]), 1);
        let chapter_dir = root.path().join("Manga/chainsaw-man/Chapter 1");
        assert!(!chapter_dir.join("2.png").exists());
        assert_eq!(fs::read(chapter_dir.join("3.png")).unwrap(), b"p3");
    }

    #[test]
    fn transport_error_skips_page_in_pdf_mode() {
        let root = tempfile::tempdir().unwrap();
        let transport = ScriptedTransport::new();
        script_title(&transport, "Chainsaw-Man", one_chapter());
        let urls = script_pages(&transport, "1", 2);
        transport.script(&urls[0], [Reply::transport_error("timed out")]);
        transport.script(&urls[1], [Reply::bytes(png_fixture(10, 10, [4, 4, 4, 255]))]);

        let catalog = catalog(&transport);
        let downloader =
            MangaDownloader::new(&catalog, &DirProgressStore, PdfAssembler::new(100.0, 90));
        let report = downloader.run(TITLE_URL, &[1], &options(root.path(), true)).unwrap();

        let pdf = root.path().join("Manga/chainsaw-man/Chapter 1.pdf");
        assert_eq!(
            report.outcome(1),
            Some(&ChapterOutcome::Exported {
                pages: 1,
                failed: 1,
                path: Some(pdf.clone()),
            })
        );
        assert_eq!(lopdf::Document::load(&pdf).unwrap().get_pages().len(), 1);
    }

    #[test]
    fn partial_image_directory_is_refetched_and_left_alone() {
        let root = tempfile::tempdir().unwrap();
        let transport = ScriptedTransport::new();
        script_title(&transport, "Chainsaw-Man", one_chapter());
        for url in script_pages(&transport, "1", 2) {
            transport.script(&url, [Reply::bytes(png_fixture(8, 8, [6, 6, 6, 255]))]);
        }

        let chapter_dir = root.path().join("Manga/chainsaw-man/Chapter 1");
        fs::create_dir_all(&chapter_dir).unwrap();
        fs::write(chapter_dir.join("1.png"), png_fixture(8, 8, [1, 1, 1, 255])).unwrap();

        let catalog = catalog(&transport);
        let downloader =
            MangaDownloader::new(&catalog, &DirProgressStore, PdfAssembler::new(100.0, 90));
        let report = downloader.run(TITLE_URL, &[1], &options(root.path(), true)).unwrap();

        assert!(matches!(
            report.outcome(1),
            Some(ChapterOutcome::Exported { pages: 2, failed: 0, .. })
        ));
        assert_eq!(page_fetches(&transport), 2);
        assert!(chapter_dir.join("1.png").exists());
    }
}
