//! 无 UI 模式：一次性执行命令行参数指定的下载与信息查询。

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::base_system::context::Config;
use crate::base_system::title_id::parse_title_id;
use crate::catalog::client::CatalogClient;
use crate::catalog::models::TitleStats;
use crate::download::downloader::MangaDownloader;
use crate::download::models::{DownloadOptions, DownloadReport};
use crate::download::plan::parse_chapter_selection;
use crate::download::store::DirProgressStore;
use crate::export::pdf::PdfAssembler;
use crate::network_parser::network::BrowserTransport;

#[derive(Debug, Clone)]
pub struct RunArgs {
    pub url: String,
    pub chapters: Option<String>,
    pub info: bool,
    pub output_dir: PathBuf,
    pub as_pdf: bool,
    pub simple_names: bool,
    pub show_progress: bool,
}

pub fn run(args: &RunArgs, config: &Config) -> Result<()> {
    if args.chapters.is_none() && !args.info {
        warn!(target: "cli", "未指定 --chapters 或 --info，没有需要执行的操作");
        return Ok(());
    }

    // 参数与链接校验都在联网之前完成
    let selection = args
        .chapters
        .as_deref()
        .map(parse_chapter_selection)
        .transpose()?;
    let id = parse_title_id(&args.url)?;

    let transport = BrowserTransport::new(config)?;
    let catalog = CatalogClient::from_config(transport, config);

    if let Some(selection) = selection {
        fs::create_dir_all(&args.output_dir)
            .with_context(|| format!("无法创建输出目录 {}", args.output_dir.display()))?;

        let options = DownloadOptions {
            output_dir: args.output_dir.clone(),
            as_pdf: args.as_pdf,
            simple_names: args.simple_names,
            show_progress: args.show_progress,
        };
        let store = DirProgressStore;
        let downloader = MangaDownloader::new(&catalog, &store, PdfAssembler::from_config(config));
        let report = downloader.run(&args.url, &selection, &options)?;
        log_report(&report);
    }

    if args.info {
        let stats = catalog.title_stats(&id)?;
        print!("{}", format_title_info(&stats));
    }

    info!(target: "cli", "完成: {}", id);
    Ok(())
}

fn log_report(report: &DownloadReport) {
    if report.no_chapters {
        return;
    }
    let missing = report.not_found();
    if !missing.is_empty() {
        warn!(target: "cli", "未找到的章节: {:?}", missing);
    }
    if report.failed() > 0 || report.failed_pages() > 0 {
        warn!(
            target: "cli",
            "{} 章失败，{} 页失败；重新运行同一命令可补全",
            report.failed(),
            report.failed_pages()
        );
    }
}

/// `--info` 输出块。
pub fn format_title_info(stats: &TitleStats) -> String {
    let eng_name = stats.eng_name.as_deref().unwrap_or_default();
    let licensed = if stats.is_licensed { "True" } else { "False" };
    format!(
        "\n== '{eng_name}' stats ==\n\n\
         ID              : {}\n\
         Name            : {}\n\
         Russian name    : {}\n\
         English name    : {eng_name}\n\
         Age restriction : {}\n\
         Is licensed     : {licensed}\n\
         Status          : {}\n\
         Release date    : {}\n",
        stats.id,
        stats.name,
        stats.rus_name.as_deref().unwrap_or_default(),
        stats.age_restriction_label(),
        stats.status_label(),
        stats.release_date.as_deref().unwrap_or_default(),
    )
}
