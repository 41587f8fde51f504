//! MangaLib 漫画下载器。
//!
//! 输入 mangalib.me 的作品页链接，通过站点 JSON 接口拉取章节信息，
//! 把每章页面保存为图片，或合并为单个 PDF。
//!
//! 代码结构（读代码入口）：
//! - `base_system`：配置/日志/作品链接解析/章节名清洗等基础设施
//! - `network_parser`：HTTP 传输层与重试请求
//! - `catalog`：站点接口（作品信息、章节表、章节页面）
//! - `download`：下载流程编排与断点续传
//! - `export`：图片处理与 PDF 导出
//! - `ui`：命令行（无 UI）执行入口

use std::path::PathBuf;

use anyhow::{Result, anyhow};
use clap::Parser;
use tracing::{debug, error};

mod base_system;
mod catalog;
mod download;
mod export;
mod network_parser;
mod ui;

use base_system::config::load_or_create_with_base;
use base_system::context::Config;
use base_system::logging::{LogOptions, LogSystem, Verbosity};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Parser)]
#[command(name = "mangalib-downloader")]
#[command(about = "Download manga chapters from mangalib.me")]
#[command(disable_version_flag = true)]
struct Cli {
    /// 作品页链接，例如 https://mangalib.me/ru/manga/7965--chainsaw-man
    #[arg(required_unless_present = "version")]
    url: Option<String>,

    /// 输出调试日志
    #[arg(short, long, default_value_t = false)]
    verbose: bool,

    /// 只输出警告与错误（优先于 --verbose）
    #[arg(short, long, default_value_t = false)]
    quiet: bool,

    /// 要下载的章节：单个序号 `n` 或闭区间 `a-b`
    #[arg(short, long)]
    chapters: Option<String>,

    /// 输出作品信息
    #[arg(short, long, default_value_t = false)]
    info: bool,

    /// 下载目录
    #[arg(short, long, default_value = "Manga")]
    output_dir: PathBuf,

    /// 每章合并为一个 PDF
    #[arg(long, default_value_t = false)]
    pdf: bool,

    /// 章节目录使用 `chapter-{number}` 简单命名
    #[arg(short, long, default_value_t = false)]
    simple_names: bool,

    /// 数据目录（存放 config.yml 和 logs）
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// 配置文件路径（优先于 --data-dir 下的 config.yml）
    #[arg(long)]
    config: Option<PathBuf>,

    /// 显示版本信息后退出
    #[arg(long, default_value_t = false)]
    version: bool,
}

fn main() {
    let cli = Cli::parse();

    if cli.version {
        println!("MangaLib Downloader v{}", VERSION);
        return;
    }

    let verbosity = Verbosity::from_flags(cli.verbose, cli.quiet);
    let log = match init_logging(verbosity, cli.data_dir.as_deref()) {
        Ok(log) => log,
        Err(err) => {
            eprintln!("{err:#}");
            std::process::exit(1);
        }
    };

    if let Err(err) = run(&cli, verbosity) {
        error!(target: "startup", "{:#}", err);
        log.safe_exit();
        std::process::exit(1);
    }
}

fn run(cli: &Cli, verbosity: Verbosity) -> Result<()> {
    let config = load_or_create_with_base::<Config>(cli.config.as_deref(), cli.data_dir.as_deref())
        .map_err(|e| anyhow!(e.to_string()))?;
    debug!(target: "startup", "当前版本: v{}", VERSION);

    let args = ui::noui::RunArgs {
        url: cli.url.clone().unwrap_or_default(),
        chapters: cli.chapters.clone(),
        info: cli.info,
        output_dir: cli.output_dir.clone(),
        as_pdf: cli.pdf,
        simple_names: cli.simple_names,
        show_progress: verbosity != Verbosity::Quiet,
    };
    ui::noui::run(&args, &config)
}

fn init_logging(verbosity: Verbosity, base_dir: Option<&std::path::Path>) -> Result<LogSystem> {
    let opts = LogOptions {
        verbosity,
        use_color: true,
        archive_on_exit: true,
        console: true,
    };
    LogSystem::init_with_base(opts, base_dir).map_err(|e| anyhow!(e))
}
