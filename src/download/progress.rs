//! CLI 页面进度条。

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

pub(crate) struct PageProgress {
    bar: Option<ProgressBar>,
}

impl PageProgress {
    pub(crate) fn new(enabled: bool, total: usize, prefix: &str) -> Self {
        if !enabled || total == 0 {
            return Self { bar: None };
        }

        let style = ProgressStyle::with_template(
            "{prefix} [{elapsed_precise}] {wide_bar} {pos}/{len} ({eta})",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("##-");

        let bar = ProgressBar::with_draw_target(Some(total as u64), ProgressDrawTarget::stderr());
        bar.set_style(style);
        bar.set_prefix(prefix.to_string());
        Self { bar: Some(bar) }
    }

    pub(crate) fn inc(&self) {
        if let Some(bar) = self.bar.as_ref() {
            bar.inc(1);
        }
    }

    pub(crate) fn finish(mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }
}
