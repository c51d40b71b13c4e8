//! Progress bar for batch operations

use indicatif::{ProgressBar, ProgressStyle};

const TEMPLATE: &str = "{prefix} [{bar:50}] {pos}/{len} {wide_msg}";

/// Progress bar for `len` items, or a hidden one when disabled
pub fn batch_progress(env: &str, len: usize, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }

    let bar = ProgressBar::new(len as u64);
    let style = ProgressStyle::default_bar()
        .template(TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█-");
    bar.set_style(style);
    bar.set_prefix(format!("[{env}] Progress:"));
    bar
}
