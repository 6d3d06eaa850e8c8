//! Progress bar utilities.

use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Shared progress display for concurrent downloads.
///
/// When hidden every bar it hands out is hidden too, so callers never need to
/// branch on whether progress is shown.
#[derive(Debug, Clone)]
pub struct Progress {
    multi: MultiProgress,
    visible: bool,
}

impl Progress {
    pub fn new(visible: bool) -> Self {
        let multi = if visible {
            MultiProgress::new()
        } else {
            MultiProgress::with_draw_target(ProgressDrawTarget::hidden())
        };
        Self { multi, visible }
    }

    pub fn hidden() -> Self {
        Self::new(false)
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Bar for one file; a spinner when the size is unknown.
    pub fn download_bar(&self, total: Option<u64>, label: &str) -> ProgressBar {
        if !self.visible {
            return ProgressBar::hidden();
        }
        let bar = match total {
            Some(total) if total > 0 => create_download_bar(total),
            _ => create_byte_spinner(),
        };
        bar.set_message(label.to_string());
        self.multi.add(bar)
    }

    /// Bar counting items, e.g. pages or downloads.
    pub fn item_bar(&self, total: u64, message: &str) -> ProgressBar {
        if !self.visible {
            return ProgressBar::hidden();
        }
        self.multi.add(create_item_bar(total, message))
    }
}

/// Create a progress bar for downloads.
pub fn create_download_bar(total: u64) -> ProgressBar {
    let bar = ProgressBar::new(total);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} {msg} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    bar
}

/// Create a spinner for a download of unknown size.
pub fn create_byte_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg} {bytes} ({bytes_per_sec})")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));
    spinner
}

/// Create a progress bar for item counts.
pub fn create_item_bar(total: u64, message: &str) -> ProgressBar {
    let bar = ProgressBar::new(total);
    bar.set_style(
        ProgressStyle::default_bar()
            .template(&format!(
                "{{spinner:.green}} {} [{{bar:40.cyan/blue}}] {{pos}}/{{len}}",
                message
            ))
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    bar
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_progress_hands_out_hidden_bars() {
        let progress = Progress::hidden();
        assert!(!progress.is_visible());
        assert!(progress.download_bar(Some(10), "a.mp4").is_hidden());
        assert!(progress.item_bar(3, "Pages").is_hidden());
    }

    #[test]
    fn test_download_bar_length() {
        let bar = create_download_bar(2048);
        assert_eq!(bar.length(), Some(2048));
    }
}
