use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use vertexwise_repository::ProgressReporter;

/// Draws remote-mirror progress as an indicatif bar. Nested directory
/// listings restart the bar with their own length.
pub struct FetchProgress {
    bar: Mutex<Option<ProgressBar>>,
}

impl FetchProgress {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }
}

impl ProgressReporter for FetchProgress {
    fn begin(&self, total: usize) {
        let bar = ProgressBar::new(total as u64);
        bar.set_style(
            ProgressStyle::with_template("{bar:30} {pos}/{len} {msg}")
                .expect("valid progress template"),
        );
        *self.bar.lock().expect("progress mutex poisoned") = Some(bar);
    }

    fn advance(&self, index: usize, _total: usize, name: &str) {
        if let Some(bar) = self.bar.lock().expect("progress mutex poisoned").as_ref() {
            bar.set_position(index as u64);
            bar.set_message(format!("Downloading {name}"));
        }
    }
}
