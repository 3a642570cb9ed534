use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use super::styling::{bug, done, failed, failure, pending};

/// Spinner shown on stderr while signals are fetched
pub struct FetchProgress {
    pb: ProgressBar,
}

impl FetchProgress {
    pub fn start(target: &str) -> Self {
        let pb = create_spinner(
            pending(format!("Fetching bug and CI failure days for {target}")).to_string(),
        );
        Self { pb }
    }

    pub fn finish(self, bug_days: usize, failure_days: usize) {
        self.pb.finish_with_message(
            format!(
                "{} {} {}",
                done("Found"),
                bug(format!("{bug_days} bug days")),
                failure(format!("{failure_days} failure days ✓"))
            ),
        );
    }

    pub fn fail(self, error: &str) {
        self.pb
            .finish_with_message(failed(format!("Fetch failed: {error} ✗")).to_string());
    }
}

fn create_spinner(message: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_draw_target(ProgressDrawTarget::stderr());
    if let Ok(style) = ProgressStyle::default_spinner().template("  {msg} {spinner}") {
        pb.set_style(style);
    }
    pb.set_message(message);
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}
