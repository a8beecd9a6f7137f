//! Terminal spinner via `indicatif`

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Spinner shown while the model is working
pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg} [{elapsed}]") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}
