/// Utility helpers for the client core
use std::time::Duration;

/// Extension of a file name or path: the text after the last dot, or an
/// empty string when there is none.
pub fn file_extension(path: &str) -> &str {
    match path.rfind('.') {
        Some(pos) => &path[pos + 1..],
        None => "",
    }
}

/// Format a length in seconds as `MM:SS`.
pub fn format_duration(seconds: u32) -> String {
    let mins = seconds / 60;
    let secs = seconds % 60;
    format!("{:02}:{:02}", mins, secs)
}

/// Timer that works both natively and in the browser.
#[cfg(not(target_arch = "wasm32"))]
pub async fn sleep(duration: Duration) {
    tokio::time::sleep(duration).await;
}

#[cfg(target_arch = "wasm32")]
pub async fn sleep(duration: Duration) {
    gloo_timers::future::sleep(duration).await;
}
