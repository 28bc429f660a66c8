/// Live countdown, zero-padded `MM:SS`.
#[must_use]
pub fn format_countdown(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Elapsed time for the result view, `m:ss`.
#[must_use]
pub fn format_elapsed(secs: u32) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}
