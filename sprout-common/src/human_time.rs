//! Human-readable time formatting
//!
//! Provides consistent elapsed-time display for the recording timer.

/// Format whole seconds as `M:SS`.
///
/// Minutes are not capped; a recording that runs past an hour shows
/// `61:05` rather than rolling into an hour field.
///
/// # Examples
///
/// ```
/// use sprout_common::human_time::format_elapsed;
///
/// assert_eq!(format_elapsed(0), "0:00");
/// assert_eq!(format_elapsed(7), "0:07");
/// assert_eq!(format_elapsed(75), "1:15");
/// assert_eq!(format_elapsed(3665), "61:05");
/// ```
pub fn format_elapsed(seconds: u64) -> String {
    let minutes = seconds / 60;
    let secs = seconds % 60;
    format!("{}:{:02}", minutes, secs)
}

/// Format a byte count for log and CLI output (`512 B`, `1.5 KiB`, `3.2 MiB`)
pub fn format_bytes(bytes: u64) -> String {
    const KIB: f64 = 1024.0;
    const MIB: f64 = KIB * 1024.0;

    let value = bytes as f64;
    if value < KIB {
        format!("{} B", bytes)
    } else if value < MIB {
        format!("{:.1} KiB", value / KIB)
    } else {
        format!("{:.1} MiB", value / MIB)
    }
}
