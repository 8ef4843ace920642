//! Terminal formatting shared by the Vitalis tools

use std::io::IsTerminal;

// ANSI color codes
pub const RED: &str = "\x1b[0;31m";
pub const GREEN: &str = "\x1b[0;32m";
pub const YELLOW: &str = "\x1b[0;33m";
pub const BLUE: &str = "\x1b[0;34m";
pub const MAGENTA: &str = "\x1b[0;35m";
pub const CYAN: &str = "\x1b[0;36m";
pub const BOLD: &str = "\x1b[1m";
pub const REVERSE: &str = "\x1b[7m";
pub const NC: &str = "\x1b[0m";

/// Check if stdout is a TTY and colors should be used
pub fn use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Conditionally apply color
pub fn color(code: &str, text: &str) -> String {
    if use_colors() {
        format!("{}{}{}", code, text, NC)
    } else {
        text.to_string()
    }
}

/// Format seconds as a `MM:SS` countdown clock
pub fn format_clock(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Format a duration as "N min M sec", dropping zero parts
pub fn format_duration(seconds: u32) -> String {
    let minutes = seconds / 60;
    let secs = seconds % 60;

    let mut parts = Vec::new();
    if minutes > 0 {
        parts.push(format!("{} min", minutes));
    }
    if secs > 0 {
        parts.push(format!("{} sec", secs));
    }

    if parts.is_empty() {
        "0 sec".to_string()
    } else {
        parts.join(" ")
    }
}

/// Render a `width`-wide progress bar for `percent` (0-100)
pub fn progress_bar(percent: u32, width: usize) -> String {
    let filled = (width * percent.min(100) as usize) / 100;
    format!(
        "{}{}",
        "\u{2588}".repeat(filled),
        "\u{2591}".repeat(width - filled)
    )
}
