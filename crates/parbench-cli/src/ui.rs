//! UI helpers for terminal display.

use console::style;

/// Check if color output is disabled via `NO_COLOR` env var.
#[must_use]
pub fn is_color_disabled() -> bool {
    std::env::var("NO_COLOR").is_ok()
}

/// Print a styled header.
pub fn print_header(text: &str) {
    if is_color_disabled() {
        println!("=== {text} ===");
    } else {
        println!("{}", style(format!("=== {text} ===")).bold().cyan());
    }
}

/// Print a success message.
pub fn print_success(text: &str) {
    if is_color_disabled() {
        println!("[OK] {text}");
    } else {
        println!("{} {text}", style("[OK]").green().bold());
    }
}

/// Print an error message.
pub fn print_error(text: &str) {
    if is_color_disabled() {
        eprintln!("[ERROR] {text}");
    } else {
        eprintln!("{} {text}", style("[ERROR]").red().bold());
    }
}

/// Colour a table cell by how well its point scaled.
#[must_use]
pub fn style_efficiency(text: String, efficiency: f64, speedup: f64) -> String {
    if is_color_disabled() {
        return text;
    }
    let styled = if efficiency >= 0.5 {
        style(text).green()
    } else if speedup >= 1.0 {
        style(text).yellow()
    } else {
        style(text).red()
    };
    styled.to_string()
}
