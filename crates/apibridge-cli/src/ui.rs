//! apibridge CLI UI primitives.

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

pub mod colors {
    use console::Color;

    pub const CYAN: Color = Color::Color256(51);
    pub const MAGENTA: Color = Color::Color256(201);
    pub const AMBER: Color = Color::Color256(214);
    pub const NEON_GREEN: Color = Color::Color256(82);
    pub const DIM: Color = Color::Color256(240);
}

pub mod symbols {
    pub const DIAMOND: &str = "\u{25C6}"; // ◆
    pub const DIAMOND_OUTLINE: &str = "\u{25C7}"; // ◇
    pub const TARGET_FILLED: &str = "\u{25C9}"; // ◉
    pub const TRIANGLE: &str = "\u{25B8}"; // ▸
    pub const DOT: &str = "\u{00B7}"; // ·
    pub const ARROW: &str = "\u{2500}\u{25B8}"; // ─▸
}

/// Print compact version header
pub fn print_compact_header(version: &str) {
    println!(
        "  {} {} {}",
        style(symbols::DIAMOND).fg(colors::CYAN),
        style("apibridge").fg(colors::CYAN).bold(),
        style(version).dim()
    );
    println!();
}

/// Print a success message
pub fn success(msg: &str) {
    println!(
        "  {} {}",
        style(symbols::TARGET_FILLED).fg(colors::NEON_GREEN),
        msg
    );
}

/// Print an error message
pub fn error(msg: &str) {
    println!(
        "  {} {}",
        style(symbols::DIAMOND).fg(colors::MAGENTA),
        style(msg).fg(colors::MAGENTA)
    );
}

/// Print a warning message
pub fn warning(msg: &str) {
    println!(
        "  {} {}",
        style(symbols::DIAMOND_OUTLINE).fg(colors::AMBER),
        style(msg).fg(colors::AMBER)
    );
}

/// Print a dim/secondary message
pub fn dim(msg: &str) {
    println!("  {}", style(msg).fg(colors::DIM));
}

/// Create a spinner
pub fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let spinner_style = ProgressStyle::default_spinner()
        .tick_chars("\u{25CE}\u{25C9}\u{25CE}\u{25C9}") // ◎◉◎◉
        .template("  {spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    pb.set_style(spinner_style);
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(150));
    pb
}

/// Print a generated file
pub fn file_line(path: &str) {
    println!(
        "    {} {}",
        style(symbols::ARROW).fg(colors::DIM),
        style(path).fg(colors::CYAN)
    );
}

/// Print one planned entry point: `GET  orderservice/get-order  GetOrder(int orderId)`
pub fn route_line(verb: &str, route: &str, signature: &str) {
    println!(
        "    {} {:<5} {:<40} {}",
        style(symbols::TRIANGLE).fg(colors::CYAN),
        style(verb).bold(),
        route,
        style(signature).dim()
    );
}

/// Print service summary line
pub fn service_line(name: &str, actions: usize, correlated: usize, skipped: usize) {
    println!(
        "  {}   {:24} {} actions {} {} client methods {} {} skipped",
        style(symbols::TRIANGLE).fg(colors::CYAN),
        style(name).bold(),
        actions,
        symbols::DOT,
        correlated,
        symbols::DOT,
        skipped
    );
}

/// Print timing information
pub fn timing(label: &str, duration_ms: u128) {
    println!(
        "  {} {} in {}ms",
        style(symbols::DIAMOND_OUTLINE).fg(colors::CYAN),
        label,
        duration_ms
    );
}

/// Print the error header for check failures
pub fn problems_header() {
    println!();
    println!(
        "  {} {}",
        style(symbols::DIAMOND).fg(colors::MAGENTA).bold(),
        style("Needs attention.").fg(colors::MAGENTA).bold()
    );
    println!();
}

/// Print the success line for check
pub fn all_correlated() {
    println!(
        "  {} {}",
        style(symbols::TARGET_FILLED).fg(colors::NEON_GREEN),
        style("Every procedure has a route.").bold()
    );
}

/// `GET` or `POST`.
pub fn verb_label(read: bool) -> &'static str {
    if read {
        "GET"
    } else {
        "POST"
    }
}
