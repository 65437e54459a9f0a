//! Text rendering of comparison outcomes.

use chrono_tz::Tz;

use crate::{comparison::ComparisonResult, controller::Outcome};

pub const DEFAULT_THOUSANDS_SEPARATOR: char = '.';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresentationOptions {
    pub thousands_separator: char,
}

impl Default for PresentationOptions {
    fn default() -> Self {
        Self {
            thousands_separator: DEFAULT_THOUSANDS_SEPARATOR,
        }
    }
}

/// Rounds `value` to an integer and groups its digits in thousands.
///
/// NaN and infinities render as `"0"`.
pub fn format_volume(value: f64, separator: char) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded < 0.0 {
        grouped.push('-');
    }
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(digit);
    }
    grouped
}

/// Signed percentage with two decimals, e.g. `+20.00%`.
pub fn format_percent(value: f64) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    format!("{value:+.2}%")
}

/// Renders `outcome` for the terminal, without a trailing newline.
pub fn render(outcome: &Outcome, options: &PresentationOptions) -> String {
    match outcome {
        Outcome::Failure { message } => format!("Error: {}", single_line(message)),
        Outcome::Comparison(result) => render_report(result, options),
    }
}

/// Joins the lines of a multi-line message (e.g. a TOML parse error) with spaces.
fn single_line(message: &str) -> String {
    message
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn render_report(result: &ComparisonResult, options: &PresentationOptions) -> String {
    let volume = |value| format_volume(value, options.thousands_separator);
    [
        format!("Volume Comparison - {}", result.symbol),
        format!("Current time: {}", result.current_time),
        format!("Volume type: {}", result.volume.label()),
        format!("Average based on the last {} sessions", result.days),
        format!("Last session considered: {}", result.last_session),
        String::new(),
        format!("Today's volume: {}", volume(result.vol_today)),
        format!(
            "Last session volume up to this time: {}",
            volume(result.vol_last_session)
        ),
        format!("Average volume up to this time: {}", volume(result.vol_average)),
        String::new(),
        format!(
            "Today vs last session: {}",
            format_percent(result.perc_vs_last_session)
        ),
        format!("Today vs average: {}", format_percent(result.perc_vs_average)),
    ]
    .join("\n")
}

pub fn render_timezone(tz: Tz) -> String {
    format!("Configured timezone: {tz}")
}
