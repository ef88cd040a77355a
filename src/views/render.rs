//! Text rendering primitives: coloured spans, gauge, bar chart, alerts.

use colored::Colorize;
use std::fmt::Write;

/// Presentation settings shared by every view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderStyle {
    /// Emit ANSI truecolor escapes
    pub color: bool,
    /// Cells in the occupancy gauge
    pub gauge_width: usize,
    /// Cells in a full (100%) comparison bar
    pub bar_width: usize,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            color: true,
            gauge_width: 40,
            bar_width: 40,
        }
    }
}

impl RenderStyle {
    /// Style without escapes, used by tests and non-tty output
    pub fn plain() -> Self {
        Self {
            color: false,
            ..Self::default()
        }
    }
}

/// Parse `#rgb` or `#rrggbb`
pub fn parse_hex_colour(colour: &str) -> Option<(u8, u8, u8)> {
    let hex = colour.trim().strip_prefix('#')?;
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();

    match hex.len() {
        6 => Some((channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?)),
        3 => {
            let short = |i: usize| channel(&hex[i..i + 1]).map(|v| v * 17);
            Some((short(0)?, short(1)?, short(2)?))
        }
        _ => None,
    }
}

/// Wrap `text` in the given colour. Unknown colours are left unpainted.
pub fn paint(text: &str, colour: &str, style: &RenderStyle) -> String {
    match parse_hex_colour(colour) {
        Some((r, g, b)) if style.color => text.truecolor(r, g, b).to_string(),
        _ => text.to_string(),
    }
}

/// Number of filled cells for `value` out of 100
fn filled_cells(value: i64, width: usize) -> usize {
    let value = value.clamp(0, 100) as usize;
    (value * width + 50) / 100
}

/// Horizontal gauge with the value printed after it, e.g. `[████░░░░] 50%`
pub fn gauge(value: i64, colour: &str, style: &RenderStyle) -> String {
    let filled = filled_cells(value, style.gauge_width);
    let arc = "█".repeat(filled);
    let rest = "░".repeat(style.gauge_width - filled);

    format!("[{}{}] {}%", paint(&arc, colour, style), rest, value)
}

/// One bar of the comparison chart
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bar {
    pub label: String,
    pub value: i64,
    pub colour: String,
}

/// Horizontal bar chart with a 0-100% axis and a series label
pub fn bar_chart(series_label: &str, bars: &[Bar], style: &RenderStyle) -> String {
    let label_width = bars.iter().map(|b| b.label.chars().count()).max().unwrap_or(0);
    let mut out = String::new();

    let _ = writeln!(out, "{}", series_label);

    for bar in bars {
        let filled = filled_cells(bar.value, style.bar_width);
        let _ = writeln!(
            out,
            "{:<width$} │{}{} {}%",
            bar.label,
            paint(&"█".repeat(filled), &bar.colour, style),
            " ".repeat(style.bar_width - filled),
            bar.value,
            width = label_width,
        );
    }

    // Axis: 0% .. 100% in quarters
    let mut axis = vec![' '; style.bar_width + 5];
    for tick in 0..=4 {
        let label = format!("{}%", tick * 25);
        let start = (tick * style.bar_width / 4).min(axis.len() - label.len());
        for (i, c) in label.chars().enumerate() {
            axis[start + i] = c;
        }
    }
    let _ = writeln!(
        out,
        "{:<width$} └{}",
        "",
        "─".repeat(style.bar_width),
        width = label_width
    );
    let _ = write!(
        out,
        "{:<width$}  {}",
        "",
        axis.iter().collect::<String>().trim_end(),
        width = label_width
    );

    out
}

/// Error banner scoped to one view
pub fn alert(message: &str, style: &RenderStyle) -> String {
    paint(&format!("✖ {}", message), "#d32f2f", style)
}

/// Indeterminate progress line
pub fn progress_line(style: &RenderStyle) -> String {
    format!("{} Loading…", "▬".repeat(style.gauge_width.min(12)))
}

/// Spinner placeholder
pub fn spinner() -> String {
    "◌ Loading…".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_colour() {
        assert_eq!(parse_hex_colour("#ff8000"), Some((255, 128, 0)));
        assert_eq!(parse_hex_colour("#F80"), Some((255, 136, 0)));
        assert_eq!(parse_hex_colour("green"), None);
        assert_eq!(parse_hex_colour("#12345"), None);
    }

    #[test]
    fn test_paint() {
        colored::control::set_override(true);
        let style = RenderStyle::default();
        assert_eq!(
            paint("x", "#010203", &style),
            "\x1b[38;2;1;2;3mx\x1b[0m"
        );
        assert_eq!(paint("x", "green", &style), "x");
        assert_eq!(paint("x", "#010203", &RenderStyle::plain()), "x");
    }

    #[test]
    fn test_gauge() {
        let style = RenderStyle {
            color: false,
            gauge_width: 10,
            bar_width: 10,
        };
        assert_eq!(gauge(50, "#00ff00", &style), "[█████░░░░░] 50%");
        assert_eq!(gauge(0, "#00ff00", &style), "[░░░░░░░░░░] 0%");
        assert_eq!(gauge(100, "#00ff00", &style), "[██████████] 100%");
    }

    #[test]
    fn test_bar_chart_rows() {
        let style = RenderStyle {
            color: false,
            gauge_width: 10,
            bar_width: 20,
        };
        let bars = vec![
            Bar {
                label: "Milton".to_string(),
                value: 50,
                colour: "#00ff00".to_string(),
            },
            Bar {
                label: "West End".to_string(),
                value: 25,
                colour: "#ff0000".to_string(),
            },
        ];

        let chart = bar_chart("Occupancy Capacity", &bars, &style);
        let lines: Vec<&str> = chart.lines().collect();

        assert_eq!(lines[0], "Occupancy Capacity");
        assert_eq!(lines[1], format!("Milton   │{}{} 50%", "█".repeat(10), " ".repeat(10)));
        assert_eq!(lines[2], format!("West End │{}{} 25%", "█".repeat(5), " ".repeat(15)));
        assert!(lines[4].contains("0%"));
        assert!(lines[4].trim_end().ends_with("100%"));
    }
}
