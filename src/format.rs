use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::system::snapshot::Uptime;

const GIB: f64 = 1024.0 * 1024.0 * 1024.0;

pub fn truncate_unicode(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let mut result = String::new();
    let mut width = 0;
    for ch in s.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if width + ch_width > max_width.saturating_sub(1) {
            result.push('\u{2026}');
            break;
        }
        result.push(ch);
        width += ch_width;
    }
    result
}

/// Right-pads `s` with spaces to `width` display columns.
pub fn pad_right(s: &str, width: usize) -> String {
    let pad = width.saturating_sub(s.width());
    format!("{s}{}", " ".repeat(pad))
}

/// Gigabytes with precision that shrinks as the value grows:
/// `>= 10G` no decimals, `>= 1G` one, below that two.
pub fn format_gb(bytes: u64) -> String {
    let gb = bytes as f64 / GIB;
    if gb >= 10.0 {
        format!("{gb:.0}G")
    } else if gb >= 1.0 {
        format!("{gb:.1}G")
    } else {
        format!("{gb:.2}G")
    }
}

pub fn format_percent(pct: f64) -> String {
    format!("{pct:.0}%")
}

/// Percentage right-aligned to three characters, for column layouts.
pub fn format_percent_padded(pct: f64) -> String {
    format!("{pct:>3.0}%")
}

/// `"{d}d {h}h {m}m"` with leading zero units dropped; minutes always shown.
pub fn format_uptime(uptime: &Uptime) -> String {
    let total_minutes = uptime.0.as_secs() / 60;
    let days = total_minutes / (24 * 60);
    let hours = (total_minutes / 60) % 24;
    let minutes = total_minutes % 60;

    if days > 0 {
        format!("{days}d {hours}h {minutes}m")
    } else if hours > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}

pub fn format_load(one: f64, five: f64, fifteen: f64) -> String {
    format!("{one:.2} {five:.2} {fifteen:.2}")
}
