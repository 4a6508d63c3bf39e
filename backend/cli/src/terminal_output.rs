//! Terminal output: ANSI styling and plant record rendering.

use florascope_core::PlantRecord;

pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";

/// Well-known fields in display order, with their labels.
const FIELD_LABELS: &[(&str, &str)] = &[
    ("name", "Name"),
    ("scientificname", "Scientific name"),
    ("family", "Family"),
    ("origin", "Origin"),
    ("uses", "Uses"),
    ("description", "Description"),
];

/// Check if the terminal supports color output.
pub fn supports_color() -> bool {
    std::env::var("NO_COLOR").is_err()
        && (std::env::var("COLORTERM").is_ok()
            || std::env::var("TERM")
                .map(|t| t != "dumb")
                .unwrap_or(false))
}

pub fn note_warn(msg: &str) {
    if supports_color() {
        eprintln!("{YELLOW}{BOLD}⚠{RESET} {msg}");
    } else {
        eprintln!("WARN: {msg}");
    }
}

pub fn note_success(msg: &str) {
    if supports_color() {
        println!("{GREEN}{BOLD}✓{RESET} {msg}");
    } else {
        println!("OK: {msg}");
    }
}

/// Render a record as aligned `Label: value` lines. Known fields come first
/// in a fixed order; any other keys follow alphabetically.
pub fn render_record(record: &PlantRecord, color: bool) -> String {
    let mut rows: Vec<(String, &str)> = FIELD_LABELS
        .iter()
        .filter_map(|(key, label)| record.get(key).map(|v| (label.to_string(), v)))
        .collect();
    rows.extend(
        record
            .iter()
            .filter(|(k, _)| !FIELD_LABELS.iter().any(|(known, _)| known == k))
            .map(|(k, v)| (k.to_string(), v)),
    );

    let width = rows.iter().map(|(label, _)| label.chars().count()).max().unwrap_or(0);
    let mut out = String::new();
    for (label, value) in rows {
        let pad = " ".repeat(width - label.chars().count());
        if color {
            out.push_str(&format!("{BOLD}{label}{RESET}:{pad} {value}\n"));
        } else {
            out.push_str(&format!("{label}:{pad} {value}\n"));
        }
    }
    out
}
