//! Plain-text rendering of a ledger for the terminal.

use passbook_core::{HeaderStyle, TransactionRecord};

pub fn render_table(records: &[TransactionRecord], headers: HeaderStyle) -> String {
    let header: Vec<String> = headers.labels().iter().map(|s| s.to_string()).collect();
    let rows: Vec<[String; 5]> = records.iter().map(|r| r.cells()).collect();

    let mut widths = [0usize; 5];
    for (i, cell) in header.iter().enumerate() {
        widths[i] = display_width(cell);
    }
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(display_width(cell));
        }
    }

    let mut out = String::new();
    push_row(&mut out, &header, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_row(&mut out, &rule, &widths);
    for row in &rows {
        push_row(&mut out, row, &widths);
    }
    out
}

fn push_row(out: &mut String, cells: &[String], widths: &[usize; 5]) {
    let mut line = String::new();
    for (i, cell) in cells.iter().enumerate() {
        let pad = " ".repeat(widths[i].saturating_sub(display_width(cell)));
        if i > 0 {
            line.push_str("  ");
        }
        // amounts right-aligned
        if i >= 2 {
            line.push_str(&pad);
            line.push_str(cell);
        } else {
            line.push_str(cell);
            line.push_str(&pad);
        }
    }
    out.push_str(line.trim_end());
    out.push('\n');
}

/// Terminal columns, counting East Asian wide characters as two.
fn display_width(s: &str) -> usize {
    s.chars().map(|c| if is_wide(c) { 2 } else { 1 }).sum()
}

fn is_wide(c: char) -> bool {
    matches!(c as u32,
        0x1100..=0x115F
        | 0x2E80..=0x303E
        | 0x3041..=0x33FF
        | 0x3400..=0x4DBF
        | 0x4E00..=0x9FFF
        | 0xAC00..=0xD7A3
        | 0xF900..=0xFAFF
        | 0xFE30..=0xFE4F
        | 0xFF00..=0xFF60
        | 0xFFE0..=0xFFE6)
}
