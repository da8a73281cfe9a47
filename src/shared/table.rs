//! Table and text layout helpers for terminal output.
//! Width calculations ignore ANSI color codes so colored cells line up.

const COLUMNS_DEFAULT: usize = 100;

/// Width of the attached terminal, then `$COLUMNS`, then a fixed default.
pub fn terminal_columns() -> usize {
    if let Some((terminal_size::Width(w), _)) = terminal_size::terminal_size() {
        return usize::from(w);
    }
    std::env::var("COLUMNS")
        .ok()
        .and_then(|c| c.parse().ok())
        .filter(|c: &usize| *c > 0)
        .unwrap_or(COLUMNS_DEFAULT)
}

/// Render rows as `a | b | c` with column widths taken from the widest cell.
/// The last column is never padded.
pub fn render_table(rows: &[Vec<String>]) -> String {
    let cols = rows.iter().map(Vec::len).max().unwrap_or(0);
    let mut widths = vec![0; cols];
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(display_len(cell));
        }
    }

    rows.iter()
        .map(|row| format_row(row, &widths))
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_row(row: &[String], widths: &[usize]) -> String {
    let last = row.len().saturating_sub(1);
    row.iter()
        .zip(widths.iter())
        .enumerate()
        .map(|(i, (cell, width))| {
            if i == last {
                cell.clone()
            } else {
                pad_field(cell, *width, display_len(cell))
            }
        })
        .collect::<Vec<_>>()
        .join(" | ")
}

/// Right-pad a field based on visible length (ignoring ANSI codes).
pub fn pad_field(display: &str, target: usize, plain_len: usize) -> String {
    let mut out = display.to_string();
    let padding = target.saturating_sub(plain_len);
    out.push_str(&" ".repeat(padding));
    out
}

/// Truncate text to a width, appending an ellipsis when needed.
pub fn truncate_with_ellipsis(text: &str, max_width: usize) -> String {
    if max_width == 0 {
        return String::new();
    }
    let len = text.chars().count();
    if len <= max_width {
        return text.to_string();
    }
    if max_width == 1 {
        return "…".to_string();
    }
    let mut out =
        text.chars().take(max_width.saturating_sub(1)).collect::<String>();
    out.push('…');
    out
}

/// Compute visible length of a string, ignoring ANSI escape sequences.
pub fn display_len(s: &str) -> usize {
    let mut len = 0;
    let mut chars = s.chars();
    while let Some(ch) = chars.next() {
        if ch == '\x1b' {
            for next in chars.by_ref() {
                if next == 'm' {
                    break;
                }
            }
            continue;
        }
        len += 1;
    }
    len
}
