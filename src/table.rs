//! Plain-text rendering of tables for terminal previews.

use std::fmt::Write as _;

use crate::frame::Table;

const MISSING_MARKER: &str = "·";

/// Renders the first `limit` rows of a typed table. Headers carry the column
/// type and missing cells show a marker so they stand apart from empty text.
pub fn render_frame(table: &Table, limit: usize) -> String {
    let mut headers = Vec::with_capacity(table.columns().len() + 1);
    headers.push(table.index_name().to_string());
    headers.extend(
        table
            .columns()
            .iter()
            .map(|column| format!("{} ({})", column.name, column.column_type())),
    );

    let rows = (0..table.row_count().min(limit))
        .map(|row| {
            let mut cells = vec![table.index()[row].clone()];
            cells.extend(table.columns().iter().map(|column| {
                column
                    .value(row)
                    .map(|value| value.to_string())
                    .unwrap_or_else(|| MISSING_MARKER.to_string())
            }));
            cells
        })
        .collect::<Vec<_>>();
    render_table(&headers, &rows)
}

pub fn render_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let mut widths = headers.iter().map(|h| display_width(h)).collect::<Vec<_>>();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(display_width(cell));
        }
    }

    let mut output = String::new();
    let _ = writeln!(output, "{}", format_row(headers, &widths));
    let rule = widths.iter().map(|w| "-".repeat((*w).max(1))).collect::<Vec<_>>();
    let _ = writeln!(output, "{}", format_row(&rule, &widths));
    for row in rows {
        let _ = writeln!(output, "{}", format_row(row, &widths));
    }
    output
}

pub fn print_table(headers: &[String], rows: &[Vec<String>]) {
    print!("{}", render_table(headers, rows));
}

fn format_row(values: &[String], widths: &[usize]) -> String {
    let line = values
        .iter()
        .zip(widths)
        .map(|(value, width)| {
            let cell = value.replace(['\n', '\r', '\t'], " ");
            let padding = width.saturating_sub(display_width(&cell));
            format!("{cell}{}", " ".repeat(padding))
        })
        .collect::<Vec<_>>()
        .join("  ");
    line.trim_end().to_string()
}

fn display_width(value: &str) -> usize {
    value.chars().count()
}
