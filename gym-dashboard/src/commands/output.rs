use colored::Colorize;

use crate::api::Notifier;

/// Prints mutation outcomes to the terminal
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn success(&self, message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    fn error(&self, message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }
}

pub fn heading(title: &str) {
    println!("{}", title.bold());
    println!("────────────────────────────────");
}

/// Left-aligned columns sized to their widest cell
pub fn print_table(headers: &[&str], rows: &[Vec<String>]) {
    if rows.is_empty() {
        println!("{}", "No results".dimmed());
        return;
    }

    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(index, header)| {
            rows.iter()
                .filter_map(|row| row.get(index))
                .map(|cell| cell.chars().count())
                .chain(std::iter::once(header.chars().count()))
                .max()
                .unwrap_or_default()
        })
        .collect();

    let header_line = headers
        .iter()
        .zip(&widths)
        .map(|(header, width)| format!("{:<width$}", header, width = width))
        .collect::<Vec<_>>()
        .join("  ");
    println!("{}", header_line.bold());

    for row in rows {
        let line = row
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = width))
            .collect::<Vec<_>>()
            .join("  ");
        println!("{}", line);
    }
}

pub fn or_dash(value: Option<impl ToString>) -> String {
    value.map(|value| value.to_string()).unwrap_or_else(|| "-".to_string())
}

pub fn rating(value: Option<f64>) -> String {
    value
        .map(|value| format!("{:.1}", value))
        .unwrap_or_else(|| "-".to_string())
}
