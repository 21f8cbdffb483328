//! Terminal output formatting.

use colored::{ColoredString, Colorize};
use unicode_width::UnicodeWidthStr;

use vaani_core::{Category, Response};
use vaani_graph::NameMatch;

/// Print an answer, followed by its confidence and optionally its data.
pub fn print_response(response: &Response, json: bool) {
    println!("{}", response.answer_text);
    println!();
    println!("{} {}", "confidence".dimmed(), confidence(response.confidence));

    if json && !response.structured_data.is_null() {
        let pretty = serde_json::to_string_pretty(&response.structured_data)
            .unwrap_or_else(|_| response.structured_data.to_string());
        println!();
        println!("{}", pretty.dimmed());
    }
}

fn confidence(value: f32) -> ColoredString {
    let text = format!("{:.2}", value);
    if value >= 0.75 {
        text.green()
    } else if value >= 0.5 {
        text.yellow()
    } else {
        text.red()
    }
}

/// Print node counts per category with a total line.
pub fn print_label_counts(counts: &[(Category, i64)]) {
    let width = counts
        .iter()
        .map(|(c, _)| label_cell(*c).width())
        .max()
        .unwrap_or(0);

    for (category, count) in counts {
        let count_text = if *count == 0 { count.to_string().dimmed() } else { count.to_string().bold() };
        println!("  {}  {:>6}", pad_right(&label_cell(*category), width), count_text);
    }

    let total: i64 = counts.iter().map(|(_, n)| n).sum();
    println!("{}", "─".repeat(40));
    println!("  {}  {:>6}", pad_right("Total", width), total.to_string().cyan().bold());
}

fn label_cell(category: Category) -> String {
    format!("{} {}", category.emoji(), category.plural())
}

/// Print name search hits.
pub fn print_name_matches(matches: &[NameMatch]) {
    if matches.is_empty() {
        println!("{}", "No matching names.".dimmed());
        return;
    }

    for (i, m) in matches.iter().enumerate() {
        let label = m
            .category
            .map(|c| c.label().cyan())
            .unwrap_or_else(|| "?".dimmed());
        println!(
            "{:>3}. {} [{}] {}",
            i + 1,
            m.name.bold(),
            label,
            format!("{:.2}", m.score).dimmed()
        );
    }
}

/// Pad a plain string to a given visual width (right-padded).
fn pad_right(s: &str, width: usize) -> String {
    let visual = UnicodeWidthStr::width(s);
    if visual >= width {
        s.to_string()
    } else {
        format!("{}{}", s, " ".repeat(width - visual))
    }
}
