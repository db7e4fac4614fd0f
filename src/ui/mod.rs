//! Terminal output formatting for search results and fetch progress.

use comfy_table::{presets::UTF8_FULL_CONDENSED, Cell, ContentArrangement, Table};
use is_terminal::IsTerminal;
use owo_colors::OwoColorize;

use crate::models::Paper;
use crate::utils::truncate_with_ellipsis;

/// Check if stdout is a terminal.
pub fn is_terminal() -> bool {
    std::io::stdout().is_terminal()
}

/// Get the current terminal width.
pub fn terminal_width() -> usize {
    terminal_size::terminal_size()
        .map(|(w, _)| w.0 as usize)
        .unwrap_or(100)
}

/// Print a success line.
pub fn success(message: &str) {
    if is_terminal() {
        println!("{} {}", "✓".green().bold(), message);
    } else {
        println!("{}", message);
    }
}

/// Print a warning line.
pub fn warning(message: &str) {
    if is_terminal() {
        eprintln!("{} {}", "⚠".yellow().bold(), message);
    } else {
        eprintln!("{}", message);
    }
}

/// Print an error line.
pub fn error(message: &str) {
    if is_terminal() {
        eprintln!("{} {}", "✗".red().bold(), message);
    } else {
        eprintln!("{}", message);
    }
}

/// Render search results as a table, newest papers first.
///
/// The download column shows whether a PDF lookup can be attempted for
/// the row, which requires a DOI.
pub fn render_paper_table(papers: &[Paper]) -> String {
    let mut sorted: Vec<&Paper> = papers.iter().collect();
    sorted.sort_by(|a, b| b.year.cmp(&a.year));

    let title_width = (terminal_width() / 2).max(30);

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Title", "Year", "Venue", "Authors", "DOI", "PDF"]);

    for paper in sorted {
        let authors = truncate_with_ellipsis(&paper.authors.join(", "), 40);
        let pdf = if paper.has_doi() { "yes" } else { "-" };

        table.add_row(vec![
            Cell::new(truncate_with_ellipsis(&paper.title, title_width)),
            Cell::new(&paper.year),
            Cell::new(truncate_with_ellipsis(&paper.venue, 20)),
            Cell::new(authors),
            Cell::new(&paper.doi),
            Cell::new(pdf),
        ]);
    }

    table.to_string()
}

/// Render search results as plain text, one paper per line.
pub fn render_paper_lines(papers: &[Paper]) -> String {
    papers
        .iter()
        .map(|p| {
            format!(
                "{} ({}) [{}] {} {}",
                p.title,
                p.year,
                p.venue,
                p.authors.join(", "),
                p.doi
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
