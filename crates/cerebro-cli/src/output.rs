use std::io::Write;

use chrono::Local;
use owo_colors::OwoColorize;

use cerebro_core::{HistoryQuery, QueryHistoryEntry, SearchResult};

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

/// Print the answer followed by numbered web results.
pub fn print_search_result(
    w: &mut dyn Write,
    query: &str,
    result: &SearchResult,
    color: ColorMode,
) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(w, "{} {}", "Query:".dimmed(), query.bold())?;
    } else {
        writeln!(w, "Query: {}", query)?;
    }
    writeln!(w)?;

    if color.enabled() {
        writeln!(w, "{}", "AI Answer".cyan().bold())?;
    } else {
        writeln!(w, "AI Answer")?;
    }
    if result.ai_answer.trim().is_empty() {
        writeln!(w, "  (no answer)")?;
    } else {
        for line in result.ai_answer.lines() {
            writeln!(w, "  {}", line)?;
        }
    }

    if result.web_results.is_empty() {
        return Ok(());
    }
    writeln!(w)?;
    if color.enabled() {
        writeln!(w, "{}", "Web Results".cyan().bold())?;
    } else {
        writeln!(w, "Web Results")?;
    }
    for (i, web) in result.web_results.iter().enumerate() {
        if color.enabled() {
            writeln!(w, "{:>3}. {}", i + 1, web.title.bold())?;
            writeln!(w, "     {}", web.link.blue().underline())?;
            if !web.snippet.is_empty() {
                writeln!(w, "     {}", web.snippet.dimmed())?;
            }
        } else {
            writeln!(w, "{:>3}. {}", i + 1, web.title)?;
            writeln!(w, "     {}", web.link)?;
            if !web.snippet.is_empty() {
                writeln!(w, "     {}", web.snippet)?;
            }
        }
    }
    Ok(())
}

/// Print one page of past queries, newest first as the server sent them.
pub fn print_history(
    w: &mut dyn Write,
    query: HistoryQuery,
    entries: &[QueryHistoryEntry],
    color: ColorMode,
) -> std::io::Result<()> {
    let heading = format!("Last {} days, page {}", query.days, query.page);
    if color.enabled() {
        writeln!(w, "{}", heading.bold())?;
    } else {
        writeln!(w, "{}", heading)?;
    }

    if entries.is_empty() {
        writeln!(w, "  No queries found.")?;
        return Ok(());
    }

    for entry in entries {
        let when = entry
            .created_at
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M")
            .to_string();
        if color.enabled() {
            writeln!(w, "  {}  {}", when.dimmed(), entry.query_text)?;
        } else {
            writeln!(w, "  {}  {}", when, entry.query_text)?;
        }
        if let Some(answer) = entry.ai_answer.as_deref().filter(|a| !a.trim().is_empty()) {
            let first = answer.lines().next().unwrap_or_default();
            let short = truncate(first, 100);
            if color.enabled() {
                writeln!(w, "      {}", short.dimmed())?;
            } else {
                writeln!(w, "      {}", short)?;
            }
        }
    }
    Ok(())
}

/// A `key: value` line for `status`.
pub fn print_field(
    w: &mut dyn Write,
    key: &str,
    value: &str,
    color: ColorMode,
) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(w, "{:<10} {}", format!("{key}:").dimmed(), value)
    } else {
        writeln!(w, "{:<10} {}", format!("{key}:"), value)
    }
}

pub fn print_success(w: &mut dyn Write, message: &str, color: ColorMode) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(w, "{}", message.green())
    } else {
        writeln!(w, "{}", message)
    }
}

pub fn print_error(w: &mut dyn Write, message: &str, color: ColorMode) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(w, "{} {}", "error:".red().bold(), message)
    } else {
        writeln!(w, "error: {}", message)
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let mut short: String = s.chars().take(max_chars.saturating_sub(3)).collect();
    short.push_str("...");
    short
}

#[cfg(test)]
mod tests {
    use super::*;
    use cerebro_core::WebResult;
    use chrono::Utc;

    const PLAIN: ColorMode = ColorMode(false);

    fn render(f: impl FnOnce(&mut dyn Write) -> std::io::Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn search_result_lists_numbered_links() {
        let result = SearchResult {
            web_results: vec![
                WebResult {
                    title: "The Rust Book".into(),
                    link: "https://doc.rust-lang.org/book/".into(),
                    snippet: "Ownership is Rust's most unique feature".into(),
                },
                WebResult {
                    title: "Rustonomicon".into(),
                    link: "https://doc.rust-lang.org/nomicon/".into(),
                    snippet: String::new(),
                },
            ],
            ai_answer: "Ownership governs memory.\nEach value has one owner.".into(),
        };
        let out = render(|w| print_search_result(w, "rust ownership", &result, PLAIN));
        assert!(out.starts_with("Query: rust ownership\n"));
        assert!(out.contains("  Ownership governs memory.\n  Each value has one owner.\n"));
        assert!(out.contains("  1. The Rust Book\n     https://doc.rust-lang.org/book/\n"));
        assert!(out.contains("  2. Rustonomicon\n"));
        assert!(!out.contains('\u{1b}'), "plain mode must not emit escapes");
    }

    #[test]
    fn replayed_answer_has_no_results_section() {
        let result = SearchResult {
            web_results: vec![],
            ai_answer: String::new(),
        };
        let out = render(|w| print_search_result(w, "q", &result, PLAIN));
        assert!(out.contains("(no answer)"));
        assert!(!out.contains("Web Results"));
    }

    #[test]
    fn empty_history_page() {
        let out = render(|w| print_history(w, HistoryQuery::default(), &[], PLAIN));
        assert_eq!(out, "Last 7 days, page 1\n  No queries found.\n");
    }

    #[test]
    fn history_shows_answer_preview() {
        let entries = vec![
            QueryHistoryEntry {
                id: "1".into(),
                query_text: "capital of France".into(),
                created_at: Utc::now(),
                ai_answer: Some("Paris.\nMore detail".into()),
            },
            QueryHistoryEntry {
                id: "2".into(),
                query_text: "unanswered".into(),
                created_at: Utc::now(),
                ai_answer: None,
            },
        ];
        let out = render(|w| print_history(w, HistoryQuery::default(), &entries, PLAIN));
        assert!(out.contains("capital of France\n      Paris.\n"));
        assert!(!out.contains("More detail"));
        assert!(out.trim_end().ends_with("unanswered"));
    }

    #[test]
    fn colored_error_is_marked() {
        let out = render(|w| print_error(w, "Search failed. Please try again.", ColorMode(true)));
        assert!(out.contains('\u{1b}'));
        assert!(out.contains("Search failed. Please try again."));
    }

    #[test]
    fn truncate_long_answers() {
        assert_eq!(truncate("abcdef", 5), "ab...");
        assert_eq!(truncate("abc", 5), "abc");
    }
}
