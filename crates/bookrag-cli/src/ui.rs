//! UI utilities for the CLI

use bookrag_core::{Error, HealthReport, QueryResult, truncate_chars};
use colored::*;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, size},
};
use std::io::{self, IsTerminal, Write};

const PROMPT: &str = "bookrag>";

/// Display startup banner
pub fn display_banner(model: &str, collection: &str) {
    let terminal_width = size().map(|(w, _)| w as usize).unwrap_or(80);
    let banner_width = std::cmp::min(67, terminal_width.saturating_sub(4)).max(40);
    let inner = banner_width - 2;

    let top_border = format!("┌{}┐", "─".repeat(inner));
    let bottom_border = format!("└{}┘", "─".repeat(inner));
    let empty_line = format!("│{}│", " ".repeat(inner));

    println!();
    println!("{}", top_border.blue());
    println!("{}", empty_line.blue());

    let title = "bookrag - ask the book";
    println!(
        "{}{}{}{}",
        "│  ".blue(),
        title.blue().bold(),
        " ".repeat(inner.saturating_sub(title.chars().count() + 2)),
        "│".blue()
    );
    println!("{}", empty_line.blue());

    let model_line = format!("model: {}", model);
    let collection_line = format!("collection: {}", collection);
    let lines = [
        "Answers come from the indexed book, with citations.",
        "",
        model_line.as_str(),
        collection_line.as_str(),
    ];

    for line in lines {
        if line.is_empty() {
            println!("{}", empty_line.blue());
            continue;
        }
        println!("{}", banner_line(line, inner).blue());
    }

    println!("{}", empty_line.blue());
    println!("{}", bottom_border.blue());
    println!();
    println!(
        "{}",
        "Tip: ask a question about the book, or type 'help' for commands".dimmed()
    );
    println!();
}

/// One boxed banner row, cut to fit `inner` columns
pub(crate) fn banner_line(text: &str, inner: usize) -> String {
    let text = truncate_chars(text, inner.saturating_sub(4));
    let padding = inner.saturating_sub(text.chars().count() + 2);
    format!("│  {}{}│", text, " ".repeat(padding))
}

/// Read one line, with ↑/↓ history navigation when attached to a terminal.
///
/// Returns `None` at end of input.
pub fn handle_input_with_history(history: &mut Vec<String>) -> io::Result<Option<String>> {
    if !io::stdin().is_terminal() {
        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            return Ok(None);
        }
        let input = input.trim().to_string();
        if !input.is_empty() {
            history.push(input.clone());
        }
        return Ok(Some(input));
    }

    enable_raw_mode()?;
    let result = read_raw_line(history);
    disable_raw_mode()?;
    println!();

    let input = result?;
    if let Some(line) = &input {
        if !line.is_empty() {
            history.push(line.clone());
        }
    }
    Ok(input)
}

fn read_raw_line(history: &[String]) -> io::Result<Option<String>> {
    let mut input = String::new();
    let mut history_index: Option<usize> = None;

    redraw(&input, 0)?;

    loop {
        let Event::Key(key_event) = event::read()? else {
            continue;
        };
        if key_event.kind != KeyEventKind::Press {
            continue;
        }

        let previous_width = input.chars().count();
        match key_event.code {
            KeyCode::Enter => return Ok(Some(input.trim().to_string())),
            KeyCode::Esc => return Ok(Some(String::new())),
            KeyCode::Char('d')
                if key_event.modifiers.contains(event::KeyModifiers::CONTROL) && input.is_empty() =>
            {
                return Ok(None);
            }
            KeyCode::Char('c') if key_event.modifiers.contains(event::KeyModifiers::CONTROL) => {
                return Ok(None);
            }
            KeyCode::Char(c) => input.push(c),
            KeyCode::Backspace => {
                input.pop();
            }
            KeyCode::Up if !history.is_empty() => {
                let new_index = match history_index {
                    None => history.len() - 1,
                    Some(idx) => idx.saturating_sub(1),
                };
                history_index = Some(new_index);
                input = history[new_index].clone();
            }
            KeyCode::Down => match history_index {
                Some(idx) if idx + 1 < history.len() => {
                    history_index = Some(idx + 1);
                    input = history[idx + 1].clone();
                }
                Some(_) => {
                    history_index = None;
                    input.clear();
                }
                None => {}
            },
            _ => continue,
        }
        redraw(&input, previous_width)?;
    }
}

fn redraw(input: &str, previous_width: usize) -> io::Result<()> {
    let mut stdout = io::stdout();
    write!(stdout, "\r{} {}", PROMPT.green().bold(), " ".repeat(previous_width))?;
    write!(stdout, "\r{} {}", PROMPT.green().bold(), input)?;
    stdout.flush()
}

/// Display help message
pub fn print_help() {
    println!("{}", "Available commands:".bold());
    println!("  {} - Ask a question about the book", "<question>".green());
    println!("  {} - Check the vector database and the LLM endpoint", "health".green());
    println!("  {} - Show this help message", "help".green());
    println!("  {} - Exit the application", "exit/quit".green());
    println!();
    println!("{}", "Examples:".bold());
    println!("  What is a ROS 2 node?");
    println!("  How do launch files start several nodes?");
}

/// Format an answer followed by its sources
pub fn render_answer(result: &QueryResult) -> String {
    let mut out = String::new();

    out.push_str(&format!("{}\n\n", result.answer));

    if result.citations.is_empty() {
        out.push_str(&format!("{}\n", "No sources met the similarity threshold.".dimmed()));
    } else {
        out.push_str(&format!("{}\n", "Sources:".bold()));
        for (i, citation) in result.citations.iter().enumerate() {
            let title = citation.title.as_deref().unwrap_or(&citation.document_id);
            out.push_str(&format!(
                "  [{}] {} {}",
                i + 1,
                title.cyan(),
                format!("({:.2})", citation.relevance_score).dimmed()
            ));
            if let Some(url) = &citation.url {
                out.push_str(&format!(" {}", url.underline()));
            }
            out.push('\n');
        }
    }

    out.push('\n');
    let footer = format!(
        "confidence {:.0}% • {} ms • {}",
        result.confidence * 100.0,
        result.processing_time_ms,
        result.model
    );
    out.push_str(&footer.dimmed().to_string());

    out
}

/// Format a health report, one line per component
pub fn render_health(report: &HealthReport) -> String {
    let mut out = String::new();

    for (component, status) in &report.components {
        let marker = if status.ok { "✔".green() } else { "✘".red() };
        out.push_str(&format!("{} {}: {}\n", marker, component.bold(), status.detail));
    }

    let summary = if report.is_healthy() {
        "all components healthy".green()
    } else {
        "one or more components unhealthy".red()
    };
    out.push_str(&summary.to_string());

    out
}

/// Format an error with its failing stage
pub fn render_error(err: &Error) -> String {
    format!("{} {} failed: {}", "✘".red(), err.stage(), err.detail())
}
