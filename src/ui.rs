//! Console output helpers shared by the commands.

use console::style;

use crate::core::env::DiagnosticResult;

const RULE_WIDTH: usize = 60;

/// Print `title` between two horizontal rules.
pub fn print_banner(title: &str) {
    let rule = "=".repeat(RULE_WIDTH);
    println!("{rule}");
    println!("{}", style(title).bold());
    println!("{rule}");
}

/// Print a step marker preceded by a blank line.
pub fn print_step(text: &str) {
    println!("\n{} {}", style(">").cyan().bold(), text);
}

/// Print the command about to be spawned.
pub fn print_command(cmd: &str) {
    println!("\n{} {}", style("$").dim(), cmd);
}

/// `OK` or `MISSING`.
pub fn status(ok: bool) -> &'static str {
    if ok {
        "OK"
    } else {
        "MISSING"
    }
}

/// Print one doctor line, plus its hint if any.
pub fn print_diagnostic(result: &DiagnosticResult) {
    let detail = if result.passed {
        style(result.detail.as_str()).green()
    } else {
        style(result.detail.as_str()).yellow()
    };
    println!("{}: {}", result.check_name, detail);
    if let Some(hint) = &result.hint {
        println!("  {}", style(hint).dim());
    }
}

/// Shorten `text` to `max_chars`, marking the cut.
pub fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}\n...[truncated]...", &text[..idx]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_keeps_short_text() {
        assert_eq!(preview("hello", 800), "hello");
        let exact = "a".repeat(800);
        assert_eq!(preview(&exact, 800), exact);
    }

    #[test]
    fn preview_cuts_on_char_boundary() {
        let text = "é".repeat(801);
        let out = preview(&text, 800);
        assert!(out.ends_with("\n...[truncated]..."));
        assert_eq!(out.chars().filter(|c| *c == 'é').count(), 800);
    }

    #[test]
    fn status_labels() {
        assert_eq!(status(true), "OK");
        assert_eq!(status(false), "MISSING");
    }
}
