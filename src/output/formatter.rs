use owo_colors::OwoColorize;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use crate::fetch::Dashboard;
use crate::summary::{AggregateResult, Column, PullSummary};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate title to fit available width, accounting for Unicode
fn truncate_title(title: &str, max_width: usize) -> String {
    let chars: Vec<char> = title.chars().collect();
    if chars.len() <= max_width {
        title.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Format a day count into a short age string
/// "today", "3d" for days, "2w" for weeks
pub fn format_age(days: i64) -> String {
    if days >= 7 {
        format!("{}w", days / 7)
    } else if days >= 1 {
        format!("{}d", days)
    } else {
        "today".to_string()
    }
}

/// Signals shown after the title: likes, comments, CI markers and flags
fn format_signals(pull: &PullSummary) -> String {
    let mut parts = vec![
        format!("+{}", pull.likes),
        format!("{}c", pull.comments),
        format_age(pull.old),
    ];
    if pull.total_oks + pull.total_fails + pull.total_unstable > 0 {
        parts.push(format!(
            "ci {}/{}/{}",
            pull.total_oks, pull.total_fails, pull.total_unstable
        ));
    }
    if pull.following {
        parts.push("following".to_string());
    }
    if pull.obsolete {
        parts.push("obsolete".to_string());
    }
    parts.join(" ")
}

fn format_pull_line(pull: &PullSummary, term_width: Option<usize>, use_colors: bool) -> String {
    let reference = pull.short_ref();
    let signals = format_signals(pull);
    let separator = "  ";
    // Indent, reference, signals and two separators
    let fixed_width = 2 + reference.chars().count() + signals.chars().count() + separator.len() * 2;

    let title = match term_width {
        Some(width) if width > fixed_width + 10 => truncate_title(&pull.title, width - fixed_width),
        Some(_) => truncate_title(&pull.title, 20),
        None => pull.title.clone(),
    };

    if use_colors {
        format!(
            "  {}{}{}{}{}",
            reference.cyan(),
            separator,
            title.bold(),
            separator,
            signals.dimmed()
        )
    } else {
        format!("  {}{}{}{}{}", reference, separator, title, separator, signals)
    }
}

/// Sort pulls for display: most liked first, then stalest first
fn sorted_column<'a>(result: &'a AggregateResult, column: Column) -> Vec<&'a PullSummary> {
    let mut pulls: Vec<_> = result.in_column(column).collect();
    pulls.sort_by(|a, b| b.likes.cmp(&a.likes).then(b.old.cmp(&a.old)));
    pulls
}

/// Format the dashboard as one section per column, right to left so the
/// most actionable pulls come first.
pub fn format_dashboard(dashboard: &Dashboard, use_colors: bool) -> String {
    let term_width = get_terminal_width();
    let result = &dashboard.result;
    let mut lines = Vec::new();

    if use_colors {
        lines.push(dashboard.descriptor.title.bold().to_string());
    } else {
        lines.push(dashboard.descriptor.title.clone());
    }

    for column in Column::ALL.iter().rev() {
        let pulls = sorted_column(result, *column);
        let header = format!(
            "{} ({})",
            dashboard.descriptor.headers.get(*column),
            pulls.len()
        );
        lines.push(String::new());
        if use_colors {
            lines.push(header.yellow().bold().to_string());
        } else {
            lines.push(header);
        }

        if pulls.is_empty() {
            lines.push("  (none)".to_string());
        }
        for pull in pulls {
            lines.push(format_pull_line(pull, term_width, use_colors));
        }
    }

    if !result.failures.is_empty() {
        lines.push(String::new());
        let header = format!("Failed ({})", result.failures.len());
        if use_colors {
            lines.push(header.red().bold().to_string());
        } else {
            lines.push(header);
        }
        for failure in &result.failures {
            lines.push(format!("  {}: {}", failure.target, failure.message));
        }
    }

    lines.push(String::new());
    lines.push(format_run_stats(result));
    lines.join("\n")
}

/// One-line run counters
pub fn format_run_stats(result: &AggregateResult) -> String {
    let rate_limit = result
        .rate_limit
        .map(|rl| rl.to_string())
        .unwrap_or_else(|| "unknown".to_string());
    format!(
        "{} pulls, {} requests, {} tasks, rate limit remaining {}",
        result.pulls.len(),
        result.total_requests,
        result.total_tasks,
        rate_limit
    )
}

/// Format pulls as tab-separated values for scripting
/// Columns: column, likes, comments, days old, ref, title (no headers, no colors)
pub fn format_tsv(result: &AggregateResult) -> String {
    result
        .pulls
        .iter()
        .map(|pull| {
            let column = match pull.column {
                Some(Column::Left) => "left",
                Some(Column::Middle) => "middle",
                Some(Column::Right) => "right",
                None => "-",
            };
            format!(
                "{}\t{}\t{}\t{}\t{}\t{}",
                column,
                pull.likes,
                pull.comments,
                pull.old,
                pull.short_ref(),
                pull.title
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
