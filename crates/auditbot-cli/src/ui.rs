//! UI utilities for the CLI

use colored::*;
use crossterm::terminal::size;
use auditbot_core::{ClassificationResult, ClassificationSource};

use crate::report::{AuditReport, LabelCount};

/// Display startup banner
pub fn display_banner() {
    let terminal_width = size().map(|(w, _)| w as usize).unwrap_or(80);
    let banner_width = std::cmp::min(60, terminal_width.saturating_sub(4)).max(40);

    let top_border = format!("┌{}┐", "─".repeat(banner_width - 2));
    let bottom_border = format!("└{}┘", "─".repeat(banner_width - 2));

    let lines = [
        "AuditBot - Chat Quality Auditor",
        "Spot poor customer service before it costs you sales.",
    ];

    println!();
    println!("{}", top_border.blue());
    for line in lines {
        let padding = (banner_width - 4).saturating_sub(line.chars().count());
        println!("{}", format!("│ {}{} │", line, " ".repeat(padding)).blue());
    }
    println!("{}", bottom_border.blue());
    println!();
}

/// Progress line shown while rows are classified
pub fn progress_line(done: usize, total: usize) -> String {
    format!("Analyzing chat {} of {}...", done, total)
}

/// Headline KPIs
pub fn format_summary(report: &AuditReport) -> String {
    let summary = &report.summary;
    [
        format!("{} {}", "Total chats:".bold(), summary.total.to_string().green()),
        format!("{} {}", "Angry customers:".bold(), summary.negative.to_string().yellow()),
        format!("{} {}", "QUALITY ALERTS:".bold(), summary.rude.to_string().red().bold()),
        format!(
            "Classified remotely: {}, by keyword rules: {}",
            summary.remote, summary.heuristic
        )
        .dimmed()
        .to_string(),
    ]
    .join("\n")
}

/// Aligned `label  count` lines
pub fn format_label_counts(counts: &[LabelCount]) -> String {
    let width = counts
        .iter()
        .map(|c| c.label.chars().count())
        .max()
        .unwrap_or(0);

    counts
        .iter()
        .map(|c| format!("{:<width$}  {}", c.label, c.count, width = width))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_sentiments(report: &AuditReport) -> String {
    format_label_counts(&report.sentiment_breakdown)
}

/// Rudeness incidents per agent
pub fn format_agents(report: &AuditReport) -> String {
    match &report.rude_by_agent {
        None => "No agent column found in the dataset.".yellow().to_string(),
        Some(counts) if counts.is_empty() => "Every agent behaved well.".green().to_string(),
        Some(counts) => format_label_counts(counts),
    }
}

fn colored_flag(result: &ClassificationResult) -> ColoredString {
    if result.is_rude() {
        result.rudeness_flag.white().on_red()
    } else {
        result.rudeness_flag.white().on_green()
    }
}

/// `sentiment | flag | recommendation (source)`
pub fn format_classification(result: &ClassificationResult, source: ClassificationSource) -> String {
    format!(
        "{} | {} | {} {}",
        result.sentiment.bold(),
        colored_flag(result),
        result.recommendation,
        format!("({})", source).dimmed()
    )
}

/// Per-row detail
pub fn format_details(report: &AuditReport) -> String {
    report
        .rows
        .iter()
        .map(|row| {
            let agent = report
                .agent_of(row)
                .map(|a| format!("[{}] ", a.cyan()))
                .unwrap_or_default();
            format!(
                "#{} {}{}\n    {}",
                row.index + 1,
                agent,
                report.message_of(row),
                format_classification(&row.result, row.source)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Print the full dashboard
pub fn render_report(report: &AuditReport) {
    let classifier = match &report.model {
        Some(model) => format!("{} (keyword rules as fallback)", model),
        None => "keyword rules (offline)".to_string(),
    };

    println!("{} {}", "Classifier:".dimmed(), classifier.dimmed());
    println!();
    println!("{}", format_summary(report));
    println!();
    println!("{}", "Overall sentiment".bold().underline());
    println!("{}", format_sentiments(report));
    println!();
    println!("{}", "Agents with rudeness alerts".bold().underline());
    println!("{}", format_agents(report));
    println!();
    println!("{}", "Audit detail".bold().underline());
    println!("{}", format_details(report));
}
