//! Chat auditing for AuditBot: classification pipeline, reports and terminal UI

mod dataset;
mod gateway;
mod heuristic;
mod report;
mod response;
mod ui;

#[cfg(test)]
mod tests;

pub use dataset::ChatTable;
pub use gateway::{
    build_prompt, classify, ClassifierGateway, GeminiGateway, RemoteError, DEFAULT_REMOTE_TIMEOUT,
};
pub use heuristic::{HeuristicClassifier, KeywordRules};
pub use report::{audit, manager_answer, AuditReport, AuditSummary, AuditedRow, LabelCount};
pub use response::{parse_classification, ResponseParseError, FIELD_DELIMITER};
pub use ui::{
    display_banner, format_agents, format_classification, format_details, format_label_counts,
    format_sentiments, format_summary, progress_line, render_report,
};

// Re-export core types
pub use auditbot_core::{ClassificationResult, ClassificationSource, Error, Result};
