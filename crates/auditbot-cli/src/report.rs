//! Batch audit of a chat table and the aggregates shown to managers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use auditbot_core::{ClassificationResult, ClassificationSource, LLMProvider};

use crate::dataset::ChatTable;
use crate::gateway::ClassifierGateway;

/// One classified row of the input table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditedRow {
    pub index: usize,
    pub cells: Vec<String>,
    #[serde(flatten)]
    pub result: ClassificationResult,
    pub source: ClassificationSource,
}

/// Occurrences of a label (a sentiment, an agent name)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelCount {
    pub label: String,
    pub count: usize,
}

/// Headline numbers of an audit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditSummary {
    pub total: usize,
    pub negative: usize,
    pub rude: usize,
    pub remote: usize,
    pub heuristic: usize,
}

/// Immutable outcome of auditing a whole table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditReport {
    pub generated_at: DateTime<Utc>,
    pub model: Option<String>,
    pub columns: Vec<String>,
    pub message_column: usize,
    pub agent_column: Option<usize>,
    pub rows: Vec<AuditedRow>,
    pub summary: AuditSummary,
    pub sentiment_breakdown: Vec<LabelCount>,
    /// `None` when the table has no agent column
    pub rude_by_agent: Option<Vec<LabelCount>>,
}

impl AuditReport {
    /// Aggregate already classified rows
    pub fn from_rows(
        table: &ChatTable,
        rows: Vec<AuditedRow>,
        model: Option<String>,
    ) -> Self {
        let agent_column = table.agent_column();

        let summary = AuditSummary {
            total: rows.len(),
            negative: rows.iter().filter(|r| r.result.is_negative()).count(),
            rude: rows.iter().filter(|r| r.result.is_rude()).count(),
            remote: rows.iter().filter(|r| r.source == ClassificationSource::Remote).count(),
            heuristic: rows.iter().filter(|r| r.source == ClassificationSource::Heuristic).count(),
        };

        let sentiment_breakdown = count_labels(rows.iter().map(|r| r.result.sentiment.as_str()));

        let rude_by_agent = agent_column.map(|column| {
            count_labels(
                rows.iter()
                    .filter(|r| r.result.is_rude())
                    .map(|r| r.cells.get(column).map_or("", String::as_str)),
            )
        });

        Self {
            generated_at: Utc::now(),
            model,
            columns: table.columns().to_vec(),
            message_column: table.message_column(),
            agent_column,
            rows,
            summary,
            sentiment_breakdown,
            rude_by_agent,
        }
    }

    /// Rows flagged as rude
    pub fn incidents(&self) -> impl Iterator<Item = &AuditedRow> {
        self.rows.iter().filter(|r| r.result.is_rude())
    }

    pub fn message_of<'a>(&self, row: &'a AuditedRow) -> &'a str {
        row.cells.get(self.message_column).map_or("", String::as_str)
    }

    pub fn agent_of<'a>(&self, row: &'a AuditedRow) -> Option<&'a str> {
        self.agent_column
            .and_then(|column| row.cells.get(column))
            .map(String::as_str)
    }
}

/// Count labels, most frequent first, ties by label
fn count_labels<'a>(labels: impl Iterator<Item = &'a str>) -> Vec<LabelCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for label in labels {
        *counts.entry(label).or_insert(0) += 1;
    }

    let mut counts: Vec<LabelCount> = counts
        .into_iter()
        .map(|(label, count)| LabelCount { label: label.to_string(), count })
        .collect();
    counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
    counts
}

/// Classify every row of `table`, one at a time, and aggregate the results.
///
/// `progress` is called after each row with `(done, total)`.
pub async fn audit<L: LLMProvider>(
    table: &ChatTable,
    gateway: &ClassifierGateway<L>,
    mut progress: impl FnMut(usize, usize),
) -> AuditReport {
    let message_column = table.message_column();
    let total = table.len();
    let mut rows = Vec::with_capacity(total);

    for (index, cells) in table.rows().iter().enumerate() {
        let message = cells.get(message_column).map_or("", String::as_str);
        let (result, source) = gateway.classify_with_source(message).await;

        tracing::debug!(row = index + 1, %source, sentiment = %result.sentiment, "classified row");

        rows.push(AuditedRow {
            index,
            cells: cells.clone(),
            result,
            source,
        });
        progress(index + 1, total);
    }

    AuditReport::from_rows(table, rows, gateway.model_id().map(str::to_string))
}

/// One-line answer of the manager assistant
pub fn manager_answer(report: &AuditReport) -> String {
    let alerts = report.summary.rude;
    let advice = if alerts > 0 {
        "Check the detail table above."
    } else {
        "The team is working well."
    };

    format!(
        "Based on my analysis, I detected {} serious interactions. {}",
        alerts, advice
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::GeminiGateway;
    use crate::heuristic::HeuristicClassifier;

    async fn demo_report() -> AuditReport {
        let gateway = GeminiGateway::offline(HeuristicClassifier::default());
        audit(&ChatTable::demo(), &gateway, |_, _| {}).await
    }

    #[tokio::test]
    async fn test_demo_summary() {
        let report = demo_report().await;

        assert_eq!(
            report.summary,
            AuditSummary { total: 5, negative: 2, rude: 2, remote: 0, heuristic: 5 }
        );
        assert_eq!(report.model, None);
        assert_eq!(report.message_column, 2);
    }

    #[tokio::test]
    async fn test_demo_breakdowns() {
        let report = demo_report().await;

        assert_eq!(
            report.sentiment_breakdown,
            vec![
                LabelCount { label: "Neutral".to_string(), count: 3 },
                LabelCount { label: "Very Negative".to_string(), count: 2 },
            ]
        );
        assert_eq!(
            report.rude_by_agent,
            Some(vec![LabelCount { label: "Ana Soporte".to_string(), count: 2 }])
        );

        let incidents: Vec<&str> = report.incidents().map(|r| report.message_of(r)).collect();
        assert_eq!(
            incidents,
            vec![
                "Señora ya le dije que espere, no moleste son unos inútiles",
                "No me interesa su problema",
            ]
        );
    }

    #[tokio::test]
    async fn test_progress_is_reported_per_row() {
        let gateway = GeminiGateway::offline(HeuristicClassifier::default());
        let mut seen = Vec::new();
        audit(&ChatTable::demo(), &gateway, |done, total| seen.push((done, total))).await;

        assert_eq!(seen, vec![(1, 5), (2, 5), (3, 5), (4, 5), (5, 5)]);
    }

    #[tokio::test]
    async fn test_no_agent_column() {
        let table = ChatTable::from_json_str(r#"[{"text": "useless"}, {"text": ""}]"#).unwrap();
        let gateway = GeminiGateway::offline(HeuristicClassifier::default());
        let report = audit(&table, &gateway, |_, _| {}).await;

        assert_eq!(report.rude_by_agent, None);
        assert_eq!(report.summary.rude, 1);
        assert_eq!(report.rows[1].source, ClassificationSource::Sentinel);
        assert_eq!(report.rows[1].result.sentiment, "N/A");
        assert_eq!(report.agent_of(&report.rows[0]), None);
    }

    #[test]
    fn test_remote_labels_are_aggregated() {
        let table = ChatTable::new(
            vec!["agent".to_string(), "message".to_string()],
            vec![
                vec!["Zoe".to_string(), "a".to_string()],
                vec!["Ana".to_string(), "b".to_string()],
                vec!["Zoe".to_string(), "c".to_string()],
            ],
        )
        .unwrap();
        let remote = |index: usize, sentiment: &str, flag: &str| AuditedRow {
            index,
            cells: table.rows()[index].clone(),
            result: ClassificationResult::new(sentiment, flag, "x"),
            source: ClassificationSource::Remote,
        };
        let rows = vec![
            remote(0, "Muy Negativo", "Si"),
            remote(1, "Negative", "Yes"),
            remote(2, "Positive", "No"),
        ];

        let report = AuditReport::from_rows(&table, rows, Some("gemini-2.0-flash".to_string()));
        assert_eq!(report.summary.negative, 2);
        assert_eq!(report.summary.rude, 2);
        assert_eq!(report.summary.remote, 3);
        assert_eq!(
            report.rude_by_agent,
            Some(vec![
                LabelCount { label: "Ana".to_string(), count: 1 },
                LabelCount { label: "Zoe".to_string(), count: 1 },
            ])
        );
    }

    #[tokio::test]
    async fn test_manager_answer() {
        let report = demo_report().await;
        assert_eq!(
            manager_answer(&report),
            "Based on my analysis, I detected 2 serious interactions. Check the detail table above."
        );

        let table = ChatTable::from_json_str(r#"[{"message": "gracias"}]"#).unwrap();
        let gateway = GeminiGateway::offline(HeuristicClassifier::default());
        let calm = audit(&table, &gateway, |_, _| {}).await;
        assert!(manager_answer(&calm).ends_with("The team is working well."));
    }

    #[tokio::test]
    async fn test_report_serializes_flat_rows() {
        let report = demo_report().await;
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["rows"][1]["rudeness_flag"], "Yes");
        assert_eq!(json["rows"][1]["source"], "heuristic");
        assert_eq!(json["summary"]["total"], 5);
    }
}
