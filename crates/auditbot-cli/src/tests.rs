//! Snapshot tests for CLI components

#[cfg(test)]
mod snapshot_tests {
    use crate::{
        audit, format_agents, format_classification, format_details, format_sentiments,
        format_summary, progress_line, ChatTable, ClassificationResult, ClassificationSource,
        GeminiGateway, HeuristicClassifier, KeywordRules,
    };
    use insta::assert_snapshot;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn plain_output() {
        colored::control::set_override(false);
    }

    async fn offline_demo_report() -> crate::AuditReport {
        let gateway = GeminiGateway::offline(HeuristicClassifier::default());
        audit(&ChatTable::demo(), &gateway, |_, _| {}).await
    }

    #[tokio::test]
    async fn test_summary_snapshot() {
        plain_output();
        let report = offline_demo_report().await;

        assert_snapshot!(format_summary(&report), @r"
        Total chats: 5
        Angry customers: 2
        QUALITY ALERTS: 2
        Classified remotely: 0, by keyword rules: 5
        ");
    }

    #[tokio::test]
    async fn test_breakdown_snapshots() {
        plain_output();
        let report = offline_demo_report().await;

        assert_snapshot!(format_sentiments(&report), @r"
        Neutral        3
        Very Negative  2
        ");
        assert_snapshot!(format_agents(&report), @"Ana Soporte  2");
    }

    #[tokio::test]
    async fn test_details_mention_every_row() {
        plain_output();
        let report = offline_demo_report().await;
        let details = format_details(&report);

        assert_eq!(details.lines().count(), 10);
        assert!(details.starts_with("#1 [Carlos V.] Hola precio por favor"));
        assert!(details.contains(
            "Very Negative | Yes | Urgent review (keyword-detected) (heuristic)"
        ));
        assert!(details.contains("#4 [Bot] Su pedido ha sido enviado\n    Neutral | No | Monitor (heuristic)"));
    }

    #[test]
    fn test_classification_line() {
        plain_output();
        let line = format_classification(
            &ClassificationResult::sentinel(),
            ClassificationSource::Sentinel,
        );
        assert_snapshot!(line, @"N/A | No | No text (sentinel)");
        assert_eq!(progress_line(3, 5), "Analyzing chat 3 of 5...");
    }

    #[tokio::test]
    async fn test_files_on_disk() {
        plain_output();

        let mut dataset = NamedTempFile::new().unwrap();
        write!(
            dataset,
            r#"[
                {{"Agent": "Lee", "Chat": "The app is terrible and slow"}},
                {{"Agent": "Kim", "Chat": "Thanks, excellent support"}},
                {{"Agent": "Lee", "Chat": "Your fault, not mine"}}
            ]"#
        )
        .unwrap();

        let mut keywords = NamedTempFile::new().unwrap();
        write!(keywords, r#"{{"negative": ["terrible"]}}"#).unwrap();

        let table = ChatTable::load(dataset.path()).await.unwrap();
        let rules = KeywordRules::load(keywords.path()).await.unwrap();
        let gateway = GeminiGateway::offline(HeuristicClassifier::new(rules));
        let report = audit(&table, &gateway, |_, _| {}).await;

        assert_eq!(report.summary.rude, 1);
        assert_eq!(report.rows[2].result.recommendation, "Monitor");
        assert_snapshot!(format_sentiments(&report), @r"
        Neutral        1
        Positive       1
        Very Negative  1
        ");
        assert_snapshot!(format_agents(&report), @"Lee  1");
    }

    #[tokio::test]
    async fn test_agents_without_incidents() {
        plain_output();
        let table = ChatTable::from_json_str(r#"[{"agente": "Ana", "mensaje": "gracias"}]"#).unwrap();
        let gateway = GeminiGateway::offline(HeuristicClassifier::default());
        let report = audit(&table, &gateway, |_, _| {}).await;

        assert_snapshot!(format_agents(&report), @"Every agent behaved well.");
    }
}
