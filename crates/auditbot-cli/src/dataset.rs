//! Chat transcript table loading and column discovery

use serde_json::Value;
use std::path::Path;
use tokio::fs;
use auditbot_core::{Error, Result};

/// Lower-cased column names recognised as the message column
const MESSAGE_COLUMN_NAMES: [&str; 5] = ["mensaje", "message", "chat", "texto", "text"];

/// Substring identifying the agent column ("Agent", "Agente", "agent_name", ...)
const AGENT_COLUMN_HINT: &str = "agent";

/// Rows of chat transcripts with named columns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTable {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl ChatTable {
    /// Create a table; every row must have one cell per column
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self> {
        if columns.is_empty() {
            return Err(Error::Dataset("dataset has no columns".to_string()));
        }

        if let Some((index, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != columns.len()) {
            return Err(Error::Dataset(format!(
                "row {} has {} cells, expected {}",
                index + 1,
                row.len(),
                columns.len()
            )));
        }

        Ok(Self { columns, rows })
    }

    /// Load a JSON array of objects from disk
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| Error::Dataset(format!("cannot read {}: {}", path.display(), e)))?;

        Self::from_json_str(&content)
    }

    /// Parse a JSON array of objects.
    ///
    /// Columns follow key order of first appearance, with surrounding
    /// whitespace stripped from names.
    pub fn from_json_str(content: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(content)
            .map_err(|e| Error::Dataset(format!("invalid JSON: {}", e)))?;

        let Value::Array(records) = value else {
            return Err(Error::Dataset("expected a JSON array of objects".to_string()));
        };

        if records.is_empty() {
            return Err(Error::Dataset("dataset has no rows".to_string()));
        }

        let mut columns: Vec<String> = Vec::new();
        let mut objects = Vec::with_capacity(records.len());
        for (index, record) in records.into_iter().enumerate() {
            let Value::Object(object) = record else {
                return Err(Error::Dataset(format!("row {} is not an object", index + 1)));
            };

            let trimmed: Vec<(String, Value)> = object
                .into_iter()
                .map(|(key, value)| (key.trim().to_string(), value))
                .collect();

            for (key, _) in &trimmed {
                if !columns.contains(key) {
                    columns.push(key.clone());
                }
            }
            objects.push(trimmed);
        }

        let rows = objects
            .into_iter()
            .map(|object| {
                columns
                    .iter()
                    .map(|column| {
                        object
                            .iter()
                            .find(|(key, _)| key == column)
                            .map(|(_, value)| cell_text(value))
                            .unwrap_or_default()
                    })
                    .collect()
            })
            .collect();

        Self::new(columns, rows)
    }

    /// Sample transcripts used when no dataset is supplied
    pub fn demo() -> Self {
        let columns = ["Agente", "Cliente", "Mensaje"];
        let rows = [
            ["Carlos V.", "Juan", "Hola precio por favor"],
            ["Ana Soporte", "Maria", "Señora ya le dije que espere, no moleste son unos inútiles"],
            ["Carlos V.", "Pedro", "El precio es 50 mil pesos"],
            ["Bot", "Luisa", "Su pedido ha sido enviado"],
            ["Ana Soporte", "Jose", "No me interesa su problema"],
        ];

        Self {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: rows
                .iter()
                .map(|row| row.iter().map(|c| c.to_string()).collect())
                .collect(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of the message column: the first column with a known message
    /// name, otherwise the last column.
    pub fn message_column(&self) -> usize {
        self.columns
            .iter()
            .position(|c| MESSAGE_COLUMN_NAMES.contains(&c.to_lowercase().as_str()))
            .unwrap_or(self.columns.len() - 1)
    }

    /// Index of the first column whose name mentions "agent"
    pub fn agent_column(&self) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c.to_lowercase().contains(AGENT_COLUMN_HINT))
    }
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_table() {
        let table = ChatTable::demo();
        assert_eq!(table.len(), 5);
        assert_eq!(table.columns(), ["Agente", "Cliente", "Mensaje"]);
        assert_eq!(table.message_column(), 2);
        assert_eq!(table.agent_column(), Some(0));
    }

    #[test]
    fn test_from_json_keeps_key_order_and_trims_names() {
        let table = ChatTable::from_json_str(
            r#"[
                {" Agent ": "Ana", "Ticket": 17, "Chat": "hello", "Closed": true},
                {"Ticket": 18, " Agent ": null, "Chat": "where is my order?", "Closed": false}
            ]"#,
        )
        .unwrap();

        assert_eq!(table.columns(), ["Agent", "Ticket", "Chat", "Closed"]);
        assert_eq!(table.rows()[0], ["Ana", "17", "hello", "true"]);
        assert_eq!(table.rows()[1], ["", "18", "where is my order?", "false"]);
        assert_eq!(table.message_column(), 2);
        assert_eq!(table.agent_column(), Some(0));
    }

    #[test]
    fn test_missing_keys_become_empty_cells() {
        let table = ChatTable::from_json_str(r#"[{"a": "1"}, {"b": "2"}]"#).unwrap();
        assert_eq!(table.columns(), ["a", "b"]);
        assert_eq!(table.rows(), [vec!["1", ""], vec!["", "2"]]);
    }

    #[test]
    fn test_message_column_falls_back_to_last() {
        let table = ChatTable::new(
            vec!["id".to_string(), "body".to_string()],
            vec![vec!["1".to_string(), "hi".to_string()]],
        )
        .unwrap();
        assert_eq!(table.message_column(), 1);
        assert_eq!(table.agent_column(), None);
    }

    #[test]
    fn test_message_column_name_is_case_insensitive() {
        let table = ChatTable::new(
            vec!["MESSAGE".to_string(), "notes".to_string()],
            Vec::new(),
        )
        .unwrap();
        assert_eq!(table.message_column(), 0);
    }

    #[test]
    fn test_invalid_inputs() {
        for content in ["{}", "[]", "[1, 2]", "not json"] {
            assert!(
                matches!(ChatTable::from_json_str(content), Err(Error::Dataset(_))),
                "{content} should be rejected"
            );
        }

        assert!(ChatTable::new(Vec::new(), Vec::new()).is_err());
        assert!(ChatTable::new(vec!["a".to_string()], vec![vec![]]).is_err());
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let err = ChatTable::load("/definitely/not/here.json").await.unwrap_err();
        assert!(err.to_string().contains("cannot read"));
    }
}
