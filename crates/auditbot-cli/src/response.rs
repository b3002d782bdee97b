//! Parser for the pipe-delimited answer of the remote classifier

use thiserror::Error;
use auditbot_core::ClassificationResult;

/// Field separator the remote model is asked to use
pub const FIELD_DELIMITER: char = '|';

/// Why a remote answer could not be turned into a [`ClassificationResult`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResponseParseError {
    #[error("expected at least 3 pipe-delimited fields, found {found}")]
    TooFewFields { found: usize },

    #[error("field {index} is empty")]
    EmptyField { index: usize },
}

/// Parse `sentiment | rudeness | recommendation`.
///
/// Fields are trimmed and taken as-is; anything after the third field is
/// ignored.
pub fn parse_classification(text: &str) -> Result<ClassificationResult, ResponseParseError> {
    let fields: Vec<&str> = text.trim().split(FIELD_DELIMITER).map(str::trim).collect();

    if fields.len() < 3 {
        return Err(ResponseParseError::TooFewFields { found: fields.len() });
    }

    if let Some(index) = fields[..3].iter().position(|f| f.is_empty()) {
        return Err(ResponseParseError::EmptyField { index });
    }

    Ok(ClassificationResult::new(fields[0], fields[1], fields[2]))
}
