//! Ingestion boundary: loading flat email records from outside sources.
//!
//! Two JSON shapes are accepted: an array of already normalized
//! [`EmailRecord`]s, or an array of raw Gmail API messages (see [`gmail`]).

pub mod gmail;

use std::path::Path;

use chrono::{DateTime, Utc};
use tracing::info;

use crate::error::{read_file, BoardError, Result};
use crate::model::EmailRecord;

/// Shape of an ingestion file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// `[{"id", "subject", "from", "preview", "timestamp", "isRead", "labels"}]`
    Normalized,
    /// `[{"id", "labelIds", "snippet", "payload": {"headers"}, "internalDate"}]`
    Gmail,
}

/// Load and validate records from a JSON file.
///
/// `now` anchors the relative timestamps of Gmail messages.
pub fn load_records(path: &Path, format: SourceFormat, now: DateTime<Utc>) -> Result<Vec<EmailRecord>> {
    let contents = read_file(path)?;
    let records = match format {
        SourceFormat::Normalized => {
            serde_json::from_str::<Vec<EmailRecord>>(&contents).map_err(|e| BoardError::json(path, e))?
        }
        SourceFormat::Gmail => {
            let messages: Vec<gmail::GmailMessage> =
                serde_json::from_str(&contents).map_err(|e| BoardError::json(path, e))?;
            messages.iter().map(|m| gmail::normalize(m, now)).collect()
        }
    };
    validate_records(&records)?;
    info!(
        path = %path.display(),
        count = records.len(),
        ?format,
        "Loaded email records"
    );
    Ok(records)
}

/// Every record needs a non-blank id.
pub fn validate_records(records: &[EmailRecord]) -> Result<()> {
    for (index, record) in records.iter().enumerate() {
        if record.id.is_blank() {
            return Err(BoardError::InvalidRecord {
                index,
                reason: "empty id".to_string(),
            });
        }
    }
    Ok(())
}
