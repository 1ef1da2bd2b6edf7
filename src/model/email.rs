//! Email types: the message stored inside a card and the normalized
//! record produced by ingestion.

use serde::{Deserialize, Serialize};

use super::ids::EmailId;

/// A single email as it lives inside a [`Card`](super::card::Card).
///
/// The subject is not stored here: once an email joins a card, the card's
/// subject is the display title for the whole group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Email {
    /// Stable identity, unique across the board.
    pub id: EmailId,
    /// Sender address (or display string).
    pub from: String,
    /// Body excerpt.
    pub preview: String,
    /// Display timestamp, never parsed by the core.
    pub timestamp: String,
    /// Read flag.
    #[serde(default)]
    pub is_read: bool,
}

/// A flat, normalized email record as delivered by an ingestion source
/// (mock data or the Gmail importer).
///
/// This is also the payload of an inbox-email drag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailRecord {
    pub id: EmailId,
    pub subject: String,
    pub from: String,
    #[serde(default)]
    pub preview: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub is_read: bool,
    /// Source-system labels, reserved ones included.
    #[serde(default)]
    pub labels: Vec<String>,
}

impl EmailRecord {
    /// The card-level email for this record (subject and labels dropped).
    pub fn to_email(&self) -> Email {
        Email {
            id: self.id.clone(),
            from: self.from.clone(),
            preview: self.preview.clone(),
            timestamp: self.timestamp.clone(),
            is_read: self.is_read,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_deserializes_camel_case_with_defaults() {
        let json = r#"{"id":"e1","subject":"Hi","from":"a@b.com","isRead":true}"#;
        let rec: EmailRecord = serde_json::from_str(json).unwrap();
        assert_eq!(rec.id, EmailId::from("e1"));
        assert!(rec.is_read);
        assert!(rec.labels.is_empty());
        assert_eq!(rec.preview, "");
    }

    #[test]
    fn test_to_email_keeps_identity_and_read_flag() {
        let rec = EmailRecord {
            id: EmailId::from("e7"),
            subject: "Subject".into(),
            from: "x@y.z".into(),
            preview: "body".into(),
            timestamp: "2 hours ago".into(),
            is_read: false,
            labels: vec!["INBOX".into()],
        };
        let email = rec.to_email();
        assert_eq!(email.id, rec.id);
        assert_eq!(email.preview, "body");
        assert!(!email.is_read);
    }
}
