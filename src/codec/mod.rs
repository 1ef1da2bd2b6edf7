//! Drag payload codec.
//!
//! A drag gesture carries its source across to the drop site in a
//! [`DragCarrier`]: a small string map modelled on the browser's
//! `DataTransfer`. The payload kind travels under its own key
//! ([`KIND_KEY`]) so the receiving side can dispatch on it before parsing
//! the JSON body under [`DATA_KEY`].
//!
//! ```text
//! dragType = "card" | "column" | "email" | "email-from-card"
//! payload  = JSON object for that kind (camelCase fields)
//! ```
//!
//! The one-line wire form used by the CLI is `<kind> <json>`.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::model::{CardId, ColumnId, Email, EmailRecord};

/// Carrier key holding the payload kind tag.
pub const KIND_KEY: &str = "dragType";

/// Carrier key holding the JSON payload body.
pub const DATA_KEY: &str = "payload";

/// The four kinds of drag source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    Card,
    Column,
    InboxEmail,
    CardEmail,
}

impl PayloadKind {
    /// The tag written under [`KIND_KEY`].
    pub fn tag(self) -> &'static str {
        match self {
            Self::Card => "card",
            Self::Column => "column",
            Self::InboxEmail => "email",
            Self::CardEmail => "email-from-card",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "card" => Some(Self::Card),
            "column" => Some(Self::Column),
            "email" => Some(Self::InboxEmail),
            "email-from-card" => Some(Self::CardEmail),
            _ => None,
        }
    }
}

impl fmt::Display for PayloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A card being dragged out of its column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardDrag {
    pub card_id: CardId,
    pub source_column_id: ColumnId,
}

/// A column header being dragged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDrag {
    pub column_id: ColumnId,
}

/// An email being extracted out of a multi-email card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardEmailDrag {
    pub email: Email,
    /// Subject to give the extracted card, when the source knows one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    pub source_card_id: CardId,
}

/// A decoded drag payload.
///
/// The serde form (used by replay scripts) is internally tagged with
/// `kind`, using the same tags as the carrier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum DragPayload {
    #[serde(rename = "card")]
    Card(CardDrag),
    #[serde(rename = "column")]
    Column(ColumnDrag),
    #[serde(rename = "email")]
    InboxEmail(EmailRecord),
    #[serde(rename = "email-from-card")]
    CardEmail(CardEmailDrag),
}

impl DragPayload {
    pub fn kind(&self) -> PayloadKind {
        match self {
            Self::Card(_) => PayloadKind::Card,
            Self::Column(_) => PayloadKind::Column,
            Self::InboxEmail(_) => PayloadKind::InboxEmail,
            Self::CardEmail(_) => PayloadKind::CardEmail,
        }
    }
}

/// Why a carrier could not be decoded. Always recoverable: the drop is a no-op.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("drag carrier has no 'dragType' tag")]
    MissingKind,

    #[error("unknown drag kind '{0}'")]
    UnknownKind(String),

    #[error("drag carrier for '{0}' has no payload")]
    MissingPayload(PayloadKind),

    #[error("malformed '{kind}' payload: {reason}")]
    Malformed { kind: PayloadKind, reason: String },
}

/// String map carried across a drag gesture.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DragCarrier {
    entries: BTreeMap<String, String>,
}

impl DragCarrier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_data(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn get_data(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render as `<kind> <json>`.
    pub fn to_wire(&self) -> String {
        match (self.get_data(KIND_KEY), self.get_data(DATA_KEY)) {
            (Some(kind), Some(data)) => format!("{kind} {data}"),
            (Some(kind), None) => kind.to_string(),
            (None, _) => String::new(),
        }
    }

    /// Parse the `<kind> <json>` form.
    ///
    /// Never fails: problems surface when the carrier is decoded.
    pub fn from_wire(wire: &str) -> Self {
        let mut carrier = Self::new();
        let wire = wire.trim();
        if wire.is_empty() {
            return carrier;
        }
        match wire.split_once(char::is_whitespace) {
            Some((kind, data)) => {
                carrier.set_data(KIND_KEY, kind);
                let data = data.trim();
                if !data.is_empty() {
                    carrier.set_data(DATA_KEY, data);
                }
            }
            None => carrier.set_data(KIND_KEY, wire),
        }
        carrier
    }
}

/// Serialize a payload onto a fresh carrier.
pub fn encode(payload: &DragPayload) -> serde_json::Result<DragCarrier> {
    let data = match payload {
        DragPayload::Card(drag) => serde_json::to_string(drag)?,
        DragPayload::Column(drag) => serde_json::to_string(drag)?,
        DragPayload::InboxEmail(record) => serde_json::to_string(record)?,
        DragPayload::CardEmail(drag) => serde_json::to_string(drag)?,
    };
    let mut carrier = DragCarrier::new();
    carrier.set_data(KIND_KEY, payload.kind().tag());
    carrier.set_data(DATA_KEY, data);
    Ok(carrier)
}

/// Read only the kind tag, without touching the payload body.
pub fn peek_kind(carrier: &DragCarrier) -> Result<PayloadKind, DecodeError> {
    let tag = carrier
        .get_data(KIND_KEY)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(DecodeError::MissingKind)?;
    PayloadKind::from_tag(tag).ok_or_else(|| DecodeError::UnknownKind(tag.to_string()))
}

/// Decode a carrier into a payload.
pub fn decode(carrier: &DragCarrier) -> Result<DragPayload, DecodeError> {
    let result = decode_inner(carrier);
    if let Err(ref e) = result {
        warn!(error = %e, "Discarding undecodable drag carrier");
    }
    result
}

fn decode_inner(carrier: &DragCarrier) -> Result<DragPayload, DecodeError> {
    let kind = peek_kind(carrier)?;
    let data = carrier
        .get_data(DATA_KEY)
        .filter(|d| !d.trim().is_empty())
        .ok_or(DecodeError::MissingPayload(kind))?;

    let payload = match kind {
        PayloadKind::Card => {
            let drag: CardDrag = parse_body(kind, data)?;
            require_id(kind, "cardId", drag.card_id.is_blank())?;
            require_id(kind, "sourceColumnId", drag.source_column_id.is_blank())?;
            DragPayload::Card(drag)
        }
        PayloadKind::Column => {
            let drag: ColumnDrag = parse_body(kind, data)?;
            require_id(kind, "columnId", drag.column_id.is_blank())?;
            DragPayload::Column(drag)
        }
        PayloadKind::InboxEmail => {
            let record: EmailRecord = parse_body(kind, data)?;
            require_id(kind, "id", record.id.is_blank())?;
            DragPayload::InboxEmail(record)
        }
        PayloadKind::CardEmail => {
            let drag: CardEmailDrag = parse_body(kind, data)?;
            require_id(kind, "email.id", drag.email.id.is_blank())?;
            require_id(kind, "sourceCardId", drag.source_card_id.is_blank())?;
            DragPayload::CardEmail(drag)
        }
    };
    Ok(payload)
}

fn parse_body<T: DeserializeOwned>(kind: PayloadKind, data: &str) -> Result<T, DecodeError> {
    serde_json::from_str(data).map_err(|e| DecodeError::Malformed {
        kind,
        reason: e.to_string(),
    })
}

fn require_id(kind: PayloadKind, field: &str, blank: bool) -> Result<(), DecodeError> {
    if blank {
        Err(DecodeError::Malformed {
            kind,
            reason: format!("'{field}' is empty"),
        })
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EmailId;

    fn inbox_payload() -> DragPayload {
        DragPayload::InboxEmail(EmailRecord {
            id: EmailId::from("e1"),
            subject: "Q3 Report".into(),
            from: "cfo@example.com".into(),
            preview: "Numbers attached".into(),
            timestamp: "2 hours ago".into(),
            is_read: false,
            labels: vec!["INBOX".into(), "Finance".into()],
        })
    }

    #[test]
    fn test_encode_puts_tag_under_kind_key() {
        let carrier = encode(&inbox_payload()).unwrap();
        assert_eq!(carrier.get_data(KIND_KEY), Some("email"));
        let body: serde_json::Value =
            serde_json::from_str(carrier.get_data(DATA_KEY).unwrap()).unwrap();
        assert_eq!(body["isRead"], false);
        assert_eq!(body["labels"][1], "Finance");
    }

    #[test]
    fn test_decode_restores_every_kind() {
        let payloads = vec![
            inbox_payload(),
            DragPayload::Card(CardDrag {
                card_id: "c1".into(),
                source_column_id: "todo".into(),
            }),
            DragPayload::Column(ColumnDrag {
                column_id: "done".into(),
            }),
            DragPayload::CardEmail(CardEmailDrag {
                email: Email {
                    id: "3b".into(),
                    from: "logistics@shipping.com".into(),
                    preview: "Shipping delays".into(),
                    timestamp: "2 days ago".into(),
                    is_read: false,
                },
                subject: None,
                source_card_id: "3".into(),
            }),
        ];
        for payload in payloads {
            let carrier = encode(&payload).unwrap();
            assert_eq!(decode(&carrier).unwrap(), payload);
        }
    }

    #[test]
    fn test_peek_kind_does_not_parse_body() {
        let mut carrier = DragCarrier::new();
        carrier.set_data(KIND_KEY, "card");
        carrier.set_data(DATA_KEY, "{ not json");
        assert_eq!(peek_kind(&carrier), Ok(PayloadKind::Card));
        assert!(matches!(
            decode(&carrier),
            Err(DecodeError::Malformed {
                kind: PayloadKind::Card,
                ..
            })
        ));
    }

    #[test]
    fn test_missing_and_unknown_kind() {
        let mut carrier = DragCarrier::new();
        carrier.set_data(DATA_KEY, r#"{"cardId":"c1","sourceColumnId":"a"}"#);
        assert_eq!(decode(&carrier), Err(DecodeError::MissingKind));

        carrier.set_data(KIND_KEY, "swimlane");
        assert_eq!(
            decode(&carrier),
            Err(DecodeError::UnknownKind("swimlane".into()))
        );
    }

    #[test]
    fn test_missing_payload() {
        let carrier = DragCarrier::from_wire("column");
        assert_eq!(
            decode(&carrier),
            Err(DecodeError::MissingPayload(PayloadKind::Column))
        );
    }

    #[test]
    fn test_shape_mismatch_is_malformed() {
        // A card payload tagged as an inbox email: missing subject/from.
        let carrier = DragCarrier::from_wire(r#"email {"cardId":"c1","sourceColumnId":"a"}"#);
        let err = decode(&carrier).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::Malformed {
                kind: PayloadKind::InboxEmail,
                ..
            }
        ));
    }

    #[test]
    fn test_blank_id_is_malformed() {
        let carrier = DragCarrier::from_wire(r#"card {"cardId":" ","sourceColumnId":"a"}"#);
        let err = decode(&carrier).unwrap_err();
        assert!(err.to_string().contains("cardId"));
    }

    #[test]
    fn test_wire_form() {
        let carrier = encode(&DragPayload::Column(ColumnDrag {
            column_id: "todo".into(),
        }))
        .unwrap();
        let wire = carrier.to_wire();
        assert_eq!(wire, r#"column {"columnId":"todo"}"#);
        assert_eq!(DragCarrier::from_wire(&wire), carrier);
        assert!(DragCarrier::from_wire("   ").is_empty());
    }

    #[test]
    fn test_payload_serde_is_internally_tagged() {
        let json = r#"{"kind":"card","cardId":"c1","sourceColumnId":"B"}"#;
        let payload: DragPayload = serde_json::from_str(json).unwrap();
        assert_eq!(payload.kind(), PayloadKind::Card);
    }
}
