//! Cards: the unit a user drags around the board.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::email::Email;
use super::ids::{CardId, EmailId};

/// Card priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(format!("unknown priority '{other}' (expected low, medium, high)")),
        }
    }
}

/// A group of one or more emails under one subject.
///
/// A card reachable from a board always holds at least one email. The
/// first email is conventionally the original message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    /// Display title, also the merge key for incoming emails.
    pub subject: String,
    /// Emails in arrival order.
    pub emails: Vec<Email>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub labels: Vec<String>,
}

impl Card {
    /// Whether this card holds the given email.
    pub fn contains_email(&self, email_id: &EmailId) -> bool {
        self.emails.iter().any(|e| &e.id == email_id)
    }

    /// Case-insensitive, whitespace-trimmed subject comparison.
    pub fn subject_matches(&self, subject: &str) -> bool {
        normalize_subject(&self.subject) == normalize_subject(subject)
    }

    /// Number of unread emails on the card.
    pub fn unread_count(&self) -> usize {
        self.emails.iter().filter(|e| !e.is_read).count()
    }
}

/// Normalize a subject for merge comparison.
pub fn normalize_subject(subject: &str) -> String {
    subject.trim().to_lowercase()
}
