//! Explicit card operations: create, edit, delete.

use std::collections::HashSet;

use serde::Deserialize;
use tracing::debug;

use super::ids::fresh_card_id_for_subject;
use super::{Outcome, Reconciliation};
use crate::model::{Board, Card, CardId, ColumnId, Email, Priority};

/// Fields for a card created by hand rather than by a drop.
#[derive(Debug, Clone, Deserialize)]
pub struct NewCard {
    pub subject: String,
    /// Must hold at least one email, none of them already on the board.
    pub emails: Vec<Email>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub labels: Vec<String>,
}

/// Field edits for an existing card. `None` leaves the field as is.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CardPatch {
    pub subject: Option<String>,
    pub priority: Option<Priority>,
    pub labels: Option<Vec<String>>,
}

/// Append a new card to a column.
pub fn add_card<'a>(board: &'a Board, column_id: &ColumnId, card: NewCard) -> Reconciliation<'a> {
    let subject = card.subject.trim();
    if subject.is_empty() || card.emails.is_empty() {
        return Reconciliation::keep(board, Outcome::Rejected);
    }
    let Some(column_idx) = board.column_index(column_id) else {
        return Reconciliation::keep(board, Outcome::NotFound);
    };
    let mut seen = HashSet::new();
    for email in &card.emails {
        if let Some(owner) = board.find_email_owner(&email.id) {
            return Reconciliation::keep(board, Outcome::Duplicate(owner.card_id));
        }
        if !seen.insert(&email.id) {
            return Reconciliation::keep(board, Outcome::Rejected);
        }
    }

    let id = fresh_card_id_for_subject(board, subject);
    debug!(%id, column = %column_id, emails = card.emails.len(), "Adding card");

    let mut next = board.clone();
    next.columns[column_idx].cards.push(Card {
        id,
        subject: subject.to_string(),
        emails: card.emails,
        priority: card.priority,
        labels: card.labels,
    });
    Reconciliation::changed(next)
}

/// Apply field edits to a card. A blank subject is rejected.
pub fn update_card<'a>(board: &'a Board, card_id: &CardId, patch: &CardPatch) -> Reconciliation<'a> {
    let subject = patch.subject.as_deref().map(str::trim);
    if subject.is_some_and(str::is_empty) {
        return Reconciliation::keep(board, Outcome::Rejected);
    }
    let Some(loc) = board.locate_card(card_id) else {
        return Reconciliation::keep(board, Outcome::NotFound);
    };

    let current = &board.columns[loc.column].cards[loc.card];
    let mut edited = current.clone();
    if let Some(subject) = subject {
        edited.subject = subject.to_string();
    }
    if let Some(priority) = patch.priority {
        edited.priority = priority;
    }
    if let Some(labels) = &patch.labels {
        edited.labels = labels.clone();
    }
    if &edited == current {
        return Reconciliation::keep(board, Outcome::Unchanged);
    }

    let mut next = board.clone();
    *next.card_at_mut(loc) = edited;
    Reconciliation::changed(next)
}

/// Remove a card and its emails from the board.
pub fn delete_card<'a>(board: &'a Board, card_id: &CardId) -> Reconciliation<'a> {
    let Some(loc) = board.locate_card(card_id) else {
        return Reconciliation::keep(board, Outcome::NotFound);
    };
    let mut next = board.clone();
    next.columns[loc.column].cards.remove(loc.card);
    Reconciliation::changed(next)
}
