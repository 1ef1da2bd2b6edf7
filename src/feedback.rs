//! User-facing messages for drop outcomes.
//!
//! The presentation layer shows one short notice per drop. Which notice
//! depends on the outcome, on the payload, and on where things ended up in
//! the board after the drop, so [`describe`] takes all three.

use serde::Serialize;

use crate::codec::{DecodeError, DragPayload};
use crate::engine::Outcome;
use crate::i18n;
use crate::model::{Board, Card, Column, EmailId};
use crate::session::DropResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// A localized notice for one drop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Feedback {
    pub title: String,
    pub description: String,
    pub severity: Severity,
}

impl Feedback {
    fn new(title: &str, description: String, severity: Severity) -> Self {
        Self {
            title: title.to_string(),
            description,
            severity,
        }
    }

    /// Notice for a carrier that could not be decoded.
    pub fn malformed(error: &DecodeError) -> Self {
        Self::new(
            i18n::fb_malformed_title(),
            format!("{} ({error})", i18n::fb_malformed()),
            Severity::Error,
        )
    }
}

/// Describe `outcome` for `payload`. `board` is the board after the drop.
///
/// `Unchanged` drops produce no notice.
pub fn describe(outcome: &Outcome, payload: &DragPayload, board: &Board) -> Option<Feedback> {
    match outcome {
        Outcome::Unchanged => None,
        Outcome::Reconciled => reconciled(payload, board),
        Outcome::Duplicate(card_id) => {
            let subject = board.find_card(card_id).map(|(_, card)| card.subject.as_str());
            Some(Feedback::new(
                i18n::fb_duplicate_title(),
                phrase(i18n::fb_duplicate(), subject),
                Severity::Warning,
            ))
        }
        Outcome::NotFound => Some(Feedback::new(
            i18n::fb_not_found_title(),
            i18n::fb_not_found().to_string(),
            Severity::Error,
        )),
        Outcome::Rejected => Some(Feedback::new(
            i18n::fb_rejected_title(),
            i18n::fb_rejected().to_string(),
            Severity::Warning,
        )),
    }
}

/// Notice for a whole drop, including decode failures.
pub fn for_drop(result: &DropResult, board: &Board) -> Option<Feedback> {
    match result {
        DropResult::NotDragging => None,
        DropResult::Malformed(e) => Some(Feedback::malformed(e)),
        DropResult::Settled { payload, outcome } => describe(outcome, payload, board),
    }
}

fn reconciled(payload: &DragPayload, board: &Board) -> Option<Feedback> {
    let feedback = match payload {
        DragPayload::Card(drag) => {
            let description = match board.find_card(&drag.card_id) {
                Some((column, card)) => format!(
                    "{} \"{}\" {} \"{}\"",
                    i18n::fb_card(),
                    card.subject,
                    i18n::fb_moved_to(),
                    column.title
                ),
                None => format!("{} {}", i18n::fb_card(), i18n::fb_moved_to()),
            };
            Feedback::new(i18n::fb_card_moved_title(), description, Severity::Info)
        }
        DragPayload::InboxEmail(record) => {
            let (column, card) = owner_of(board, &record.id)?;
            if card.emails.len() == 1 {
                Feedback::new(
                    i18n::fb_card_created_title(),
                    phrase(i18n::fb_card_created(), Some(column.title.as_str())),
                    Severity::Info,
                )
            } else {
                Feedback::new(
                    i18n::fb_email_added_title(),
                    phrase(i18n::fb_email_added(), Some(card.subject.as_str())),
                    Severity::Info,
                )
            }
        }
        DragPayload::CardEmail(drag) => {
            let column = owner_of(board, &drag.email.id).map(|(col, _)| col.title.as_str());
            Feedback::new(
                i18n::fb_email_extracted_title(),
                phrase(i18n::fb_email_extracted(), column),
                Severity::Info,
            )
        }
        DragPayload::Column(_) => return None,
    };
    Some(feedback)
}

fn owner_of<'b>(board: &'b Board, email_id: &EmailId) -> Option<(&'b Column, &'b Card)> {
    let owner = board.find_email_owner(email_id)?;
    board.find_card(&owner.card_id)
}

fn phrase(prefix: &str, name: Option<&str>) -> String {
    match name {
        Some(name) => format!("{prefix} \"{name}\""),
        None => prefix.to_string(),
    }
}
