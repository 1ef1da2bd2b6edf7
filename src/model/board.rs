//! The board: an ordered list of columns holding ordered cards.

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::card::Card;
use super::ids::{CardId, ColumnId, EmailId};
use crate::error::{read_file, BoardError, Result};

/// A user-editable column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub id: ColumnId,
    pub title: String,
    /// Opaque display token (e.g. a gradient class name).
    pub color: String,
    /// Cards in display order.
    #[serde(default)]
    pub cards: Vec<Card>,
}

impl Column {
    /// Create an empty column.
    pub fn new(id: impl Into<ColumnId>, title: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            color: color.into(),
            cards: Vec::new(),
        }
    }

    /// Find a card in this column by id.
    pub fn card(&self, card_id: &CardId) -> Option<&Card> {
        self.cards.iter().find(|c| &c.id == card_id)
    }
}

/// Where a card sits on the board, by index.
///
/// Indices are only valid for the board they were computed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardLocation {
    pub column: usize,
    pub card: usize,
}

/// The card (and its column) that currently holds an email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailOwner {
    pub column_id: ColumnId,
    pub card_id: CardId,
}

/// A broken board invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    DuplicateColumnId(ColumnId),
    DuplicateCardId(CardId),
    DuplicateEmailId(EmailId),
    EmptyCard(CardId),
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateColumnId(id) => write!(f, "column id '{id}' appears more than once"),
            Self::DuplicateCardId(id) => write!(f, "card id '{id}' appears more than once"),
            Self::DuplicateEmailId(id) => write!(f, "email '{id}' is held by more than one card"),
            Self::EmptyCard(id) => write!(f, "card '{id}' has no emails"),
        }
    }
}

/// The full board.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub columns: Vec<Column>,
}

impl Board {
    pub fn new(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    /// Load a board snapshot from a JSON file and check its invariants.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let contents = read_file(path)?;
        let board: Board =
            serde_json::from_str(&contents).map_err(|e| BoardError::json(path, e))?;
        let violations = board.validate();
        if !violations.is_empty() {
            let reason = violations
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ");
            return Err(BoardError::InvalidBoard {
                path: path.to_path_buf(),
                reason,
            });
        }
        Ok(board)
    }

    pub fn column(&self, column_id: &ColumnId) -> Option<&Column> {
        self.columns.iter().find(|c| &c.id == column_id)
    }

    pub fn column_index(&self, column_id: &ColumnId) -> Option<usize> {
        self.columns.iter().position(|c| &c.id == column_id)
    }

    /// Locate a card by id anywhere on the board.
    pub fn locate_card(&self, card_id: &CardId) -> Option<CardLocation> {
        self.columns.iter().enumerate().find_map(|(ci, column)| {
            column
                .cards
                .iter()
                .position(|c| &c.id == card_id)
                .map(|ki| CardLocation {
                    column: ci,
                    card: ki,
                })
        })
    }

    /// Find a card and the column holding it.
    pub fn find_card(&self, card_id: &CardId) -> Option<(&Column, &Card)> {
        let loc = self.locate_card(card_id)?;
        let column = &self.columns[loc.column];
        Some((column, &column.cards[loc.card]))
    }

    /// Find the card that currently holds `email_id`.
    pub fn find_email_owner(&self, email_id: &EmailId) -> Option<EmailOwner> {
        for column in &self.columns {
            for card in &column.cards {
                if card.contains_email(email_id) {
                    return Some(EmailOwner {
                        column_id: column.id.clone(),
                        card_id: card.id.clone(),
                    });
                }
            }
        }
        None
    }

    /// Mutable access to a card by location.
    pub(crate) fn card_at_mut(&mut self, loc: CardLocation) -> &mut Card {
        &mut self.columns[loc.column].cards[loc.card]
    }

    /// Iterate over every card on the board, column by column.
    pub fn cards(&self) -> impl Iterator<Item = &Card> {
        self.columns.iter().flat_map(|c| c.cards.iter())
    }

    pub fn card_count(&self) -> usize {
        self.columns.iter().map(|c| c.cards.len()).sum()
    }

    pub fn email_count(&self) -> usize {
        self.cards().map(|c| c.emails.len()).sum()
    }

    pub fn has_card_id(&self, card_id: &CardId) -> bool {
        self.cards().any(|c| &c.id == card_id)
    }

    /// Check every structural invariant and report all violations.
    ///
    /// An empty result means: column ids unique, card ids unique across
    /// columns, no email in more than one card, no empty card.
    pub fn validate(&self) -> Vec<InvariantViolation> {
        let mut violations = Vec::new();
        let mut columns = HashSet::new();
        let mut cards = HashSet::new();
        let mut emails = HashSet::new();

        for column in &self.columns {
            if !columns.insert(&column.id) {
                violations.push(InvariantViolation::DuplicateColumnId(column.id.clone()));
            }
            for card in &column.cards {
                if !cards.insert(&card.id) {
                    violations.push(InvariantViolation::DuplicateCardId(card.id.clone()));
                }
                if card.emails.is_empty() {
                    violations.push(InvariantViolation::EmptyCard(card.id.clone()));
                }
                for email in &card.emails {
                    if !emails.insert(&email.id) {
                        violations.push(InvariantViolation::DuplicateEmailId(email.id.clone()));
                    }
                }
            }
        }
        violations
    }
}
