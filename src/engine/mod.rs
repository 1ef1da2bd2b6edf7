//! Reconciliation engine.
//!
//! Every function here is pure: it reads a [`Board`] and returns a
//! [`Reconciliation`] holding either the untouched input (borrowed) or a
//! freshly built next board (owned), plus an [`Outcome`] for the
//! presentation layer. Nothing mutates the input, so a snapshot handed to
//! a reader stays valid while the next board is being computed.

pub mod cards;
pub mod columns;
pub mod ids;
pub mod import;
pub mod labels;
pub mod reconcile;

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::model::{Board, CardId, ColumnId};

pub use cards::{add_card, delete_card, update_card, CardPatch, NewCard};
pub use columns::{add_column, delete_column, edit_column, move_column};
pub use import::{import_emails, ImportReport};
pub use reconcile::{reconcile, EXTRACTED_SUBJECT};

/// What a drop (or explicit operation) did to the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Nothing to do; the board is the input board.
    Unchanged,
    /// A new board was produced.
    Reconciled,
    /// The email is already on the board, held by this card.
    Duplicate(CardId),
    /// A referenced column, card or email no longer exists.
    NotFound,
    /// The request is well-formed but not allowed.
    Rejected,
}

impl Outcome {
    pub fn is_reconciled(&self) -> bool {
        matches!(self, Self::Reconciled)
    }
}

/// Where a drag was released.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DropTarget {
    Column(ColumnId),
    Card(CardId),
}

/// Result of one engine call.
#[derive(Debug, Clone)]
pub struct Reconciliation<'a> {
    /// The board after the call. Borrowed when nothing changed.
    pub board: Cow<'a, Board>,
    pub outcome: Outcome,
}

impl<'a> Reconciliation<'a> {
    /// The input board, untouched.
    pub(crate) fn keep(board: &'a Board, outcome: Outcome) -> Self {
        Self {
            board: Cow::Borrowed(board),
            outcome,
        }
    }

    /// A new board.
    pub(crate) fn changed(board: Board) -> Self {
        Self {
            board: Cow::Owned(board),
            outcome: Outcome::Reconciled,
        }
    }

    /// Whether a new board value was produced.
    pub fn is_changed(&self) -> bool {
        matches!(self.board, Cow::Owned(_))
    }

    pub fn into_board(self) -> Board {
        self.board.into_owned()
    }
}
