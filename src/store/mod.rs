//! Board store: the single owner of the current board.
//!
//! Readers get [`Arc<Board>`] snapshots that never change under them. The
//! only way to change the board is [`BoardStore::commit`] with a whole new
//! value, normally one produced by the engine. Since committing takes
//! `&mut self`, there is exactly one writer at a time.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use crate::engine::{Outcome, Reconciliation};
use crate::model::{Board, Card, CardId, ColumnId, EmailId, EmailOwner};

/// A card found in the store, with the column holding it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardRef {
    pub column_id: ColumnId,
    pub card: Card,
}

/// Holds the current board and a revision counter bumped on each commit.
#[derive(Debug, Clone)]
pub struct BoardStore {
    current: Arc<Board>,
    revision: u64,
}

impl BoardStore {
    pub fn new(board: Board) -> Self {
        Self {
            current: Arc::new(board),
            revision: 0,
        }
    }

    /// The current snapshot. Cheap; no side effects.
    pub fn get_board(&self) -> Arc<Board> {
        Arc::clone(&self.current)
    }

    /// Number of commits so far.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Replace the board with `next` and return the new revision.
    pub fn commit(&mut self, next: Board) -> u64 {
        debug_assert!(
            next.validate().is_empty(),
            "committed board violates invariants: {:?}",
            next.validate()
        );
        self.current = Arc::new(next);
        self.revision += 1;
        info!(
            revision = self.revision,
            columns = self.current.columns.len(),
            cards = self.current.card_count(),
            "Committed board"
        );
        self.revision
    }

    /// Run an engine operation against the current snapshot and commit its
    /// result when it produced a new board.
    pub fn apply<F>(&mut self, op: F) -> Outcome
    where
        F: for<'a> FnOnce(&'a Board) -> Reconciliation<'a>,
    {
        let snapshot = self.get_board();
        let Reconciliation { board, outcome } = op(&*snapshot);
        match board {
            std::borrow::Cow::Owned(next) => {
                self.commit(next);
            }
            std::borrow::Cow::Borrowed(_) => {
                debug!(?outcome, "Nothing to commit");
            }
        }
        outcome
    }

    pub fn find_card(&self, card_id: &CardId) -> Option<CardRef> {
        self.current.find_card(card_id).map(|(column, card)| CardRef {
            column_id: column.id.clone(),
            card: card.clone(),
        })
    }

    pub fn find_email_owner(&self, email_id: &EmailId) -> Option<EmailOwner> {
        self.current.find_email_owner(email_id)
    }
}

impl Default for BoardStore {
    fn default() -> Self {
        Self::new(Board::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{CardDrag, DragPayload};
    use crate::engine::{self, DropTarget};
    use crate::model::{Column, Email, Priority};

    fn store() -> BoardStore {
        let mut b = Column::new("B", "B", "green");
        b.cards.push(Card {
            id: CardId::from("c1"),
            subject: "X".into(),
            emails: vec![Email {
                id: EmailId::from("e1"),
                from: "a@b.com".into(),
                preview: String::new(),
                timestamp: String::new(),
                is_read: false,
            }],
            priority: Priority::Medium,
            labels: vec![],
        });
        BoardStore::new(Board::new(vec![Column::new("A", "A", "blue"), b]))
    }

    fn move_c1<'a>(board: &'a Board, to: &str) -> Reconciliation<'a> {
        let payload = DragPayload::Card(CardDrag {
            card_id: "c1".into(),
            source_column_id: "B".into(),
        });
        engine::reconcile(board, &DropTarget::Column(to.into()), &payload)
    }

    #[test]
    fn test_snapshot_survives_commit() {
        let mut store = store();
        let before = store.get_board();
        assert_eq!(store.apply(|b| move_c1(b, "A")), Outcome::Reconciled);
        assert_eq!(store.revision(), 1);
        // The old snapshot is untouched.
        assert_eq!(before.columns[1].cards.len(), 1);
        assert_eq!(store.get_board().columns[0].cards.len(), 1);
    }

    #[test]
    fn test_apply_unchanged_does_not_commit() {
        let mut store = store();
        assert_eq!(store.apply(|b| move_c1(b, "B")), Outcome::Unchanged);
        assert_eq!(store.revision(), 0);
    }

    #[test]
    fn test_lookups() {
        let store = store();
        let found = store.find_card(&CardId::from("c1")).unwrap();
        assert_eq!(found.column_id, ColumnId::from("B"));
        assert_eq!(found.card.subject, "X");
        assert!(store.find_card(&CardId::from("c2")).is_none());

        let owner = store.find_email_owner(&EmailId::from("e1")).unwrap();
        assert_eq!(owner.card_id, CardId::from("c1"));
    }
}
