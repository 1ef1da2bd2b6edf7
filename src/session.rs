//! Drag session: the life of one drag gesture.
//!
//! ```text
//! Idle ──begin──▶ Dragging(carrier) ──drop_on──▶ Idle   (reconcile + commit)
//!                          └────────cancel──────▶ Idle   (board untouched)
//! ```
//!
//! The presentation layer calls [`DragSession::begin`] on drag start and
//! either [`DragSession::drop_on`] or [`DragSession::cancel`] when the
//! gesture ends. A cancelled drag never reaches the engine.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::codec::{self, DecodeError, DragCarrier, DragPayload};
use crate::engine::{self, DropTarget, Outcome};
use crate::store::BoardStore;

/// Current state of the gesture.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(DragCarrier),
}

/// What happened when a drag was released over a target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropResult {
    /// A drop arrived with no drag in progress.
    NotDragging,
    /// The carrier could not be decoded; the board is untouched.
    Malformed(DecodeError),
    /// The payload was reconciled against the board.
    Settled {
        payload: DragPayload,
        outcome: Outcome,
    },
}

impl DropResult {
    /// The engine outcome, if the drop reached the engine.
    pub fn outcome(&self) -> Option<&Outcome> {
        match self {
            Self::Settled { outcome, .. } => Some(outcome),
            _ => None,
        }
    }
}

/// Tracks a single in-flight drag.
#[derive(Debug, Clone, Default)]
pub struct DragSession {
    state: DragState,
}

impl DragSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    /// Start dragging `payload`. A drag already in flight is replaced.
    pub fn begin(&mut self, payload: &DragPayload) -> serde_json::Result<()> {
        let carrier = codec::encode(payload)?;
        self.begin_with_carrier(carrier);
        Ok(())
    }

    /// Start dragging with a carrier produced elsewhere.
    pub fn begin_with_carrier(&mut self, carrier: DragCarrier) {
        if self.is_dragging() {
            debug!("Replacing in-flight drag");
        }
        self.state = DragState::Dragging(carrier);
    }

    /// Abandon the drag. The board is never consulted.
    pub fn cancel(&mut self) {
        if std::mem::take(&mut self.state) != DragState::Idle {
            debug!("Drag cancelled");
        }
    }

    /// Release the drag over `target`: decode, reconcile, commit.
    pub fn drop_on(&mut self, store: &mut BoardStore, target: &DropTarget) -> DropResult {
        let DragState::Dragging(carrier) = std::mem::take(&mut self.state) else {
            warn!(?target, "Drop without an active drag");
            return DropResult::NotDragging;
        };
        let payload = match codec::decode(&carrier) {
            Ok(payload) => payload,
            Err(e) => return DropResult::Malformed(e),
        };
        let outcome = store.apply(|board| engine::reconcile(board, target, &payload));
        DropResult::Settled { payload, outcome }
    }
}

/// One scripted gesture, as read from a replay script line.
///
/// Either `drag` (a payload) or `carrier` (wire form `<kind> <json>`)
/// starts the drag; a missing `drop` cancels it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Gesture {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drag: Option<DragPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carrier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drop: Option<DropTarget>,
}

impl Gesture {
    /// Play this gesture through `session` against `store`.
    ///
    /// Returns `None` when the gesture was cancelled.
    pub fn play(
        &self,
        session: &mut DragSession,
        store: &mut BoardStore,
    ) -> serde_json::Result<Option<DropResult>> {
        match (&self.drag, &self.carrier) {
            (Some(payload), _) => session.begin(payload)?,
            (None, Some(wire)) => session.begin_with_carrier(DragCarrier::from_wire(wire)),
            (None, None) => session.begin_with_carrier(DragCarrier::new()),
        }
        match &self.drop {
            Some(target) => Ok(Some(session.drop_on(store, target))),
            None => {
                session.cancel();
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{CardDrag, PayloadKind};
    use crate::model::{Board, Card, CardId, Column, Email, EmailId, Priority};

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

    fn card_payload() -> DragPayload {
        DragPayload::Card(CardDrag {
            card_id: "c1".into(),
            source_column_id: "B".into(),
        })
    }

    #[test]
    fn test_drag_and_drop_commits() {
        let mut store = store();
        let mut session = DragSession::new();
        session.begin(&card_payload()).unwrap();
        assert!(session.is_dragging());

        let result = session.drop_on(&mut store, &DropTarget::Column("A".into()));
        assert_eq!(result.outcome(), Some(&Outcome::Reconciled));
        assert_eq!(session.state(), &DragState::Idle);
        assert_eq!(store.revision(), 1);
        assert_eq!(store.get_board().columns[0].cards.len(), 1);
    }

    #[test]
    fn test_cancel_leaves_board_alone() {
        let mut store = store();
        let before = store.get_board();
        let mut session = DragSession::new();
        session.begin(&card_payload()).unwrap();
        session.cancel();
        assert!(!session.is_dragging());
        assert_eq!(
            session.drop_on(&mut store, &DropTarget::Column("A".into())),
            DropResult::NotDragging
        );
        assert_eq!(*store.get_board(), *before);
        assert_eq!(store.revision(), 0);
    }

    #[test]
    fn test_malformed_carrier_is_a_no_op() {
        let mut store = store();
        let mut session = DragSession::new();
        session.begin_with_carrier(DragCarrier::from_wire("card {\"cardId\":"));
        let result = session.drop_on(&mut store, &DropTarget::Column("A".into()));
        assert!(matches!(
            result,
            DropResult::Malformed(DecodeError::Malformed {
                kind: PayloadKind::Card,
                ..
            })
        ));
        assert_eq!(store.revision(), 0);
        assert!(!session.is_dragging());
    }

    #[test]
    fn test_gesture_from_json() {
        let mut store = store();
        let mut session = DragSession::new();
        let line = r#"{"drag":{"kind":"card","cardId":"c1","sourceColumnId":"B"},"drop":{"column":"A"}}"#;
        let gesture: Gesture = serde_json::from_str(line).unwrap();
        let result = gesture.play(&mut session, &mut store).unwrap().unwrap();
        assert_eq!(result.outcome(), Some(&Outcome::Reconciled));

        let cancelled: Gesture =
            serde_json::from_str(r#"{"carrier":"card {\"cardId\":\"c1\",\"sourceColumnId\":\"A\"}"}"#)
                .unwrap();
        assert!(cancelled.play(&mut session, &mut store).unwrap().is_none());
        assert_eq!(store.revision(), 1);
    }
}
