//! Drop reconciliation: one decoded payload, one drop target, one next board.

use tracing::debug;

use super::ids::fresh_card_id;
use super::labels::{filter_reserved, merge_into};
use super::{DropTarget, Outcome, Reconciliation};
use crate::codec::{CardDrag, CardEmailDrag, DragPayload};
use crate::model::{Board, Card, CardId, ColumnId, EmailRecord, Priority};

/// Subject given to an extracted card when the payload carries none.
pub const EXTRACTED_SUBJECT: &str = "Extracted Email";

/// Compute the board that results from dropping `payload` on `target`.
///
/// Pure and deterministic. On any outcome other than
/// [`Outcome::Reconciled`] the returned board is the input board.
pub fn reconcile<'a>(
    board: &'a Board,
    target: &DropTarget,
    payload: &DragPayload,
) -> Reconciliation<'a> {
    debug!(kind = %payload.kind(), ?target, "Reconciling drop");

    let result = match (payload, target) {
        (DragPayload::InboxEmail(record), DropTarget::Column(column_id)) => {
            inbox_email_to_column(board, record, column_id)
        }
        (DragPayload::InboxEmail(record), DropTarget::Card(card_id)) => {
            inbox_email_to_card(board, record, card_id)
        }
        (DragPayload::Card(drag), DropTarget::Column(column_id)) => {
            card_to_column(board, drag, column_id)
        }
        (DragPayload::Card(drag), DropTarget::Card(card_id)) => {
            if &drag.card_id == card_id {
                Reconciliation::keep(board, Outcome::Unchanged)
            } else {
                match owning_column(board, card_id) {
                    Some(column_id) => card_to_column(board, drag, &column_id),
                    None => Reconciliation::keep(board, Outcome::NotFound),
                }
            }
        }
        (DragPayload::CardEmail(drag), DropTarget::Column(column_id)) => {
            extract_email(board, drag, column_id)
        }
        (DragPayload::CardEmail(drag), DropTarget::Card(card_id)) => {
            if &drag.source_card_id == card_id {
                Reconciliation::keep(board, Outcome::Unchanged)
            } else {
                match owning_column(board, card_id) {
                    Some(column_id) => extract_email(board, drag, &column_id),
                    None => Reconciliation::keep(board, Outcome::NotFound),
                }
            }
        }
        // Column order changes go through `move_column`, never a drop.
        (DragPayload::Column(_), _) => Reconciliation::keep(board, Outcome::Unchanged),
    };

    debug!(outcome = ?result.outcome, "Drop reconciled");
    result
}

/// The column holding `card_id`, for drops that bubble from a card to its column.
fn owning_column(board: &Board, card_id: &CardId) -> Option<ColumnId> {
    board.find_card(card_id).map(|(column, _)| column.id.clone())
}

fn card_to_column<'a>(
    board: &'a Board,
    drag: &CardDrag,
    target: &ColumnId,
) -> Reconciliation<'a> {
    if &drag.source_column_id == target {
        return Reconciliation::keep(board, Outcome::Unchanged);
    }
    let (Some(source_idx), Some(target_idx)) = (
        board.column_index(&drag.source_column_id),
        board.column_index(target),
    ) else {
        return Reconciliation::keep(board, Outcome::NotFound);
    };
    // Look the card up by id: its index may have shifted since the drag began.
    let Some(card_idx) = board.columns[source_idx]
        .cards
        .iter()
        .position(|c| c.id == drag.card_id)
    else {
        return Reconciliation::keep(board, Outcome::NotFound);
    };

    let mut next = board.clone();
    let card = next.columns[source_idx].cards.remove(card_idx);
    next.columns[target_idx].cards.push(card);
    Reconciliation::changed(next)
}

fn inbox_email_to_column<'a>(
    board: &'a Board,
    record: &EmailRecord,
    target: &ColumnId,
) -> Reconciliation<'a> {
    if let Some(owner) = board.find_email_owner(&record.id) {
        return Reconciliation::keep(board, Outcome::Duplicate(owner.card_id));
    }
    let Some(target_idx) = board.column_index(target) else {
        return Reconciliation::keep(board, Outcome::NotFound);
    };

    let merge_idx = board.columns[target_idx]
        .cards
        .iter()
        .position(|c| c.subject_matches(&record.subject));

    let mut next = board.clone();
    match merge_idx {
        Some(card_idx) => {
            let card = &mut next.columns[target_idx].cards[card_idx];
            card.emails.push(record.to_email());
            merge_into(&mut card.labels, &record.labels);
        }
        None => {
            let card = Card {
                id: fresh_card_id(board, &record.id),
                subject: record.subject.clone(),
                emails: vec![record.to_email()],
                priority: Priority::default(),
                labels: filter_reserved(&record.labels),
            };
            next.columns[target_idx].cards.push(card);
        }
    }
    Reconciliation::changed(next)
}

fn inbox_email_to_card<'a>(
    board: &'a Board,
    record: &EmailRecord,
    target: &CardId,
) -> Reconciliation<'a> {
    if let Some(owner) = board.find_email_owner(&record.id) {
        return Reconciliation::keep(board, Outcome::Duplicate(owner.card_id));
    }
    let Some(loc) = board.locate_card(target) else {
        return Reconciliation::keep(board, Outcome::NotFound);
    };

    let mut next = board.clone();
    let card = next.card_at_mut(loc);
    card.emails.push(record.to_email());
    merge_into(&mut card.labels, &record.labels);
    Reconciliation::changed(next)
}

fn extract_email<'a>(
    board: &'a Board,
    drag: &CardEmailDrag,
    target: &ColumnId,
) -> Reconciliation<'a> {
    let Some(target_idx) = board.column_index(target) else {
        return Reconciliation::keep(board, Outcome::NotFound);
    };
    let Some(source) = board.locate_card(&drag.source_card_id) else {
        return Reconciliation::keep(board, Outcome::NotFound);
    };
    let source_card = &board.columns[source.column].cards[source.card];
    let Some(email_idx) = source_card
        .emails
        .iter()
        .position(|e| e.id == drag.email.id)
    else {
        return Reconciliation::keep(board, Outcome::NotFound);
    };
    // A card never drops to zero emails.
    if source_card.emails.len() <= 1 {
        return Reconciliation::keep(board, Outcome::Rejected);
    }

    let subject = drag
        .subject
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(EXTRACTED_SUBJECT)
        .to_string();

    let mut next = board.clone();
    let email = next.card_at_mut(source).emails.remove(email_idx);
    let card = Card {
        id: fresh_card_id(&next, &email.id),
        subject,
        emails: vec![email],
        priority: Priority::default(),
        labels: Vec::new(),
    };
    next.columns[target_idx].cards.push(card);
    Reconciliation::changed(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::ColumnDrag;
    use crate::model::{Column, Email, EmailId};

    fn email(id: &str) -> Email {
        Email {
            id: EmailId::from(id),
            from: format!("{id}@example.com"),
            preview: format!("preview {id}"),
            timestamp: "1 day ago".into(),
            is_read: false,
        }
    }

    fn card(id: &str, subject: &str, emails: &[&str]) -> Card {
        Card {
            id: CardId::from(id),
            subject: subject.into(),
            emails: emails.iter().map(|e| email(e)).collect(),
            priority: Priority::High,
            labels: vec!["Design".into()],
        }
    }

    fn record(id: &str, subject: &str, labels: &[&str]) -> EmailRecord {
        EmailRecord {
            id: EmailId::from(id),
            subject: subject.into(),
            from: "sender@example.com".into(),
            preview: "hello".into(),
            timestamp: "Just now".into(),
            is_read: false,
            labels: labels.iter().map(|l| l.to_string()).collect(),
        }
    }

    /// A: empty; B: c1 "X" [e1]; C: c2 "Q3 Report" [e2, e3]
    fn board() -> Board {
        let a = Column::new("A", "Column A", "blue");
        let mut b = Column::new("B", "Column B", "green");
        b.cards.push(card("c1", "X", &["e1"]));
        let mut c = Column::new("C", "Column C", "red");
        c.cards.push(card("c2", "Q3 Report", &["e2", "e3"]));
        Board::new(vec![a, b, c])
    }

    fn card_drag(card: &str, source: &str) -> DragPayload {
        DragPayload::Card(CardDrag {
            card_id: card.into(),
            source_column_id: source.into(),
        })
    }

    fn extract(email_id: &str, source: &str) -> DragPayload {
        DragPayload::CardEmail(CardEmailDrag {
            email: email(email_id),
            subject: None,
            source_card_id: source.into(),
        })
    }

    fn col(id: &str) -> DropTarget {
        DropTarget::Column(id.into())
    }

    #[test]
    fn test_move_card_between_columns() {
        let board = board();
        let r = reconcile(&board, &col("A"), &card_drag("c1", "B"));
        assert_eq!(r.outcome, Outcome::Reconciled);
        let next = r.into_board();
        assert_eq!(next.columns[0].cards[0].id, CardId::from("c1"));
        assert!(next.columns[1].cards.is_empty());
        assert!(next.validate().is_empty());
    }

    #[test]
    fn test_move_card_appends_to_end() {
        let board = board();
        let next = reconcile(&board, &col("C"), &card_drag("c1", "B")).into_board();
        let ids: Vec<_> = next.columns[2].cards.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["c2", "c1"]);
    }

    #[test]
    fn test_move_card_same_column_is_unchanged() {
        let board = board();
        let r = reconcile(&board, &col("B"), &card_drag("c1", "B"));
        assert_eq!(r.outcome, Outcome::Unchanged);
        assert!(!r.is_changed());
    }

    #[test]
    fn test_move_card_stale_ids_not_found() {
        let board = board();
        let r = reconcile(&board, &col("A"), &card_drag("c1", "C"));
        assert_eq!(r.outcome, Outcome::NotFound);
        let r = reconcile(&board, &col("A"), &card_drag("c1", "gone"));
        assert_eq!(r.outcome, Outcome::NotFound);
        let r = reconcile(&board, &col("gone"), &card_drag("c1", "B"));
        assert_eq!(r.outcome, Outcome::NotFound);
        assert_eq!(*r.board, board);
    }

    #[test]
    fn test_card_dropped_on_card_lands_in_its_column() {
        let board = board();
        let r = reconcile(&board, &DropTarget::Card("c2".into()), &card_drag("c1", "B"));
        assert_eq!(r.outcome, Outcome::Reconciled);
        assert_eq!(r.board.columns[2].cards.len(), 2);

        let r = reconcile(&board, &DropTarget::Card("c1".into()), &card_drag("c1", "B"));
        assert_eq!(r.outcome, Outcome::Unchanged);
    }

    #[test]
    fn test_inbox_email_creates_card_with_filtered_labels() {
        let board = board();
        let payload = DragPayload::InboxEmail(record("e9", "Launch", &["INBOX", "UNREAD", "Client-X"]));
        let r = reconcile(&board, &col("A"), &payload);
        assert_eq!(r.outcome, Outcome::Reconciled);
        let created = &r.board.columns[0].cards[0];
        assert_eq!(created.id, CardId::from("card-e9"));
        assert_eq!(created.subject, "Launch");
        assert_eq!(created.priority, Priority::Medium);
        assert_eq!(created.labels, vec!["Client-X".to_string()]);
        assert_eq!(created.emails.len(), 1);
        assert_eq!(created.emails[0].preview, "hello");
    }

    #[test]
    fn test_inbox_email_merges_by_subject() {
        let board = board();
        let payload = DragPayload::InboxEmail(record("e4", "q3 report ", &["IMPORTANT", "Finance"]));
        let r = reconcile(&board, &col("C"), &payload);
        assert_eq!(r.outcome, Outcome::Reconciled);
        let next = r.into_board();
        assert_eq!(next.columns[2].cards.len(), 1);
        let merged = &next.columns[2].cards[0];
        let ids: Vec<_> = merged.emails.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["e2", "e3", "e4"]);
        assert_eq!(merged.labels, vec!["Design".to_string(), "Finance".to_string()]);
        assert_eq!(merged.subject, "Q3 Report");
    }

    #[test]
    fn test_merge_only_within_target_column() {
        let board = board();
        let payload = DragPayload::InboxEmail(record("e4", "Q3 Report", &[]));
        let next = reconcile(&board, &col("A"), &payload).into_board();
        assert_eq!(next.columns[0].cards.len(), 1);
        assert_eq!(next.columns[2].cards[0].emails.len(), 2);
    }

    #[test]
    fn test_inbox_email_duplicate() {
        let board = board();
        let payload = DragPayload::InboxEmail(record("e1", "Anything", &[]));
        for target in [col("A"), col("B"), DropTarget::Card("c2".into())] {
            let r = reconcile(&board, &target, &payload);
            assert_eq!(r.outcome, Outcome::Duplicate(CardId::from("c1")));
            assert!(!r.is_changed());
        }
    }

    #[test]
    fn test_inbox_email_onto_card() {
        let board = board();
        let payload = DragPayload::InboxEmail(record("e5", "Unrelated", &["UNREAD", "Ops"]));
        let r = reconcile(&board, &DropTarget::Card("c1".into()), &payload);
        assert_eq!(r.outcome, Outcome::Reconciled);
        let next = r.into_board();
        let (column, card) = next.find_card(&CardId::from("c1")).unwrap();
        assert_eq!(column.id, ColumnId::from("B"));
        assert_eq!(card.subject, "X");
        assert_eq!(card.emails.last().unwrap().id, EmailId::from("e5"));
        assert_eq!(card.labels, vec!["Design".to_string(), "Ops".to_string()]);
    }

    #[test]
    fn test_inbox_email_onto_missing_targets() {
        let board = board();
        let payload = DragPayload::InboxEmail(record("e5", "S", &[]));
        assert_eq!(
            reconcile(&board, &DropTarget::Card("nope".into()), &payload).outcome,
            Outcome::NotFound
        );
        assert_eq!(reconcile(&board, &col("nope"), &payload).outcome, Outcome::NotFound);
    }

    #[test]
    fn test_extract_email_into_new_card() {
        let board = board();
        let r = reconcile(&board, &col("A"), &extract("e3", "c2"));
        assert_eq!(r.outcome, Outcome::Reconciled);
        let next = r.into_board();
        assert_eq!(next.columns[2].cards[0].emails.len(), 1);
        let created = &next.columns[0].cards[0];
        assert_eq!(created.id, CardId::from("card-e3"));
        assert_eq!(created.subject, EXTRACTED_SUBJECT);
        assert!(created.labels.is_empty());
        assert_eq!(created.priority, Priority::Medium);
        // The board's own copy of the email moves, not the payload copy.
        assert_eq!(created.emails[0].preview, "preview e3");
        assert!(next.validate().is_empty());
    }

    #[test]
    fn test_extract_uses_payload_subject() {
        let board = board();
        let payload = DragPayload::CardEmail(CardEmailDrag {
            email: email("e2"),
            subject: Some("  Follow-up ".into()),
            source_card_id: "c2".into(),
        });
        let next = reconcile(&board, &col("C"), &payload).into_board();
        assert_eq!(next.columns[2].cards.len(), 2);
        assert_eq!(next.columns[2].cards[1].subject, "Follow-up");
    }

    #[test]
    fn test_extract_sole_email_rejected() {
        let board = board();
        let r = reconcile(&board, &col("A"), &extract("e1", "c1"));
        assert_eq!(r.outcome, Outcome::Rejected);
        assert_eq!(*r.board, board);
    }

    #[test]
    fn test_extract_missing_refs() {
        let board = board();
        assert_eq!(reconcile(&board, &col("A"), &extract("e9", "c2")).outcome, Outcome::NotFound);
        assert_eq!(reconcile(&board, &col("A"), &extract("e2", "zz")).outcome, Outcome::NotFound);
        assert_eq!(reconcile(&board, &col("zz"), &extract("e2", "c2")).outcome, Outcome::NotFound);
    }

    #[test]
    fn test_extract_onto_cards() {
        let board = board();
        let r = reconcile(&board, &DropTarget::Card("c2".into()), &extract("e2", "c2"));
        assert_eq!(r.outcome, Outcome::Unchanged);

        let r = reconcile(&board, &DropTarget::Card("c1".into()), &extract("e2", "c2"));
        assert_eq!(r.outcome, Outcome::Reconciled);
        assert_eq!(r.board.columns[1].cards.len(), 2);
    }

    #[test]
    fn test_extracted_id_avoids_existing_card() {
        let mut board = board();
        board.columns[2].cards[0].id = CardId::from("card-e3");
        let next = reconcile(&board, &col("A"), &extract("e3", "card-e3")).into_board();
        assert_eq!(next.columns[0].cards[0].id, CardId::from("card-e3-2"));
    }

    #[test]
    fn test_column_payload_is_unchanged() {
        let board = board();
        let payload = DragPayload::Column(ColumnDrag {
            column_id: "A".into(),
        });
        let r = reconcile(&board, &col("C"), &payload);
        assert_eq!(r.outcome, Outcome::Unchanged);
        assert!(!r.is_changed());
    }

    #[test]
    fn test_input_board_is_never_mutated() {
        let board = board();
        let before = board.clone();
        let _ = reconcile(&board, &col("A"), &card_drag("c1", "B"));
        let _ = reconcile(&board, &col("A"), &extract("e3", "c2"));
        assert_eq!(board, before);
    }
}
