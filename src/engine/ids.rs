//! Deterministic id generation.
//!
//! Ids are derived from the board they are added to, so the same board and
//! payload always produce the same next board.

use crate::model::{Board, CardId, ColumnId, EmailId};

/// A card id for a card founded by `email_id`: `card-<email>`, suffixed
/// `-2`, `-3`, ... until unused on `board`.
pub fn fresh_card_id(board: &Board, email_id: &EmailId) -> CardId {
    let base = format!("card-{email_id}");
    first_unused(&base, |candidate| board.has_card_id(&CardId::new(candidate))).into()
}

/// A card id for an explicitly created card, derived from its subject.
pub fn fresh_card_id_for_subject(board: &Board, subject: &str) -> CardId {
    let slug = slugify(subject);
    let base = if slug.is_empty() {
        "card".to_string()
    } else {
        format!("card-{slug}")
    };
    first_unused(&base, |candidate| board.has_card_id(&CardId::new(candidate))).into()
}

/// A column id derived from its title: `column-<slug>`, suffixed on collision.
pub fn fresh_column_id(board: &Board, title: &str) -> ColumnId {
    let slug = slugify(title);
    let base = if slug.is_empty() {
        "column".to_string()
    } else {
        format!("column-{slug}")
    };
    first_unused(&base, |candidate| {
        board.column(&ColumnId::new(candidate)).is_some()
    })
    .into()
}

fn first_unused(base: &str, taken: impl Fn(&str) -> bool) -> String {
    if !taken(base) {
        return base.to_string();
    }
    (2u64..)
        .map(|n| format!("{base}-{n}"))
        .find(|candidate| !taken(candidate))
        .unwrap_or_else(|| base.to_string())
}

/// Lowercase ASCII alphanumerics, runs of anything else collapsed to `-`.
fn slugify(text: &str) -> String {
    let mut slug = String::new();
    let mut pending_dash = false;
    for ch in text.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Card, Column, Email, Priority};

    fn board_with_card(id: &str) -> Board {
        let mut column = Column::new("todo", "To Do", "blue");
        column.cards.push(Card {
            id: CardId::from(id),
            subject: "S".into(),
            emails: vec![Email {
                id: EmailId::from("x"),
                from: String::new(),
                preview: String::new(),
                timestamp: String::new(),
                is_read: false,
            }],
            priority: Priority::Medium,
            labels: vec![],
        });
        Board::new(vec![column])
    }

    #[test]
    fn test_card_id_from_email() {
        let board = Board::default();
        assert_eq!(fresh_card_id(&board, &EmailId::from("e1")), CardId::from("card-e1"));
    }

    #[test]
    fn test_card_id_suffix_on_collision() {
        let board = board_with_card("card-e1");
        assert_eq!(fresh_card_id(&board, &EmailId::from("e1")), CardId::from("card-e1-2"));
    }

    #[test]
    fn test_column_id_from_title() {
        let board = Board::new(vec![Column::new("column-waiting-for-reply", "x", "y")]);
        assert_eq!(
            fresh_column_id(&board, "Waiting for Reply"),
            ColumnId::from("column-waiting-for-reply-2")
        );
        assert_eq!(fresh_column_id(&board, "  !!  "), ColumnId::from("column"));
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify(" Q3 -- Report! "), "q3-report");
        assert_eq!(slugify("Café"), "caf");
    }
}
