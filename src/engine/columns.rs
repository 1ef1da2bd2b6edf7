//! Explicit column operations: add, edit, delete, reorder.

use tracing::debug;

use super::ids::fresh_column_id;
use super::{Outcome, Reconciliation};
use crate::model::{Board, Column, ColumnId};

/// Append a new empty column. A blank title is rejected.
pub fn add_column<'a>(board: &'a Board, title: &str, color: &str) -> Reconciliation<'a> {
    let title = title.trim();
    if title.is_empty() {
        return Reconciliation::keep(board, Outcome::Rejected);
    }
    let id = fresh_column_id(board, title);
    debug!(%id, title, "Adding column");

    let mut next = board.clone();
    next.columns.push(Column::new(id, title, color));
    Reconciliation::changed(next)
}

/// Change a column's title and color.
pub fn edit_column<'a>(
    board: &'a Board,
    column_id: &ColumnId,
    title: &str,
    color: &str,
) -> Reconciliation<'a> {
    let title = title.trim();
    if title.is_empty() {
        return Reconciliation::keep(board, Outcome::Rejected);
    }
    let Some(idx) = board.column_index(column_id) else {
        return Reconciliation::keep(board, Outcome::NotFound);
    };
    let current = &board.columns[idx];
    if current.title == title && current.color == color {
        return Reconciliation::keep(board, Outcome::Unchanged);
    }

    let mut next = board.clone();
    next.columns[idx].title = title.to_string();
    next.columns[idx].color = color.to_string();
    Reconciliation::changed(next)
}

/// Remove a column together with its cards and their emails.
///
/// The last remaining column cannot be deleted.
pub fn delete_column<'a>(board: &'a Board, column_id: &ColumnId) -> Reconciliation<'a> {
    let Some(idx) = board.column_index(column_id) else {
        return Reconciliation::keep(board, Outcome::NotFound);
    };
    if board.columns.len() <= 1 {
        return Reconciliation::keep(board, Outcome::Rejected);
    }
    debug!(
        id = %column_id,
        cards = board.columns[idx].cards.len(),
        "Deleting column"
    );

    let mut next = board.clone();
    next.columns.remove(idx);
    Reconciliation::changed(next)
}

/// Move a column to just before `before`, or to the end when `before` is `None`.
pub fn move_column<'a>(
    board: &'a Board,
    column_id: &ColumnId,
    before: Option<&ColumnId>,
) -> Reconciliation<'a> {
    let Some(from) = board.column_index(column_id) else {
        return Reconciliation::keep(board, Outcome::NotFound);
    };
    if before == Some(column_id) {
        return Reconciliation::keep(board, Outcome::Unchanged);
    }

    let mut next = board.clone();
    let column = next.columns.remove(from);
    let to = match before {
        Some(anchor) => match next.column_index(anchor) {
            Some(idx) => idx,
            None => return Reconciliation::keep(board, Outcome::NotFound),
        },
        None => next.columns.len(),
    };
    if to == from {
        return Reconciliation::keep(board, Outcome::Unchanged);
    }
    next.columns.insert(to, column);
    Reconciliation::changed(next)
}
