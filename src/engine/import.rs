//! Bulk import: one card per ingested email.

use std::collections::HashSet;

use serde::Serialize;
use tracing::{debug, info};

use super::ids::fresh_card_id;
use super::labels::filter_reserved;
use super::{Outcome, Reconciliation};
use crate::model::{Board, Card, ColumnId, EmailId, EmailRecord, Priority};

/// What an import did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    /// Cards created, one per record.
    pub created: usize,
    /// Ids skipped because they were already on the board or repeated in the batch.
    pub skipped: Vec<EmailId>,
}

/// Add each record as its own single-email card at the end of `column_id`.
///
/// Records whose id is already on the board (or earlier in the same batch)
/// are skipped, so the board never holds an email twice.
pub fn import_emails<'a>(
    board: &'a Board,
    column_id: &ColumnId,
    records: &[EmailRecord],
) -> (Reconciliation<'a>, ImportReport) {
    let mut report = ImportReport::default();
    let Some(column_idx) = board.column_index(column_id) else {
        return (Reconciliation::keep(board, Outcome::NotFound), report);
    };

    let mut next = board.clone();
    let mut seen: HashSet<&EmailId> = HashSet::new();
    for record in records {
        if !seen.insert(&record.id) || board.find_email_owner(&record.id).is_some() {
            debug!(id = %record.id, "Skipping email already on the board");
            report.skipped.push(record.id.clone());
            continue;
        }
        let card = Card {
            id: fresh_card_id(&next, &record.id),
            subject: record.subject.clone(),
            emails: vec![record.to_email()],
            priority: Priority::default(),
            labels: filter_reserved(&record.labels),
        };
        next.columns[column_idx].cards.push(card);
        report.created += 1;
    }

    info!(
        column = %column_id,
        created = report.created,
        skipped = report.skipped.len(),
        "Imported emails"
    );

    if report.created == 0 {
        (Reconciliation::keep(board, Outcome::Unchanged), report)
    } else {
        (Reconciliation::changed(next), report)
    }
}
