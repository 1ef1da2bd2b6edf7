//! Label policy for emails entering the board.

/// Ingestion-origin labels that never become board labels.
pub const RESERVED_LABELS: [&str; 3] = ["INBOX", "UNREAD", "IMPORTANT"];

pub fn is_reserved(label: &str) -> bool {
    RESERVED_LABELS.contains(&label)
}

/// Drop reserved labels, keeping the rest in order.
pub fn filter_reserved(labels: &[String]) -> Vec<String> {
    labels.iter().filter(|l| !is_reserved(l)).cloned().collect()
}

/// Append the non-reserved `incoming` labels that `existing` lacks.
///
/// Comparison is case-sensitive.
pub fn merge_into(existing: &mut Vec<String>, incoming: &[String]) {
    for label in incoming {
        if !is_reserved(label) && !existing.contains(label) {
            existing.push(label.clone());
        }
    }
}
