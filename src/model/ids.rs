//! Typed identifiers for columns, cards and emails.
//!
//! Each id is an opaque string on the wire (`#[serde(transparent)]`), but
//! distinct types keep a card id from being passed where a column id is
//! expected.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap a raw string id.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the raw id.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Whether the raw id is empty (after trimming).
            pub fn is_blank(&self) -> bool {
                self.0.trim().is_empty()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

define_id!(
    /// Identity of a [`Column`](super::board::Column).
    ColumnId
);

define_id!(
    /// Identity of a [`Card`](super::card::Card), unique across the board.
    CardId
);

define_id!(
    /// Identity of an [`Email`](super::email::Email), stable across the system.
    EmailId
);
