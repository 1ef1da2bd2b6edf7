//! Core data model: emails, cards, columns and the board.

pub mod board;
pub mod card;
pub mod email;
pub mod ids;

pub use board::{Board, CardLocation, Column, EmailOwner, InvariantViolation};
pub use card::{Card, Priority};
pub use email::{Email, EmailRecord};
pub use ids::{CardId, ColumnId, EmailId};
