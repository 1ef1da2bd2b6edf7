//! `mailboard`: an email kanban board with drag-and-drop reconciliation.
//!
//! The board (columns of cards, each card a thread of emails) lives in a
//! [`store::BoardStore`]. Drag gestures travel through a string-keyed
//! carrier ([`codec`]) and are settled against the board by the pure
//! [`engine::reconcile`] function, which returns the next board and an
//! [`engine::Outcome`] without ever mutating its input.

pub mod codec;
pub mod config;
pub mod engine;
pub mod error;
pub mod feedback;
pub mod i18n;
pub mod ingest;
pub mod model;
pub mod session;
pub mod store;
