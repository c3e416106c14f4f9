//! Domain logic for the project-progress portal.
//!
//! Everything in this crate is pure: the static project catalog, the
//! per-user progress state machine, reward tiers, the canned chat bot and
//! the chat message types. Persistence lives in `kevs-db`, HTTP in
//! `kevs-api`.

pub mod bot;
pub mod catalog;
pub mod chat;
pub mod error;
pub mod progress;
pub mod rewards;
pub mod types;
