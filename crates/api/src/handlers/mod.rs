pub mod auth;
pub mod catalog;
pub mod chat;
pub mod progress;
pub mod user;
