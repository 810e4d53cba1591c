//! Room synchronization client for Project 42.
//!
//! Keeps one room screen's view of a game room consistent with the server's
//! pushed events, and sends the player's commands back.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
