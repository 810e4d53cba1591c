//! Data Transfer Objects (DTOs) for the game server.
//!
//! DTOs are organized by protocol:
//! - `model`: room, player and chat shapes shared by both protocols
//! - `websocket`: event envelope and event payload DTOs
//! - `http`: HTTP API request and response DTOs

pub mod conversion;
pub mod http;
pub mod model;
pub mod websocket;
