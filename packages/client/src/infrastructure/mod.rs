//! Infrastructure layer: concrete implementations of the domain ports.

pub mod api;
pub mod channel;
pub mod dto;
pub mod storage;
