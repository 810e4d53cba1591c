//! Utilities shared by the Project 42 packages.

pub mod logger;
pub mod time;
