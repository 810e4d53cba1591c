//! `PasswordMemory` implementations.

pub mod password;

pub use password::{InMemoryPasswordMemory, JsonFilePasswordMemory};
