//! `EventChannel` implementations.
//!
//! - `websocket`: the live connection to the game server
//! - `inmemory`: a loopback channel driven by hand (tests, demos)

pub mod inmemory;
pub mod registry;
pub mod websocket;

pub use inmemory::InMemoryEventChannel;
pub use registry::ListenerRegistry;
pub use websocket::WebSocketEventChannel;
