//! `GameApi` implementations.

pub mod http;

pub use http::HttpGameApi;
