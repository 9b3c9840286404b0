//! Chatwork API client module
//!
//! Thin wrapper around the three Chatwork REST endpoints this service proxies.

pub mod client;

pub use client::ChatworkClient;

/// Chatwork room identifier
pub type RoomId = i64;
