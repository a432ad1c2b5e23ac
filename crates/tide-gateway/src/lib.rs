//! Read-only HTTP surface over scenario allocation snapshots.
pub mod gateway_server;

pub use gateway_server::*;
