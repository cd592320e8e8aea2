//! Server core functionality
//!
//! The accept loop: binds the listener, builds the shared validator, and hands
//! each connection its own authentication gate.

pub mod core;

pub use self::core::Server;
