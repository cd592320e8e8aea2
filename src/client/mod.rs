//! Client management system
//!
//! Handles per-connection state, the dispatch loop, and connection tracking.

pub mod handler;
pub mod registry;
pub mod state;

pub use handler::handle_client;
pub use registry::ClientRegistry;
pub use state::Client;
