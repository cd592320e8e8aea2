//! Logging middleware
//!
//! Connection lifecycle log lines shared by the accept loop and the dispatch loop.

use log::{info, warn};
use std::net::SocketAddr;

/// Log a client connection
pub fn log_connection(client_addr: &SocketAddr, active: usize, max: usize) {
    info!("Client connected: {} ({}/{} clients)", client_addr, active, max);
}

/// Log a connection that passed the gate
pub fn log_authenticated(client_addr: &SocketAddr) {
    info!("Client {} authenticated", client_addr);
}

/// Log a connection closed by the gate. The reason stays local.
pub fn log_gate_closed(client_addr: &SocketAddr, reason: &str) {
    warn!("Closing {}: {}", client_addr, reason);
}

/// Log a client disconnect
pub fn log_disconnect(client_addr: &SocketAddr) {
    info!("Client {} disconnected", client_addr);
}
