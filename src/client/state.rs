//! Module `client`
//!
//! Defines the `Client` struct: the per-connection state the dispatch loop owns,
//! including the connection's authentication gate.

use std::net::SocketAddr;

use crate::auth::{AuthenticationGate, GateState};

/// Represents the state of a connected client.
///
/// Owned by exactly one dispatch task; never shared across connections.
pub struct Client {
    client_addr: SocketAddr,
    gate: AuthenticationGate,
    messages_received: u64,
}

impl Client {
    pub fn new(client_addr: SocketAddr, gate: AuthenticationGate) -> Self {
        Self {
            client_addr,
            gate,
            messages_received: 0,
        }
    }

    // --------------------
    // Getter methods
    // --------------------

    /// Returns the client's socket address.
    pub fn client_addr(&self) -> &SocketAddr {
        &self.client_addr
    }

    /// Returns whether the client has passed the authentication gate.
    pub fn is_authenticated(&self) -> bool {
        self.gate.state() == GateState::Passed
    }

    /// Number of messages read from this connection so far.
    pub fn messages_received(&self) -> u64 {
        self.messages_received
    }

    // --------------------
    // Mutators
    // --------------------

    /// The gate, for the dispatch loop to run messages through.
    pub fn gate_mut(&mut self) -> &mut AuthenticationGate {
        &mut self.gate
    }

    pub fn record_message(&mut self) {
        self.messages_received += 1;
    }
}
