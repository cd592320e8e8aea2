//! Client registry
//!
//! Tracks which peers currently hold a connection so the accept loop can
//! enforce `max_clients`.

use std::collections::HashSet;
use std::net::SocketAddr;

/// Registry for tracking active connections
pub struct ClientRegistry {
    clients: HashSet<SocketAddr>,
    max_clients: usize,
}

impl ClientRegistry {
    pub fn new(max_clients: usize) -> Self {
        Self {
            clients: HashSet::new(),
            max_clients,
        }
    }

    /// Registers `addr`, or returns false when the registry is full.
    pub fn try_insert(&mut self, addr: SocketAddr) -> bool {
        if self.clients.len() >= self.max_clients {
            return false;
        }
        self.clients.insert(addr);
        true
    }

    pub fn remove(&mut self, addr: &SocketAddr) -> bool {
        self.clients.remove(addr)
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    pub fn max_clients(&self) -> usize {
        self.max_clients
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(port: u16) -> SocketAddr {
        SocketAddr::from(([127, 0, 0, 1], port))
    }

    #[test]
    fn test_enforces_capacity() {
        let mut registry = ClientRegistry::new(2);
        assert!(registry.try_insert(addr(1)));
        assert!(registry.try_insert(addr(2)));
        assert!(!registry.try_insert(addr(3)));
        assert_eq!(registry.len(), 2);

        assert!(registry.remove(&addr(1)));
        assert!(registry.try_insert(addr(3)));
        assert!(!registry.remove(&addr(9)));
    }
}
