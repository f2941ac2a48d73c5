//! Module `client`
//!
//! Defines the `Client` struct tracking a connected client's address and
//! activity. Sessions carry no login state; every request stands alone.

use std::net::SocketAddr;
use std::time::{Duration, Instant};

/// Represents a connected client.
#[derive(Debug, Clone)]
pub struct Client {
    client_addr: SocketAddr,
    connected_at: Instant,
    requests_handled: u64,
}

impl Client {
    pub fn new(client_addr: SocketAddr) -> Self {
        Self {
            client_addr,
            connected_at: Instant::now(),
            requests_handled: 0,
        }
    }

    /// Counts one more request served on this connection.
    pub fn record_request(&mut self) {
        self.requests_handled += 1;
    }

    pub fn client_addr(&self) -> SocketAddr {
        self.client_addr
    }

    pub fn requests_handled(&self) -> u64 {
        self.requests_handled
    }

    /// Time since the connection was accepted.
    pub fn connected_for(&self) -> Duration {
        self.connected_at.elapsed()
    }
}
