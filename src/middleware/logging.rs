//! Logging middleware
//!
//! Provides request logging. Only the verb and non-secret fields are logged.

use log::{debug, info};
use std::net::SocketAddr;

use crate::protocol::Command;

/// Log a client connection
pub fn log_connection(client_addr: &SocketAddr, connected: usize, max_clients: usize) {
    info!(
        "Client connected: {} ({}/{} clients)",
        client_addr, connected, max_clients
    );
}

/// Log a client command
pub fn log_command(client_addr: &SocketAddr, command: &Command) {
    match command {
        Command::Register(req) => {
            info!("Client {} executed: REGISTER phone={}", client_addr, req.phone)
        }
        Command::Login(req) => {
            info!("Client {} executed: LOGIN phone={}", client_addr, req.phone)
        }
        Command::Profile(id) => info!("Client {} executed: PROFILE {}", client_addr, id),
        Command::Invalid(err) => debug!("Client {} sent invalid request: {}", client_addr, err),
        other => debug!("Client {} executed: {}", client_addr, other.verb()),
    }
}
