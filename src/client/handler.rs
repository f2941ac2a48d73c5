use log::{debug, error, info, warn};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::sync::Mutex;
use tokio::time::timeout;

use crate::account::AccountService;
use crate::client::{Client, ClientRegistry};
use crate::config::NetworkConfig;
use crate::error::ProtocolError;
use crate::middleware::logging::{log_command, log_connection};
use crate::protocol::responses::{READY, SERVICE_UNAVAILABLE, format_error, format_message};
use crate::protocol::{CommandStatus, handle_command, handle_protocol_error, parse_command};
use crate::storage::AccountStore;

/// Handles one client connection using the Tokio async runtime.
///
/// - Admits the client into `clients` or turns it away when the registry is full.
/// - Reads newline-terminated requests, bounded by `max_request_length`.
/// - Dispatches each request with `handle_command` and writes back one response line.
/// - Closes on QUIT, EOF or the idle timeout.
pub async fn handle_client<S: AccountStore>(
    stream: TcpStream,
    client_addr: SocketAddr,
    service: Arc<AccountService<S>>,
    clients: Arc<Mutex<ClientRegistry>>,
    config: Arc<NetworkConfig>,
) -> Result<(), std::io::Error> {
    let (read_half, mut write_half) = stream.into_split();

    {
        let mut registry = clients.lock().await;
        if !registry.try_insert(Client::new(client_addr)) {
            warn!(
                "Rejecting {}: {} clients already connected",
                client_addr,
                registry.max_clients()
            );
            drop(registry);
            write_half
                .write_all(
                    format_error(
                        SERVICE_UNAVAILABLE,
                        "too_many_connections",
                        "too many connections, try again later",
                    )
                    .as_bytes(),
                )
                .await?;
            return Ok(());
        }
        log_connection(&client_addr, registry.len(), registry.max_clients());
    }

    let result = serve(
        BufReader::new(read_half),
        &mut write_half,
        client_addr,
        &service,
        &clients,
        &config,
    )
    .await;

    if let Err(e) = &result {
        error!("Session with {} failed: {}", client_addr, e);
    }

    let mut registry = clients.lock().await;
    if let Some(client) = registry.remove(&client_addr) {
        info!(
            "Client {} disconnected after {} requests ({:.1?})",
            client_addr,
            client.requests_handled(),
            client.connected_for()
        );
    }

    result
}

async fn serve<S: AccountStore>(
    mut reader: BufReader<OwnedReadHalf>,
    write_half: &mut OwnedWriteHalf,
    client_addr: SocketAddr,
    service: &AccountService<S>,
    clients: &Mutex<ClientRegistry>,
    config: &NetworkConfig,
) -> Result<(), std::io::Error> {
    write_half
        .write_all(format_message(READY, "account service ready").as_bytes())
        .await?;
    write_half.flush().await?;

    let limit = config.max_request_length;
    let mut buf = Vec::with_capacity(256);

    loop {
        buf.clear();

        let read = timeout(
            config.idle_timeout(),
            (&mut reader).take(limit as u64).read_until(b'\n', &mut buf),
        )
        .await;

        let n = match read {
            Ok(Ok(n)) => n,
            Ok(Err(e)) => return Err(e),
            Err(_) => {
                info!("Client {} idle, closing connection", client_addr);
                return Ok(());
            }
        };

        if n == 0 {
            info!("Connection closed by client {}", client_addr);
            return Ok(());
        }

        // Hit the limit without a terminator: reject and skip the rest of the line
        if n >= limit && !buf.ends_with(b"\n") {
            let result = handle_protocol_error(&ProtocolError::RequestTooLong(limit));
            if let Some(msg) = result.message {
                write_half.write_all(msg.as_bytes()).await?;
            }
            if timeout(config.idle_timeout(), discard_line(&mut reader))
                .await
                .is_err()
            {
                info!("Client {} idle, closing connection", client_addr);
                return Ok(());
            }
            continue;
        }

        let line = match std::str::from_utf8(&buf) {
            Ok(line) => line,
            Err(_) => {
                let result = handle_protocol_error(&ProtocolError::MalformedBody(
                    "request is not valid UTF-8".into(),
                ));
                if let Some(msg) = result.message {
                    write_half.write_all(msg.as_bytes()).await?;
                }
                continue;
            }
        };

        if line.trim().is_empty() {
            continue;
        }

        let command = parse_command(line);
        log_command(&client_addr, &command);

        if let Some(client) = clients.lock().await.get_mut(&client_addr) {
            client.record_request();
        }

        let result = handle_command(service, command).await;

        if let CommandStatus::Failure(reason) = &result.status {
            debug!("Request from {} failed: {}", client_addr, reason);
        }

        if let Some(msg) = &result.message {
            write_half.write_all(msg.as_bytes()).await?;
        }

        if result.status == CommandStatus::CloseConnection {
            info!("Client {} requested to quit", client_addr);
            return Ok(());
        }
    }
}

/// Consumes input up to and including the next newline without buffering it.
async fn discard_line(reader: &mut BufReader<OwnedReadHalf>) -> Result<(), std::io::Error> {
    loop {
        let available = reader.fill_buf().await?;
        if available.is_empty() {
            return Ok(());
        }

        if let Some(pos) = available.iter().position(|&b| b == b'\n') {
            reader.consume(pos + 1);
            return Ok(());
        }

        let len = available.len();
        reader.consume(len);
    }
}
