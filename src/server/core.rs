use log::{error, info, warn};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Mutex;

use crate::account::AccountService;
use crate::client::{ClientRegistry, handle_client};
use crate::config::NetworkConfig;
use crate::error::ServerError;
use crate::storage::AccountStore;

pub struct Server<S: AccountStore> {
    listener: TcpListener,
    service: Arc<AccountService<S>>,
    client_registry: Arc<Mutex<ClientRegistry>>,
    config: Arc<NetworkConfig>,
}

impl<S: AccountStore> Server<S> {
    /// Binds the listener. Port 0 picks a free port; see `local_addr`.
    pub async fn bind(
        config: NetworkConfig,
        service: AccountService<S>,
    ) -> Result<Self, ServerError> {
        let socket = config.listen_socket();

        let listener = TcpListener::bind(&socket)
            .await
            .map_err(|e| ServerError::Bind(socket.clone(), e))?;
        info!("Server bound to {}", listener.local_addr()?);

        Ok(Self {
            listener,
            service: Arc::new(service),
            client_registry: Arc::new(Mutex::new(ClientRegistry::new(config.max_clients))),
            config: Arc::new(config),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        Ok(self.listener.local_addr()?)
    }

    /// Runs the accept loop forever, one task per connection.
    pub async fn start(&self) {
        info!(
            "Starting RAX account server on {} (max {} clients)",
            self.config.listen_socket(),
            self.config.max_clients
        );

        loop {
            match self.listener.accept().await {
                Ok((stream, addr)) => {
                    let service = Arc::clone(&self.service);
                    let client_registry = Arc::clone(&self.client_registry);
                    let config = Arc::clone(&self.config);

                    // Spawn a task for each client so accept loop doesn't block
                    tokio::spawn(async move {
                        if let Err(e) =
                            handle_client(stream, addr, service, client_registry, config).await
                        {
                            warn!("Failed to handle client {}: {}", addr, e);
                        }
                    });
                }
                Err(e) => {
                    error!("Error accepting connection: {}", e);
                }
            }
        }
    }
}
