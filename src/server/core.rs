use log::{error, info, warn};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;

use crate::auth::{AuthenticationGate, Validator, create_validator};
use crate::client::{Client, ClientRegistry, handle_client};
use crate::config::ServerConfig;
use crate::error::GateServerError;
use crate::middleware::logging::{log_connection, log_disconnect};
use crate::protocol::FrameLimits;

pub struct Server {
    client_registry: Arc<Mutex<ClientRegistry>>,
    validator: Arc<dyn Validator>,
    listener: TcpListener,
    config: Arc<ServerConfig>,
}

impl Server {
    /// Validates `config`, builds the configured validator and binds the listener.
    pub async fn bind(config: ServerConfig) -> Result<Self, GateServerError> {
        config.validate()?;
        let validator = create_validator(&config.login_module, &config.validator_options())?;

        let socket = config.listen_socket();
        let listener = TcpListener::bind(&socket).await.map_err(|e| {
            error!("Failed to bind to {}: {}", socket, e);
            GateServerError::IoError(e)
        })?;
        info!("Server bound to {}", listener.local_addr()?);

        Ok(Self {
            client_registry: Arc::new(Mutex::new(ClientRegistry::new(config.max_clients))),
            validator,
            listener,
            config: Arc::new(config),
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub async fn start(&self) {
        info!(
            "Starting auth gate on {} with {} validator (max {} clients)",
            self.config.listen_socket(),
            self.validator.name(),
            self.config.max_clients
        );

        loop {
            match self.listener.accept().await {
                Ok((stream, addr)) => {
                    let client_registry = Arc::clone(&self.client_registry);
                    let validator = Arc::clone(&self.validator);
                    let config = Arc::clone(&self.config);

                    // Spawn a task for each client so accept loop doesn't block
                    tokio::spawn(async move {
                        handle_new_client(stream, addr, client_registry, validator, config).await;
                    });
                }
                Err(e) => {
                    error!("Error accepting connection: {}", e);
                }
            }
        }
    }
}

/// Registers a new connection, gives it a fresh gate, and runs its dispatch loop.
async fn handle_new_client(
    stream: TcpStream,
    client_addr: SocketAddr,
    client_registry: Arc<Mutex<ClientRegistry>>,
    validator: Arc<dyn Validator>,
    config: Arc<ServerConfig>,
) {
    {
        let mut clients = client_registry.lock().await;
        if !clients.try_insert(client_addr) {
            warn!(
                "Refusing {}: {} clients already connected",
                client_addr,
                clients.max_clients()
            );
            return;
        }
        log_connection(&client_addr, clients.len(), clients.max_clients());
    }

    let gate = AuthenticationGate::new(validator, config.missing_credentials);
    let limits = FrameLimits {
        max_line_length: config.max_command_length,
        max_header_count: config.max_header_count,
        max_body_length: config.max_body_length,
    };
    handle_client(stream, Client::new(client_addr, gate), limits).await;

    client_registry.lock().await.remove(&client_addr);
    log_disconnect(&client_addr);
}
