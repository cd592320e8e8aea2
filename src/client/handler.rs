use log::{debug, info};
use tokio::io::{AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

use crate::auth::GateAction;
use crate::client::Client;
use crate::error::GateServerError;
use crate::error::handlers::handle_error;
use crate::middleware::logging::{log_authenticated, log_gate_closed};
use crate::protocol::{CommandStatus, FrameLimits, handle_message, read_message};

/// Runs one connection's dispatch loop.
///
/// - Messages are read and handled strictly one at a time.
/// - While the client's gate is active every message goes to the gate first;
///   once it has passed, the gate is skipped and messages go straight downstream.
/// - Any gate rejection, framing error or read error ends the connection.
pub async fn handle_client(cmd_stream: TcpStream, mut client: Client, limits: FrameLimits) {
    let client_addr = *client.client_addr();
    let (read_half, mut write_half) = cmd_stream.into_split();
    let mut reader = BufReader::new(read_half);

    loop {
        let message = match read_message(&mut reader, limits).await {
            Ok(Some(message)) => message,
            Ok(None) => {
                info!("Connection closed by client {}", client_addr);
                break;
            }
            Err(e) => {
                handle_error(&e);
                break;
            }
        };
        client.record_message();
        debug!("Received {} message from {}", message.kind(), client_addr);

        if !client.is_authenticated() {
            match client.gate_mut().process(&message).await {
                GateAction::Authenticated => {
                    log_authenticated(&client_addr);
                    continue;
                }
                GateAction::Forward => {}
                GateAction::Close(reason) => {
                    log_gate_closed(&client_addr, &reason);
                    break;
                }
            }
        }

        let result = handle_message(&message);
        if let Some(msg) = result.message {
            if let Err(e) = write_half.write_all(msg.as_bytes()).await {
                handle_error(&GateServerError::from(e));
                break;
            }
        }

        match result.status {
            CommandStatus::CloseConnection => {
                info!("Client {} requested to exit", client_addr);
                break;
            }
            CommandStatus::Failure(reason) => debug!("Request from {} failed: {}", client_addr, reason),
            CommandStatus::Success => {}
        }
    }

    let _ = write_half.shutdown().await;
    debug!(
        "Dispatch loop for {} ended after {} messages",
        client_addr,
        client.messages_received()
    );
}
