//! Downstream message handler
//!
//! Stands in for the rest of the server behind the gate: answers `version`,
//! honours `exit`, and replies to any HTTP request with the server version.

use crate::protocol::commands::{Command, CommandResult, CommandStatus, parse_command};
use crate::protocol::responses::{HTTP_BAD_REQUEST, HTTP_OK, format_http, format_line};
use crate::protocol::{HttpRequest, InboundMessage};

fn version_string() -> String {
    format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}

/// Dispatches a message forwarded by the gate.
pub fn handle_message(message: &InboundMessage) -> CommandResult {
    match message {
        InboundMessage::Command(tokens) => handle_command(&parse_command(tokens)),
        InboundMessage::Http(request) => handle_http(request),
        InboundMessage::Other(kind) => CommandResult {
            status: CommandStatus::Failure(format!("unsupported message type: {}", kind)),
            message: None,
        },
    }
}

fn handle_command(command: &Command) -> CommandResult {
    match command {
        Command::Version => CommandResult {
            status: CommandStatus::Success,
            message: Some(format_line(&version_string())),
        },
        Command::Exit => CommandResult {
            status: CommandStatus::CloseConnection,
            message: None,
        },
        Command::Unknown(name) => CommandResult {
            status: CommandStatus::Failure(format!("unknown command: {}", name)),
            message: Some(format_line(&format!("unknown command: {}", name))),
        },
    }
}

fn handle_http(request: &HttpRequest) -> CommandResult {
    if !request.version.starts_with("HTTP/1.") {
        return CommandResult {
            status: CommandStatus::Failure(format!("unsupported version {}", request.version)),
            message: Some(format_http(HTTP_BAD_REQUEST, "Bad Request", "")),
        };
    }

    CommandResult {
        status: CommandStatus::Success,
        message: Some(format_http(HTTP_OK, "OK", &version_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(line: &str) -> InboundMessage {
        InboundMessage::Command(line.split_whitespace().map(String::from).collect())
    }

    #[test]
    fn test_version() {
        let result = handle_message(&command("version"));
        assert_eq!(result.status, CommandStatus::Success);
        assert_eq!(
            result.message.as_deref(),
            Some(format!("tsd-auth-gate {}\n", env!("CARGO_PKG_VERSION")).as_str())
        );
    }

    #[test]
    fn test_exit_closes() {
        assert_eq!(
            handle_message(&command("exit")).status,
            CommandStatus::CloseConnection
        );
    }

    #[test]
    fn test_unknown_command() {
        let result = handle_message(&command("put sys.cpu 1 2"));
        assert_eq!(result.message.as_deref(), Some("unknown command: put\n"));
    }

    #[test]
    fn test_http_request() {
        let request = HttpRequest::new("GET", "/api/version", "HTTP/1.1");
        let result = handle_message(&InboundMessage::Http(request));
        assert!(result.message.unwrap().starts_with("HTTP/1.1 200 OK"));

        let request = HttpRequest::new("GET", "/", "HTTP/2.0");
        let result = handle_message(&InboundMessage::Http(request));
        assert!(matches!(result.status, CommandStatus::Failure(_)));
    }
}
