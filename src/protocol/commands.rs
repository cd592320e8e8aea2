//! Module `commands`
//!
//! Commands understood by the downstream RPC handler once a connection is
//! through the gate, and the result type handlers return.

/// A command line received after authentication.
#[derive(Debug, PartialEq)]
pub enum Command {
    Version,
    Exit,
    Unknown(String),
}

/// Represents the outcome status of executing a command.
#[derive(Debug, PartialEq)]
pub enum CommandStatus {
    Success,
    Failure(String),
    CloseConnection,
}

/// Struct encapsulating the full result of a command execution.
#[derive(Debug)]
pub struct CommandResult {
    pub status: CommandStatus,
    pub message: Option<String>,
}

/// Parses tokens into a [`Command`]. The command word is case-insensitive.
pub fn parse_command(tokens: &[String]) -> Command {
    let Some(first) = tokens.first() else {
        return Command::Unknown(String::new());
    };

    match first.to_ascii_lowercase().as_str() {
        "version" => Command::Version,
        "exit" => Command::Exit,
        _ => Command::Unknown(first.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(line: &str) -> Vec<String> {
        line.split_whitespace().map(String::from).collect()
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_command(&tokens("version")), Command::Version);
        assert_eq!(parse_command(&tokens("VERSION extra")), Command::Version);
        assert_eq!(parse_command(&tokens("exit")), Command::Exit);
        assert_eq!(
            parse_command(&tokens("put sys.cpu 1 2")),
            Command::Unknown("put".into())
        );
        assert_eq!(parse_command(&[]), Command::Unknown(String::new()));
    }
}
