//! Wire protocol
//!
//! Message framing, inbound message shapes, and the downstream handler that
//! serves connections after authentication.

pub mod commands;
pub mod handlers;
pub mod message;
pub mod parser;
pub mod responses;

pub use commands::{Command, CommandResult, CommandStatus};
pub use handlers::handle_message;
pub use message::{HttpRequest, InboundMessage};
pub use parser::{FrameLimits, read_message};
