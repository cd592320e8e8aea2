//! Response formatting
//!
//! Line responses for command clients and minimal HTTP responses.

pub const HTTP_OK: u16 = 200;
pub const HTTP_BAD_REQUEST: u16 = 400;

/// Format a line response for a command client
pub fn format_line(message: &str) -> String {
    format!("{}\n", message)
}

/// Format a plain-text HTTP/1.1 response
pub fn format_http(status: u16, reason: &str, body: &str) -> String {
    format!(
        "HTTP/1.1 {} {}\r\nContent-Type: text/plain\r\nContent-Length: {}\r\n\r\n{}",
        status,
        reason,
        body.len(),
        body
    )
}
