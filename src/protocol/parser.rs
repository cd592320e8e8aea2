//! Message framing
//!
//! Reads one [`InboundMessage`] at a time from a connection. A line that looks
//! like an HTTP request line starts an HTTP request: the head is read up to the
//! empty line, then exactly `Content-Length` body bytes. Chunked bodies are not
//! supported. Any other line is split on whitespace into a command.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt};

use crate::error::GateServerError;
use crate::protocol::{HttpRequest, InboundMessage};

/// Bounds applied while framing
#[derive(Debug, Clone, Copy)]
pub struct FrameLimits {
    pub max_line_length: usize,
    pub max_header_count: usize,
    pub max_body_length: usize,
}

/// Splits a command line into whitespace-separated tokens.
pub fn tokenize(line: &str) -> Vec<String> {
    line.split_whitespace().map(str::to_string).collect()
}

/// Parses `METHOD URI HTTP/x.y` into an empty request, or `None` for anything else.
pub fn parse_request_line(line: &str) -> Option<HttpRequest> {
    let mut parts = line.split_whitespace();
    let (method, uri, version) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some()
        || !version.starts_with("HTTP/")
        || !method.chars().all(|c| c.is_ascii_uppercase())
    {
        return None;
    }
    Some(HttpRequest::new(method, uri, version))
}

/// Reads the next message, skipping blank lines. `Ok(None)` means the peer closed
/// the connection between messages.
pub async fn read_message<R>(
    reader: &mut R,
    limits: FrameLimits,
) -> Result<Option<InboundMessage>, GateServerError>
where
    R: AsyncBufRead + Unpin,
{
    loop {
        let Some(line) = read_line(reader, limits.max_line_length).await? else {
            return Ok(None);
        };
        if line.trim().is_empty() {
            continue;
        }

        return match parse_request_line(&line) {
            Some(request) => read_headers(reader, request, limits).await.map(Some),
            None => Ok(Some(InboundMessage::Command(tokenize(&line)))),
        };
    }
}

async fn read_headers<R>(
    reader: &mut R,
    mut request: HttpRequest,
    limits: FrameLimits,
) -> Result<InboundMessage, GateServerError>
where
    R: AsyncBufRead + Unpin,
{
    loop {
        let Some(line) = read_line(reader, limits.max_line_length).await? else {
            return Err(GateServerError::ProtocolError(
                "connection closed inside HTTP request head".into(),
            ));
        };
        if line.is_empty() {
            break;
        }

        if request.header_count() >= limits.max_header_count {
            return Err(GateServerError::ProtocolError(format!(
                "more than {} headers",
                limits.max_header_count
            )));
        }

        let (name, value) = line.split_once(':').ok_or_else(|| {
            GateServerError::ProtocolError(format!("invalid header line: {}", line))
        })?;
        request.add_header(name.trim(), value.trim());
    }

    let length = body_length(&request, limits.max_body_length)?;
    if length > 0 {
        let mut body = vec![0; length];
        reader.read_exact(&mut body).await.map_err(|_| {
            GateServerError::ProtocolError("connection closed inside HTTP request body".into())
        })?;
        request.set_body(body);
    }
    Ok(InboundMessage::Http(request))
}

/// Declared body size, bounded by `max_len`. Only identity bodies are framed.
fn body_length(request: &HttpRequest, max_len: usize) -> Result<usize, GateServerError> {
    if let Some(encoding) = request.header("Transfer-Encoding") {
        if !encoding.eq_ignore_ascii_case("identity") {
            return Err(GateServerError::ProtocolError(format!(
                "unsupported transfer encoding: {}",
                encoding
            )));
        }
    }

    let Some(value) = request.header("Content-Length") else {
        return Ok(0);
    };
    let length: usize = value.parse().map_err(|_| {
        GateServerError::ProtocolError(format!("invalid Content-Length: {}", value))
    })?;
    if length > max_len {
        return Err(GateServerError::ProtocolError(format!(
            "body longer than {} bytes",
            max_len
        )));
    }
    Ok(length)
}

/// One line without its terminator, or `None` at end of stream.
async fn read_line<R>(reader: &mut R, max_len: usize) -> Result<Option<String>, GateServerError>
where
    R: AsyncBufRead + Unpin,
{
    // One byte past the limit tells an overlong line from one that is exactly
    // `max_len` bytes and ends at EOF.
    let mut line = String::new();
    let n = (&mut *reader)
        .take(max_len as u64 + 1)
        .read_line(&mut line)
        .await?;

    if n == 0 {
        return Ok(None);
    }
    if n > max_len {
        return Err(GateServerError::ProtocolError(format!(
            "line longer than {} bytes",
            max_len
        )));
    }

    let trimmed = line.trim_end_matches(['\r', '\n']).len();
    line.truncate(trimmed);
    Ok(Some(line))
}
