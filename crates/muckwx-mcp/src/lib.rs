//! MCP 2.1 client for publishing to a MUCK
//!
//! Implements the out-of-band half of the MUD Client Protocol that the
//! weather publisher needs: one session per run, negotiating a single
//! package and issuing a single call before disconnecting.

pub mod message;
pub mod session;

pub use message::*;
pub use session::*;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum McpError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TLS error: {0}")]
    Tls(String),

    #[error("Handshake failed: {0}")]
    Handshake(String),

    #[error("Server speaks unsupported MCP range {0}")]
    UnsupportedVersion(String),

    #[error("Invalid value for {0}: embedded line break")]
    InvalidValue(String),

    #[error("Invalid MUCK sink configuration: {0}")]
    Config(String),

    #[error("Timeout waiting for server")]
    Timeout,

    #[error("Connection closed during negotiation")]
    ConnectionClosed,
}

pub type McpResult<T> = Result<T, McpError>;
