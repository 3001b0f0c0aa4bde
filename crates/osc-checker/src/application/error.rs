//! Error taxonomy shared by the send and receive use cases.
//!
//! Together with [`osc_core::ConversionError`] these are the three kinds of
//! failure an operator can see:
//!
//! - [`ValidationError`] – a form field is empty or malformed; nothing was
//!   attempted on the network.
//! - [`osc_core::ConversionError`] – an argument's text does not match its
//!   declared type; nothing was sent.
//! - [`TransportError`] – the network layer refused a bind, resolve, or send
//!   (or the receive threads could not be started).
//!
//! All of them are local and recoverable.  None of them stop the process.

use std::net::SocketAddr;

use thiserror::Error;

/// Empty or malformed operator input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("host must not be empty")]
    EmptyHost,

    #[error("port must not be empty")]
    EmptyPort,

    /// The port text is not an integer in `0..=65535`.
    #[error("invalid port number: {0:?}")]
    InvalidPort(String),

    #[error("OSC address must not be empty")]
    EmptyAddress,

    /// OSC address patterns always begin with `/`.
    #[error("OSC address must start with '/': {0:?}")]
    AddressWithoutSlash(String),
}

/// Network-level failure while binding, resolving, encoding, or sending.
#[derive(Debug, Error)]
pub enum TransportError {
    /// `host:port` did not resolve to any socket address.
    #[error("could not resolve {target}: {source}")]
    Resolve {
        target: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to bind UDP socket on {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to send to {target}: {source}")]
    Send {
        target: String,
        #[source]
        source: std::io::Error,
    },

    /// The OSC codec rejected the packet.
    #[error("failed to encode OSC packet: {0}")]
    Encode(String),

    /// Resolution succeeded but produced no addresses.
    #[error("{0} resolved to no addresses")]
    NoAddress(String),

    #[error("failed to spawn {name} thread: {source}")]
    Spawn {
        name: &'static str,
        #[source]
        source: std::io::Error,
    },
}

/// Parses operator-entered port text.
///
/// # Errors
///
/// [`ValidationError::EmptyPort`] for empty text and
/// [`ValidationError::InvalidPort`] for anything that is not a `u16`.
pub fn parse_port(text: &str) -> Result<u16, ValidationError> {
    if text.is_empty() {
        return Err(ValidationError::EmptyPort);
    }
    text.parse::<u16>()
        .map_err(|_| ValidationError::InvalidPort(text.to_string()))
}
