//! Network infrastructure: the two UDP adapters.
//!
//! # Sub-modules
//!
//! - **`udp_sender`** – Implements `OscTransport`.  Resolves `host:port`,
//!   encodes the message with `rosc`, and sends one datagram from an
//!   ephemeral local port.
//!
//! - **`udp_listener`** – Implements `InboundSource`.  Binds
//!   `127.0.0.1:<port>`, decodes each datagram on a background thread, and
//!   forwards the rendered messages over an async channel.

pub mod udp_listener;
pub mod udp_sender;
