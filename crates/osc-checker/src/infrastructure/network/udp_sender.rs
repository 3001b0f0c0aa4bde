//! UDP implementation of [`OscTransport`].
//!
//! Each send resolves `host:port`, encodes the message as a single OSC packet
//! and writes one datagram.  The local socket is bound on first use to an
//! ephemeral port and then reused for every later send of the same address
//! family.  There is no connect step, so one socket can reach any number of
//! targets.
//!
//! # Name resolution
//!
//! `host` may be an IP literal or a DNS name.  When a name resolves to both
//! IPv4 and IPv6 addresses the first IPv4 address wins.

use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};
use std::sync::{Mutex, PoisonError};

use rosc::{encoder, OscMessage, OscPacket};
use tracing::debug;

use crate::application::error::TransportError;
use crate::application::send_message::OscTransport;

/// Sends OSC messages as UDP datagrams.
#[derive(Debug, Default)]
pub struct UdpOscTransport {
    v4: Mutex<Option<UdpSocket>>,
    v6: Mutex<Option<UdpSocket>>,
}

impl UdpOscTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `f` with the cached socket for `dest`'s family, binding it first
    /// if needed.
    fn with_socket<T>(
        &self,
        dest: SocketAddr,
        f: impl FnOnce(&UdpSocket) -> T,
    ) -> Result<T, TransportError> {
        let (slot, local): (&Mutex<Option<UdpSocket>>, SocketAddr) = if dest.is_ipv4() {
            (&self.v4, SocketAddr::from(([0, 0, 0, 0], 0)))
        } else {
            (&self.v6, SocketAddr::from(([0u16; 8], 0)))
        };

        let mut guard = slot.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(socket) = guard.as_ref() {
            return Ok(f(socket));
        }

        let socket = UdpSocket::bind(local).map_err(|source| TransportError::Bind {
            addr: local,
            source,
        })?;
        debug!("OSC sender socket bound on {:?}", socket.local_addr().ok());
        let out = f(&socket);
        *guard = Some(socket);
        Ok(out)
    }
}

impl OscTransport for UdpOscTransport {
    fn send(&self, host: &str, port: u16, message: &OscMessage) -> Result<(), TransportError> {
        let dest = resolve(host, port)?;

        let packet = OscPacket::Message(message.clone());
        let bytes = encoder::encode(&packet).map_err(|e| TransportError::Encode(format!("{e:?}")))?;

        let sent = self.with_socket(dest, |socket| socket.send_to(&bytes, dest))?;
        let len = sent.map_err(|source| TransportError::Send {
            target: dest.to_string(),
            source,
        })?;
        debug!("sent {len} bytes to {dest}: {}", message.addr);
        Ok(())
    }
}

/// Resolves `host:port`, preferring IPv4.
fn resolve(host: &str, port: u16) -> Result<SocketAddr, TransportError> {
    let target = format!("{host}:{port}");
    let addrs: Vec<SocketAddr> = (host, port)
        .to_socket_addrs()
        .map_err(|source| TransportError::Resolve {
            target: target.clone(),
            source,
        })?
        .collect();

    addrs
        .iter()
        .find(|a| a.is_ipv4())
        .or_else(|| addrs.first())
        .copied()
        .ok_or(TransportError::NoAddress(target))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
