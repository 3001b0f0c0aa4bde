//! UDP implementation of [`InboundSource`].
//!
//! [`UdpInboundSource::open`] binds `127.0.0.1:<port>` and spawns an acceptor
//! thread that:
//!
//! 1. Receives one datagram (at most [`rosc::decoder::MTU`] bytes).
//! 2. Decodes it as an OSC packet.  Datagrams that fail to decode are logged
//!    at `debug` and dropped.
//! 3. Flattens bundles (recursively) into their messages, in order.  Bundle
//!    time tags are ignored; everything is delivered immediately.
//! 4. Renders each message's values as text and forwards an
//!    [`InboundMessage`] over the channel.
//!
//! The acceptor runs on a dedicated OS thread so blocking socket I/O never
//! touches the Tokio runtime.
//!
//! # Stopping
//!
//! The acceptor re-checks the `running` flag after every read.  The stream's
//! waker sends one empty datagram to the bound address, so a stop wakes a
//! blocked read at once and the socket is dropped (releasing the port) right
//! after.  The short read timeout covers a lost wake-up datagram.

use std::net::{SocketAddr, UdpSocket};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use osc_core::render_values;
use rosc::{decoder, OscMessage, OscPacket};
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::application::error::TransportError;
use crate::application::receive_messages::{InboundMessage, InboundSource, InboundStream, StopWaker};

/// How long one `recv_from` may block before the running flag is re-checked.
pub const READ_TIMEOUT: Duration = Duration::from_millis(200);

/// Capacity of the acceptor → log pump channel.
const CHANNEL_CAPACITY: usize = 256;

/// Receives OSC datagrams on the loopback interface.
#[derive(Debug, Default, Clone, Copy)]
pub struct UdpInboundSource;

impl UdpInboundSource {
    pub fn new() -> Self {
        Self
    }
}

impl InboundSource for UdpInboundSource {
    fn open(&self, port: u16, running: Arc<AtomicBool>) -> Result<InboundStream, TransportError> {
        let addr = SocketAddr::from(([127, 0, 0, 1], port));
        let socket = UdpSocket::bind(addr).map_err(|source| TransportError::Bind { addr, source })?;
        // Without the timeout the acceptor could never observe a stop.
        socket
            .set_read_timeout(Some(READ_TIMEOUT))
            .map_err(|source| TransportError::Bind { addr, source })?;
        let local_addr = socket
            .local_addr()
            .map_err(|source| TransportError::Bind { addr, source })?;

        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);

        std::thread::Builder::new()
            .name("osc-acceptor".to_string())
            .spawn(move || acceptor_loop(socket, tx, running))
            .map_err(|source| TransportError::Spawn {
                name: "osc-acceptor",
                source,
            })?;

        info!("OSC listener bound on UDP {local_addr}");
        Ok(InboundStream {
            local_addr,
            receiver: rx,
            waker: Some(wake_acceptor(local_addr)),
        })
    }
}

/// Sends one empty datagram to `local_addr` from a throwaway socket.
fn wake_acceptor(local_addr: SocketAddr) -> StopWaker {
    Box::new(move || {
        let sent = UdpSocket::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
            .and_then(|socket| socket.send_to(&[], local_addr));
        if let Err(e) = sent {
            debug!("could not wake OSC acceptor on {local_addr}: {e}");
        }
    })
}

/// The receive loop executed on the acceptor thread.
fn acceptor_loop(socket: UdpSocket, tx: mpsc::Sender<InboundMessage>, running: Arc<AtomicBool>) {
    let mut buf = [0u8; decoder::MTU];

    'recv: while running.load(Ordering::Relaxed) {
        let (len, src) = match socket.recv_from(&mut buf) {
            Ok(pair) => pair,
            Err(e) if is_timeout_error(&e) => continue,
            Err(e) => {
                error!("OSC recv error: {e}");
                continue;
            }
        };
        if len == 0 {
            continue;
        }

        let packet = match decoder::decode_udp(&buf[..len]) {
            Ok((_, packet)) => packet,
            Err(e) => {
                debug!("dropping undecodable datagram from {src}: {e:?}");
                continue;
            }
        };

        for message in flatten(packet) {
            let inbound = InboundMessage {
                values: render_values(&message.args),
                address: message.addr,
            };
            if tx.blocking_send(inbound).is_err() {
                // Receiver dropped: nobody is listening any more.
                break 'recv;
            }
        }
    }

    debug!("OSC acceptor on {:?} stopped", socket.local_addr().ok());
    // Release the port before the channel reports closed.
    drop(socket);
    drop(tx);
}

/// Messages contained in `packet`, depth-first in wire order.
fn flatten(packet: OscPacket) -> Vec<OscMessage> {
    match packet {
        OscPacket::Message(msg) => vec![msg],
        OscPacket::Bundle(bundle) => bundle.content.into_iter().flat_map(flatten).collect(),
    }
}

/// Returns `true` for OS timeout / would-block errors that should be retried.
fn is_timeout_error(e: &std::io::Error) -> bool {
    matches!(
        e.kind(),
        std::io::ErrorKind::WouldBlock | std::io::ErrorKind::TimedOut
    )
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use rosc::{encoder, OscBundle, OscTime, OscType};

    fn msg(addr: &str, args: Vec<OscType>) -> OscMessage {
        OscMessage {
            addr: addr.to_string(),
            args,
        }
    }

    /// The OSC "immediately" time tag.
    fn immediately() -> OscTime {
        OscTime {
            seconds: 0,
            fractional: 1,
        }
    }

    fn send_packet(to: SocketAddr, packet: &OscPacket) {
        let socket = UdpSocket::bind("127.0.0.1:0").unwrap();
        socket
            .send_to(&encoder::encode(packet).unwrap(), to)
            .unwrap();
    }

    fn recv_within(rx: &mut mpsc::Receiver<InboundMessage>) -> InboundMessage {
        let deadline = std::time::Instant::now() + Duration::from_secs(5);
        loop {
            match rx.try_recv() {
                Ok(m) => return m,
                Err(mpsc::error::TryRecvError::Empty) if std::time::Instant::now() < deadline => {
                    std::thread::sleep(Duration::from_millis(10));
                }
                Err(e) => panic!("no message received: {e:?}"),
            }
        }
    }

    #[test]
    fn test_is_timeout_error_recognises_timed_out_and_would_block() {
        assert!(is_timeout_error(&std::io::Error::new(
            std::io::ErrorKind::TimedOut,
            "timed out"
        )));
        assert!(is_timeout_error(&std::io::Error::new(
            std::io::ErrorKind::WouldBlock,
            "would block"
        )));
    }

    #[test]
    fn test_is_timeout_error_returns_false_for_other_errors() {
        let e = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        assert!(!is_timeout_error(&e));
    }

    #[test]
    fn test_flatten_nested_bundle_preserves_order() {
        // Arrange
        let inner = OscPacket::Bundle(OscBundle {
            timetag: immediately(),
            content: vec![OscPacket::Message(msg("/b", vec![]))],
        });
        let outer = OscPacket::Bundle(OscBundle {
            timetag: immediately(),
            content: vec![
                OscPacket::Message(msg("/a", vec![])),
                inner,
                OscPacket::Message(msg("/c", vec![])),
            ],
        });

        // Act
        let addrs: Vec<String> = flatten(outer).into_iter().map(|m| m.addr).collect();

        // Assert
        assert_eq!(addrs, vec!["/a", "/b", "/c"]);
    }

    #[test]
    fn test_open_on_port_zero_reports_bound_port() {
        let running = Arc::new(AtomicBool::new(true));
        let stream = UdpInboundSource::new().open(0, Arc::clone(&running)).unwrap();

        assert!(stream.local_addr.ip().is_loopback());
        assert_ne!(stream.local_addr.port(), 0);
        running.store(false, Ordering::Relaxed);
    }

    #[test]
    fn test_open_on_busy_port_fails_with_bind_error() {
        let holder = UdpSocket::bind("127.0.0.1:0").unwrap();
        let port = holder.local_addr().unwrap().port();

        let result = UdpInboundSource::new().open(port, Arc::new(AtomicBool::new(true)));

        assert!(matches!(result, Err(TransportError::Bind { .. })));
    }

    #[test]
    fn test_acceptor_renders_messages_and_skips_garbage() {
        // Arrange
        let running = Arc::new(AtomicBool::new(true));
        let mut stream = UdpInboundSource::new().open(0, Arc::clone(&running)).unwrap();
        let to = stream.local_addr;

        // Act: garbage first, then a real message.
        UdpSocket::bind("127.0.0.1:0")
            .unwrap()
            .send_to(b"not osc", to)
            .unwrap();
        send_packet(
            to,
            &OscPacket::Message(msg(
                "/test",
                vec![OscType::Int(1), OscType::Float(2.5), OscType::String("x".into())],
            )),
        );

        // Assert
        let received = recv_within(&mut stream.receiver);
        assert_eq!(received.address, "/test");
        assert_eq!(received.values, "1, 2.5, x");
        running.store(false, Ordering::Relaxed);
    }

    #[test]
    fn test_acceptor_delivers_bundle_contents_individually() {
        let running = Arc::new(AtomicBool::new(true));
        let mut stream = UdpInboundSource::new().open(0, Arc::clone(&running)).unwrap();

        send_packet(
            stream.local_addr,
            &OscPacket::Bundle(OscBundle {
                timetag: immediately(),
                content: vec![
                    OscPacket::Message(msg("/one", vec![OscType::Int(1)])),
                    OscPacket::Message(msg("/two", vec![OscType::Bool(false)])),
                ],
            }),
        );

        let first = recv_within(&mut stream.receiver);
        let second = recv_within(&mut stream.receiver);
        assert_eq!((first.address.as_str(), first.values.as_str()), ("/one", "1"));
        assert_eq!((second.address.as_str(), second.values.as_str()), ("/two", "false"));
        running.store(false, Ordering::Relaxed);
    }

    #[test]
    fn test_waker_releases_port_well_within_read_timeout() {
        // Arrange
        let running = Arc::new(AtomicBool::new(true));
        let mut stream = UdpInboundSource::new().open(0, Arc::clone(&running)).unwrap();
        let waker = stream.waker.take().expect("UDP streams carry a waker");
        let started = std::time::Instant::now();

        // Act
        running.store(false, Ordering::Relaxed);
        waker();

        // Assert: the channel closes once the socket has been dropped.
        assert!(stream.receiver.blocking_recv().is_none());
        assert!(started.elapsed() < READ_TIMEOUT, "took {:?}", started.elapsed());
        UdpSocket::bind(stream.local_addr).expect("port is free again");
    }

    #[test]
    fn test_empty_datagram_is_not_delivered() {
        let running = Arc::new(AtomicBool::new(true));
        let mut stream = UdpInboundSource::new().open(0, Arc::clone(&running)).unwrap();

        UdpSocket::bind("127.0.0.1:0")
            .unwrap()
            .send_to(&[], stream.local_addr)
            .unwrap();
        send_packet(stream.local_addr, &OscPacket::Message(msg("/after", vec![])));

        assert_eq!(recv_within(&mut stream.receiver).address, "/after");
        running.store(false, Ordering::Relaxed);
    }

    #[test]
    fn test_acceptor_exits_and_closes_channel_after_stop() {
        let running = Arc::new(AtomicBool::new(true));
        let mut stream = UdpInboundSource::new().open(0, Arc::clone(&running)).unwrap();

        running.store(false, Ordering::Relaxed);

        // The sender is dropped once the loop observes the flag.
        assert!(stream.receiver.blocking_recv().is_none());
    }
}
