//! SendMessageUseCase: validates a send target, encodes its arguments, and
//! transmits one OSC message.
//!
//! The use case delegates the actual datagram to an [`OscTransport`] trait
//! object.  The UDP implementation lives in the infrastructure layer; tests
//! substitute a mock so they can assert exactly how many packets went out.
//!
//! # Send pipeline
//!
//! ```text
//! SendTarget ──► validate host / port / address ──► encode arguments in order
//!            ──► build OscMessage ──► OscTransport::send ──► SendResult
//! ```
//!
//! Any failure before the last step means no network call is made.  The
//! transport step is a single best-effort attempt: there is no retry and no
//! timeout beyond whatever the OS applies to a UDP send.

use std::sync::Arc;

use chrono::Local;
use osc_core::{domain::argument::encode_all, ConversionError, OscArgument};
use rosc::{OscMessage, OscType};
use thiserror::Error;
use tracing::{info, warn};

use super::error::{parse_port, TransportError, ValidationError};

/// Error type for a single send attempt.
#[derive(Debug, Error)]
pub enum SendError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Conversion(#[from] ConversionError),

    #[error("transport failed: {0}")]
    Transport(#[from] TransportError),
}

/// Outbound OSC transport.
///
/// Implementations own whatever socket they need and may reuse it between
/// calls.  They must not retry.
#[cfg_attr(test, mockall::automock)]
pub trait OscTransport: Send + Sync {
    /// Transmits `message` to `host:port` once.
    fn send(&self, host: &str, port: u16, message: &OscMessage) -> Result<(), TransportError>;
}

/// One configured destination as the operator currently sees it.
///
/// Every field is editable.  `port` holds the text from the port field; it is
/// parsed at send time so a half-typed port does not need a separate state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendTarget {
    pub name: String,
    pub host: String,
    pub port: String,
    pub address: String,
    pub arguments: Vec<OscArgument>,
}

impl SendTarget {
    pub fn new(
        name: impl Into<String>,
        host: impl Into<String>,
        port: u16,
        address: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            host: host.into(),
            port: port.to_string(),
            address: address.into(),
            arguments: Vec::new(),
        }
    }

    pub fn with_argument(mut self, argument: OscArgument) -> Self {
        self.arguments.push(argument);
        self
    }

    /// Appends a fresh `int` / `"0"` argument row and returns its index.
    pub fn add_argument(&mut self) -> usize {
        self.arguments.push(OscArgument::default());
        self.arguments.len() - 1
    }

    /// Removes the argument at `index`, if there is one.
    pub fn remove_argument(&mut self, index: usize) -> Option<OscArgument> {
        (index < self.arguments.len()).then(|| self.arguments.remove(index))
    }
}

/// Summary of a successful send, used to build the history line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendResult {
    /// Local time of the send, `HH:MM:SS`.
    pub timestamp: String,
    pub name: String,
    pub host: String,
    pub port: u16,
    pub address: String,
    /// `type:value` for each argument, in declaration order.
    pub arguments_as_text: Vec<String>,
}

impl SendResult {
    /// `HH:MM:SS | name → host:port address [type:value, ...]`
    pub fn history_line(&self) -> String {
        format!(
            "{} | {} → {}:{} {} [{}]",
            self.timestamp,
            self.name,
            self.host,
            self.port,
            self.address,
            self.arguments_as_text.join(", ")
        )
    }
}

/// The Send Message use case.
pub struct SendMessageUseCase {
    transport: Arc<dyn OscTransport>,
}

impl SendMessageUseCase {
    pub fn new(transport: Arc<dyn OscTransport>) -> Self {
        Self { transport }
    }

    /// Validates `target`, encodes its arguments, and sends one message.
    ///
    /// Blocks the caller for the duration of the transport call.
    ///
    /// # Errors
    ///
    /// - [`SendError::Validation`] if host, port, or address is empty or
    ///   malformed.
    /// - [`SendError::Conversion`] for the first argument whose text does not
    ///   match its declared type.
    /// - [`SendError::Transport`] if the transport fails.
    pub fn send(&self, target: &SendTarget) -> Result<SendResult, SendError> {
        let result = self.try_send(target);
        match &result {
            Ok(sent) => info!(
                "OSC send complete [{}]: {}:{} {} [{}]",
                sent.name,
                sent.host,
                sent.port,
                sent.address,
                sent.arguments_as_text.join(", ")
            ),
            Err(e) => warn!("OSC send failed [{}]: {e}", target.name),
        }
        result
    }

    fn try_send(&self, target: &SendTarget) -> Result<SendResult, SendError> {
        let port = validate(target)?;

        let args: Vec<OscType> = encode_all(&target.arguments)?
            .into_iter()
            .map(OscType::from)
            .collect();

        let message = OscMessage {
            addr: target.address.clone(),
            args,
        };
        self.transport.send(&target.host, port, &message)?;

        Ok(SendResult {
            timestamp: Local::now().format("%H:%M:%S").to_string(),
            name: target.name.clone(),
            host: target.host.clone(),
            port,
            address: target.address.clone(),
            arguments_as_text: target.arguments.iter().map(OscArgument::summary).collect(),
        })
    }
}

/// Checks the form fields and returns the parsed port.
fn validate(target: &SendTarget) -> Result<u16, ValidationError> {
    if target.host.is_empty() {
        return Err(ValidationError::EmptyHost);
    }
    let port = parse_port(&target.port)?;
    if target.address.is_empty() {
        return Err(ValidationError::EmptyAddress);
    }
    if !target.address.starts_with('/') {
        return Err(ValidationError::AddressWithoutSlash(target.address.clone()));
    }
    Ok(port)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use osc_core::ArgKind;

    fn target() -> SendTarget {
        SendTarget::new("Default", "127.0.0.1", 7000, "/test")
            .with_argument(OscArgument::new(ArgKind::Int, "42"))
    }

    fn use_case_expecting_no_send() -> SendMessageUseCase {
        let mut transport = MockOscTransport::new();
        transport.expect_send().times(0);
        SendMessageUseCase::new(Arc::new(transport))
    }

    // ── Validation ────────────────────────────────────────────────────────────

    #[test]
    fn test_empty_host_fails_without_network_call() {
        // Arrange
        let use_case = use_case_expecting_no_send();
        let mut t = target();
        t.host.clear();

        // Act
        let result = use_case.send(&t);

        // Assert
        assert!(matches!(
            result,
            Err(SendError::Validation(ValidationError::EmptyHost))
        ));
    }

    #[test]
    fn test_empty_port_fails_without_network_call() {
        let use_case = use_case_expecting_no_send();
        let mut t = target();
        t.port.clear();

        assert!(matches!(
            use_case.send(&t),
            Err(SendError::Validation(ValidationError::EmptyPort))
        ));
    }

    #[test]
    fn test_non_numeric_port_fails_without_network_call() {
        let use_case = use_case_expecting_no_send();
        let mut t = target();
        t.port = "seven".to_string();

        assert!(matches!(
            use_case.send(&t),
            Err(SendError::Validation(ValidationError::InvalidPort(p))) if p == "seven"
        ));
    }

    #[test]
    fn test_empty_address_fails_without_network_call() {
        let use_case = use_case_expecting_no_send();
        let mut t = target();
        t.address.clear();

        assert!(matches!(
            use_case.send(&t),
            Err(SendError::Validation(ValidationError::EmptyAddress))
        ));
    }

    #[test]
    fn test_address_without_leading_slash_is_rejected() {
        let use_case = use_case_expecting_no_send();
        let mut t = target();
        t.address = "test".to_string();

        assert!(matches!(
            use_case.send(&t),
            Err(SendError::Validation(ValidationError::AddressWithoutSlash(_)))
        ));
    }

    // ── Conversion ────────────────────────────────────────────────────────────

    #[test]
    fn test_bad_argument_aborts_before_network_call() {
        // Arrange: second argument cannot be a float.
        let use_case = use_case_expecting_no_send();
        let t = target()
            .with_argument(OscArgument::new(ArgKind::Float, "abc"))
            .with_argument(OscArgument::new(ArgKind::Bool, "nope"));

        // Act
        let err = use_case.send(&t).unwrap_err();

        // Assert: the first failure is reported.
        match err {
            SendError::Conversion(c) => {
                assert_eq!(c.field, "float");
                assert_eq!(c.input, "abc");
            }
            other => panic!("expected conversion error, got {other:?}"),
        }
    }

    // ── Transport ─────────────────────────────────────────────────────────────

    #[test]
    fn test_valid_target_sends_typed_message_once() {
        // Arrange
        let mut transport = MockOscTransport::new();
        transport
            .expect_send()
            .withf(|host, port, msg| {
                host == "127.0.0.1"
                    && *port == 7000
                    && msg.addr == "/test"
                    && msg.args
                        == vec![
                            OscType::Int(42),
                            OscType::Float(0.5),
                            OscType::String("hi".to_string()),
                            OscType::Bool(true),
                        ]
            })
            .times(1)
            .returning(|_, _, _| Ok(()));
        let use_case = SendMessageUseCase::new(Arc::new(transport));
        let t = target()
            .with_argument(OscArgument::new(ArgKind::Float, "0.5"))
            .with_argument(OscArgument::new(ArgKind::String, "hi"))
            .with_argument(OscArgument::new(ArgKind::Bool, "true"));

        // Act
        let result = use_case.send(&t).expect("send must succeed");

        // Assert
        assert_eq!(result.name, "Default");
        assert_eq!(result.port, 7000);
        assert_eq!(
            result.arguments_as_text,
            vec!["int:42", "float:0.5", "string:hi", "bool:true"]
        );
    }

    #[test]
    fn test_message_without_arguments_is_sent() {
        let mut transport = MockOscTransport::new();
        transport
            .expect_send()
            .withf(|_, _, msg| msg.args.is_empty())
            .times(1)
            .returning(|_, _, _| Ok(()));
        let use_case = SendMessageUseCase::new(Arc::new(transport));

        let result = use_case
            .send(&SendTarget::new("bare", "localhost", 9000, "/ping"))
            .expect("send must succeed");

        assert!(result.arguments_as_text.is_empty());
        assert!(result.history_line().ends_with("bare → localhost:9000 /ping []"));
    }

    #[test]
    fn test_transport_failure_is_reported_without_retry() {
        let mut transport = MockOscTransport::new();
        transport.expect_send().times(1).returning(|_, _, _| {
            Err(TransportError::Send {
                target: "127.0.0.1:7000".to_string(),
                source: std::io::Error::new(std::io::ErrorKind::Other, "boom"),
            })
        });
        let use_case = SendMessageUseCase::new(Arc::new(transport));

        let result = use_case.send(&target());

        assert!(matches!(result, Err(SendError::Transport(_))));
    }

    // ── SendTarget / SendResult helpers ───────────────────────────────────────

    #[test]
    fn test_history_line_format() {
        let result = SendResult {
            timestamp: "09:05:01".to_string(),
            name: "Mixer".to_string(),
            host: "10.0.0.2".to_string(),
            port: 8000,
            address: "/ch/1/fader".to_string(),
            arguments_as_text: vec!["float:0.8".to_string(), "bool:true".to_string()],
        };

        assert_eq!(
            result.history_line(),
            "09:05:01 | Mixer → 10.0.0.2:8000 /ch/1/fader [float:0.8, bool:true]"
        );
    }

    #[test]
    fn test_add_and_remove_argument_rows() {
        let mut t = target();

        let idx = t.add_argument();
        assert_eq!(idx, 1);
        assert_eq!(t.arguments[1], OscArgument::default());

        assert_eq!(t.remove_argument(0).map(|a| a.raw_text), Some("42".to_string()));
        assert_eq!(t.arguments.len(), 1);
        assert!(t.remove_argument(5).is_none());
    }
}
