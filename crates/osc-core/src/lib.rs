//! # osc-core
//!
//! Shared library for OSC Checker containing the typed-argument codec, the
//! address filter, the bounded received-message log, and the textual
//! rendering of decoded OSC values.
//!
//! It has zero dependencies on OS APIs, UI frameworks, threads, or network
//! sockets.  The OSC wire format itself is delegated to the `rosc` crate;
//! this crate only owns what happens *around* the wire codec.
//!
//! # Architecture overview (for beginners)
//!
//! OSC Checker lets an operator send Open Sound Control messages to a
//! configured endpoint and watch the messages arriving on a local UDP port.
//! Almost all of that is plumbing.  The pieces of real logic live here:
//!
//! - **`domain::argument`** – Turns the text an operator typed plus a declared
//!   type (`int`, `float`, `string`, `bool`) into a typed OSC value, or
//!   explains precisely why it cannot.
//!
//! - **`domain::filter`** – Decides whether a received address should be shown
//!   for a given filter pattern (`""`, `"/test*"`, `"foo"`).
//!
//! - **`domain::bounded_log`** and **`domain::message_log`** – A newest-first
//!   list capped at a fixed size, and the log of received messages built on
//!   top of it.
//!
//! - **`render`** – How decoded OSC values are shown to the operator.

pub mod domain;
pub mod render;

// Re-export the most-used types at the crate root so callers can write
// `osc_core::MessageLog` instead of `osc_core::domain::message_log::MessageLog`.
pub use domain::argument::{
    encode, encode_all, ArgKind, ConversionError, OscArgument, TypedValue, UnknownKind,
};
pub use domain::bounded_log::BoundedLog;
pub use domain::filter::{matches, AddressFilter};
pub use domain::message_log::{MessageLog, ReceivedMessage, DEFAULT_MAX_ENTRIES};
pub use render::{render_value, render_values};
