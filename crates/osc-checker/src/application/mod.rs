//! Application layer use cases for OSC Checker.
//!
//! # What is the "application" layer? (for beginners)
//!
//! The *application* layer sits between the domain (`osc_core`: pure rules
//! about arguments, filters, and logs) and the infrastructure (UDP sockets,
//! config files, the command bridge).
//!
//! Use cases in this layer:
//!
//! - **Orchestrate** domain objects to fulfil an operator goal (e.g., "send
//!   this target's message" or "start listening on port 7000").
//! - **Depend on abstractions** (traits such as `OscTransport` and
//!   `InboundSource`) rather than concrete sockets, so tests can swap in mocks.
//! - **Contain no socket or file system calls** of their own.
//!
//! # Sub-modules
//!
//! - **`error`** – The validation and transport errors shared by both use
//!   cases, plus port parsing.
//!
//! - **`send_message`** – Validates a send target, encodes its typed
//!   arguments, and hands one OSC message to the transport.
//!
//! - **`send_history`** – The bounded, newest-first list of successful sends.
//!
//! - **`receive_messages`** – The Stopped/Receiving listener state machine and
//!   the thread-safe message log it feeds.

pub mod error;
pub mod receive_messages;
pub mod send_history;
pub mod send_message;
