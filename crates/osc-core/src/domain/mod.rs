//! Domain entities for OSC Checker.
//!
//! This module contains pure business logic with no infrastructure dependencies.
//!
//! # What is "domain" in Clean Architecture? (for beginners)
//!
//! Clean Architecture organises code into concentric layers.  The innermost
//! layer is called the **domain** (or "entities" layer).  Domain code:
//!
//! - Contains the core rules of the application.
//! - Has **no** imports from OS APIs, network libraries, or UI frameworks.
//! - Can be compiled and tested on any platform without any external setup.
//!
//! Code in outer layers (infrastructure, application, UI) depends on the domain,
//! but the domain never depends on them.

/// Typed OSC arguments and the text-to-value codec.
pub mod argument;

/// Newest-first, capacity-bounded sequence.
pub mod bounded_log;

/// Address filter patterns for the received-message view.
pub mod filter;

/// Log of received OSC messages.
pub mod message_log;
