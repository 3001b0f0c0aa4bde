//! Infrastructure layer for OSC Checker.
//!
//! Contains OS-facing adapters: UDP sockets, configuration file loading, and
//! the command bridge a front end drives.
//!
//! **Dependency rule**: this layer may depend on `application` and `osc_core`,
//! but MUST NOT be imported by the `application` or domain layers.

pub mod network;
pub mod storage;
pub mod ui_bridge;
