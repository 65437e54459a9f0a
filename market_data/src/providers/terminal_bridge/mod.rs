//! HTTP bridge to a desktop trading terminal.
//!
//! The terminal's native API only exists in-process on the machine running the
//! terminal, so a small bridge process exposes it over local HTTP/JSON. Every
//! reply is an envelope carrying either `data` or an `error` with the terminal's
//! last-error code.

pub mod client;
pub mod response;

pub use client::BridgeTerminal;
