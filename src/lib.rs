//! parlor: a JSON request/response service over persistent TCP connections.
//!
//! A client opens one connection, presents a fixed 4-byte signature, and
//! then exchanges length-prefixed JSON documents with the server:
//! - echo a string back
//! - add two integers, or sum a whole list
//! - concatenate strings, pairwise or as a list
//! - play a quiz game, with a per-connection question session and a
//!   stateless multiple-choice form
//!
//! The modules are exposed as a library so the server binary, the
//! interactive client binary, and the integration tests all share the
//! same wire codec and dispatch logic.

pub mod config;
pub mod dispatch;
pub mod frame;
pub mod limiter;
pub mod message;
pub mod ops;
pub mod quiz;
pub mod server;
