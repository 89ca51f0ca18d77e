//! # tls-kx-core
//!
//! The key-agreement core of a TLS measurement library: everything needed
//! to negotiate a pre-master secret with TLS 1.0-1.2 servers using RSA key
//! transport, ephemeral finite-field Diffie-Hellman, or ephemeral
//! elliptic-curve Diffie-Hellman over nineteen named groups.
//!
//! This is research tooling, not a production TLS stack.  It speaks SSL 3.0
//! framing, export-RSA, DSS and MD5‖SHA1 on purpose, retains negotiated
//! secrets for logging, and can be configured (via
//! [`Config::kex_config`](config::Config)) to send deliberately malformed
//! or small-subgroup public values to see how servers react.  None of the
//! arithmetic is constant-time beyond what the underlying libraries give.
//!
//! The record layer, handshake orchestration, certificate validation and
//! the PRF all live elsewhere; this crate starts at a parsed hello pair and
//! ends at pre-master-secret bytes.
//!
//! ## Layout
//!
//! - [`kx`] — the three [`KeyAgreement`](kx::KeyAgreement) state machines
//! - [`sign`] — authentication of ServerKeyExchange parameters
//! - [`ec`] — the curve registry and implementations
//! - [`msgs`] — wire codecs and protocol enums
//! - [`config`], [`key`], [`rand`] — what the handshake driver supplies

#![warn(missing_docs, unreachable_pub, unused_must_use)]
#![forbid(unsafe_code)]

mod error;

pub mod config;
pub mod ec;
#[allow(missing_docs)]
pub mod key;
pub mod kx;
#[allow(missing_docs)]
#[macro_use]
pub mod msgs;
pub mod rand;
pub mod sign;

pub use error::Error;
