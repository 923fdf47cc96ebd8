//! BoltLite — a minimal client for a graph database's Bolt wire protocol.
//!
//! This crate covers the codec and the session state machine: PackStream
//! encoding/decoding, chunk framing, and the connection life cycle from
//! handshake through HELLO to a single autocommit RUN.
//!
//! # Architecture
//!
//! - **`packstream`** — Binary encoding/decoding (PackStream format)
//! - **`types`** — The PackStream value model (Null, Integer, String, List, Dict, Structure)
//! - **`chunk`** — Message framing (2-byte length-prefixed chunks)
//! - **`message`** — Protocol message types and serialization
//! - **`session`** — The session state machine: connect, handshake, hello, run, close
//! - **`version`** — Handshake preamble and version proposal encoding

pub mod chunk;
pub mod error;
pub mod message;
pub mod packstream;
pub mod session;
pub mod types;
pub mod version;

pub use error::BoltLiteError;
pub use session::{AccessMode, Record, Session, SessionState, SuccessMeta};
pub use types::Value;
