//! PackStream binary encoding format for the Bolt protocol.
//!
//! PackStream is a binary presentation format for the exchange of richly
//! typed data. It uses big-endian byte ordering exclusively. This module
//! implements the Packer (`encode`) and Unpacker (`decode`) halves; both
//! are pure functions of their inputs and share no mutable state.

pub mod decode;
pub mod encode;
pub mod marker;

pub use decode::unpack_value;
pub use encode::{encode_value, pack};
