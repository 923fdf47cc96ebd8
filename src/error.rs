//! Error types for BoltLite.

/// Errors that can occur while driving a BoltLite session.
///
/// Variants map onto the kinds from the protocol design: transport,
/// framing, encoding, decoding, protocol, and authentication failures.
#[derive(Debug, thiserror::Error)]
pub enum BoltLiteError {
    /// The underlying byte stream failed (connect, read, write, or close).
    #[error("transport error: {0}")]
    Transport(#[from] std::io::Error),

    /// A chunk payload exceeded the 2-byte length prefix's range.
    #[error("message of {0} bytes does not fit in a single chunk (max 65535)")]
    MessageTooLarge(usize),

    /// A chunk frame carried a zero-length payload where a message was expected.
    #[error("received an empty chunk")]
    EmptyChunk,

    /// A List, Dictionary, or Structure exceeded the tiny-container limit of
    /// 15 elements. Large containers are a known limitation of this core.
    #[error("{kind} of {len} elements exceeds the tiny-container limit of 15")]
    UnsupportedSize { kind: &'static str, len: usize },

    /// `unpack_value` was called with an empty slice.
    #[error("no bytes to decode")]
    EmptyInput,

    /// The first byte of a value did not match any known PackStream marker.
    #[error("unsupported PackStream marker: 0x{0:02X}")]
    UnsupportedMarker(u8),

    /// A length prefix claimed more bytes than remained in the buffer.
    #[error("truncated input: needed {needed} more bytes, {available} available")]
    Truncated { needed: usize, available: usize },

    /// A decoded value did not have the type the caller required.
    #[error("expected {expected}, got {got}")]
    UnexpectedType { expected: &'static str, got: String },

    /// The server's chosen handshake version did not match the client's proposal.
    #[error("handshake mismatch: proposed {expected:02X?}, server chose {got:02X?}")]
    HandshakeMismatch { expected: [u8; 4], got: [u8; 4] },

    /// A response structure was not the one expected for the current session state.
    #[error("unexpected message in state {state}: {detail}")]
    UnexpectedMessage { state: &'static str, detail: String },

    /// The server responded with a FAILURE structure.
    #[error("server returned FAILURE ({code}): {message}")]
    Failure { code: String, message: String },

    /// The server responded with IGNORED.
    #[error("server IGNORED the request")]
    Ignored,

    /// HELLO did not succeed, or its SUCCESS carried no `connection_id`.
    #[error("authentication failed: {0}")]
    Authentication(String),
}
