//! Server-to-client Bolt messages.

use crate::types::{Dict, Value};

/// A message sent from the server to the client.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerMessage {
    /// Request completed successfully. Metadata varies by context.
    Success { metadata: Dict },

    /// A row of query results.
    Record { data: Vec<Value> },

    /// Request failed. Contains error code and message.
    Failure { metadata: Dict },

    /// Request was ignored (connection is in an error state).
    Ignored,
}
