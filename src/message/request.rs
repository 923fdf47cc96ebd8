//! Client-to-server Bolt messages.

use crate::types::{Dict, Value};

/// A message sent from the client to the server.
///
/// This core only emits the three messages a single auto-commit query
/// needs: HELLO to initialize the connection, RUN to start a query, and
/// PULL to stream its results.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientMessage {
    /// Initialize the connection. Sent once after the handshake.
    Hello { extra: Dict },

    /// Execute a query in auto-commit mode.
    Run {
        query: String,
        parameters: Dict,
        extra: Dict,
    },

    /// Pull results from the last RUN.
    Pull { extra: Dict },
}

impl ClientMessage {
    /// Creates a PULL message requesting all remaining records.
    pub fn pull_all() -> Self {
        Self::Pull {
            extra: Dict::from([("n".to_string(), Value::Integer(-1))]),
        }
    }
}
