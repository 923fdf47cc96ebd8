//! The session state machine (design §4.5).

/// A Bolt session's lifecycle state.
///
/// ```text
///   Disconnected --connect--> Negotiating --handshake OK--> Authenticating
///       --hello OK--> Ready --run--> RunSent --run-success--> Streaming
///       --pull-success--> Ready
///   any error path --------------------------------------> Failed
///   close -------------------------------------------------> Closed
/// ```
///
/// `Failed` and `Closed` are terminal: a failed session must be closed and
/// reconnected, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Disconnected,
    Negotiating,
    Authenticating,
    Ready,
    RunSent,
    Streaming,
    Failed,
    Closed,
}

impl SessionState {
    /// A short name used in error messages.
    pub fn name(self) -> &'static str {
        match self {
            SessionState::Disconnected => "Disconnected",
            SessionState::Negotiating => "Negotiating",
            SessionState::Authenticating => "Authenticating",
            SessionState::Ready => "Ready",
            SessionState::RunSent => "RunSent",
            SessionState::Streaming => "Streaming",
            SessionState::Failed => "Failed",
            SessionState::Closed => "Closed",
        }
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
