#[cfg(test)]
#[path = "state_test.rs"]
mod state_test;

use std::fmt;

/// Lifecycle position of the channel's single connection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConnectionState {
    /// Constructed; `connect` has not been called yet.
    #[default]
    Idle,
    Connecting,
    Open,
    /// `close()` was requested; waiting for the transport to finish.
    Closing,
    /// Terminal. There is no reconnection.
    Closed(CloseKind),
}

/// How a connection reached [`ConnectionState::Closed`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CloseKind {
    /// Closed by request, or by the peer with a completed handshake.
    Clean,
    /// The peer or network dropped the connection without a handshake.
    Unclean,
    /// The transport failed to establish or errored while open.
    Error,
}

impl ConnectionState {
    #[must_use]
    pub fn is_open(self) -> bool {
        self == Self::Open
    }

    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Closed(_))
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Connecting => "connecting",
            Self::Open => "open",
            Self::Closing => "closing",
            Self::Closed(CloseKind::Clean) => "closed",
            Self::Closed(CloseKind::Unclean) => "lost",
            Self::Closed(CloseKind::Error) => "failed",
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
