//! Search page state: connection status, the latest result batch, and a
//! single user-facing notice line.

#[cfg(test)]
#[path = "search_test.rs"]
mod search_test;

use channel::{ChannelError, CloseKind, ConnectionState, QueryError, SearchResponse};

/// Connection status as shown in the status bar.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConnectionStatus {
    #[default]
    Disconnected,
    Connecting,
    Connected,
    Closing,
    /// The peer dropped the connection.
    Lost,
    /// The connection never opened or failed while open.
    Failed,
}

impl ConnectionStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Disconnected => "Disconnected",
            Self::Connecting => "Connecting...",
            Self::Connected => "Connected",
            Self::Closing => "Closing...",
            Self::Lost => "Connection lost",
            Self::Failed => "Connection failed",
        }
    }

    pub fn dot_class(self) -> &'static str {
        match self {
            Self::Connected => "status-bar__dot status-bar__dot--connected",
            Self::Connecting | Self::Closing => "status-bar__dot status-bar__dot--connecting",
            Self::Disconnected => "status-bar__dot status-bar__dot--disconnected",
            Self::Lost | Self::Failed => "status-bar__dot status-bar__dot--error",
        }
    }
}

impl From<ConnectionState> for ConnectionStatus {
    fn from(state: ConnectionState) -> Self {
        match state {
            ConnectionState::Idle | ConnectionState::Closed(CloseKind::Clean) => Self::Disconnected,
            ConnectionState::Connecting => Self::Connecting,
            ConnectionState::Open => Self::Connected,
            ConnectionState::Closing => Self::Closing,
            ConnectionState::Closed(CloseKind::Unclean) => Self::Lost,
            ConnectionState::Closed(CloseKind::Error) => Self::Failed,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct SearchState {
    pub status: ConnectionStatus,
    /// Responses of the most recent batch, in frame order.
    pub responses: Vec<SearchResponse>,
    /// Number of batches received so far.
    pub batches: u64,
    pub notice: Option<String>,
}

impl SearchState {
    pub fn is_connected(&self) -> bool {
        self.status == ConnectionStatus::Connected
    }

    /// Whether the user can still ask the channel to close.
    pub fn can_close(&self) -> bool {
        matches!(self.status, ConnectionStatus::Connected | ConnectionStatus::Connecting)
    }

    /// A new batch replaces whatever was shown before.
    pub fn begin_batch(&mut self, len: usize) {
        self.responses = Vec::with_capacity(len);
        self.batches += 1;
    }

    pub fn push_response(&mut self, response: SearchResponse) {
        self.responses.push(response);
    }

    pub fn set_state(&mut self, state: ConnectionState) {
        self.status = state.into();
        if state.is_open() {
            self.notice = None;
        }
    }

    pub fn report_error(&mut self, error: &ChannelError) {
        self.notice = Some(error.to_string());
    }

    pub fn reject_query(&mut self, error: &QueryError) {
        self.notice = Some(error.to_string());
    }

    pub fn report_not_connected(&mut self) {
        self.notice = Some(format!("cannot search while {}", self.status.label().to_lowercase()));
    }

    pub fn clear_notice(&mut self) {
        self.notice = None;
    }
}
