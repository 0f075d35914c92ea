//! Seams between the channel state machine and the host that runs it.

use std::fmt;
use std::time::Duration;

use frames::SearchResponse;

use crate::error::ChannelError;
use crate::state::ConnectionState;

/// Something that happened on the host's socket.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransportEvent {
    /// The connection finished opening.
    Opened,
    /// A complete text frame arrived.
    Message(String),
    /// The transport reported an error. Hosts follow it with `Closed`.
    Error(String),
    /// The connection ended. `clean` is true when the closing handshake
    /// completed.
    Closed { clean: bool, code: u16, reason: String },
}

/// Handle identifying one keepalive timer.
///
/// Allocated by the client; a tick carrying an id that is no longer active is
/// ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(pub(crate) u64);

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "keepalive#{}", self.0)
    }
}

/// The host's socket.
///
/// Calls return immediately; outcomes come back as [`TransportEvent`]s.
pub trait Transport {
    /// Begin opening a connection to `url`.
    ///
    /// # Errors
    ///
    /// Returns a reason when the attempt cannot even start (bad URL, no
    /// socket support). Failures after this point arrive as events.
    fn open(&mut self, url: &str) -> Result<(), String>;

    /// Queue a text frame for transmission.
    fn send_text(&mut self, text: &str);

    /// Begin a clean close.
    fn close(&mut self);
}

/// The host's periodic timers.
pub trait KeepaliveScheduler {
    /// Start firing `id` every `period`, first tick one period from now.
    fn start(&mut self, id: TimerId, period: Duration);

    /// Stop `id`. Unknown ids are ignored.
    fn cancel(&mut self, id: TimerId);
}

/// Receives everything the channel wants shown to the user.
///
/// A renderer has no handle on the client; its only way back is through the
/// caller's own `send`.
pub trait Renderer {
    /// Render one response. Called in frame order.
    fn render(&mut self, response: &SearchResponse);

    /// A well-formed frame with `len` responses is about to be rendered.
    fn batch_started(&mut self, len: usize) {
        let _ = len;
    }

    fn state_changed(&mut self, state: ConnectionState) {
        let _ = state;
    }

    /// A connection-level failure the user should know about.
    fn error(&mut self, error: &ChannelError) {
        let _ = error;
    }
}
