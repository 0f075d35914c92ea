//! The channel state machine.
//!
//! ```text
//! Idle --connect--> Connecting --opened--> Open --close()--> Closing --closed--> Closed(Clean)
//!                   Connecting --error/closed--> Closed(Error)
//!                                            Open --error--> Closed(Error)
//!                                            Open --closed, unclean--> Closed(Unclean)
//!                                            Open --closed, clean--> Closed(Clean)
//! ```
//!
//! The keepalive timer exists exactly while the state is `Open`.

#[cfg(test)]
#[path = "client_test.rs"]
mod client_test;

use std::time::Duration;

use frames::{ClientMessage, SearchQuery};
use log::{debug, info, warn};

use crate::endpoint::Endpoint;
use crate::error::ChannelError;
use crate::host::{KeepaliveScheduler, Renderer, TimerId, Transport, TransportEvent};
use crate::state::{CloseKind, ConnectionState};

/// Period between keepalive pings while the connection is open.
pub const KEEPALIVE_INTERVAL: Duration = Duration::from_secs(25);

/// Owns one connection and translates between caller intents and wire frames.
pub struct ChannelClient<T, K, R> {
    transport: T,
    keepalive: K,
    renderer: R,
    state: ConnectionState,
    endpoint: Option<Endpoint>,
    keepalive_interval: Duration,
    active_timer: Option<TimerId>,
    timers_issued: u64,
}

impl<T, K, R> ChannelClient<T, K, R>
where
    T: Transport,
    K: KeepaliveScheduler,
    R: Renderer,
{
    pub fn new(transport: T, keepalive: K, renderer: R) -> Self {
        Self {
            transport,
            keepalive,
            renderer,
            state: ConnectionState::Idle,
            endpoint: None,
            keepalive_interval: KEEPALIVE_INTERVAL,
            active_timer: None,
            timers_issued: 0,
        }
    }

    /// Override the keepalive period.
    #[must_use]
    pub fn with_keepalive_interval(mut self, interval: Duration) -> Self {
        self.keepalive_interval = interval;
        self
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state.is_open()
    }

    pub fn endpoint(&self) -> Option<&Endpoint> {
        self.endpoint.as_ref()
    }

    /// The keepalive timer currently running, if any.
    pub fn active_keepalive(&self) -> Option<TimerId> {
        self.active_timer
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn into_renderer(self) -> R {
        self.renderer
    }

    /// Start connecting to `endpoint`.
    ///
    /// Only valid once, from `Idle`. A transport that cannot start the attempt
    /// moves the channel straight to `Closed(Error)` and reports through the
    /// renderer's error hook.
    pub fn connect(&mut self, endpoint: Endpoint) {
        if self.state != ConnectionState::Idle {
            warn!("channel: connect ignored while {}", self.state);
            return;
        }

        info!("channel: connecting to {endpoint}");
        self.set_state(ConnectionState::Connecting);
        let result = self.transport.open(endpoint.as_str());
        self.endpoint = Some(endpoint);
        if let Err(reason) = result {
            self.fail(ChannelError::Connect(reason));
        }
    }

    /// Serialize and transmit `message`.
    ///
    /// Returns `false`, sending nothing, unless the connection is open.
    pub fn send(&mut self, message: &ClientMessage) -> bool {
        if !self.state.is_open() {
            debug!("channel: dropping {message:?} while {}", self.state);
            return false;
        }
        let text = frames::encode_message(message);
        self.transport.send_text(&text);
        true
    }

    /// Send a search for `query`. Same rules as [`Self::send`].
    pub fn submit_search(&mut self, query: SearchQuery) -> bool {
        info!("channel: search {query:?}");
        self.send(&ClientMessage::Search { query })
    }

    /// Close the connection. Repeated calls are no-ops.
    ///
    /// The keepalive timer is cancelled before the transport is asked to
    /// close, so no ping can race the teardown.
    pub fn close(&mut self) {
        match self.state {
            ConnectionState::Open | ConnectionState::Connecting => {
                self.set_state(ConnectionState::Closing);
                self.stop_keepalive();
                self.transport.close();
            }
            ConnectionState::Idle => {
                debug!("channel: close before connect");
                self.set_state(ConnectionState::Closed(CloseKind::Clean));
            }
            ConnectionState::Closing | ConnectionState::Closed(_) => {
                debug!("channel: close ignored while {}", self.state);
            }
        }
    }

    /// Feed one transport event into the state machine.
    pub fn handle_event(&mut self, event: TransportEvent) {
        match event {
            TransportEvent::Opened => self.on_open(),
            TransportEvent::Message(text) => self.on_message(&text),
            TransportEvent::Error(reason) => self.on_error(reason),
            TransportEvent::Closed { clean, code, reason } => self.on_closed(clean, code, reason),
        }
    }

    /// A keepalive tick for `id` fired.
    pub fn keepalive_tick(&mut self, id: TimerId) {
        if self.active_timer != Some(id) {
            debug!("channel: ignoring stale tick for {id}");
            return;
        }
        if self.state.is_open() {
            self.send(&ClientMessage::Ping);
        }
    }

    fn on_open(&mut self) {
        if self.state != ConnectionState::Connecting {
            debug!("channel: ignoring open while {}", self.state);
            return;
        }
        self.set_state(ConnectionState::Open);
        self.start_keepalive();
    }

    fn on_message(&mut self, text: &str) {
        if !matches!(self.state, ConnectionState::Open | ConnectionState::Closing) {
            debug!("channel: ignoring frame while {}", self.state);
            return;
        }

        let batch = match frames::decode_batch(text) {
            Ok(batch) => batch,
            Err(err) => {
                let error = ChannelError::from(err);
                warn!("channel: dropping inbound frame: {error}");
                return;
            }
        };

        debug!("channel: batch with {} responses", batch.responses.len());
        self.renderer.batch_started(batch.responses.len());
        for response in &batch.responses {
            self.renderer.render(response);
        }
    }

    fn on_error(&mut self, reason: String) {
        match self.state {
            ConnectionState::Connecting => self.fail(ChannelError::Connect(reason)),
            ConnectionState::Open => self.fail(ChannelError::Transport(reason)),
            ConnectionState::Closing => warn!("channel: transport error while closing: {reason}"),
            ConnectionState::Idle | ConnectionState::Closed(_) => {
                debug!("channel: ignoring transport error while {}: {reason}", self.state);
            }
        }
    }

    fn on_closed(&mut self, clean: bool, code: u16, reason: String) {
        match self.state {
            ConnectionState::Connecting => {
                self.fail(ChannelError::Connect(format!("closed before opening (code {code})")));
            }
            ConnectionState::Open if clean => {
                info!("channel: closed by peer (code {code})");
                self.stop_keepalive();
                self.set_state(ConnectionState::Closed(CloseKind::Clean));
            }
            ConnectionState::Open => {
                self.stop_keepalive();
                self.set_state(ConnectionState::Closed(CloseKind::Unclean));
                let error = ChannelError::ConnectionLost { code, reason };
                warn!("channel: {error}");
                self.renderer.error(&error);
            }
            ConnectionState::Closing => {
                self.set_state(ConnectionState::Closed(CloseKind::Clean));
            }
            ConnectionState::Idle | ConnectionState::Closed(_) => {
                debug!("channel: ignoring close while {}", self.state);
            }
        }
    }

    fn fail(&mut self, error: ChannelError) {
        warn!("channel: {error}");
        self.stop_keepalive();
        self.set_state(ConnectionState::Closed(CloseKind::Error));
        self.renderer.error(&error);
    }

    fn start_keepalive(&mut self) {
        // Leaving Open always clears the timer, so none can be active here.
        self.stop_keepalive();
        self.timers_issued += 1;
        let id = TimerId(self.timers_issued);
        self.keepalive.start(id, self.keepalive_interval);
        self.active_timer = Some(id);
    }

    fn stop_keepalive(&mut self) {
        if let Some(id) = self.active_timer.take() {
            self.keepalive.cancel(id);
        }
    }

    fn set_state(&mut self, next: ConnectionState) {
        if self.state == next {
            return;
        }
        info!("channel: {} -> {next}", self.state);
        self.state = next;
        self.renderer.state_changed(next);
    }
}
