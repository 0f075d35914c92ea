//! Tokio implementations of the channel's transport and keepalive seams.
//!
//! Both report back through one unbounded queue of [`HostEvent`]s that the
//! session loop drains into the [`channel::ChannelClient`].

use std::collections::HashMap;
use std::time::Duration;

use channel::{KeepaliveScheduler, TimerId, Transport, TransportEvent};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::error::ProtocolError;
use tokio_tungstenite::tungstenite::handshake::client::Request;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::protocol::frame::Utf8Bytes;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tracing::{debug, warn};

/// How long to wait for the peer's close reply after we sent ours.
const CLOSE_GRACE: Duration = Duration::from_secs(5);

/// Close code reported when no close frame was exchanged.
const ABNORMAL_CLOSURE: u16 = 1006;

/// Close code reported when the peer's close frame carried no status.
const NO_STATUS: u16 = 1005;

/// Everything the host loop reacts to.
#[derive(Debug)]
pub enum HostEvent {
    Transport(TransportEvent),
    Tick(TimerId),
}

pub type HostEvents = UnboundedSender<HostEvent>;

// =============================================================================
// SOCKET
// =============================================================================

/// A tokio-tungstenite socket driven from a spawned task.
pub struct SocketTransport {
    events: HostEvents,
    outgoing: Option<UnboundedSender<Message>>,
    task: Option<JoinHandle<()>>,
}

impl SocketTransport {
    pub fn new(events: HostEvents) -> Self {
        Self { events, outgoing: None, task: None }
    }
}

impl Transport for SocketTransport {
    fn open(&mut self, url: &str) -> Result<(), String> {
        let request = url.into_client_request().map_err(|error| error.to_string())?;
        let (tx, rx) = mpsc::unbounded_channel();
        self.outgoing = Some(tx);
        self.task = Some(tokio::spawn(run_socket(request, rx, self.events.clone())));
        Ok(())
    }

    fn send_text(&mut self, text: &str) {
        let Some(outgoing) = &self.outgoing else {
            warn!("socket: send before open");
            return;
        };
        if outgoing.send(Message::text(text.to_owned())).is_err() {
            debug!("socket: send after socket task ended");
        }
    }

    fn close(&mut self) {
        let Some(outgoing) = self.outgoing.take() else {
            return;
        };
        let frame = CloseFrame { code: CloseCode::Normal, reason: Utf8Bytes::from_static("") };
        let _ = outgoing.send(Message::Close(Some(frame)));
    }
}

impl Drop for SocketTransport {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

fn emit(events: &HostEvents, event: TransportEvent) {
    if events.send(HostEvent::Transport(event)).is_err() {
        debug!("socket: host loop gone");
    }
}

async fn run_socket(request: Request, mut outgoing: UnboundedReceiver<Message>, events: HostEvents) {
    let stream = match connect_async(request).await {
        Ok((stream, _)) => stream,
        Err(error) => {
            emit(&events, TransportEvent::Error(error.to_string()));
            emit(&events, TransportEvent::Closed { clean: false, code: ABNORMAL_CLOSURE, reason: String::new() });
            return;
        }
    };
    emit(&events, TransportEvent::Opened);

    let (mut write, mut read) = stream.split();
    let mut received_close: Option<(u16, String)> = None;
    let mut close_deadline: Option<Instant> = None;

    loop {
        tokio::select! {
            // Nothing more goes out once either side has started closing.
            message = outgoing.recv(), if close_deadline.is_none() && received_close.is_none() => {
                let message = message.unwrap_or(Message::Close(None));
                let closing = matches!(message, Message::Close(_));
                match write.send(message).await {
                    Ok(()) => {}
                    Err(WsError::Protocol(ProtocolError::SendAfterClosing)) => {
                        debug!("socket: dropping send after close");
                    }
                    Err(error) => {
                        emit(&events, TransportEvent::Error(error.to_string()));
                        break;
                    }
                }
                if closing {
                    close_deadline = Some(Instant::now() + CLOSE_GRACE);
                }
            }
            inbound = read.next() => match inbound {
                Some(Ok(Message::Text(text))) => {
                    emit(&events, TransportEvent::Message(text.as_str().to_owned()));
                }
                Some(Ok(Message::Close(frame))) => {
                    received_close = Some(frame.map_or((NO_STATUS, String::new()), |frame| {
                        (u16::from(frame.code), frame.reason.as_str().to_owned())
                    }));
                }
                Some(Ok(_)) => {}
                Some(Err(WsError::ConnectionClosed | WsError::AlreadyClosed)) | None => break,
                Some(Err(WsError::Protocol(ProtocolError::ResetWithoutClosingHandshake))) => {
                    debug!("socket: reset without closing handshake");
                    break;
                }
                Some(Err(error)) => {
                    emit(&events, TransportEvent::Error(error.to_string()));
                    break;
                }
            },
            () = tokio::time::sleep_until(close_deadline.unwrap_or_else(Instant::now)), if close_deadline.is_some() => {
                warn!("socket: peer did not answer close within {CLOSE_GRACE:?}");
                break;
            }
        }
    }

    let event = match received_close {
        Some((code, reason)) => TransportEvent::Closed { clean: true, code, reason },
        None => TransportEvent::Closed { clean: false, code: ABNORMAL_CLOSURE, reason: String::new() },
    };
    emit(&events, event);
}

// =============================================================================
// KEEPALIVE
// =============================================================================

/// One tokio interval task per active timer.
pub struct IntervalScheduler {
    events: HostEvents,
    timers: HashMap<TimerId, JoinHandle<()>>,
}

impl IntervalScheduler {
    pub fn new(events: HostEvents) -> Self {
        Self { events, timers: HashMap::new() }
    }
}

impl KeepaliveScheduler for IntervalScheduler {
    fn start(&mut self, id: TimerId, period: Duration) {
        let events = self.events.clone();
        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if events.send(HostEvent::Tick(id)).is_err() {
                    break;
                }
            }
        });
        debug!(%id, ?period, "keepalive started");
        if let Some(previous) = self.timers.insert(id, task) {
            previous.abort();
        }
    }

    fn cancel(&mut self, id: TimerId) {
        if let Some(task) = self.timers.remove(&id) {
            debug!(%id, "keepalive cancelled");
            task.abort();
        }
    }
}

impl Drop for IntervalScheduler {
    fn drop(&mut self) {
        for (_, task) in self.timers.drain() {
            task.abort();
        }
    }
}
