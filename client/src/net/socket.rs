//! `web_sys::WebSocket` transport, gloo interval keepalive, and the local task
//! that drives the channel.
//!
//! Socket callbacks, timer ticks and page commands all land on one unbounded
//! queue; the task applies them to the `ChannelClient` one at a time.

use std::collections::HashMap;
use std::time::Duration;

use channel::{ChannelClient, Endpoint, KeepaliveScheduler, TimerId, Transport, TransportEvent};
use futures::StreamExt;
use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use gloo_timers::callback::Interval;
use leptos::prelude::{RwSignal, Update};
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen::closure::Closure;
use web_sys::{CloseEvent, Event, MessageEvent, WebSocket};

use super::Command;
use super::renderer::SignalRenderer;
use crate::state::search::SearchState;

/// Normal closure status code.
const CLOSE_NORMAL: u16 = 1000;

/// Everything the channel task reacts to.
#[derive(Debug)]
pub enum Input {
    Transport(TransportEvent),
    Tick(TimerId),
    Command(Command),
}

type Inputs = UnboundedSender<Input>;

fn push(inputs: &Inputs, input: Input) {
    if inputs.unbounded_send(input).is_err() {
        log::debug!("channel task gone, dropping input");
    }
}

fn js_reason(value: &JsValue) -> String {
    value
        .dyn_ref::<js_sys::Error>()
        .map(|error| String::from(error.message()))
        .or_else(|| value.as_string())
        .unwrap_or_else(|| format!("{value:?}"))
}

// =============================================================================
// TRANSPORT
// =============================================================================

struct Callbacks {
    _open: Closure<dyn FnMut(Event)>,
    _message: Closure<dyn FnMut(MessageEvent)>,
    _error: Closure<dyn FnMut(Event)>,
    _close: Closure<dyn FnMut(CloseEvent)>,
}

/// Browser WebSocket whose callbacks feed [`Input::Transport`].
pub struct BrowserTransport {
    inputs: Inputs,
    socket: Option<WebSocket>,
    callbacks: Option<Callbacks>,
}

impl BrowserTransport {
    pub fn new(inputs: Inputs) -> Self {
        Self { inputs, socket: None, callbacks: None }
    }
}

impl Transport for BrowserTransport {
    fn open(&mut self, url: &str) -> Result<(), String> {
        let socket = WebSocket::new(url).map_err(|error| js_reason(&error))?;

        let inputs = self.inputs.clone();
        let open = Closure::<dyn FnMut(Event)>::new(move |_: Event| {
            push(&inputs, Input::Transport(TransportEvent::Opened));
        });

        let inputs = self.inputs.clone();
        let message = Closure::<dyn FnMut(MessageEvent)>::new(move |event: MessageEvent| {
            match event.data().as_string() {
                Some(text) => push(&inputs, Input::Transport(TransportEvent::Message(text))),
                None => log::debug!("ignoring non-text frame"),
            }
        });

        let inputs = self.inputs.clone();
        let error = Closure::<dyn FnMut(Event)>::new(move |_: Event| {
            push(&inputs, Input::Transport(TransportEvent::Error("websocket error".to_owned())));
        });

        let inputs = self.inputs.clone();
        let close = Closure::<dyn FnMut(CloseEvent)>::new(move |event: CloseEvent| {
            push(
                &inputs,
                Input::Transport(TransportEvent::Closed {
                    clean: event.was_clean(),
                    code: event.code(),
                    reason: event.reason(),
                }),
            );
        });

        socket.set_onopen(Some(open.as_ref().unchecked_ref()));
        socket.set_onmessage(Some(message.as_ref().unchecked_ref()));
        socket.set_onerror(Some(error.as_ref().unchecked_ref()));
        socket.set_onclose(Some(close.as_ref().unchecked_ref()));

        self.socket = Some(socket);
        self.callbacks = Some(Callbacks { _open: open, _message: message, _error: error, _close: close });
        Ok(())
    }

    fn send_text(&mut self, text: &str) {
        let Some(socket) = &self.socket else {
            return;
        };
        if let Err(error) = socket.send_with_str(text) {
            log::warn!("websocket send failed: {}", js_reason(&error));
        }
    }

    fn close(&mut self) {
        let Some(socket) = &self.socket else {
            return;
        };
        if let Err(error) = socket.close_with_code(CLOSE_NORMAL) {
            log::warn!("websocket close failed: {}", js_reason(&error));
        }
    }
}

impl Drop for BrowserTransport {
    fn drop(&mut self) {
        // Detach handlers before their closures are freed.
        if let Some(socket) = &self.socket {
            socket.set_onopen(None);
            socket.set_onmessage(None);
            socket.set_onerror(None);
            socket.set_onclose(None);
        }
    }
}

// =============================================================================
// KEEPALIVE
// =============================================================================

/// gloo intervals keyed by timer id. Dropping an `Interval` cancels it.
pub struct IntervalKeepalive {
    inputs: Inputs,
    timers: HashMap<TimerId, Interval>,
}

impl IntervalKeepalive {
    pub fn new(inputs: Inputs) -> Self {
        Self { inputs, timers: HashMap::new() }
    }
}

impl KeepaliveScheduler for IntervalKeepalive {
    fn start(&mut self, id: TimerId, period: Duration) {
        let millis = u32::try_from(period.as_millis()).unwrap_or(u32::MAX);
        let inputs = self.inputs.clone();
        let interval = Interval::new(millis, move || push(&inputs, Input::Tick(id)));
        self.timers.insert(id, interval);
    }

    fn cancel(&mut self, id: TimerId) {
        self.timers.remove(&id);
    }
}

// =============================================================================
// DRIVER
// =============================================================================

/// Endpoint for the page currently loaded.
fn page_endpoint() -> Endpoint {
    let location = web_sys::window().map(|w| w.location());
    let href = location.as_ref().and_then(|l| l.href().ok()).unwrap_or_default();
    let host = location
        .as_ref()
        .and_then(|l| l.host().ok())
        .unwrap_or_else(|| "localhost:9000".to_owned());
    Endpoint::from_page(&href, &host)
}

/// Spawn the channel task and return the queue that feeds it.
pub fn spawn_channel(search: RwSignal<SearchState>) -> Inputs {
    let (tx, rx) = mpsc::unbounded::<Input>();
    leptos::task::spawn_local(drive(search, tx.clone(), rx));
    tx
}

async fn drive(search: RwSignal<SearchState>, inputs: Inputs, mut rx: UnboundedReceiver<Input>) {
    let mut client = ChannelClient::new(
        BrowserTransport::new(inputs.clone()),
        IntervalKeepalive::new(inputs),
        SignalRenderer::new(search),
    );
    client.connect(page_endpoint());

    while !client.state().is_terminal() {
        let Some(input) = rx.next().await else {
            break;
        };
        match input {
            Input::Transport(event) => client.handle_event(event),
            Input::Tick(id) => client.keepalive_tick(id),
            Input::Command(Command::Search(query)) => {
                if !client.submit_search(query) {
                    search.update(SearchState::report_not_connected);
                }
            }
            Input::Command(Command::Close) => client.close(),
        }
    }

    log::info!("channel task finished ({})", client.state());
}
