//! Connection lifecycle and message protocol handling for the live search
//! channel.
//!
//! This crate performs no I/O. A host (browser or native) owns the real socket
//! and timers, implements [`Transport`] and [`KeepaliveScheduler`], and feeds
//! what happens back into [`ChannelClient`] as [`TransportEvent`]s and
//! keepalive ticks. Rendering is delegated to a [`Renderer`].
//!
//! SYSTEM CONTEXT
//! ==============
//! `frames` defines the wire model; this crate decides when frames may be sent
//! and what inbound frames mean; `client` and the `livesearch` binary are the
//! hosts.

mod client;
mod endpoint;
mod error;
mod host;
mod state;

pub use client::{ChannelClient, KEEPALIVE_INTERVAL};
pub use endpoint::{Endpoint, WS_PATH};
pub use error::ChannelError;
pub use host::{KeepaliveScheduler, Renderer, TimerId, Transport, TransportEvent};
pub use state::{CloseKind, ConnectionState};

pub use frames::{ClientMessage, QueryError, ResultBatch, SearchQuery, SearchResponse};
