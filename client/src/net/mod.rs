//! Browser host for the search channel.
//!
//! SYSTEM CONTEXT
//! ==============
//! `socket` implements the channel's transport and keepalive seams on
//! `web_sys::WebSocket` and gloo timers and drives the `ChannelClient` from a
//! local task; `renderer` writes what the channel renders into `SearchState`.
//! Components talk to the running channel only through [`ChannelHandle`].

pub mod renderer;
#[cfg(feature = "csr")]
pub mod socket;

use channel::SearchQuery;
use leptos::prelude::RwSignal;

use crate::state::search::SearchState;

/// A request from the page to the running channel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Search(SearchQuery),
    Close,
}

/// Cloneable handle components use to reach the channel task.
///
/// Without the `csr` feature there is no channel and every call returns
/// `false`.
#[derive(Clone, Default)]
pub struct ChannelHandle {
    #[cfg(feature = "csr")]
    inputs: Option<futures::channel::mpsc::UnboundedSender<socket::Input>>,
}

impl ChannelHandle {
    /// Submit `query`. Returns `false` if the channel task has ended.
    pub fn search(&self, query: SearchQuery) -> bool {
        self.send(Command::Search(query))
    }

    /// Ask the channel to close.
    pub fn close(&self) -> bool {
        self.send(Command::Close)
    }

    #[cfg(feature = "csr")]
    fn send(&self, command: Command) -> bool {
        self.inputs
            .as_ref()
            .is_some_and(|tx| tx.unbounded_send(socket::Input::Command(command)).is_ok())
    }

    #[cfg(not(feature = "csr"))]
    fn send(&self, command: Command) -> bool {
        log::debug!("no channel for {command:?}");
        false
    }
}

/// Start the channel for this page, writing into `search`.
#[cfg(feature = "csr")]
pub fn connect(search: RwSignal<SearchState>) -> ChannelHandle {
    ChannelHandle { inputs: Some(socket::spawn_channel(search)) }
}

#[cfg(not(feature = "csr"))]
pub fn connect(search: RwSignal<SearchState>) -> ChannelHandle {
    let _ = search;
    ChannelHandle::default()
}
