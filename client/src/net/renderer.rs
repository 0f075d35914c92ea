#[cfg(test)]
#[path = "renderer_test.rs"]
mod renderer_test;

use channel::{ChannelError, ConnectionState, Renderer, SearchResponse};
use leptos::prelude::{RwSignal, Update};

use crate::state::search::SearchState;

/// Renders channel output into the page's reactive state.
#[derive(Clone, Copy)]
pub struct SignalRenderer {
    search: RwSignal<SearchState>,
}

impl SignalRenderer {
    pub fn new(search: RwSignal<SearchState>) -> Self {
        Self { search }
    }
}

impl Renderer for SignalRenderer {
    fn render(&mut self, response: &SearchResponse) {
        let response = response.clone();
        self.search.update(|s| s.push_response(response));
    }

    fn batch_started(&mut self, len: usize) {
        self.search.update(|s| s.begin_batch(len));
    }

    fn state_changed(&mut self, state: ConnectionState) {
        self.search.update(|s| s.set_state(state));
    }

    fn error(&mut self, error: &ChannelError) {
        self.search.update(|s| s.report_error(error));
    }
}
