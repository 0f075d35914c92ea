use leptos::prelude::GetUntracked;
use leptos::reactive::owner::Owner;

use super::*;
use crate::state::search::ConnectionStatus;

#[test]
fn renderer_writes_batches_and_status_into_state() {
    let owner = Owner::new();
    owner.with(|| {
        let search = RwSignal::new(SearchState::default());
        let mut renderer = SignalRenderer::new(search);

        renderer.state_changed(ConnectionState::Open);
        let response: SearchResponse =
            serde_json::from_value(serde_json::json!({ "query": "cats" })).expect("response");
        renderer.batch_started(1);
        renderer.render(&response);

        let state = search.get_untracked();
        assert_eq!(state.status, ConnectionStatus::Connected);
        assert_eq!(state.batches, 1);
        assert_eq!(state.responses, vec![response]);
    });
}

#[test]
fn renderer_reports_errors_as_notice() {
    let owner = Owner::new();
    owner.with(|| {
        let search = RwSignal::new(SearchState::default());
        let mut renderer = SignalRenderer::new(search);

        renderer.error(&ChannelError::Connect("refused".to_owned()));

        assert_eq!(search.get_untracked().notice.as_deref(), Some("could not connect: refused"));
    });
}
