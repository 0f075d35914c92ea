//! Connection status indicator with a close button.

use leptos::prelude::*;

use crate::net::ChannelHandle;
use crate::state::search::SearchState;

/// Status bar above the results.
///
/// Shows the connection status, the latest notice, and a button that closes
/// the channel while it is connecting or connected.
#[component]
pub fn StatusBar() -> impl IntoView {
    let search = expect_context::<RwSignal<SearchState>>();
    let channel = expect_context::<ChannelHandle>();

    let status_class = move || search.get().status.dot_class();
    let status_label = move || search.get().status.label();
    let notice = move || search.get().notice.unwrap_or_default();
    let batches = move || search.get().batches;

    let on_close = move |_| {
        if !channel.close() {
            log::debug!("close requested with no running channel");
        }
    };

    view! {
        <div class="status-bar">
            <span class="status-bar__connection">
                <span class=status_class></span>
                {status_label}
            </span>
            <span class="status-bar__divider">"|"</span>
            <span class="status-bar__batches">{move || format!("{} batches", batches())}</span>
            <span class="status-bar__notice">{notice}</span>
            <span class="status-bar__spacer"></span>
            <button class="btn status-bar__close" on:click=on_close disabled=move || !search.get().can_close()>
                "Disconnect"
            </button>
        </div>
    }
}
