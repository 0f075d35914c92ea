//! Query input.

use leptos::prelude::*;

use channel::SearchQuery;

use crate::net::ChannelHandle;
use crate::state::search::SearchState;

/// Text input that submits a search on Enter or button click.
///
/// Blank input is rejected locally and never reaches the channel.
#[component]
pub fn SearchBar() -> impl IntoView {
    let search = expect_context::<RwSignal<SearchState>>();
    let channel = expect_context::<ChannelHandle>();

    let input = RwSignal::new(String::new());

    let do_search = move || {
        let query = match SearchQuery::new(&input.get()) {
            Ok(query) => query,
            Err(error) => {
                search.update(|s| s.reject_query(&error));
                return;
            }
        };
        if channel.search(query) {
            search.update(SearchState::clear_notice);
            input.set(String::new());
        } else {
            search.update(SearchState::report_not_connected);
        }
    };

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        do_search();
    };

    view! {
        <form class="search-bar" on:submit=on_submit>
            <input
                class="search-bar__input"
                type="text"
                placeholder="Search videos..."
                prop:value=move || input.get()
                on:input=move |ev| input.set(event_target_value(&ev))
            />
            <button class="btn btn--primary search-bar__submit" type="submit" disabled=move || !search.get().is_connected()>
                "Search"
            </button>
        </form>
    }
}
