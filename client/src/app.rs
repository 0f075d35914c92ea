//! Root application component.

use leptos::prelude::*;

use crate::components::{results::Results, search_bar::SearchBar, status_bar::StatusBar};
use crate::net;
use crate::state::search::SearchState;

/// Root component.
///
/// Provides the search state and channel handle, then starts the channel for
/// this page. There is no reconnection: reload the page to connect again.
#[component]
pub fn App() -> impl IntoView {
    let search = RwSignal::new(SearchState::default());
    provide_context(search);
    provide_context(net::connect(search));

    view! {
        <main class="live-search">
            <header class="live-search__header">
                <h1>"Live Search"</h1>
                <StatusBar/>
            </header>
            <SearchBar/>
            <Results/>
        </main>
    }
}
