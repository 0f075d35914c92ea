//! Page components.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components read `RwSignal<SearchState>` and send requests through the
//! `ChannelHandle`, both from Leptos context.

pub mod results;
pub mod search_bar;
pub mod status_bar;
