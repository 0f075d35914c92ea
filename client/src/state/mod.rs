//! Client-side state.
//!
//! DESIGN
//! ======
//! Plain reducers over `SearchState`; components and the channel renderer
//! call them through one `RwSignal`.

pub mod search;
