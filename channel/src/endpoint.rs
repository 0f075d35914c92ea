#[cfg(test)]
#[path = "endpoint_test.rs"]
mod endpoint_test;

use std::fmt;

/// Path of the channel endpoint on the serving host.
pub const WS_PATH: &str = "/ws";

/// A WebSocket URL the channel connects to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoint(String);

impl Endpoint {
    /// Use `url` as-is.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    /// Derive the endpoint for a page served from `host`.
    ///
    /// Pages loaded over `https` connect with `wss`, everything else with `ws`.
    #[must_use]
    pub fn from_page(href: &str, host: &str) -> Self {
        let scheme = if href.starts_with("https") { "wss" } else { "ws" };
        Self(format!("{scheme}://{host}{WS_PATH}"))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
