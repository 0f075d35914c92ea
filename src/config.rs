//! Command-line and environment configuration.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::time::Duration;

use channel::{Endpoint, QueryError, SearchQuery};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "livesearch", about = "Live video search over a persistent channel")]
pub struct Cli {
    /// Channel endpoint.
    #[arg(long, env = "LIVESEARCH_URL", default_value = "ws://127.0.0.1:9000/ws")]
    pub url: String,

    /// Seconds between keepalive pings while connected.
    #[arg(long, env = "LIVESEARCH_KEEPALIVE_SECS", default_value_t = 25, value_parser = clap::value_parser!(u64).range(1..))]
    pub keepalive_secs: u64,

    /// Search to submit once connected. Repeatable.
    #[arg(long = "query", value_name = "QUERY")]
    pub queries: Vec<String>,

    /// Close after every `--query` has been answered instead of reading stdin.
    #[arg(long, default_value_t = false, requires = "queries")]
    pub once: bool,
}

/// Validated session settings.
#[derive(Clone, Debug)]
pub struct SessionConfig {
    pub endpoint: Endpoint,
    pub keepalive: Duration,
    pub queries: Vec<SearchQuery>,
    pub once: bool,
}

impl TryFrom<Cli> for SessionConfig {
    type Error = QueryError;

    fn try_from(cli: Cli) -> Result<Self, Self::Error> {
        let queries = cli
            .queries
            .iter()
            .map(|raw| SearchQuery::new(raw))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            endpoint: Endpoint::new(cli.url),
            keepalive: Duration::from_secs(cli.keepalive_secs),
            queries,
            once: cli.once,
        })
    }
}
