//! One channel session: connect, submit queries, render until closed.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::io::Write;

use channel::{ChannelClient, ConnectionState, SearchQuery};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::config::SessionConfig;
use crate::host::{HostEvent, IntervalScheduler, SocketTransport};
use crate::render::TerminalRenderer;

/// Input line that closes the session.
pub const QUIT_COMMAND: &str = ":quit";

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("failed to read input: {0}")]
    Input(#[from] std::io::Error),
    #[error("host event queue closed while {0}")]
    EventsClosed(ConnectionState),
}

/// How a session ended.
pub struct SessionOutcome<W> {
    pub state: ConnectionState,
    pub renderer: TerminalRenderer<W>,
}

type Client<W> = ChannelClient<SocketTransport, IntervalScheduler, TerminalRenderer<W>>;

/// Drive one connection to a terminal state.
///
/// Configured queries go out as soon as the connection opens. Unless `once`
/// is set, each line of `input` is submitted as a further query; an empty
/// line is rejected, and [`QUIT_COMMAND`] or end of input closes the channel.
///
/// # Errors
///
/// Fails if `input` cannot be read or the host event queue closes early.
pub async fn run<W, I>(
    config: SessionConfig,
    renderer: TerminalRenderer<W>,
    input: I,
) -> Result<SessionOutcome<W>, SessionError>
where
    W: Write,
    I: AsyncBufRead + Unpin,
{
    let (events_tx, mut events) = mpsc::unbounded_channel();
    let mut client: Client<W> = ChannelClient::new(
        SocketTransport::new(events_tx.clone()),
        IntervalScheduler::new(events_tx),
        renderer,
    )
    .with_keepalive_interval(config.keepalive);

    client.connect(config.endpoint.clone());

    let mut lines = input.lines();
    let mut input_done = config.once;
    let mut submitted = false;

    while !client.state().is_terminal() {
        tokio::select! {
            event = events.recv() => {
                let Some(event) = event else {
                    return Err(SessionError::EventsClosed(client.state()));
                };
                match event {
                    HostEvent::Transport(event) => client.handle_event(event),
                    HostEvent::Tick(id) => client.keepalive_tick(id),
                }
            }
            line = lines.next_line(), if client.is_open() && !input_done => {
                match line? {
                    Some(line) => handle_line(&mut client, &line),
                    None => {
                        info!("input finished, closing");
                        input_done = true;
                        client.close();
                    }
                }
            }
        }

        if !submitted && client.is_open() {
            submitted = true;
            for query in &config.queries {
                client.submit_search(query.clone());
            }
        }

        if config.once && client.is_open() && all_answered(&client, &config.queries) {
            info!("all queries answered, closing");
            client.close();
        }
    }

    Ok(SessionOutcome { state: client.state(), renderer: client.into_renderer() })
}

fn handle_line<W: Write>(client: &mut Client<W>, line: &str) {
    if line.trim() == QUIT_COMMAND {
        client.close();
        return;
    }
    match SearchQuery::new(line) {
        Ok(query) => {
            client.submit_search(query);
        }
        Err(error) => warn!(%error, "query rejected"),
    }
}

fn all_answered<W: Write>(client: &Client<W>, queries: &[SearchQuery]) -> bool {
    queries.iter().all(|query| client.renderer().has_answered(query.as_str()))
}
