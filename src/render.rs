//! Plain-text rendering of result batches for a terminal.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use std::borrow::Cow;
use std::collections::HashSet;
use std::io::{self, Write};

use channel::{ChannelError, ConnectionState, Renderer, SearchResponse};
use frames::metric_label;

/// Writes batches to `out` and remembers which queries have been answered.
pub struct TerminalRenderer<W> {
    out: W,
    answered: HashSet<String>,
    batches: usize,
    last_error: Option<String>,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out, answered: HashSet::new(), batches: 0, last_error: None }
    }

    /// Whether any batch so far carried a response for `query`.
    pub fn has_answered(&self, query: &str) -> bool {
        self.answered.contains(query)
    }

    pub fn batches(&self) -> usize {
        self.batches
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_response(&mut self, response: &SearchResponse) -> io::Result<()> {
        let mood = response
            .sentiment
            .as_ref()
            .map_or_else(|| "?".to_owned(), |s| format!("{} {}", printable(s.emoticon()), s.label()));
        writeln!(
            self.out,
            "[{}] {mood}  grade {}  ease {}",
            printable(&response.query),
            metric_label(response.flesch_kincaid_grade_level_avg),
            metric_label(response.flesch_reading_score_avg),
        )?;
        if response.items.is_empty() {
            writeln!(self.out, "  (no videos)")?;
        }
        for (index, item) in response.items.iter().enumerate() {
            writeln!(
                self.out,
                "  {:>2}. {} ({}) {}",
                index + 1,
                printable(&item.snippet.title),
                printable(&item.snippet.channel_title),
                printable(&item.watch_url()),
            )?;
        }
        Ok(())
    }

    fn write_line(&mut self, line: &str) {
        if let Err(error) = writeln!(self.out, "{}", printable(line)) {
            tracing::warn!(%error, "render: write failed");
        }
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn render(&mut self, response: &SearchResponse) {
        self.answered.insert(response.query.clone());
        if let Err(error) = self.write_response(response) {
            tracing::warn!(%error, "render: write failed");
        }
    }

    fn batch_started(&mut self, len: usize) {
        self.batches += 1;
        let noun = if len == 1 { "response" } else { "responses" };
        self.write_line(&format!("-- batch {} ({len} {noun}) --", self.batches));
    }

    fn state_changed(&mut self, state: ConnectionState) {
        match state {
            ConnectionState::Open => self.write_line("* connected"),
            ConnectionState::Closed(_) => self.write_line(&format!("* disconnected ({state})")),
            _ => {}
        }
    }

    fn error(&mut self, error: &ChannelError) {
        self.last_error = Some(error.to_string());
        self.write_line(&format!("! {error}"));
    }
}

/// Escape control characters so server text cannot drive the terminal.
fn printable(text: &str) -> Cow<'_, str> {
    if !text.chars().any(char::is_control) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_control() {
            out.extend(c.escape_default());
        } else {
            out.push(c);
        }
    }
    Cow::Owned(out)
}
