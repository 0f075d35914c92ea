use frames::CodecError;

/// Failures the channel reports.
///
/// `Connect`, `Transport` and `ConnectionLost` reach the renderer's error hook.
/// `Malformed` is only logged: a bad frame never disturbs the connection.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    /// The transport never reached the open state.
    #[error("could not connect: {0}")]
    Connect(String),
    /// The transport failed while open.
    #[error("transport error: {0}")]
    Transport(String),
    /// The connection ended without a closing handshake.
    #[error("connection lost (code {code}){}", reason_suffix(.reason))]
    ConnectionLost { code: u16, reason: String },
    /// An inbound frame could not be decoded.
    #[error("malformed frame: {0}")]
    Malformed(#[from] CodecError),
}

fn reason_suffix(reason: &str) -> String {
    if reason.is_empty() { String::new() } else { format!(": {reason}") }
}
