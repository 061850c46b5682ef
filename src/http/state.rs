use std::fmt;

/// Lifecycle of a single GET on the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ReadyState {
    Unsent,
    /// Url parsed and connection established.
    Opened,
    /// Request written.
    Sent,
    /// Status line read, headers and body still coming.
    Receiving,
    Done,
}

impl fmt::Display for ReadyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReadyState::Unsent => "unsent",
            ReadyState::Opened => "opened",
            ReadyState::Sent => "sent",
            ReadyState::Receiving => "receiving",
            ReadyState::Done => "done",
        };
        f.write_str(name)
    }
}
