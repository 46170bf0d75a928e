use rosterline_protocol::ProtocolError;

/// Errors a backend proxy can report for a single remote call.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// Opening the connection (or the handshake on it) failed.
    #[error("connect failed: {0}")]
    ConnectFailed(#[source] std::io::Error),

    /// The backend closed the connection before answering.
    #[error("connection closed: {0}")]
    ConnectionClosed(String),

    /// Sending the request failed.
    #[error("send failed: {0}")]
    SendFailed(#[source] std::io::Error),

    /// Receiving the reply failed.
    #[error("receive failed: {0}")]
    ReceiveFailed(#[source] std::io::Error),

    /// The backend answered, and the answer was "no".
    #[error("backend rejected the call ({code}): {message}")]
    Rejected { code: u16, message: String },

    /// The reply could not be decoded or was the wrong kind of reply.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

impl BackendError {
    /// Shorthand for a rejection.
    pub fn rejected(code: u16, message: impl Into<String>) -> Self {
        Self::Rejected {
            code,
            message: message.into(),
        }
    }
}
