//! Error types for the session layer.

/// Errors that can occur while signing in or out.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The identity provider rejected the login or logout call, or reported
    /// success without handing over an identity. The session state is
    /// whatever it was before the attempt.
    #[error("authentication flow failed: {0}")]
    AuthFlowFailed(String),
}
