use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Failures surfaced by [`crate::FileWorkspace`] operations that reach the host.
pub enum WorkspaceError {
    /// A storage call failed.
    #[error("storage {op} failed: {message}")]
    Storage {
        /// Storage operation name.
        op: &'static str,
        /// Backend message.
        message: String,
    },
    /// Preferences could not be read or written.
    #[error("workspace config: {0}")]
    Config(String),
}
