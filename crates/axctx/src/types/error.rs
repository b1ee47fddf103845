/*! Error types for context builds. */

/// Errors that can abort a context build.
///
/// Budget exhaustion is deliberately *not* an error - it is the normal
/// stopping condition and is reported via `StopReason` instead.
#[derive(Debug, thiserror::Error)]
pub enum ContextError {
  /// A build was requested with an empty anchor list. This is a caller bug:
  /// the serializer has nothing to explore from and would only ever produce
  /// empty output.
  #[error("context build requires at least one anchor element")]
  NoAnchors,

  /// The build's cancel token was triggered. All traversal state has been
  /// released before this surfaces.
  #[error("context build cancelled")]
  Cancelled,
}

/// Result type for context builds.
pub type ContextResult<T> = Result<T, ContextError>;
