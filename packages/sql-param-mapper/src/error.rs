/// Top-level error returned by [`crate::analyze`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AnalyzeError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Invariant(#[from] InvariantError),
}

/// The SQL text could not be parsed. No partial analysis accompanies this error.
#[derive(Debug, thiserror::Error, PartialEq, Eq, Clone)]
#[error("{message}")]
pub struct ParseError {
    /// The parser's own message.
    pub message: String,

    /// 1-based character offset into the SQL text at which the parser gave up.
    pub cursor_position: usize,
}

/// A precondition on the parsed AST was violated.
///
/// These indicate a problem with the parser's output (or with a hand-built AST) rather than with the SQL being
/// analyzed, and are deliberately kept apart from [`ParseError`] and from [`crate::Warning`]s.
#[derive(Debug, thiserror::Error, PartialEq, Eq, Clone)]
pub enum InvariantError {
    #[error("Invariant failed: parser returned no statements")]
    NoStatement,

    #[error("Invariant failed: column reference has no name parts")]
    EmptyColumnRef,

    #[error("Invariant failed: object name has no parts: '{}'", _0)]
    EmptyObjectName(String),
}
