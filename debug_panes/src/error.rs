//! Error types for the pane orchestrator.

use std::io;

/// Errors that can occur while driving the multiplexer.
#[derive(Debug, thiserror::Error)]
pub enum MuxError {
    /// A control command failed or its reply could not be parsed.
    #[error("tmux {args:?} failed: {reason}")]
    Invocation {
        /// Arguments passed to the control program.
        args: Vec<String>,
        /// Trimmed stderr, spawn error or parse failure.
        reason: String,
    },

    /// A pane reference did not resolve to a registered pane.
    #[error("pane not found: {0}")]
    PaneNotFound(String),

    /// A pane command arrived before the orchestrator was attached.
    #[error("pane orchestrator is not attached to a debugger session")]
    NotInitialized,

    /// Several registered panes share the requested title.
    #[error("title {title:?} matches {count} panes")]
    AmbiguousTitle {
        /// The requested title.
        title: String,
        /// Number of registered panes carrying it.
        count: usize,
    },

    /// A split size could not be validated.
    #[error("invalid size: {0}")]
    InvalidSize(String),

    /// A split direction was not recognised.
    #[error("invalid direction: {0}")]
    InvalidDirection(String),

    /// An action was constructed with nothing to run.
    #[error("empty command")]
    EmptyCommand,

    /// An external program name carried whitespace, i.e. a whole command
    /// line was quoted as one word.
    #[error("program {0:?} contains whitespace; pass its arguments as separate words")]
    QuotedProgram(String),

    /// The pane was adopted rather than created and may not be closed.
    #[error("pane {0} is not owned by the orchestrator")]
    NotOwned(String),

    /// Configuration could not be parsed.
    #[error("config error: {0}")]
    Config(String),

    /// An I/O error occurred.
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

impl MuxError {
    /// Build an [`MuxError::Invocation`] from an argument list and a reason.
    pub fn invocation(args: &[String], reason: impl Into<String>) -> Self {
        Self::Invocation { args: args.to_vec(), reason: reason.into() }
    }
}

/// Convenience type alias for orchestrator results.
pub type MuxResult<T> = Result<T, MuxError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invocation_message_names_arguments() {
        let err = MuxError::invocation(&["kill-pane".into()], "no such pane");
        assert_eq!(err.to_string(), "tmux [\"kill-pane\"] failed: no such pane");
    }

    #[test]
    fn io_errors_convert() {
        let err: MuxError = io::Error::new(io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(err, MuxError::Io(_)));
    }
}
