//! Error types for command dispatch, undo history, and configuration.

use thiserror::Error;

/// Handler registration errors
///
/// These indicate wiring mistakes and are expected to surface while the
/// application is being assembled, not during normal operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    #[error("Handler already registered for {0}")]
    DuplicateHandler(String),

    #[error("No handler registered for: {}", .0.join(", "))]
    Unhandled(Vec<String>),
}

/// Errors returned by `CommandDispatcher::execute`
///
/// Handler failures are carried through untouched: `Display` and `source()`
/// are those of the handler's own error.
#[derive(Debug, Error)]
pub enum DispatchError<E> {
    #[error("No handler registered for {0}")]
    NoHandler(String),

    #[error(transparent)]
    Handler(E),
}

impl<E> DispatchError<E> {
    /// The handler's error, if this failure came from the handler
    pub fn handler_error(&self) -> Option<&E> {
        match self {
            DispatchError::Handler(err) => Some(err),
            DispatchError::NoHandler(_) => None,
        }
    }

    /// Consume the error and hand back the handler's original error value
    pub fn into_handler_error(self) -> Option<E> {
        match self {
            DispatchError::Handler(err) => Some(err),
            DispatchError::NoHandler(_) => None,
        }
    }

    pub fn is_routing_error(&self) -> bool {
        matches!(self, DispatchError::NoHandler(_))
    }
}

/// Failures while running or replaying an undoable action
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("Executing '{id}' in context '{context}' failed: {source}")]
    ExecuteFailed {
        context: String,
        id: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Undo of '{id}' in context '{context}' failed: {source}")]
    UndoFailed {
        context: String,
        id: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Redo of '{id}' in context '{context}' failed: {source}")]
    RedoFailed {
        context: String,
        id: String,
        #[source]
        source: anyhow::Error,
    },
}

impl HistoryError {
    /// Id of the undoable whose side effect failed
    pub fn undoable_id(&self) -> &str {
        match self {
            HistoryError::ExecuteFailed { id, .. }
            | HistoryError::UndoFailed { id, .. }
            | HistoryError::RedoFailed { id, .. } => id,
        }
    }

    /// Id of the command context the failure happened in
    pub fn context_id(&self) -> &str {
        match self {
            HistoryError::ExecuteFailed { context, .. }
            | HistoryError::UndoFailed { context, .. }
            | HistoryError::RedoFailed { context, .. } => context,
        }
    }
}

/// Command context registry errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContextError {
    #[error("Command context already exists: {0}")]
    AlreadyExists(String),

    #[error("Command context not found: {0}")]
    NotFound(String),

    #[error("The default command context cannot be deleted")]
    DefaultContextProtected,
}

/// Configuration and logging setup errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Logging setup failed: {0}")]
    Logging(String),
}
