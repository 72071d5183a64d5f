//! Retrace: Typed Command Dispatch and Undo History
//!
//! Routes command values to exactly one asynchronous handler per command kind,
//! keeps independent undo/redo histories per editing surface, and orchestrates
//! enter/exit callbacks for mode transitions.

pub mod command;
pub mod config;
pub mod context;
pub mod error;
pub mod lifecycle;
pub mod logging;
pub mod undo;

pub use command::{Command, CommandDispatcher, CommandHandler};
pub use config::{ConfigLoader, HistoryConfig, ReplayFailurePolicy, RetraceConfig};
pub use context::{CommandContext, CommandContextManager, KnownContext};
pub use error::{ConfigError, ContextError, DispatchError, HistoryError, RegistrationError};
pub use lifecycle::{CallbackId, CallbackMode, ContextManager, Transition};
pub use undo::{DelegatingUndoable, Undoable};
