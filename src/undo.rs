//! Undoable actions
//!
//! An [`Undoable`] pairs a forward side effect with its inverse under one
//! identity. [`DelegatingUndoable`] builds one from a pair of closures, which
//! is how most callers create history entries.

use async_trait::async_trait;

pub mod delegating;

pub use delegating::DelegatingUndoable;

/// A replayable forward/inverse action
///
/// `undo` must restore the state the most recent `execute` produced, however
/// many undo/redo cycles the entry goes through. Both methods take `&mut self`
/// so an implementation may remember whether it is running for the first time
/// or being redone.
#[async_trait]
pub trait Undoable: Send {
    /// Identifier used for diagnostics; not required to be unique
    fn id(&self) -> &str;

    /// Human-readable description (e.g. "Undo: Create label")
    fn description(&self) -> String {
        self.id().to_string()
    }

    async fn execute(&mut self) -> anyhow::Result<()>;

    async fn undo(&mut self) -> anyhow::Result<()>;
}
