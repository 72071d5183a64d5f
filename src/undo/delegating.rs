//! Undoable built from an execute closure and an undo closure.

use crate::undo::Undoable;
use async_trait::async_trait;
use futures::future::{self, BoxFuture, FutureExt};
use std::fmt;
use std::future::Future;

type Action = Box<dyn FnMut() -> BoxFuture<'static, anyhow::Result<()>> + Send>;

/// Delegates `execute` and `undo` to caller-supplied closures
///
/// The wrapper keeps no state of its own: every call runs the matching
/// closure and awaits it.
pub struct DelegatingUndoable {
    id: String,
    description: Option<String>,
    exec_fn: Action,
    undo_fn: Action,
}

impl DelegatingUndoable {
    /// Build from asynchronous closures
    pub fn new<E, EFut, U, UFut>(id: impl Into<String>, mut exec_fn: E, mut undo_fn: U) -> Self
    where
        E: FnMut() -> EFut + Send + 'static,
        EFut: Future<Output = anyhow::Result<()>> + Send + 'static,
        U: FnMut() -> UFut + Send + 'static,
        UFut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        Self {
            id: id.into(),
            description: None,
            exec_fn: Box::new(move || exec_fn().boxed()),
            undo_fn: Box::new(move || undo_fn().boxed()),
        }
    }

    /// Build from synchronous closures
    pub fn from_fns<E, U>(id: impl Into<String>, mut exec_fn: E, mut undo_fn: U) -> Self
    where
        E: FnMut() -> anyhow::Result<()> + Send + 'static,
        U: FnMut() -> anyhow::Result<()> + Send + 'static,
    {
        Self {
            id: id.into(),
            description: None,
            exec_fn: Box::new(move || future::ready(exec_fn()).boxed()),
            undo_fn: Box::new(move || future::ready(undo_fn()).boxed()),
        }
    }

    /// Set the description shown for this entry; defaults to the id
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl fmt::Debug for DelegatingUndoable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DelegatingUndoable")
            .field("id", &self.id)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Undoable for DelegatingUndoable {
    fn id(&self) -> &str {
        &self.id
    }

    fn description(&self) -> String {
        self.description.clone().unwrap_or_else(|| self.id.clone())
    }

    async fn execute(&mut self) -> anyhow::Result<()> {
        (self.exec_fn)().await
    }

    async fn undo(&mut self) -> anyhow::Result<()> {
        (self.undo_fn)().await
    }
}
