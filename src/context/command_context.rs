//! A single undo/redo history.

use crate::config::{HistoryConfig, ReplayFailurePolicy};
use crate::error::HistoryError;
use crate::undo::Undoable;
use futures::lock::Mutex as AsyncMutex;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

type Action = Arc<AsyncMutex<Box<dyn Undoable>>>;

/// One history slot
///
/// The slot, not the undoable, is what moves between stacks, so an entry can
/// sit on its destination stack while its replay is still running.
struct Entry {
    id: String,
    description: String,
    action: Action,
}

impl Entry {
    fn new(undoable: Box<dyn Undoable>) -> Self {
        Self {
            id: undoable.id().to_string(),
            description: undoable.description(),
            action: Arc::new(AsyncMutex::new(undoable)),
        }
    }

    fn holds(&self, action: &Action) -> bool {
        Arc::ptr_eq(&self.action, action)
    }
}

/// Both stacks keep the most recent entry at the back.
#[derive(Default)]
struct Stacks {
    undo: VecDeque<Entry>,
    redo: Vec<Entry>,
    /// Bumped by every push; a replay started on an older branch never
    /// restores onto the redo stack of a newer one.
    branch: u64,
}

impl Stacks {
    fn take_from_undo(&mut self, action: &Action) -> Option<Entry> {
        let index = self.undo.iter().position(|entry| entry.holds(action))?;
        self.undo.remove(index)
    }

    fn take_from_redo(&mut self, action: &Action) -> Option<Entry> {
        let index = self.redo.iter().position(|entry| entry.holds(action))?;
        Some(self.redo.remove(index))
    }

    fn find_mut(&mut self, action: &Action) -> Option<&mut Entry> {
        self.undo
            .iter_mut()
            .chain(self.redo.iter_mut())
            .find(|entry| entry.holds(action))
    }

    /// Drop the oldest undo entries beyond `max_depth`; 0 keeps everything
    fn trim(&mut self, context: &str, max_depth: usize) {
        if max_depth == 0 {
            return;
        }
        while self.undo.len() > max_depth {
            if let Some(dropped) = self.undo.pop_front() {
                debug!(
                    context,
                    undoable = %dropped.id,
                    "History limit reached, dropping oldest entry"
                );
            }
        }
    }
}

/// Which replay was running when it failed
#[derive(Debug, Clone, Copy)]
enum Replay {
    Undo,
    Redo,
}

/// Undo and redo stacks for one editing surface
///
/// Pushing a new entry clears the redo stack; branching history is not kept.
/// Contexts are created and owned by the
/// [`CommandContextManager`](crate::context::CommandContextManager).
///
/// The stack lock is only held while entries move. `undo` and `redo` move the
/// entry to its destination stack before awaiting the replay, so a push made
/// while an undo is in flight clears that entry from the redo stack like any
/// other.
pub struct CommandContext {
    id: String,
    max_depth: usize,
    replay_failure: ReplayFailurePolicy,
    stacks: Mutex<Stacks>,
}

impl CommandContext {
    pub(crate) fn new(id: impl Into<String>, config: &HistoryConfig) -> Self {
        Self {
            id: id.into(),
            max_depth: config.max_depth,
            replay_failure: config.replay_failure,
            stacks: Mutex::new(Stacks::default()),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Add an already executed entry to the history
    ///
    /// Does not call `execute`. Clears the redo stack and, when a depth limit
    /// is configured, drops the oldest entries beyond it.
    pub fn push_undoable(&self, undoable: Box<dyn Undoable>) {
        let entry = Entry::new(undoable);
        let mut stacks = self.stacks.lock();
        debug!(context = %self.id, undoable = %entry.id, "Pushing undoable");
        stacks.undo.push_back(entry);
        stacks.redo.clear();
        stacks.branch += 1;
        stacks.trim(&self.id, self.max_depth);
    }

    /// Execute an entry, then push it if execution succeeded
    pub async fn push_and_execute(
        &self,
        mut undoable: Box<dyn Undoable>,
    ) -> Result<(), HistoryError> {
        if let Err(source) = undoable.execute().await {
            return Err(HistoryError::ExecuteFailed {
                context: self.id.clone(),
                id: undoable.id().to_string(),
                source,
            });
        }
        self.push_undoable(undoable);
        Ok(())
    }

    /// Undo the most recent entry
    ///
    /// The entry is on the redo stack before its `undo` runs. Returns the
    /// entry's description, or `None` when there is nothing to undo. If `undo`
    /// fails the error is returned and the entry is handled according to the
    /// context's replay failure policy.
    pub async fn undo(&self) -> Result<Option<String>, HistoryError> {
        let moved = {
            let mut stacks = self.stacks.lock();
            stacks.undo.pop_back().map(|entry| {
                let moved = (entry.action.clone(), entry.description.clone(), stacks.branch);
                stacks.redo.push(entry);
                moved
            })
        };
        let Some((action, description, branch)) = moved else {
            debug!(context = %self.id, "Nothing to undo");
            return Ok(None);
        };

        let result = {
            let mut undoable = action.lock().await;
            let result = undoable.undo().await;
            (result, undoable.id().to_string(), undoable.description())
        };
        self.settle(Replay::Undo, &action, branch, description, result)
    }

    /// Redo the most recently undone entry by running its `execute` again
    ///
    /// The entry is back on the undo stack before `execute` runs.
    pub async fn redo(&self) -> Result<Option<String>, HistoryError> {
        let moved = {
            let mut stacks = self.stacks.lock();
            stacks.redo.pop().map(|entry| {
                let moved = (entry.action.clone(), entry.description.clone(), stacks.branch);
                stacks.undo.push_back(entry);
                stacks.trim(&self.id, self.max_depth);
                moved
            })
        };
        let Some((action, description, branch)) = moved else {
            debug!(context = %self.id, "Nothing to redo");
            return Ok(None);
        };

        let result = {
            let mut undoable = action.lock().await;
            let result = undoable.execute().await;
            (result, undoable.id().to_string(), undoable.description())
        };
        self.settle(Replay::Redo, &action, branch, description, result)
    }

    /// Record the outcome of a finished replay
    fn settle(
        &self,
        replay: Replay,
        action: &Action,
        branch: u64,
        description: String,
        (result, id, refreshed): (anyhow::Result<()>, String, String),
    ) -> Result<Option<String>, HistoryError> {
        let mut stacks = self.stacks.lock();

        let source = match result {
            Ok(()) => {
                if let Some(entry) = stacks.find_mut(action) {
                    entry.description = refreshed;
                }
                return Ok(Some(description));
            }
            Err(source) => source,
        };

        warn!(
            context = %self.id,
            undoable = %id,
            replay = ?replay,
            error = %source,
            "Replay failed"
        );
        let restore = self.replay_failure == ReplayFailurePolicy::Restore;
        match replay {
            Replay::Undo => {
                // Absent when a push or clear already dropped it from redo
                if let Some(entry) = stacks.take_from_redo(action) {
                    if restore {
                        stacks.undo.push_back(entry);
                        stacks.trim(&self.id, self.max_depth);
                    }
                }
                Err(HistoryError::UndoFailed {
                    context: self.id.clone(),
                    id,
                    source,
                })
            }
            Replay::Redo => {
                if let Some(entry) = stacks.take_from_undo(action) {
                    if restore && stacks.branch == branch {
                        stacks.redo.push(entry);
                    }
                }
                Err(HistoryError::RedoFailed {
                    context: self.id.clone(),
                    id,
                    source,
                })
            }
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.stacks.lock().undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.stacks.lock().redo.is_empty()
    }

    pub fn undo_count(&self) -> usize {
        self.stacks.lock().undo.len()
    }

    pub fn redo_count(&self) -> usize {
        self.stacks.lock().redo.len()
    }

    /// Description of the entry `undo` would replay next
    pub fn undo_description(&self) -> Option<String> {
        self.stacks.lock().undo.back().map(|entry| entry.description.clone())
    }

    /// Description of the entry `redo` would replay next
    pub fn redo_description(&self) -> Option<String> {
        self.stacks.lock().redo.last().map(|entry| entry.description.clone())
    }

    /// Drop all history
    pub fn clear(&self) {
        let mut stacks = self.stacks.lock();
        stacks.undo.clear();
        stacks.redo.clear();
        stacks.branch += 1;
    }
}

impl fmt::Debug for CommandContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stacks = self.stacks.lock();
        f.debug_struct("CommandContext")
            .field("id", &self.id)
            .field("undo", &stacks.undo.len())
            .field("redo", &stacks.redo.len())
            .finish()
    }
}
