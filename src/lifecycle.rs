//! Enter/exit callback orchestration for mode transitions
//!
//! A [`ContextManager`] keeps two ordered callback lists, one run by
//! [`ContextManager::enter`] and one by [`ContextManager::exit`]. It tracks no
//! "entered" state of its own and is unrelated to undo history.
//!
//! Greedy callbacks go to the front of their list and stop the walk once they
//! have run, so an exclusive listener (say, an editing surface that has
//! captured focus) can pre-empt the ordinary ones. Non-persistent callbacks are
//! removed after they run once.

use std::fmt;
use tracing::{debug, error};

/// How a registered callback behaves when it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackMode {
    /// Runs once, then is removed
    Once,
    /// Runs on every transition
    Persistent,
    /// Runs first, stops the walk, then is removed
    GreedyOnce,
    /// Runs first and stops the walk on every transition
    GreedyPersistent,
}

impl CallbackMode {
    pub fn is_greedy(self) -> bool {
        matches!(self, CallbackMode::GreedyOnce | CallbackMode::GreedyPersistent)
    }

    pub fn is_persistent(self) -> bool {
        matches!(self, CallbackMode::Persistent | CallbackMode::GreedyPersistent)
    }
}

/// Handle for one registration
///
/// Every registration gets its own id, even when the same logic is registered
/// on both the enter and exit lists, so removing one never removes the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CallbackId(u64);

/// Which list a callback belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Enter,
    Exit,
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transition::Enter => f.write_str("enter"),
            Transition::Exit => f.write_str("exit"),
        }
    }
}

type Callback = Box<dyn FnMut() -> anyhow::Result<()> + Send>;

struct Registration {
    id: CallbackId,
    mode: CallbackMode,
    callback: Callback,
}

/// Ordered enter and exit callback lists
#[derive(Default)]
pub struct ContextManager {
    enter_callbacks: Vec<Registration>,
    exit_callbacks: Vec<Registration>,
    next_id: u64,
}

impl ContextManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_enter_callback<F>(&mut self, mode: CallbackMode, callback: F) -> CallbackId
    where
        F: FnMut() -> anyhow::Result<()> + Send + 'static,
    {
        self.register(Transition::Enter, mode, Box::new(callback))
    }

    pub fn register_exit_callback<F>(&mut self, mode: CallbackMode, callback: F) -> CallbackId
    where
        F: FnMut() -> anyhow::Result<()> + Send + 'static,
    {
        self.register(Transition::Exit, mode, Box::new(callback))
    }

    fn register(
        &mut self,
        transition: Transition,
        mode: CallbackMode,
        callback: Callback,
    ) -> CallbackId {
        let id = CallbackId(self.next_id);
        self.next_id += 1;

        let registration = Registration { id, mode, callback };
        let list = self.list_mut(transition);
        if mode.is_greedy() {
            list.insert(0, registration);
        } else {
            list.push(registration);
        }
        debug!(transition = %transition, ?mode, callback = id.0, "Registered callback");
        id
    }

    /// Run the enter callbacks; returns how many ran
    pub fn enter(&mut self) -> usize {
        Self::run(Transition::Enter, &mut self.enter_callbacks)
    }

    /// Run the exit callbacks; returns how many ran
    pub fn exit(&mut self) -> usize {
        Self::run(Transition::Exit, &mut self.exit_callbacks)
    }

    fn run(transition: Transition, callbacks: &mut Vec<Registration>) -> usize {
        let mut fired = 0;
        let mut expired = Vec::new();

        for registration in callbacks.iter_mut() {
            if let Err(err) = (registration.callback)() {
                error!(
                    transition = %transition,
                    callback = registration.id.0,
                    error = %err,
                    "Callback failed"
                );
            }
            fired += 1;

            if !registration.mode.is_persistent() {
                expired.push(registration.id);
            }
            if registration.mode.is_greedy() {
                break;
            }
        }

        if !expired.is_empty() {
            callbacks.retain(|registration| !expired.contains(&registration.id));
        }
        fired
    }

    /// Remove a registration; returns whether it was still registered
    pub fn unregister(&mut self, id: CallbackId) -> bool {
        for transition in [Transition::Enter, Transition::Exit] {
            let list = self.list_mut(transition);
            if let Some(index) = list.iter().position(|registration| registration.id == id) {
                list.remove(index);
                return true;
            }
        }
        false
    }

    pub fn enter_callback_count(&self) -> usize {
        self.enter_callbacks.len()
    }

    pub fn exit_callback_count(&self) -> usize {
        self.exit_callbacks.len()
    }

    /// Remove every enter and exit callback
    pub fn reset(&mut self) {
        self.enter_callbacks.clear();
        self.exit_callbacks.clear();
    }

    fn list_mut(&mut self, transition: Transition) -> &mut Vec<Registration> {
        match transition {
            Transition::Enter => &mut self.enter_callbacks,
            Transition::Exit => &mut self.exit_callbacks,
        }
    }
}

impl fmt::Debug for ContextManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextManager")
            .field("enter_callbacks", &self.enter_callbacks.len())
            .field("exit_callbacks", &self.exit_callbacks.len())
            .finish()
    }
}
