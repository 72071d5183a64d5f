//! Command dispatcher: routes each command to the single handler for its kind.

use crate::command::{Command, CommandHandler};
use crate::error::{DispatchError, RegistrationError};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Maps command kinds to their handlers
///
/// At most one handler exists per kind. The dispatcher adds nothing to a
/// dispatch beyond the lookup: it does not log, retry, cache results, or
/// serialize concurrent commands.
pub struct CommandDispatcher<C: Command> {
    handlers: RwLock<HashMap<C::Kind, Arc<dyn CommandHandler<C>>>>,
}

impl<C: Command> CommandDispatcher<C> {
    /// Create a dispatcher with no handlers
    pub fn new() -> Self {
        Self {
            handlers: RwLock::new(HashMap::new()),
        }
    }

    /// Register the handler for `kind`
    ///
    /// Fails if a handler is already registered for that kind; the existing
    /// handler stays in place.
    pub fn register<H>(&self, kind: C::Kind, handler: H) -> Result<(), RegistrationError>
    where
        H: CommandHandler<C> + 'static,
    {
        let mut handlers = self.handlers.write();
        if handlers.contains_key(&kind) {
            return Err(RegistrationError::DuplicateHandler(kind.to_string()));
        }
        handlers.insert(kind, Arc::new(handler));
        debug!(kind = %kind, "Registered command handler");
        Ok(())
    }

    /// Remove the handler for `kind`, returning whether one was registered
    pub fn unregister(&self, kind: C::Kind) -> bool {
        let removed = self.handlers.write().remove(&kind).is_some();
        if removed {
            debug!(kind = %kind, "Unregistered command handler");
        }
        removed
    }

    pub fn is_registered(&self, kind: C::Kind) -> bool {
        self.handlers.read().contains_key(&kind)
    }

    /// Kinds that currently have a handler, in declaration order
    pub fn registered_kinds(&self) -> Vec<C::Kind> {
        let handlers = self.handlers.read();
        C::kinds()
            .iter()
            .copied()
            .filter(|kind| handlers.contains_key(kind))
            .collect()
    }

    /// Kinds of the command set that have no handler
    pub fn missing_handlers(&self) -> Vec<C::Kind> {
        let handlers = self.handlers.read();
        C::kinds()
            .iter()
            .copied()
            .filter(|kind| !handlers.contains_key(kind))
            .collect()
    }

    /// Check that every kind in the command set has a handler
    ///
    /// Meant to be called once the application has finished wiring handlers.
    pub fn ensure_complete(&self) -> Result<(), RegistrationError> {
        let missing = self.missing_handlers();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(RegistrationError::Unhandled(
                missing.iter().map(ToString::to_string).collect(),
            ))
        }
    }

    /// Run the handler registered for the command's kind
    ///
    /// The handler's value is returned as is. A handler error comes back as
    /// [`DispatchError::Handler`] carrying the original error.
    pub async fn execute(&self, command: C) -> Result<C::Output, DispatchError<C::Error>> {
        let kind = command.kind();
        // Clone the handler out so the lock is released before awaiting.
        let handler = self.handlers.read().get(&kind).cloned();
        let handler = handler.ok_or_else(|| DispatchError::NoHandler(kind.to_string()))?;
        handler.handle(command).await.map_err(DispatchError::Handler)
    }
}

impl<C: Command> Default for CommandDispatcher<C> {
    fn default() -> Self {
        Self::new()
    }
}
