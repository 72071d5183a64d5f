//! Command context registry
//!
//! The [`CommandContextManager`] owns every [`CommandContext`] and tracks which
//! one is active. An application builds one manager at its composition root and
//! shares it (typically as `Arc<CommandContextManager>`); tests build their own.

use crate::config::HistoryConfig;
use crate::context::{CommandContext, KnownContext};
use crate::error::{ContextError, HistoryError};
use crate::undo::Undoable;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

struct Registry {
    contexts: HashMap<String, Arc<CommandContext>>,
    /// Also stored in `contexts`; kept here so lookups of it cannot fail.
    default: Arc<CommandContext>,
    active: String,
}

impl Registry {
    fn initial(config: &HistoryConfig) -> Self {
        let default_id = KnownContext::Default.as_str();
        let default = Arc::new(CommandContext::new(default_id, config));
        let mut contexts = HashMap::new();
        contexts.insert(default_id.to_string(), default.clone());
        Self {
            contexts,
            default,
            active: default_id.to_string(),
        }
    }
}

/// Registry of named command contexts
///
/// The default context always exists, starts out active, and cannot be
/// deleted. Switching the active context never touches any history.
pub struct CommandContextManager {
    config: HistoryConfig,
    registry: RwLock<Registry>,
}

impl CommandContextManager {
    pub fn new() -> Self {
        Self::with_config(HistoryConfig::default())
    }

    /// Create a manager whose contexts use the given history settings
    pub fn with_config(config: HistoryConfig) -> Self {
        let registry = RwLock::new(Registry::initial(&config));
        Self { config, registry }
    }

    pub fn config(&self) -> &HistoryConfig {
        &self.config
    }

    /// The context unqualified operations target
    pub fn active_context(&self) -> Arc<CommandContext> {
        let registry = self.registry.read();
        registry
            .contexts
            .get(&registry.active)
            .unwrap_or(&registry.default)
            .clone()
    }

    pub fn active_context_id(&self) -> String {
        self.registry.read().active.clone()
    }

    /// Register a new, empty context
    pub fn create_context(&self, id: &str) -> Result<Arc<CommandContext>, ContextError> {
        let mut registry = self.registry.write();
        if registry.contexts.contains_key(id) {
            return Err(ContextError::AlreadyExists(id.to_string()));
        }
        let context = Arc::new(CommandContext::new(id, &self.config));
        registry.contexts.insert(id.to_string(), context.clone());
        debug!(context = id, "Created command context");
        Ok(context)
    }

    /// Look up a context by id
    pub fn context(&self, id: &str) -> Option<Arc<CommandContext>> {
        self.registry.read().contexts.get(id).cloned()
    }

    /// Remove a context and its history
    ///
    /// Returns `Ok(false)` if no context has that id. Deleting the active
    /// context makes the default context active.
    pub fn delete_context(&self, id: &str) -> Result<bool, ContextError> {
        if id == KnownContext::Default.as_str() {
            return Err(ContextError::DefaultContextProtected);
        }

        let mut registry = self.registry.write();
        if registry.contexts.remove(id).is_none() {
            return Ok(false);
        }
        if registry.active == id {
            registry.active = KnownContext::Default.as_str().to_string();
            info!(context = id, "Deleted active command context, default context is now active");
        } else {
            debug!(context = id, "Deleted command context");
        }
        Ok(true)
    }

    /// Make `id` the active context
    pub fn set_active_context(&self, id: &str) -> Result<(), ContextError> {
        let mut registry = self.registry.write();
        if !registry.contexts.contains_key(id) {
            return Err(ContextError::NotFound(id.to_string()));
        }
        registry.active = id.to_string();
        debug!(context = id, "Activated command context");
        Ok(())
    }

    /// Ids of all contexts, sorted
    pub fn context_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.registry.read().contexts.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Drop every context except a fresh default context, and activate it
    pub fn reset(&self) {
        *self.registry.write() = Registry::initial(&self.config);
        debug!("Reset command contexts");
    }

    /// The named context, or the active one when `context_id` is `None`
    pub fn resolve(&self, context_id: Option<&str>) -> Option<Arc<CommandContext>> {
        match context_id {
            Some(id) => self.context(id),
            None => Some(self.active_context()),
        }
    }

    /// Push an already executed entry onto the named or active context
    ///
    /// A missing named context is logged and the entry is dropped; returns
    /// whether the entry was pushed.
    pub fn push_undoable(&self, context_id: Option<&str>, undoable: Box<dyn Undoable>) -> bool {
        match self.resolve(context_id) {
            Some(context) => {
                context.push_undoable(undoable);
                true
            }
            None => {
                warn_missing(context_id, undoable.as_ref());
                false
            }
        }
    }

    /// Execute an entry and push it onto the named or active context
    ///
    /// If the named context does not exist the entry is neither executed nor
    /// pushed and `Ok(false)` is returned. An execution failure is returned
    /// without pushing.
    pub async fn push_and_execute(
        &self,
        context_id: Option<&str>,
        undoable: Box<dyn Undoable>,
    ) -> Result<bool, HistoryError> {
        let Some(context) = self.resolve(context_id) else {
            warn_missing(context_id, undoable.as_ref());
            return Ok(false);
        };
        context.push_and_execute(undoable).await?;
        Ok(true)
    }

    /// Undo on the active context
    pub async fn undo(&self) -> Result<Option<String>, HistoryError> {
        self.active_context().undo().await
    }

    /// Redo on the active context
    pub async fn redo(&self) -> Result<Option<String>, HistoryError> {
        self.active_context().redo().await
    }

    pub fn can_undo(&self) -> bool {
        self.active_context().can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.active_context().can_redo()
    }
}

impl Default for CommandContextManager {
    fn default() -> Self {
        Self::new()
    }
}

fn warn_missing(context_id: Option<&str>, undoable: &dyn Undoable) {
    warn!(
        context = context_id.unwrap_or_default(),
        undoable = undoable.id(),
        "Command context not found, skipping undoable"
    );
}
