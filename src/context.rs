//! Command contexts: independent, named undo/redo histories.

pub mod command_context;
pub mod manager;

pub use command_context::CommandContext;
pub use manager::CommandContextManager;

use std::fmt;

/// Context ids with a fixed meaning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KnownContext {
    /// Always present and active until another context is selected
    Default,
}

impl KnownContext {
    pub fn as_str(self) -> &'static str {
        match self {
            KnownContext::Default => "default",
        }
    }
}

impl fmt::Display for KnownContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for KnownContext {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}
