//! Integration tests for command dispatch and undo history

mod command_dispatch;
mod context_registry;
