//! Integration tests for the command context registry
//!
//! Tests cover:
//! - Shared manager handles observe the same contexts
//! - Fresh and reset managers start from the default context
//! - Hook-style pushes to missing contexts
//! - Independent histories per context

use super::test_utils::{counted, Calls};
use retrace::{CommandContextManager, ContextError, HistoryConfig, KnownContext};
use std::sync::Arc;

#[test]
fn test_shared_manager_is_one_registry() {
    let manager = Arc::new(CommandContextManager::new());
    let sidebar_view = manager.clone();

    manager.create_context("sidebar").unwrap();
    let calls = Arc::new(Calls::default());
    assert!(sidebar_view.push_undoable(Some("sidebar"), counted("expand-field", &calls)));

    assert!(manager.context("sidebar").unwrap().can_undo());
    assert_eq!(
        manager.context_ids(),
        vec!["default".to_string(), "sidebar".to_string()]
    );
}

#[test]
fn test_fresh_and_reset_managers_match() {
    let fresh = CommandContextManager::new();
    assert_eq!(fresh.active_context().id(), KnownContext::Default.as_str());
    assert!(!fresh.active_context().can_undo());

    let used = CommandContextManager::new();
    let calls = Arc::new(Calls::default());
    used.create_context("overlay").unwrap();
    used.set_active_context("overlay").unwrap();
    used.push_undoable(None, counted("drag", &calls));
    used.reset();

    assert_eq!(used.active_context().id(), KnownContext::Default.as_str());
    assert!(!used.active_context().can_undo());
    assert_eq!(used.context_ids(), fresh.context_ids());
}

#[tokio::test]
async fn test_missing_named_context_skips_action() {
    let manager = CommandContextManager::new();
    manager.create_context("overlay").unwrap();
    let calls = Arc::new(Calls::default());

    let pushed = manager
        .push_and_execute(Some("timeline"), counted("resize", &calls))
        .await
        .unwrap();

    assert!(!pushed);
    assert_eq!(calls.executed(), 0);
    for id in manager.context_ids() {
        let context = manager.context(&id).unwrap();
        assert!(!context.can_undo(), "context {} should be untouched", id);
        assert!(!context.can_redo(), "context {} should be untouched", id);
    }
}

#[tokio::test]
async fn test_unqualified_push_targets_active_context() {
    let manager = CommandContextManager::new();
    manager.create_context("overlay").unwrap();
    manager.set_active_context("overlay").unwrap();
    let calls = Arc::new(Calls::default());

    assert!(manager
        .push_and_execute(None, counted("transform", &calls))
        .await
        .unwrap());

    assert_eq!(calls.executed(), 1);
    assert!(manager.context("overlay").unwrap().can_undo());
    assert!(!manager.context("default").unwrap().can_undo());
}

#[tokio::test]
async fn test_histories_are_independent() {
    let manager = CommandContextManager::new();
    let overlay = manager.create_context("overlay").unwrap();
    let sidebar = manager.create_context("sidebar").unwrap();
    let overlay_calls = Arc::new(Calls::default());
    let sidebar_calls = Arc::new(Calls::default());

    overlay.push_and_execute(counted("move", &overlay_calls)).await.unwrap();
    sidebar.push_and_execute(counted("expand", &sidebar_calls)).await.unwrap();

    overlay.undo().await.unwrap();
    assert!(overlay.can_redo());
    assert!(sidebar.can_undo());
    assert!(!sidebar.can_redo());
    assert_eq!(sidebar_calls.undone(), 0);

    // New work in one context does not clear the other's redo stack
    sidebar.push_undoable(counted("collapse", &sidebar_calls));
    assert!(overlay.can_redo());
}

#[tokio::test]
async fn test_deleted_context_history_is_gone() {
    let manager = CommandContextManager::new();
    let calls = Arc::new(Calls::default());
    manager.create_context("overlay").unwrap();
    manager
        .push_and_execute(Some("overlay"), counted("move", &calls))
        .await
        .unwrap();

    assert!(manager.delete_context("overlay").unwrap());
    let recreated = manager.create_context("overlay").unwrap();
    assert!(!recreated.can_undo());
}

#[test]
fn test_manager_errors_name_the_context() {
    let manager = CommandContextManager::new();
    manager.create_context("overlay").unwrap();

    let err = manager.create_context("overlay").unwrap_err();
    assert_eq!(err.to_string(), "Command context already exists: overlay");

    let err = manager.set_active_context("nowhere").unwrap_err();
    assert_eq!(err, ContextError::NotFound("nowhere".to_string()));
    assert_eq!(err.to_string(), "Command context not found: nowhere");
}

#[test]
fn test_contexts_inherit_manager_config() {
    let manager = CommandContextManager::with_config(HistoryConfig {
        max_depth: 2,
        ..HistoryConfig::default()
    });
    let overlay = manager.create_context("overlay").unwrap();
    let calls = Arc::new(Calls::default());
    for id in ["a", "b", "c"] {
        overlay.push_undoable(counted(id, &calls));
    }
    assert_eq!(overlay.undo_count(), 2);
    assert_eq!(manager.config().max_depth, 2);
}
