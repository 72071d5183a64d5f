//! Integration tests for command routing
//!
//! Tests cover:
//! - Routing by command kind and result pass-through
//! - Duplicate registration
//! - Missing handlers and unregistering
//! - Handler error propagation
//! - Reentrant dispatch from inside a handler

use super::test_utils::{
    AnotherCommand, ClearCommand, DemoCommand, DemoError, DemoKind, DemoOutput, TestCommand,
};
use retrace::{CommandDispatcher, DispatchError, RegistrationError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

async fn double(command: DemoCommand) -> Result<DemoOutput, DemoError> {
    match command {
        DemoCommand::Test(TestCommand(input)) => Ok(DemoOutput::Value { value: input * 2 }),
        other => Err(DemoError(format!("unexpected {:?}", other))),
    }
}

async fn shout(command: DemoCommand) -> Result<DemoOutput, DemoError> {
    match command {
        DemoCommand::Another(AnotherCommand(text)) => Ok(DemoOutput::Text(text.to_uppercase())),
        other => Err(DemoError(format!("unexpected {:?}", other))),
    }
}

fn demo_dispatcher() -> CommandDispatcher<DemoCommand> {
    let dispatcher = CommandDispatcher::new();
    dispatcher.register(DemoKind::Test, double).unwrap();
    dispatcher.register(DemoKind::Another, shout).unwrap();
    dispatcher
}

#[tokio::test]
async fn test_example_scenario() {
    let dispatcher = demo_dispatcher();

    let doubled = dispatcher
        .execute(DemoCommand::Test(TestCommand(3)))
        .await
        .unwrap();
    assert_eq!(doubled, DemoOutput::Value { value: 6 });

    let shouted = dispatcher
        .execute(DemoCommand::Another(AnotherCommand("hello".to_string())))
        .await
        .unwrap();
    assert_eq!(shouted, DemoOutput::Text("HELLO".to_string()));
}

#[tokio::test]
async fn test_instances_of_one_kind_share_a_handler() {
    let dispatcher = demo_dispatcher();
    for input in [0, 5, -4] {
        let output = dispatcher
            .execute(DemoCommand::Test(TestCommand(input)))
            .await
            .unwrap();
        assert_eq!(output, DemoOutput::Value { value: input * 2 });
    }
}

#[tokio::test]
async fn test_void_result_is_returned() {
    let dispatcher = demo_dispatcher();
    dispatcher
        .register(DemoKind::Clear, |_command: DemoCommand| async {
            Ok::<_, DemoError>(DemoOutput::Unit)
        })
        .unwrap();

    let output = dispatcher
        .execute(DemoCommand::Clear(ClearCommand))
        .await
        .unwrap();
    assert_eq!(output, DemoOutput::Unit);
}

#[tokio::test]
async fn test_duplicate_registration_fails_before_any_handler_runs() {
    let calls = Arc::new(AtomicUsize::new(0));
    let dispatcher = CommandDispatcher::<DemoCommand>::new();

    let first = calls.clone();
    dispatcher
        .register(DemoKind::Test, move |command: DemoCommand| {
            first.fetch_add(1, Ordering::SeqCst);
            double(command)
        })
        .unwrap();
    let second = calls.clone();
    let err = dispatcher
        .register(DemoKind::Test, move |command: DemoCommand| {
            second.fetch_add(1, Ordering::SeqCst);
            double(command)
        })
        .unwrap_err();

    assert_eq!(
        err,
        RegistrationError::DuplicateHandler("TestCommand".to_string())
    );
    assert_eq!(err.to_string(), "Handler already registered for TestCommand");
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_missing_handler_never_invokes_other_handlers() {
    let calls = Arc::new(AtomicUsize::new(0));
    let dispatcher = CommandDispatcher::<DemoCommand>::new();
    let counter = calls.clone();
    dispatcher
        .register(DemoKind::Test, move |command: DemoCommand| {
            counter.fetch_add(1, Ordering::SeqCst);
            double(command)
        })
        .unwrap();

    let err = dispatcher
        .execute(DemoCommand::Another(AnotherCommand("hi".to_string())))
        .await
        .unwrap_err();

    assert!(matches!(err, DispatchError::NoHandler(ref kind) if kind == "AnotherCommand"));
    assert_eq!(err.to_string(), "No handler registered for AnotherCommand");
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_unregister_matches_never_registered() {
    let dispatcher = demo_dispatcher();
    assert!(dispatcher.unregister(DemoKind::Test));

    let after_unregister = dispatcher
        .execute(DemoCommand::Test(TestCommand(1)))
        .await
        .unwrap_err();
    let never_registered = CommandDispatcher::<DemoCommand>::new()
        .execute(DemoCommand::Test(TestCommand(1)))
        .await
        .unwrap_err();

    assert_eq!(after_unregister.to_string(), never_registered.to_string());
    assert!(!dispatcher.unregister(DemoKind::Test));
}

#[tokio::test]
async fn test_handler_error_is_propagated_unchanged() {
    let dispatcher = CommandDispatcher::<DemoCommand>::new();
    dispatcher
        .register(DemoKind::Clear, |_command: DemoCommand| async {
            Err::<DemoOutput, _>(DemoError("sample patch rejected".to_string()))
        })
        .unwrap();

    let err = dispatcher
        .execute(DemoCommand::Clear(ClearCommand))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "demo handler failed: sample patch rejected");
    assert_eq!(
        err.into_handler_error(),
        Some(DemoError("sample patch rejected".to_string()))
    );
}

#[tokio::test]
async fn test_handler_can_dispatch_reentrantly() {
    let dispatcher = Arc::new(demo_dispatcher());
    let inner = Arc::downgrade(&dispatcher);
    dispatcher
        .register(DemoKind::Clear, move |_command: DemoCommand| {
            let inner = inner.clone();
            async move {
                let dispatcher = inner
                    .upgrade()
                    .ok_or_else(|| DemoError("dispatcher dropped".to_string()))?;
                dispatcher
                    .execute(DemoCommand::Test(TestCommand(21)))
                    .await
                    .map_err(|e| DemoError(e.to_string()))
            }
        })
        .unwrap();

    let output = dispatcher
        .execute(DemoCommand::Clear(ClearCommand))
        .await
        .unwrap();
    assert_eq!(output, DemoOutput::Value { value: 42 });
}

#[tokio::test]
async fn test_concurrent_dispatches_are_not_serialized() {
    let dispatcher = Arc::new(demo_dispatcher());
    let mut tasks = Vec::new();
    for input in 0..16 {
        let dispatcher = dispatcher.clone();
        tasks.push(tokio::spawn(async move {
            dispatcher
                .execute(DemoCommand::Test(TestCommand(input)))
                .await
                .unwrap()
        }));
    }

    for (input, task) in tasks.into_iter().enumerate() {
        assert_eq!(
            task.await.unwrap(),
            DemoOutput::Value {
                value: input as i64 * 2
            }
        );
    }
}

#[test]
fn test_ensure_complete_reports_unhandled_kinds() {
    let dispatcher = demo_dispatcher();
    assert_eq!(dispatcher.missing_handlers(), vec![DemoKind::Clear]);

    let err = dispatcher.ensure_complete().unwrap_err();
    assert_eq!(err.to_string(), "No handler registered for: ClearCommand");
}
