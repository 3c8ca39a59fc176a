//! Integration tests for tracing and event monitoring.
//!
//! This test demonstrates how to use the tracing callback system to tell
//! "built a new instance" apart from "reused an existing one".

use shared_instance_registry::{
    ExecutionMode, InstanceRegistry, ModeSource, RegistryError, RegistryEvent, SharedInstanceApi,
};
use std::sync::{Arc, Mutex};

type Events = Arc<Mutex<Vec<RegistryEvent>>>;

fn registry(mode: ExecutionMode, slot: &str) -> (InstanceRegistry, Events) {
    let registry = InstanceRegistry::new()
        .with_ambient_slot(slot)
        .with_mode(ModeSource::Fixed(mode));

    let events = Arc::new(Mutex::new(Vec::new()));
    let events_clone = events.clone();
    registry.set_trace_callback(move |event| {
        events_clone.lock().unwrap().push(event.clone());
    });

    (registry, events)
}

#[test]
fn test_constructed_then_reused() {
    let (registry, events) = registry(ExecutionMode::Development, "__TRACE_TESTS_BASIC__");

    registry.get_shared_instance("main-db", || 42i32).unwrap();
    registry.get_shared_instance("main-db", || 43i32).unwrap();

    let captured = events.lock().unwrap();
    assert_eq!(
        *captured,
        vec![
            RegistryEvent::Constructed {
                key: "main-db".to_string(),
                type_name: "i32",
                mode: ExecutionMode::Development,
            },
            RegistryEvent::Reused {
                key: "main-db".to_string(),
                type_name: "i32",
                mode: ExecutionMode::Development,
            },
        ]
    );
}

#[test]
fn test_failed_event_on_factory_error() {
    let (registry, events) = registry(ExecutionMode::Production, "__TRACE_TESTS_FAILED__");

    let _ = registry.try_get_shared_instance::<u8, RegistryError, _>("main-db", || {
        Err(RegistryError::InstanceNotFound {
            key: "upstream".to_string(),
        })
    });
    registry.get_shared_instance("main-db", || 1u8).unwrap();

    let captured = events.lock().unwrap();
    assert_eq!(captured.len(), 2);
    assert!(matches!(captured[0], RegistryEvent::Failed { .. }));
    assert!(matches!(
        captured[1],
        RegistryEvent::Constructed {
            mode: ExecutionMode::Production,
            ..
        }
    ));
}

#[test]
fn test_rejected_event_on_type_mismatch() {
    let (registry, events) = registry(ExecutionMode::Production, "__TRACE_TESTS_REJECTED__");

    registry.get_shared_instance("main-db", || 1u8).unwrap();
    let err = registry
        .get_shared_instance::<String, _>("main-db", || unreachable!())
        .unwrap_err();

    let captured = events.lock().unwrap();
    assert_eq!(captured.len(), 2);
    assert_eq!(
        captured[1],
        RegistryEvent::Rejected {
            key: "main-db".to_string(),
            type_name: "alloc::string::String",
            mode: ExecutionMode::Production,
            error: err,
        }
    );
}

#[test]
fn test_contains_reports_found() {
    let (registry, events) = registry(ExecutionMode::Development, "__TRACE_TESTS_CONTAINS__");

    let _ = registry.contains("cache");
    registry.get_shared_instance("cache", || "redis".to_string()).unwrap();
    let _ = registry.contains("cache");

    let captured: Vec<String> = events.lock().unwrap().iter().map(|e| e.to_string()).collect();
    assert_eq!(captured.len(), 3);
    assert_eq!(captured[0], "contains { key: cache, found: false, mode: development }");
    assert_eq!(
        captured[1],
        "constructed { key: cache, type_name: alloc::string::String, mode: development }"
    );
    assert_eq!(captured[2], "contains { key: cache, found: true, mode: development }");
}

#[test]
fn test_clear_trace_callback() {
    let (registry, events) = registry(ExecutionMode::Production, "__TRACE_TESTS_CLEAR__");

    registry.get_shared_instance("k", || 1u8).unwrap();
    registry.clear_trace_callback();
    registry.get_shared_instance("k", || 2u8).unwrap();
    let _ = registry.get::<u8>("k");

    assert_eq!(events.lock().unwrap().len(), 1);
}

#[test]
fn test_trace_callback_replacement() {
    let (registry, first) = registry(ExecutionMode::Production, "__TRACE_TESTS_REPLACE__");

    registry.get_shared_instance("a", || 100usize).unwrap();

    let second = Arc::new(Mutex::new(Vec::new()));
    let second_clone = second.clone();
    registry.set_trace_callback(move |event| {
        second_clone.lock().unwrap().push(event.clone());
    });

    registry.get_shared_instance("b", || 200usize).unwrap();

    assert_eq!(first.lock().unwrap().len(), 1);
    assert_eq!(second.lock().unwrap().len(), 1);
}

#[test]
fn test_get_emits_no_event() {
    let (registry, events) = registry(ExecutionMode::Development, "__TRACE_TESTS_GET__");

    let _ = registry.get::<u8>("missing");

    assert!(events.lock().unwrap().is_empty());
}
