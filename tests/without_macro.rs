//! Integration tests demonstrating how to implement `SharedInstanceApi` WITHOUT the macro.
//!
//! This shows the manual implementation approach, which gives you full control
//! over where each store lives. Here the production store is a static and the
//! development store is a dedicated ambient slot.
//!
//! NOTE: All tests use #[serial] because they share the same static stores.

use serial_test::serial;
use shared_instance_registry::{
    ambient_slot, ExecutionMode, InstanceStore, ModeSource, SharedInstanceApi, TraceSlot,
};
use std::sync::{Arc, LazyLock, Mutex};

// ============================================================================
// Manual Registry Implementation (Without Macro)
// ============================================================================

static MY_LOCAL: LazyLock<InstanceStore> = LazyLock::new(InstanceStore::new);

static MY_AMBIENT: LazyLock<Arc<InstanceStore>> =
    LazyLock::new(|| ambient_slot("__WITHOUT_MACRO_TESTS__"));

static MY_TRACE: TraceSlot = Mutex::new(None);

/// Registry pinned to one mode, ignoring `APP_ENV`.
struct MyRegistry(ExecutionMode);

impl SharedInstanceApi for MyRegistry {
    fn trace(&self) -> &TraceSlot {
        &MY_TRACE
    }

    fn local_store(&self) -> &InstanceStore {
        &MY_LOCAL
    }

    fn ambient_store(&self) -> &InstanceStore {
        &MY_AMBIENT
    }

    fn mode_source(&self) -> ModeSource {
        ModeSource::Fixed(self.0)
    }
}

const PROD: MyRegistry = MyRegistry(ExecutionMode::Production);
const DEV: MyRegistry = MyRegistry(ExecutionMode::Development);

// ============================================================================
// Tests Using Manual Implementation
// ============================================================================

#[test]
#[serial]
fn test_basic_construct_and_reuse() {
    PROD.clear();

    let first = PROD.get_shared_instance("main-db", || 42i32).unwrap();
    let second = PROD.get_shared_instance("main-db", || 0i32).unwrap();

    assert_eq!(*second, 42);
    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
#[serial]
fn test_modes_use_separate_stores() {
    PROD.clear();
    DEV.clear();

    let prod = PROD.get_shared_instance("main-db", || "prod".to_string()).unwrap();
    let dev = DEV.get_shared_instance("main-db", || "dev".to_string()).unwrap();

    assert!(!Arc::ptr_eq(&prod, &dev));
    assert!(MY_LOCAL.contains("main-db").unwrap());
    assert!(MY_AMBIENT.contains("main-db").unwrap());
    assert_eq!(MY_LOCAL.len(), 1);
    assert_eq!(MY_AMBIENT.len(), 1);
}

#[test]
#[serial]
fn test_ambient_store_is_the_named_slot() {
    DEV.clear();

    DEV.get_shared_instance("analytics-db", || 7u8).unwrap();

    let slot = ambient_slot("__WITHOUT_MACRO_TESTS__");
    assert_eq!(*slot.get::<u8>("analytics-db").unwrap(), 7);
}

#[test]
#[serial]
fn test_clear_keeps_outstanding_references() {
    PROD.clear();

    let held = PROD.get_shared_instance("main-db", || vec![1, 2, 3]).unwrap();
    PROD.clear();

    assert!(!PROD.contains("main-db").unwrap());
    assert_eq!(*held, vec![1, 2, 3]);

    let rebuilt = PROD.get_shared_instance("main-db", || vec![4]).unwrap();
    assert!(!Arc::ptr_eq(&held, &rebuilt));
}
