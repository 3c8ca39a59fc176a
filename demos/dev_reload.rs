//! Live-reload example for shared-instance-registry.
//!
//! Demonstrates:
//! - Rebuilding the registry value, as reloaded code would
//! - Development mode reusing the instance from the ambient slot
//! - Production mode constructing a fresh instance per registry
//!
//! Run with: `RUST_LOG=debug cargo run --example dev_reload`

use shared_instance_registry::{
    ExecutionMode, InstanceRegistry, ModeSource, RegistryEvent, SharedInstanceApi,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

static POOLS_OPENED: AtomicUsize = AtomicUsize::new(0);

struct ConnectionPool {
    generation: usize,
}

fn open_pool() -> ConnectionPool {
    let generation = POOLS_OPENED.fetch_add(1, Ordering::SeqCst) + 1;
    ConnectionPool { generation }
}

/// What a request handler does after every reload: build its registry and ask for the pool.
fn handle_request(mode: ExecutionMode) -> Arc<ConnectionPool> {
    let registry = InstanceRegistry::new()
        .with_ambient_slot("__DEV_RELOAD_INSTANCES__")
        .with_mode(ModeSource::Fixed(mode));

    registry.set_trace_callback(|event| match event {
        RegistryEvent::Constructed { key, .. } => println!("   built new instance for {key}"),
        RegistryEvent::Reused { key, .. } => println!("   reused existing instance for {key}"),
        _ => {}
    });

    registry.get_shared_instance("main-db", open_pool).unwrap()
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== shared-instance-registry: Live Reload ===\n");

    // -------------------------------------------------------------------------
    // 1. Development: reloads keep the same pool
    // -------------------------------------------------------------------------
    println!("1. Development mode, three reload cycles...");

    for cycle in 1..=3 {
        let pool = handle_request(ExecutionMode::Development);
        println!("   cycle {cycle}: pool generation {}", pool.generation);
    }

    println!("   Pools opened: {}", POOLS_OPENED.load(Ordering::SeqCst));

    // -------------------------------------------------------------------------
    // 2. Production: every registry owns its pool
    // -------------------------------------------------------------------------
    println!("\n2. Production mode, three registry rebuilds...");

    for cycle in 1..=3 {
        let pool = handle_request(ExecutionMode::Production);
        println!("   cycle {cycle}: pool generation {}", pool.generation);
    }

    println!("   Pools opened: {}", POOLS_OPENED.load(Ordering::SeqCst));
    println!("\n=== Example completed successfully! ===");
}
