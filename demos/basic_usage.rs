//! Basic usage example for shared-instance-registry.
//!
//! Demonstrates:
//! - Constructing a shared client once with `get_shared_instance()`
//! - Reusing it from later calls without running the factory again
//! - Fallible construction with `try_get_shared_instance()`
//! - Checking construction status with `contains()`
//!
//! Run with: `RUST_LOG=debug cargo run --example basic_usage`

use shared_instance_registry::{define_registry, RegistryError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

// Create an isolated registry for this example
define_registry!(db, slot = "__BASIC_USAGE_INSTANCES__");

static CONNECTIONS_OPENED: AtomicUsize = AtomicUsize::new(0);

/// Stand-in for a database client holding a connection pool.
#[derive(Debug)]
struct DbClient {
    url: String,
    pool_size: u32,
}

impl DbClient {
    fn connect(url: &str) -> Self {
        CONNECTIONS_OPENED.fetch_add(1, Ordering::SeqCst);
        DbClient {
            url: url.to_string(),
            pool_size: 10,
        }
    }
}

#[derive(Debug)]
enum ConnectError {
    Unreachable(String),
    Registry(RegistryError),
}

impl From<RegistryError> for ConnectError {
    fn from(err: RegistryError) -> Self {
        ConnectError::Registry(err)
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== shared-instance-registry: Basic Usage ===\n");
    println!("Mode: {}\n", db::mode());

    // -------------------------------------------------------------------------
    // 1. First request constructs the client
    // -------------------------------------------------------------------------
    println!("1. Requesting main-db for the first time...");

    let main: Arc<DbClient> =
        db::get_shared_instance("main-db", || DbClient::connect("postgres://localhost/main"))
            .unwrap();

    println!("   Got: {} (pool size {})", main.url, main.pool_size);

    // -------------------------------------------------------------------------
    // 2. Later requests reuse it
    // -------------------------------------------------------------------------
    println!("\n2. Requesting main-db three more times...");

    for _ in 0..3 {
        let again: Arc<DbClient> =
            db::get_shared_instance("main-db", || DbClient::connect("postgres://localhost/main"))
                .unwrap();
        assert!(Arc::ptr_eq(&main, &again));
    }

    println!(
        "   Connections opened so far: {}",
        CONNECTIONS_OPENED.load(Ordering::SeqCst)
    );

    // -------------------------------------------------------------------------
    // 3. A second key is independent
    // -------------------------------------------------------------------------
    println!("\n3. Requesting analytics-db...");

    let analytics: Arc<DbClient> = db::get_shared_instance("analytics-db", || {
        DbClient::connect("postgres://localhost/analytics")
    })
    .unwrap();

    println!("   Got: {}", analytics.url);
    println!(
        "   Connections opened so far: {}",
        CONNECTIONS_OPENED.load(Ordering::SeqCst)
    );

    // -------------------------------------------------------------------------
    // 4. Fallible construction
    // -------------------------------------------------------------------------
    println!("\n4. Constructing replica-db with a failing factory...");

    let failed = db::try_get_shared_instance::<DbClient, _, _>("replica-db", || {
        Err(ConnectError::Unreachable("replica offline".to_string()))
    });
    println!("   Result: {:?}", failed.map(|c| c.url.clone()));
    println!("   replica-db constructed: {}", db::contains("replica-db").unwrap());

    let replica = db::try_get_shared_instance("replica-db", || {
        Ok::<_, ConnectError>(DbClient::connect("postgres://localhost/replica"))
    })
    .unwrap();
    println!("   Retry got: {}", replica.url);

    println!("\n=== Example completed successfully! ===");
}
