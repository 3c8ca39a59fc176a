//! Trait contracts example for shared-instance-registry.
//!
//! Demonstrates:
//! - Storing shared instances behind a trait (`Box<dyn Database>`)
//! - Choosing the concrete backend per instance key
//! - Business code that asks for a key and only sees the contract
//!
//! Run with: `cargo run --example trait_contracts`

use shared_instance_registry::define_registry;
use std::sync::Arc;

define_registry!(databases, slot = "__TRAIT_CONTRACTS_INSTANCES__");

// =============================================================================
// Contract Definitions (Traits)
// =============================================================================

/// Contract for a database handle.
trait Database: Send + Sync {
    fn query(&self, sql: &str) -> Vec<String>;
    fn backend(&self) -> &str;
}

type SharedDatabase = Box<dyn Database>;

// =============================================================================
// Concrete Implementations
// =============================================================================

struct PostgresPool {
    url: String,
    max_connections: u32,
}

impl Database for PostgresPool {
    fn query(&self, sql: &str) -> Vec<String> {
        println!(
            "   [POSTGRES {} x{}] {}",
            self.url, self.max_connections, sql
        );
        vec!["row-1".to_string(), "row-2".to_string()]
    }

    fn backend(&self) -> &str {
        "postgres"
    }
}

struct SqliteFile {
    path: String,
}

impl Database for SqliteFile {
    fn query(&self, sql: &str) -> Vec<String> {
        println!("   [SQLITE {}] {}", self.path, sql);
        vec!["row-1".to_string()]
    }

    fn backend(&self) -> &str {
        "sqlite"
    }
}

// =============================================================================
// Application Code (Uses Contracts, Not Implementations)
// =============================================================================

fn main_db() -> Arc<SharedDatabase> {
    databases::get_shared_instance("main-db", || -> SharedDatabase {
        Box::new(PostgresPool {
            url: "postgres://localhost/main".to_string(),
            max_connections: 20,
        })
    })
    .unwrap()
}

fn analytics_db() -> Arc<SharedDatabase> {
    databases::get_shared_instance("analytics-db", || -> SharedDatabase {
        Box::new(SqliteFile {
            path: "/var/lib/app/analytics.db".to_string(),
        })
    })
    .unwrap()
}

fn count_orders(db: &dyn Database) -> usize {
    db.query("SELECT id FROM orders").len()
}

fn main() {
    println!("=== shared-instance-registry: Trait Contracts ===\n");

    println!("1. Querying both databases through the contract...");
    let orders = count_orders(&**main_db());
    let events = count_orders(&**analytics_db());
    println!("   orders: {orders}, events: {events}");

    println!("\n2. Asking again returns the same handles...");
    assert!(Arc::ptr_eq(&main_db(), &main_db()));
    assert!(Arc::ptr_eq(&analytics_db(), &analytics_db()));

    println!("   main-db backend: {}", main_db().backend());
    println!("   analytics-db backend: {}", analytics_db().backend());

    println!("\n=== Example Complete ===");
}
