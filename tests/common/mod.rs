//! Helpers for integration tests.
//!
//! Each [`TestDb`] is a fresh PostgreSQL database created through the server
//! named by `TEST_DATABASE_URL` and dropped again when the value goes out of
//! scope. Tests skip themselves when the variable is unset.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use diesel::pg::PgConnection;
use diesel::{Connection, RunQueryDsl};
use inventario::db::{DbPool, establish_connection_pool, run_pending_migrations};
use inventario::repository::{DieselRepository, LedgerTimeouts};

static COUNTER: AtomicUsize = AtomicUsize::new(0);

/// Temporary database used in integration tests.
pub struct TestDb {
    admin_url: String,
    name: String,
    pool: DbPool,
}

/// Replace the database segment of a `postgres://` URL.
fn with_database(url: &str, name: &str) -> String {
    let (base, query) = match url.split_once('?') {
        Some((base, query)) => (base, Some(query)),
        None => (url, None),
    };
    let server = match base.rsplit_once('/') {
        Some((server, _)) if server.contains("//") && !server.ends_with('/') => server,
        _ => base,
    };
    match query {
        Some(query) => format!("{server}/{name}?{query}"),
        None => format!("{server}/{name}"),
    }
}

impl TestDb {
    /// Create and migrate a new database, or `None` when
    /// `TEST_DATABASE_URL` is not set.
    pub fn new() -> Option<Self> {
        let Ok(admin_url) = std::env::var("TEST_DATABASE_URL") else {
            eprintln!("TEST_DATABASE_URL not set; skipping database test");
            return None;
        };

        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock after epoch")
            .subsec_nanos();
        let name = format!(
            "inventario_test_{}_{}_{nanos}",
            std::process::id(),
            COUNTER.fetch_add(1, Ordering::SeqCst)
        );

        let mut admin =
            PgConnection::establish(&admin_url).expect("Failed to connect to TEST_DATABASE_URL");
        diesel::sql_query(format!("CREATE DATABASE {name}"))
            .execute(&mut admin)
            .expect("Failed to create test database");

        let pool = establish_connection_pool(
            &with_database(&admin_url, &name),
            16,
            Duration::from_secs(10),
        )
        .expect("Failed to establish PostgreSQL pool.");
        let mut conn = pool.get().expect("Failed to get connection from pool.");
        run_pending_migrations(&mut conn).expect("Migrations failed");

        Some(TestDb {
            admin_url,
            name,
            pool,
        })
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }

    pub fn repo(&self) -> DieselRepository {
        DieselRepository::new(self.pool())
    }

    /// Repository with short ledger timeouts, for lock contention tests.
    pub fn repo_with_timeouts(&self, lock_timeout_ms: u64) -> DieselRepository {
        self.repo().with_timeouts(LedgerTimeouts {
            lock_timeout_ms,
            statement_timeout_ms: lock_timeout_ms * 4,
        })
    }
}

impl Drop for TestDb {
    fn drop(&mut self) {
        if let Ok(mut admin) = PgConnection::establish(&self.admin_url) {
            let _ = diesel::sql_query(format!(
                "DROP DATABASE IF EXISTS {} WITH (FORCE)",
                self.name
            ))
            .execute(&mut admin);
        }
    }
}

#[test]
fn replaces_database_segment() {
    assert_eq!(
        with_database("postgres://u:p@localhost:5432/postgres", "t1"),
        "postgres://u:p@localhost:5432/t1"
    );
    assert_eq!(
        with_database("postgres://u:p@localhost/postgres?sslmode=disable", "t1"),
        "postgres://u:p@localhost/t1?sslmode=disable"
    );
}
