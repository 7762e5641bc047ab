//! Create or reset the inventory schema.
//!
//! Usage: `setup-db [--reset|-r]`. Without flags pending migrations are
//! applied. `--reset` reverts every migration first, dropping all data.

use std::env;
use std::process;
use std::time::Duration;

use dotenvy::dotenv;

use inventario::db::{establish_connection_pool, revert_all_migrations, run_pending_migrations};
use inventario::models::config::ServerConfig;

fn main() {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let reset = env::args()
        .skip(1)
        .any(|arg| arg == "--reset" || arg == "-r");

    let server_config = match ServerConfig::load() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Failed to load configuration: {e}");
            process::exit(1);
        }
    };

    let pool = match establish_connection_pool(
        &server_config.database_url(),
        1,
        Duration::from_millis(server_config.db_connection_timeout_ms),
    ) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to connect to {}: {e}", server_config.db_name);
            process::exit(1);
        }
    };

    let mut conn = match pool.get() {
        Ok(conn) => conn,
        Err(e) => {
            log::error!("Failed to get a database connection: {e}");
            process::exit(1);
        }
    };

    if reset {
        match revert_all_migrations(&mut conn) {
            Ok(reverted) => log::warn!("Reverted {reverted} migration(s)"),
            Err(e) => {
                log::error!("Failed to reset schema: {e}");
                process::exit(1);
            }
        }
    }

    match run_pending_migrations(&mut conn) {
        Ok(applied) => log::info!(
            "Database {} ready ({applied} migration(s) applied)",
            server_config.db_name
        ),
        Err(e) => {
            log::error!("Failed to apply migrations: {e}");
            process::exit(1);
        }
    }
}
