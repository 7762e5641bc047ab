use std::process;
use std::time::Duration;

use actix_web::middleware::Logger;
use actix_web::{App, HttpServer, web};
use dotenvy::dotenv;

use inventario::db::{establish_connection_pool, run_pending_migrations};
use inventario::models::config::ServerConfig;
use inventario::repository::{DieselRepository, LedgerTimeouts};
use inventario::routes::{configure, cors_headers};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok(); // Load .env file
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let server_config = match ServerConfig::load() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Failed to load configuration: {e}");
            process::exit(1);
        }
    };
    log::debug!("Loaded configuration: {server_config:?}");

    let pool = match establish_connection_pool(
        &server_config.database_url(),
        server_config.db_pool_size,
        Duration::from_millis(server_config.db_connection_timeout_ms),
    ) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database connection: {e}");
            process::exit(1);
        }
    };

    match pool.get() {
        Ok(mut conn) => match run_pending_migrations(&mut conn) {
            Ok(0) => log::info!("Database schema is up to date"),
            Ok(applied) => log::info!("Applied {applied} pending migration(s)"),
            Err(e) => {
                log::error!("Failed to run migrations: {e}");
                process::exit(1);
            }
        },
        Err(e) => {
            log::error!("Failed to get a database connection: {e}");
            process::exit(1);
        }
    }

    let repo = DieselRepository::new(pool).with_timeouts(LedgerTimeouts {
        lock_timeout_ms: server_config.db_lock_timeout_ms,
        statement_timeout_ms: server_config.db_statement_timeout_ms,
    });

    let bind_address = server_config.bind_address();
    log::info!(
        "Starting inventory service on {}:{}",
        bind_address.0,
        bind_address.1
    );

    HttpServer::new(move || {
        App::new()
            .wrap(cors_headers())
            .wrap(Logger::default())
            .app_data(web::Data::new(repo.clone()))
            .configure(configure)
    })
    .bind(bind_address)?
    .run()
    .await
}
