//! Sheet store server - main entry point.
//!
//! Starts the Actix-web server with configured routes and middleware.

use actix_web::{App, HttpServer, web};
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use sheet_store_lib::api::{self, ApiDoc};
use sheet_store_lib::config::Config;
use sheet_store_lib::db::DbPool;
use sheet_store_lib::middleware;
use sheet_store_lib::services::UploadLimits;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let migrate_only = args.iter().any(|arg| arg == "--migrate");

    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        std::process::exit(1);
    }

    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            error!("");
            error!("Please check your environment variables:");
            error!("  - RUST_ENV must be set to 'development' or 'production'");
            error!("  - In production, DATABASE_URL or PGUSER/PGPASSWORD must be set");
            std::process::exit(1);
        }
    };

    info!("========================================");
    info!("  Sheet Store Server");
    info!("  Environment: {}", config.environment);
    info!("========================================");

    if config.is_development() {
        warn!("Running in DEVELOPMENT mode - do not use in production!");
    }

    // Open the pool and verify the database answers before serving
    let pool = match DbPool::new(&config).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("Failed to initialize database: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = pool.ping().await {
        error!("Database is not reachable: {}", e);
        std::process::exit(1);
    }
    info!("Database connection established");

    if let Err(e) = pool.run_migrations().await {
        error!("Failed to run migrations: {}", e);
        std::process::exit(1);
    }
    info!("Database migrations complete");

    if migrate_only {
        info!("--migrate given, exiting after migrations");
        if let Err(e) = pool.close().await {
            warn!("{}", e);
        }
        return Ok(());
    }

    let bind_address = config.bind_address();
    let limits = UploadLimits {
        max_file_size: config.max_upload_size,
    };
    info!("Upload limit: {}MB", limits.max_file_size / 1024 / 1024);

    let worker_count = if config.is_development() {
        4
    } else {
        num_cpus::get()
    };
    info!(
        "Starting server at http://{} ({} workers)",
        bind_address, worker_count
    );

    let app_pool = pool.clone();
    let server = HttpServer::new(move || {
        App::new()
            .wrap(middleware::RequestLogger)
            .app_data(web::Data::new(app_pool.clone()))
            .app_data(web::Data::new(limits))
            .app_data(api::json_config())
            .app_data(api::query_config())
            .configure(api::configure_health_routes)
            .service(web::scope("/auth").configure(api::configure_auth_routes))
            .service(web::scope("/uploads").configure(api::configure_upload_routes))
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", ApiDoc::openapi()),
            )
            .default_service(web::route().to(api::route_not_found))
    })
    .workers(worker_count)
    .bind(&bind_address)?
    .run();

    let result = server.await;

    if let Err(e) = pool.close().await {
        warn!("{}", e);
    }

    result
}
