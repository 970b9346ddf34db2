use std::net::SocketAddr;
use std::sync::Arc;

use opcheck_core::catalog::Catalog;
use opcheck_events::{EmailConfig, NotificationDispatcher, SmtpMailer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use opcheck_api::config::ServerConfig;
use opcheck_api::router::build_app_router;
use opcheck_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "opcheck_api=debug,opcheck_events=debug,tower_http=debug".into());
    let json_logs = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    if json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = %config.port,
        admins = ?config.admins.usernames(),
        "Loaded server configuration"
    );

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = opcheck_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    opcheck_db::health_check(&pool)
        .await
        .expect("Database health check failed");

    opcheck_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Catalog ---
    let catalog = match &config.catalog_path {
        Some(path) => Catalog::from_json_file(path)
            .unwrap_or_else(|e| panic!("Failed to load catalog {}: {e}", path.display())),
        None => Catalog::builtin(),
    };
    tracing::info!(
        tenants = catalog.tenants.len(),
        check_types = catalog.check_types.len(),
        "Catalog loaded"
    );
    let catalog = Arc::new(catalog);

    // --- Email ---
    let email_config = EmailConfig::from_env();
    let mailer = SmtpMailer::new(&email_config).expect("Invalid email configuration");
    let notifier = NotificationDispatcher::new(
        Arc::new(mailer),
        email_config.from_address.clone(),
        email_config.recipients.clone(),
        Arc::clone(&catalog),
    );
    tracing::info!(
        smtp_host = %email_config.smtp_host,
        smtp_port = email_config.smtp_port,
        recipients = notifier.recipients().len(),
        "Notification dispatcher ready"
    );

    // --- App state ---
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        catalog,
        notifier: Arc::new(notifier),
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for SIGINT (Ctrl-C) or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
