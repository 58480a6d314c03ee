use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;

use cms_service::config::Config;
use cms_service::domain::user::models::Role;
use cms_service::domain::user::service::AuthService;
use cms_service::inbound::http::handlers::set_expose_errors;
use cms_service::inbound::http::rate_limit::RateLimiter;
use cms_service::inbound::http::router::create_router;
use cms_service::outbound::repositories::PostgresUserRepository;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cms_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "cms-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;
    set_expose_errors(config.server.expose_errors);

    tracing::info!(
        http_port = config.server.http_port,
        token_ttl_hours = config.jwt.expiration_hours,
        default_role = %config.auth.default_role,
        "Configuration loaded"
    );

    let pg_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = 5,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let default_role = Role::from_str(&config.auth.default_role)
        .map_err(|e| anyhow::anyhow!("Invalid auth.default_role: {}", e))?;

    let user_repository = Arc::new(PostgresUserRepository::new(pg_pool));
    let auth_service = Arc::new(AuthService::new(
        user_repository,
        config.jwt.secret.as_bytes(),
        config.jwt.expiration_hours,
        default_role,
    ));
    let rate_limiter = RateLimiter::new(config.rate_limit.clone());

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let application = create_router(auth_service, rate_limiter);
    axum::serve(
        http_listener,
        application.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
