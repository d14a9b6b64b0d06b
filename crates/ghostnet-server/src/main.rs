use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post, put};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use ghostnet_api::directory::UserDirectory;
use ghostnet_api::hash::Argon2Hasher;
use ghostnet_api::registry::NetRegistry;
use ghostnet_api::{AppState, AppStateInner, nets, users};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ghostnet=debug,tower_http=debug".into()),
        )
        .init();

    // Config
    let db_path = std::env::var("GHOSTNET_DB_PATH").unwrap_or_else(|_| "ghostnet.db".into());
    let host = std::env::var("GHOSTNET_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port: u16 = std::env::var("GHOSTNET_PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()?;

    // Init database
    let db = Arc::new(ghostnet_db::Database::open(&PathBuf::from(&db_path))?);

    // Shared state: the hasher is injected here, not reached for globally
    let state: AppState = Arc::new(AppStateInner {
        directory: UserDirectory::new(db.clone(), Arc::new(Argon2Hasher)),
        registry: NetRegistry::new(db),
    });

    // Routes
    let app = Router::new()
        .route("/api/ghostnets", get(nets::list_nets))
        .route("/api/ghostnets/add", post(nets::submit_net))
        .route("/api/ghostnets/{id}/status", put(nets::update_status))
        .route("/api/user", get(users::list_users))
        .route("/api/user/register", post(users::register))
        .route("/api/user/login", post(users::login))
        .route("/api/user/{id}", put(users::update_user))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Ghost-net server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
