use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use tower_http::trace::TraceLayer;
use tracing::info;

use quill_api::auth::AppStateInner;
use quill_api::routes;
use quill_api::token::TokenCodec;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quill=debug,tower_http=debug".into()),
        )
        .init();

    // Config is read once here; the secret and DB handle travel in AppState
    // and nothing downstream touches the environment.
    let jwt_secret =
        std::env::var("QUILL_JWT_SECRET").unwrap_or_else(|_| "dev-secret-change-me".into());
    let db_path = std::env::var("QUILL_DB_PATH").unwrap_or_else(|_| "quill.db".into());
    let host = std::env::var("QUILL_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port: u16 = std::env::var("QUILL_PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()?;

    // Init database
    let db = quill_db::Database::open(&PathBuf::from(&db_path))?;

    let state = Arc::new(AppStateInner {
        db,
        tokens: TokenCodec::new(&jwt_secret),
    });

    let app = routes::router(state).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Quill server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
