use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use tower_http::trace::TraceLayer;
use tracing::info;

use quotebot_api::routes;
use quotebot_api::state::{AppState, AppStateInner};
use quotebot_auth::UserfileAuthorizer;
use quotebot_db::Database;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quotebot_server=debug,quotebot_api=debug,quotebot_auth=debug,quotebot_db=info,tower_http=debug".into()),
        )
        .init();

    // Config
    let db_path = std::env::var("QUOTEBOT_DB_PATH").unwrap_or_else(|_| "quotes.db".into());
    let userfile_path =
        std::env::var("QUOTEBOT_USERFILE").unwrap_or_else(|_| "userfile.json".into());
    let prefix = std::env::var("QUOTEBOT_CMD_PREFIX").unwrap_or_else(|_| "!".into());
    let host = std::env::var("QUOTEBOT_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port: u16 = std::env::var("QUOTEBOT_PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()?;

    // The bot does not serve without its store and userfile
    let db = Database::open(&PathBuf::from(&db_path))?;
    let authorizer = UserfileAuthorizer::load(&PathBuf::from(&userfile_path))?;

    let state: AppState = Arc::new(AppStateInner {
        db,
        authorizer: Box::new(authorizer),
        prefix,
    });

    let app = routes::router(state).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Quotebot listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
