//! HTTP server: the four loan routes plus static assets at the root path.

pub mod http;

use anyhow::{Context, Result};
use axum::routing::get;
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::Config;
use crate::store::RecordStore;

/// Shared server state
#[derive(Clone)]
pub struct ServerState {
    pub config: Arc<Config>,
    pub store: Arc<RecordStore>,
}

/// Build the application router.
pub fn router(state: ServerState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/agregar", get(http::add_handler))
        .route("/libros", get(http::list_handler))
        .route("/editar", get(http::edit_handler))
        .route("/eliminar", get(http::delete_handler))
        .fallback_service(ServeDir::new(&state.config.server.static_dir))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the web server. The reminder sweep is spawned separately by the
/// caller so the two lifecycles stay independent.
pub async fn start(config: Arc<Config>, store: Arc<RecordStore>) -> Result<()> {
    let state = ServerState {
        config: config.clone(),
        store,
    };
    let app = router(state);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid listen address")?;

    println!("El servidor está inicializado en el puerto {} 👌", config.server.port);
    info!("Listening on http://{}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, app).await?;

    Ok(())
}
