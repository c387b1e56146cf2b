use axum::{Router, extract::DefaultBodyLimit};
use sqlx::PgPool;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::{config::AppConfig, database, error::Result, routes, storage::MediaStorage};

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub storage: MediaStorage,
}

pub async fn build(config: &AppConfig) -> Result<Router> {
    let pool = database::create_pool(&config.database).await?;

    tokio::fs::create_dir_all(&config.media.root).await?;
    tracing::info!(
        "Serving media from {} under {}",
        config.media.root.display(),
        config.media.url
    );

    let state = AppState {
        db: pool,
        storage: MediaStorage::new(&config.media.root, &config.media.url),
    };

    Ok(router(state, config.server.max_body_size))
}

/// Routes plus the static media service for an already assembled state.
pub fn router(state: AppState, max_body_size: usize) -> Router {
    let media = ServeDir::new(state.storage.root());

    routes::create_router()
        .nest_service(state.storage.base_url(), media)
        .layer(DefaultBodyLimit::max(max_body_size))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
