mod config;
mod db;
mod entities;
mod error;
mod forms;
mod models;
mod ranking;
mod routes;
mod store;
mod templates;
mod tmdb;

use std::{sync::Arc, time::Duration};

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;

use crate::{config::Config, store::MovieStore, tmdb::TmdbClient};

#[derive(Clone, FromRef)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: MovieStore,
    pub tmdb: Arc<TmdbClient>,
    pub cookie_key: Key,
}

impl AppState {
    pub fn new(config: Config, store: MovieStore, tmdb: TmdbClient) -> Self {
        let cookie_key = Key::derive_from(config.secret_key.as_bytes());
        Self { config: Arc::new(config), store, tmdb: Arc::new(tmdb), cookie_key }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,topten=debug,sqlx=warn".to_string()),
        )
        .init();

    let config = Config::from_env()?;

    let http = wreq::Client::builder()
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .build()?;

    let db = db::connect_and_migrate(&config.database_url).await?;
    let store = MovieStore::new(db);

    let tmdb = TmdbClient::new(
        http,
        &config.tmdb_access_token,
        config.tmdb_base_url.clone(),
        config.tmdb_image_base_url.clone(),
        config.tmdb_rps,
    );

    let addr = config.addr;
    let app = routes::router(AppState::new(config, store, tmdb));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}
