use std::net::SocketAddr;

use anyhow::{Context, bail};

/// Cookie signing needs at least this much key material.
const MIN_SECRET_KEY_LEN: usize = 32;

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub secret_key: String,
    pub tmdb_access_token: String,
    pub tmdb_base_url: String,
    pub tmdb_image_base_url: String,
    pub database_url: String,
    pub tmdb_rps: u32,
    pub request_timeout_secs: u64,
    pub max_movies: u64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let secret_key = var("SECRET_KEY").context("SECRET_KEY must be set")?;
        if secret_key.len() < MIN_SECRET_KEY_LEN {
            bail!("SECRET_KEY must be at least {MIN_SECRET_KEY_LEN} bytes long");
        }
        let tmdb_access_token =
            var("TMDB_ACCESS_TOKEN").context("TMDB_ACCESS_TOKEN must be set")?;

        let host = var("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port: u16 =
            var("PORT").unwrap_or_else(|| "3000".to_string()).parse().context("PORT")?;

        let tmdb_base_url =
            var("TMDB_BASE_URL").unwrap_or_else(|| "https://api.themoviedb.org/3".to_string());
        let tmdb_image_base_url = var("TMDB_IMAGE_BASE_URL")
            .unwrap_or_else(|| "https://image.tmdb.org/t/p/w500".to_string());

        let database_url =
            var("DATABASE_URL").unwrap_or_else(|| "sqlite://movies.db?mode=rwc".to_string());

        let tmdb_rps = var("TMDB_RPS")
            .map(|s| s.parse::<u32>())
            .transpose()
            .context("TMDB_RPS")?
            .unwrap_or(4);

        let request_timeout_secs = var("REQUEST_TIMEOUT_SECS")
            .map(|s| s.parse::<u64>())
            .transpose()
            .context("REQUEST_TIMEOUT_SECS")?
            .unwrap_or(10);

        let max_movies = var("MAX_MOVIES")
            .map(|s| s.parse::<u64>())
            .transpose()
            .context("MAX_MOVIES")?
            .unwrap_or(10);

        Ok(Self {
            addr: format!("{host}:{port}").parse().context("HOST/PORT")?,
            secret_key,
            tmdb_access_token,
            tmdb_base_url,
            tmdb_image_base_url,
            database_url,
            tmdb_rps,
            request_timeout_secs,
            max_movies,
        })
    }
}
