use std::{num::NonZeroU32, sync::Arc};

use governor::{
    Quota, RateLimiter,
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
};
use serde::{Deserialize, de::DeserializeOwned};
use tracing::debug;
use wreq::header::{ACCEPT, AUTHORIZATION};

use crate::{
    error::{DirectoryError, DirectoryResult},
    models::{MovieDetails, NewMovie, SearchCandidate},
};

pub struct TmdbClient {
    client: wreq::Client,
    authorization: String,
    base_url: String,
    image_base_url: String,
    limiter: Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
}

impl TmdbClient {
    pub fn new(
        client: wreq::Client,
        access_token: &str,
        base_url: String,
        image_base_url: String,
        rps: u32,
    ) -> Self {
        let token = access_token.trim();
        let authorization = if token.starts_with("Bearer ") {
            token.to_string()
        } else {
            format!("Bearer {token}")
        };

        let rps = NonZeroU32::new(rps).unwrap_or(NonZeroU32::MIN);
        let limiter = Arc::new(RateLimiter::direct(Quota::per_second(rps)));
        Self { client, authorization, base_url, image_base_url, limiter }
    }

    pub async fn search_by_title(&self, query: &str) -> DirectoryResult<Vec<SearchCandidate>> {
        let url = format!("{}/search/movie", self.base_url.trim_end_matches('/'));
        let resp: SearchResponse = self.get_json(&url, &[("query", query)]).await?;

        let candidates: Vec<SearchCandidate> = resp
            .results
            .into_iter()
            .filter_map(|m| {
                let title = non_empty(m.title).or_else(|| non_empty(m.original_title))?;
                Some(SearchCandidate {
                    id: m.id,
                    title,
                    year: m.release_date.as_deref().and_then(parse_year),
                    poster_path: non_empty(m.poster_path),
                })
            })
            .collect();

        debug!(query = %query, candidates = candidates.len(), "searched movie directory");
        Ok(candidates)
    }

    pub async fn fetch_details(&self, external_id: i64) -> DirectoryResult<MovieDetails> {
        let url = format!("{}/movie/{}", self.base_url.trim_end_matches('/'), external_id);
        let resp: DetailsResponse = self.get_json(&url, &[]).await?;

        let title = non_empty(resp.original_title)
            .or_else(|| non_empty(resp.title))
            .ok_or(DirectoryError::MissingField("original_title"))?;

        debug!(external_id, title = %title, "fetched movie details");
        Ok(MovieDetails {
            title,
            release_date: resp.release_date.unwrap_or_default(),
            overview: resp.overview.unwrap_or_default(),
            poster_path: non_empty(resp.poster_path),
        })
    }

    pub fn poster_url(&self, poster_path: &str) -> String {
        format!("{}{}", self.image_base_url, poster_path)
    }

    /// Turns directory details into a record ready for the store.
    pub fn new_movie(&self, details: MovieDetails) -> DirectoryResult<NewMovie> {
        let year = parse_year(&details.release_date)
            .ok_or(DirectoryError::MissingField("release_date"))?;
        let poster_path =
            details.poster_path.as_deref().ok_or(DirectoryError::MissingField("poster_path"))?;

        Ok(NewMovie {
            poster_url: self.poster_url(poster_path),
            title: details.title,
            year,
            description: details.overview,
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> DirectoryResult<T> {
        self.limiter.until_ready().await;

        let resp = self
            .client
            .get(url)
            .header(AUTHORIZATION, self.authorization.as_str())
            .header(ACCEPT, "application/json")
            .query(query)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(DirectoryError::Status(status.as_u16()));
        }

        let body = resp.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

/// Year from a `YYYY-MM-DD` release date, or from a bare year.
fn parse_year(release_date: &str) -> Option<i32> {
    let s = release_date.trim();
    if let Ok(date) = s.parse::<jiff::civil::Date>() {
        return Some(i32::from(date.year()));
    }
    (s.len() == 4).then(|| s.parse().ok()).flatten()
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    results: Vec<SearchMovie>,
}

#[derive(Debug, Deserialize)]
struct SearchMovie {
    id: i64,
    title: Option<String>,
    original_title: Option<String>,
    release_date: Option<String>,
    poster_path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DetailsResponse {
    original_title: Option<String>,
    title: Option<String>,
    release_date: Option<String>,
    overview: Option<String>,
    poster_path: Option<String>,
}
