use serde::{Deserialize, Serialize};

use crate::entities::movie;

/// A tracked movie as the rest of the application sees it.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Movie {
    pub id: i32,
    pub title: String,
    pub year: i32,
    pub description: String,
    pub rating: Option<f64>,
    pub rank: Option<i32>,
    pub review: Option<String>,
    pub poster_url: String,
}

impl From<movie::Model> for Movie {
    fn from(m: movie::Model) -> Self {
        Self {
            id: m.id,
            title: m.title,
            year: m.year,
            description: m.description,
            rating: m.rating,
            rank: m.rank,
            review: m.review,
            poster_url: m.poster_url,
        }
    }
}

/// Fields fixed at creation time; rating, rank and review start out empty.
#[derive(Clone, Debug, PartialEq)]
pub struct NewMovie {
    pub title: String,
    pub year: i32,
    pub description: String,
    pub poster_url: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SearchCandidate {
    pub id: i64,
    pub title: String,
    pub year: Option<i32>,
    pub poster_path: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MovieDetails {
    pub title: String,
    pub release_date: String,
    pub overview: String,
    pub poster_path: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct EditRequest {
    #[serde(default)]
    pub rating: String,
    #[serde(default)]
    pub review: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct AddRequest {
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub struct MovieIdQuery {
    pub movie_id: i32,
}

/// `movie_id` here is the directory's id, not one of ours.
#[derive(Debug, Deserialize)]
pub struct ExternalIdQuery {
    pub movie_id: i64,
}
