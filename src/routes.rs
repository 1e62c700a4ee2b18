use axum::{
    Router,
    extract::{Form, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
};
use axum_extra::extract::cookie::SignedCookieJar;
use cookie::{Cookie, SameSite};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::{
    AppState,
    error::AppResult,
    forms::{self, FieldErrors},
    models::{AddRequest, EditRequest, ExternalIdQuery, MovieIdQuery},
    templates,
};

const FLASH_COOKIE: &str = "flash";

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/edit", get(edit_form).post(edit_submit))
        .route("/delete", get(delete))
        .route("/add", get(add_form).post(add_submit))
        .route("/selected-movie", get(selected_movie).post(selected_movie))
        .fallback(not_found)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

pub async fn index(
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> AppResult<(SignedCookieJar, Html<String>)> {
    let movies = state.store.rerank().await?;
    let can_add = (movies.len() as u64) < state.config.max_movies;
    let (jar, flash) = take_flash(jar);

    Ok((jar, Html(templates::list_page(&movies, flash.as_deref(), can_add))))
}

pub async fn edit_form(
    State(state): State<AppState>,
    Query(q): Query<MovieIdQuery>,
) -> AppResult<Html<String>> {
    let movie = state.store.get(q.movie_id).await?;
    let form = EditRequest {
        rating: movie.rating.map(|r| r.to_string()).unwrap_or_default(),
        review: movie.review.clone().unwrap_or_default(),
    };

    Ok(Html(templates::edit_page(&movie, &form, &FieldErrors::default())))
}

pub async fn edit_submit(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Query(q): Query<MovieIdQuery>,
    Form(req): Form<EditRequest>,
) -> AppResult<Response> {
    let movie = state.store.get(q.movie_id).await?;

    let valid = match forms::validate_edit(&req) {
        Ok(valid) => valid,
        Err(errors) => {
            let body = templates::edit_page(&movie, &req, &errors);
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, Html(body)).into_response());
        },
    };

    state.store.update_rating_review(movie.id, valid.rating, &valid.review).await?;
    info!(movie_id = movie.id, rating = valid.rating, "rated movie");

    let jar = with_flash(jar, &format!("Saved your rating for {}.", movie.title));
    Ok((jar, Redirect::to("/")).into_response())
}

pub async fn delete(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Query(q): Query<MovieIdQuery>,
) -> AppResult<(SignedCookieJar, Redirect)> {
    let movie = state.store.get(q.movie_id).await?;
    state.store.delete(movie.id).await?;
    info!(movie_id = movie.id, title = %movie.title, "removed movie");

    let jar = with_flash(jar, &format!("Removed {}.", movie.title));
    Ok((jar, Redirect::to("/")))
}

pub async fn add_form(State(state): State<AppState>) -> AppResult<Html<String>> {
    if list_is_full(&state).await? {
        return Ok(Html(templates::list_full_page(state.config.max_movies)));
    }
    Ok(Html(templates::add_page(&AddRequest::default(), &FieldErrors::default())))
}

pub async fn add_submit(
    State(state): State<AppState>,
    Form(req): Form<AddRequest>,
) -> AppResult<Response> {
    if list_is_full(&state).await? {
        return Ok(Html(templates::list_full_page(state.config.max_movies)).into_response());
    }

    let title = match forms::validate_add(&req) {
        Ok(title) => title,
        Err(errors) => {
            let body = templates::add_page(&req, &errors);
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, Html(body)).into_response());
        },
    };

    let candidates = state.tmdb.search_by_title(&title).await?;
    let body = templates::select_page(&title, &candidates, &state.config.tmdb_image_base_url);
    Ok(Html(body).into_response())
}

pub async fn selected_movie(
    State(state): State<AppState>,
    Query(q): Query<ExternalIdQuery>,
) -> AppResult<Response> {
    if list_is_full(&state).await? {
        return Ok(Html(templates::list_full_page(state.config.max_movies)).into_response());
    }

    let details = state.tmdb.fetch_details(q.movie_id).await?;
    let new_movie = state.tmdb.new_movie(details)?;
    let id = state.store.insert(new_movie).await?;
    info!(movie_id = id, external_id = q.movie_id, "added movie");

    Ok(Redirect::to(&format!("/edit?movie_id={id}")).into_response())
}

async fn not_found() -> (StatusCode, Html<String>) {
    let body = templates::error_page(StatusCode::NOT_FOUND, "There is nothing at this address.");
    (StatusCode::NOT_FOUND, Html(body))
}

async fn list_is_full(state: &AppState) -> AppResult<bool> {
    Ok(state.store.count().await? >= state.config.max_movies)
}

fn with_flash(jar: SignedCookieJar, message: &str) -> SignedCookieJar {
    let cookie = Cookie::build((FLASH_COOKIE, urlencoding::encode(message).into_owned()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::minutes(5));
    jar.add(cookie)
}

/// Reads the one-shot message set by the previous redirect and clears it.
fn take_flash(jar: SignedCookieJar) -> (SignedCookieJar, Option<String>) {
    let Some(cookie) = jar.get(FLASH_COOKIE) else {
        return (jar, None);
    };
    let message = urlencoding::decode(cookie.value()).ok().map(|m| m.into_owned());
    (jar.remove(Cookie::build(FLASH_COOKIE).path("/")), message)
}
