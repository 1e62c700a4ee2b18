use axum::http::StatusCode;
use maud::{DOCTYPE, Markup, html};

use crate::{
    forms::{FieldErrors, MAX_REVIEW_LEN},
    models::{AddRequest, EditRequest, Movie, SearchCandidate},
};

const TAILWIND_CDN: &str = "https://cdn.tailwindcss.com";

const INPUT_CLASS: &str = "mt-2 w-full rounded-md border border-gray-300 px-3 py-2 focus:border-blue-500 focus:outline-none focus:ring-1 focus:ring-blue-500";
const BUTTON_CLASS: &str =
    "w-full rounded-md bg-blue-600 px-4 py-2 font-semibold text-white hover:bg-blue-700";

pub fn list_page(movies: &[Movie], flash: Option<&str>, can_add: bool) -> String {
    page(
        "My Top 10 Movies",
        html! {
            div class="max-w-4xl mx-auto px-6 py-12" {
                div class="flex items-start justify-between gap-6" {
                    div {
                        h1 class="text-3xl font-bold text-gray-900" { "My Top 10 Movies" }
                        p class="mt-2 text-gray-600" { "These are my all time favourite movies." }
                    }
                    @if can_add {
                        a class="rounded-md bg-blue-600 px-4 py-2 font-semibold text-white hover:bg-blue-700" href="/add" { "Add movie" }
                    }
                }

                @if let Some(message) = flash {
                    div class="mt-6 rounded-md bg-green-50 border border-green-200 px-4 py-3 text-green-800" { (message) }
                }

                @if movies.is_empty() {
                    div class="mt-10 bg-white shadow rounded-lg p-8" {
                        p class="text-gray-600" { "No movies yet. Search for one to get started." }
                    }
                } @else {
                    div class="mt-10 space-y-4" {
                        @for movie in movies {
                            (movie_card(movie))
                        }
                    }
                }
            }
        },
    )
}

pub fn edit_page(movie: &Movie, form: &EditRequest, errors: &FieldErrors) -> String {
    let action = format!("/edit?movie_id={}", movie.id);

    narrow_page(
        "Edit movie",
        html! {
            h1 class="text-2xl font-bold text-gray-900" { (movie.title) }
            p class="mt-2 text-gray-600" { "Edit movie rating" }

            form class="mt-8 space-y-6" method="post" action=(action) {
                div {
                    label class="block text-sm font-medium text-gray-700" for="rating" { "Your rating out of 10, e.g. 7.5" }
                    input class=(INPUT_CLASS) name="rating" id="rating" inputmode="decimal" value=(form.rating);
                    (field_error(errors.rating.as_deref()))
                }

                div {
                    label class="block text-sm font-medium text-gray-700" for="review" { "Your review" }
                    input class=(INPUT_CLASS) name="review" id="review" maxlength=(MAX_REVIEW_LEN) value=(form.review);
                    (field_error(errors.review.as_deref()))
                }

                button class=(BUTTON_CLASS) type="submit" { "Done" }
            }
        },
    )
}

pub fn add_page(form: &AddRequest, errors: &FieldErrors) -> String {
    narrow_page(
        "Add movie",
        html! {
            h1 class="text-2xl font-bold text-gray-900" { "Add a movie" }

            form class="mt-8 space-y-6" method="post" action="/add" {
                div {
                    label class="block text-sm font-medium text-gray-700" for="title" { "Movie title" }
                    input class=(INPUT_CLASS) name="title" id="title" value=(form.title) required;
                    (field_error(errors.title.as_deref()))
                }

                button class=(BUTTON_CLASS) type="submit" { "Add movie" }
            }
        },
    )
}

pub fn list_full_page(max_movies: u64) -> String {
    narrow_page(
        "List full",
        html! {
            h1 class="text-2xl font-bold text-gray-900" { "Add a movie" }
            p class="mt-4 text-gray-700" {
                (max_movies) " movies already listed, remove one to add a new movie"
            }
            a class="mt-6 inline-block text-blue-600 hover:text-blue-800" href="/" { "Back to the list" }
        },
    )
}

pub fn select_page(query: &str, candidates: &[SearchCandidate], poster_base: &str) -> String {
    page(
        "Select movie",
        html! {
            div class="max-w-2xl mx-auto px-6 py-12" {
                h1 class="text-2xl font-bold text-gray-900" { "Select movie" }
                p class="mt-2 text-gray-600" { "Results for \u{201c}" (query) "\u{201d}" }

                @if candidates.is_empty() {
                    div class="mt-8 bg-white shadow rounded-lg p-8" {
                        p class="text-gray-600" { "Nothing matched that title." }
                        a class="mt-4 inline-block text-blue-600 hover:text-blue-800" href="/add" { "Try another search" }
                    }
                } @else {
                    ul class="mt-8 divide-y divide-gray-200 bg-white shadow rounded-lg" {
                        @for candidate in candidates {
                            li class="flex items-center gap-4 p-4" {
                                @if let Some(poster) = &candidate.poster_path {
                                    img class="h-16 w-11 rounded object-cover" src=(format!("{poster_base}{poster}")) alt="";
                                }
                                a class="text-blue-600 hover:text-blue-800" href=(format!("/selected-movie?movie_id={}", candidate.id)) {
                                    (candidate.title)
                                    @if let Some(year) = candidate.year {
                                        span class="ml-2 text-gray-500" { "(" (year) ")" }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        },
    )
}

pub fn error_page(status: StatusCode, message: &str) -> String {
    narrow_page(
        "Error",
        html! {
            h1 class="text-2xl font-bold text-gray-900" {
                (status.canonical_reason().unwrap_or("Error"))
            }
            p class="mt-4 text-gray-700" { (message) }
            a class="mt-6 inline-block text-blue-600 hover:text-blue-800" href="/" { "Back" }
        },
    )
}

fn page(title: &str, body: Markup) -> String {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
                script src=(TAILWIND_CDN) {}
            }
            body class="min-h-screen bg-gray-50" { (body) }
        }
    }
    .into_string()
}

fn narrow_page(title: &str, inner: Markup) -> String {
    page(
        title,
        html! {
            div class="max-w-xl mx-auto px-6 py-12" {
                div class="bg-white shadow rounded-lg p-8" { (inner) }
            }
        },
    )
}

fn field_error(message: Option<&str>) -> Markup {
    html! {
        @if let Some(message) = message {
            p class="mt-2 text-sm text-red-600" { (message) }
        }
    }
}

fn movie_card(movie: &Movie) -> Markup {
    html! {
        div class="bg-white shadow rounded-lg p-6 flex gap-6" {
            img class="h-36 w-24 rounded object-cover" src=(movie.poster_url) alt=(movie.title);
            div class="flex-1" {
                div class="flex items-start justify-between gap-4" {
                    h2 class="text-xl font-semibold text-gray-900" {
                        @if let Some(rank) = movie.rank {
                            span class="mr-2 text-gray-400" { "#" (rank) }
                        }
                        (movie.title)
                        span class="ml-2 font-normal text-gray-500" { "(" (movie.year) ")" }
                    }
                    span class="text-lg font-semibold text-gray-700" {
                        @match movie.rating {
                            Some(rating) => { (format!("{rating:.1}")) },
                            None => { "unrated" },
                        }
                    }
                }
                p class="mt-2 text-sm text-gray-600" { (movie.description) }
                @if let Some(review) = &movie.review {
                    p class="mt-2 text-sm italic text-gray-700" { "\u{201c}" (review) "\u{201d}" }
                }
                div class="mt-4 flex gap-4 text-sm" {
                    a class="text-blue-600 hover:text-blue-800" href=(format!("/edit?movie_id={}", movie.id)) { "Update" }
                    a class="text-red-600 hover:text-red-800" href=(format!("/delete?movie_id={}", movie.id)) { "Delete" }
                }
            }
        }
    }
}
