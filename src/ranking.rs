//! Display ranks derived from ratings.
//!
//! Ranks are never entered by the user. They are recomputed from the full list on
//! every view: ordered ascending by rating, an unrated movie sorts below every rated
//! one, equal ratings keep insertion order (ascending id), and position `i` gets
//! rank `i + 1`.

use std::cmp::Ordering;

use crate::models::Movie;

/// Ascending rating order with unrated movies first and ids breaking ties.
pub fn rating_order(a: &Movie, b: &Movie) -> Ordering {
    let by_rating = match (a.rating, b.rating) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(x), Some(y)) => x.total_cmp(&y),
    };
    by_rating.then_with(|| a.id.cmp(&b.id))
}

/// Sorts `movies` into rating order and overwrites every rank.
///
/// Returns the ids whose rank changed, so callers only write those back.
pub fn assign_ranks(movies: &mut [Movie]) -> Vec<i32> {
    movies.sort_by(rating_order);

    let mut changed = Vec::new();
    for (i, movie) in movies.iter_mut().enumerate() {
        let rank = i as i32 + 1;
        if movie.rank != Some(rank) {
            movie.rank = Some(rank);
            changed.push(movie.id);
        }
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(id: i32, title: &str, rating: Option<f64>) -> Movie {
        Movie {
            id,
            title: title.to_string(),
            year: 2000,
            description: String::new(),
            rating,
            rank: None,
            review: None,
            poster_url: String::new(),
        }
    }

    fn ranks(movies: &[Movie]) -> Vec<(&str, i32)> {
        movies.iter().map(|m| (m.title.as_str(), m.rank.unwrap())).collect()
    }

    #[test]
    fn lowest_rating_gets_rank_one() {
        let mut movies =
            vec![movie(1, "A", Some(7.0)), movie(2, "B", Some(9.0)), movie(3, "C", Some(8.0))];

        assign_ranks(&mut movies);

        assert_eq!(ranks(&movies), vec![("A", 1), ("C", 2), ("B", 3)]);
    }

    #[test]
    fn ranks_are_a_permutation() {
        let ratings = [3.5, 9.9, 0.0, 7.25, 7.25, 10.0, 1.0];
        let mut movies: Vec<Movie> = ratings
            .iter()
            .enumerate()
            .map(|(i, r)| movie(i as i32 + 1, &format!("m{i}"), Some(*r)))
            .collect();

        assign_ranks(&mut movies);

        let mut seen: Vec<i32> = movies.iter().map(|m| m.rank.unwrap()).collect();
        seen.sort();
        assert_eq!(seen, (1..=ratings.len() as i32).collect::<Vec<_>>());

        for pair in movies.windows(2) {
            assert!(pair[0].rating.unwrap() <= pair[1].rating.unwrap());
        }
        assert_eq!(movies.last().unwrap().rating, Some(10.0));
        assert_eq!(movies.first().unwrap().rating, Some(0.0));
    }

    #[test]
    fn unrated_movies_rank_below_rated_ones() {
        let mut movies = vec![
            movie(1, "rated-low", Some(0.5)),
            movie(2, "unrated", None),
            movie(3, "rated-high", Some(6.0)),
        ];

        assign_ranks(&mut movies);

        assert_eq!(ranks(&movies), vec![("unrated", 1), ("rated-low", 2), ("rated-high", 3)]);
    }

    #[test]
    fn ties_keep_insertion_order() {
        let mut movies = vec![
            movie(5, "later", Some(8.0)),
            movie(2, "earlier", Some(8.0)),
            movie(9, "unrated-late", None),
            movie(4, "unrated-early", None),
        ];

        assign_ranks(&mut movies);

        assert_eq!(
            ranks(&movies),
            vec![("unrated-early", 1), ("unrated-late", 2), ("earlier", 3), ("later", 4)]
        );
    }

    #[test]
    fn only_changed_ranks_are_reported() {
        let mut movies = vec![movie(1, "A", Some(7.0)), movie(2, "B", Some(9.0))];
        assert_eq!(assign_ranks(&mut movies), vec![1, 2]);
        assert!(assign_ranks(&mut movies).is_empty());

        movies[0].rating = Some(9.5);
        let mut changed = assign_ranks(&mut movies);
        changed.sort();
        assert_eq!(changed, vec![1, 2]);
        assert_eq!(ranks(&movies), vec![("B", 1), ("A", 2)]);
    }

    #[test]
    fn empty_list_is_fine() {
        let mut movies: Vec<Movie> = Vec::new();
        assert!(assign_ranks(&mut movies).is_empty());
    }
}
