use sea_orm::{
    ActiveValue::NotSet, ColumnTrait, DatabaseConnection, EntityTrait, Order, PaginatorTrait,
    QueryFilter, QueryOrder, Set, SqlErr, TransactionTrait,
    sea_query::{Expr, NullOrdering},
};
use tracing::debug;

use crate::{
    entities::movie,
    error::{StoreError, StoreResult},
    models::{Movie, NewMovie},
    ranking,
};

#[derive(Clone)]
pub struct MovieStore {
    db: DatabaseConnection,
}

impl MovieStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn insert(&self, new: NewMovie) -> StoreResult<i32> {
        let title = new.title.clone();
        let model = movie::ActiveModel {
            id: NotSet,
            title: Set(new.title),
            year: Set(new.year),
            description: Set(new.description),
            rating: Set(None),
            rank: Set(None),
            review: Set(None),
            poster_url: Set(new.poster_url),
        };

        let res = movie::Entity::insert(model).exec(&self.db).await.map_err(|err| {
            match err.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => StoreError::Conflict(title.clone()),
                _ => StoreError::Database(err),
            }
        })?;

        debug!(movie_id = res.last_insert_id, title = %title, "inserted movie");
        Ok(res.last_insert_id)
    }

    pub async fn get(&self, id: i32) -> StoreResult<Movie> {
        movie::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(Movie::from)
            .ok_or(StoreError::NotFound(id))
    }

    /// All movies, ascending by rating; unrated first, ties by id.
    pub async fn list_by_rating(&self) -> StoreResult<Vec<Movie>> {
        let rows = by_rating().all(&self.db).await?;
        Ok(rows.into_iter().map(Movie::from).collect())
    }

    pub async fn update_rating_review(
        &self,
        id: i32,
        rating: f64,
        review: &str,
    ) -> StoreResult<()> {
        let res = movie::Entity::update_many()
            .col_expr(movie::Column::Rating, Expr::value(Some(rating)))
            .col_expr(movie::Column::Review, Expr::value(Some(review.to_string())))
            .filter(movie::Column::Id.eq(id))
            .exec(&self.db)
            .await?;

        if res.rows_affected == 0 {
            return Err(StoreError::NotFound(id));
        }
        debug!(movie_id = id, rating, "updated rating and review");
        Ok(())
    }

    pub async fn delete(&self, id: i32) -> StoreResult<()> {
        let res = movie::Entity::delete_by_id(id).exec(&self.db).await?;
        if res.rows_affected == 0 {
            return Err(StoreError::NotFound(id));
        }
        debug!(movie_id = id, "deleted movie");
        Ok(())
    }

    pub async fn count(&self) -> StoreResult<u64> {
        Ok(movie::Entity::find().count(&self.db).await?)
    }

    /// Recomputes every rank from the current ratings and returns the ranked list.
    ///
    /// Reads once and writes back only changed ranks, all inside one transaction.
    pub async fn rerank(&self) -> StoreResult<Vec<Movie>> {
        let txn = self.db.begin().await?;

        let mut movies: Vec<Movie> =
            by_rating().all(&txn).await?.into_iter().map(Movie::from).collect();
        let changed = ranking::assign_ranks(&mut movies);

        for movie in movies.iter().filter(|m| changed.contains(&m.id)) {
            movie::Entity::update_many()
                .col_expr(movie::Column::Rank, Expr::value(movie.rank))
                .filter(movie::Column::Id.eq(movie.id))
                .exec(&txn)
                .await?;
        }

        txn.commit().await?;

        debug!(total = movies.len(), changed = changed.len(), "recomputed ranks");
        Ok(movies)
    }
}

fn by_rating() -> sea_orm::Select<movie::Entity> {
    movie::Entity::find()
        .order_by_with_nulls(movie::Column::Rating, Order::Asc, NullOrdering::First)
        .order_by_asc(movie::Column::Id)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) async fn memory_store() -> MovieStore {
        let db = crate::db::connect_and_migrate("sqlite::memory:").await.unwrap();
        MovieStore::new(db)
    }

    pub(crate) fn new_movie(title: &str) -> NewMovie {
        NewMovie {
            title: title.to_string(),
            year: 1995,
            description: format!("{title} synopsis"),
            poster_url: format!("https://image.tmdb.org/t/p/w500/{title}.jpg"),
        }
    }

    #[tokio::test]
    async fn insert_then_get() {
        let store = memory_store().await;

        let id = store.insert(new_movie("Heat")).await.unwrap();
        let movie = store.get(id).await.unwrap();

        assert_eq!(movie.title, "Heat");
        assert_eq!(movie.year, 1995);
        assert_eq!(movie.rating, None);
        assert_eq!(movie.rank, None);
        assert_eq!(movie.review, None);
        assert_eq!(movie.poster_url, "https://image.tmdb.org/t/p/w500/Heat.jpg");
    }

    #[tokio::test]
    async fn duplicate_title_conflicts_and_changes_nothing() {
        let store = memory_store().await;
        store.insert(new_movie("Heat")).await.unwrap();

        let mut dup = new_movie("Heat");
        dup.year = 2020;
        let err = store.insert(dup).await.unwrap_err();

        assert!(matches!(err, StoreError::Conflict(ref t) if t == "Heat"));
        assert_eq!(store.count().await.unwrap(), 1);
        assert_eq!(store.list_by_rating().await.unwrap()[0].year, 1995);
    }

    #[tokio::test]
    async fn get_missing_is_not_found() {
        let store = memory_store().await;
        assert!(matches!(store.get(42).await, Err(StoreError::NotFound(42))));
    }

    #[tokio::test]
    async fn update_touches_only_rating_and_review() {
        let store = memory_store().await;
        let id = store.insert(new_movie("Alien")).await.unwrap();
        let before = store.get(id).await.unwrap();

        store.update_rating_review(id, 8.5, "Still terrifying").await.unwrap();
        let after = store.get(id).await.unwrap();

        assert_eq!(after.rating, Some(8.5));
        assert_eq!(after.review.as_deref(), Some("Still terrifying"));
        assert_eq!(
            Movie { rating: before.rating, review: before.review.clone(), ..after.clone() },
            before
        );
    }

    #[tokio::test]
    async fn update_missing_is_not_found() {
        let store = memory_store().await;
        let err = store.update_rating_review(7, 5.0, "meh").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(7)));
    }

    #[tokio::test]
    async fn delete_twice_fails_the_second_time() {
        let store = memory_store().await;
        let keep = store.insert(new_movie("Ran")).await.unwrap();
        let id = store.insert(new_movie("Ikiru")).await.unwrap();

        store.delete(id).await.unwrap();
        assert!(matches!(store.delete(id).await, Err(StoreError::NotFound(_))));
        assert!(matches!(store.delete(999).await, Err(StoreError::NotFound(999))));

        assert_eq!(store.count().await.unwrap(), 1);
        assert_eq!(store.get(keep).await.unwrap().title, "Ran");
    }

    #[tokio::test]
    async fn list_puts_unrated_first_and_breaks_ties_by_id() {
        let store = memory_store().await;
        let a = store.insert(new_movie("A")).await.unwrap();
        let b = store.insert(new_movie("B")).await.unwrap();
        let c = store.insert(new_movie("C")).await.unwrap();
        let d = store.insert(new_movie("D")).await.unwrap();
        store.update_rating_review(a, 6.0, "ok").await.unwrap();
        store.update_rating_review(c, 6.0, "ok too").await.unwrap();
        store.update_rating_review(d, 2.0, "no").await.unwrap();

        let ids: Vec<i32> = store.list_by_rating().await.unwrap().iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![b, d, a, c]);
    }

    #[tokio::test]
    async fn rerank_persists_ranks() {
        let store = memory_store().await;
        let a = store.insert(new_movie("A")).await.unwrap();
        let b = store.insert(new_movie("B")).await.unwrap();
        let c = store.insert(new_movie("C")).await.unwrap();
        store.update_rating_review(a, 7.0, "a").await.unwrap();
        store.update_rating_review(b, 9.0, "b").await.unwrap();
        store.update_rating_review(c, 8.0, "c").await.unwrap();

        let ranked = store.rerank().await.unwrap();
        let titles: Vec<(&str, Option<i32>)> =
            ranked.iter().map(|m| (m.title.as_str(), m.rank)).collect();
        assert_eq!(titles, vec![("A", Some(1)), ("C", Some(2)), ("B", Some(3))]);

        assert_eq!(store.get(a).await.unwrap().rank, Some(1));
        assert_eq!(store.get(c).await.unwrap().rank, Some(2));
        assert_eq!(store.get(b).await.unwrap().rank, Some(3));
    }

    #[tokio::test]
    async fn rerank_follows_rating_changes_and_deletes() {
        let store = memory_store().await;
        let a = store.insert(new_movie("A")).await.unwrap();
        let b = store.insert(new_movie("B")).await.unwrap();
        let c = store.insert(new_movie("C")).await.unwrap();
        store.update_rating_review(a, 1.0, "a").await.unwrap();
        store.update_rating_review(b, 2.0, "b").await.unwrap();
        store.update_rating_review(c, 3.0, "c").await.unwrap();
        store.rerank().await.unwrap();

        store.update_rating_review(a, 10.0, "a again").await.unwrap();
        store.delete(b).await.unwrap();
        store.rerank().await.unwrap();

        assert_eq!(store.get(c).await.unwrap().rank, Some(1));
        assert_eq!(store.get(a).await.unwrap().rank, Some(2));
    }

    #[tokio::test]
    async fn rerank_of_empty_store_is_empty() {
        let store = memory_store().await;
        assert!(store.rerank().await.unwrap().is_empty());
    }
}
