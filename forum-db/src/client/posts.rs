use crate::{
    client::{DbClient, DbError, Result},
    listing::posts_query,
    record::{PostRecord, post_columns},
    store::PostStore,
};
use async_trait::async_trait;
use forum_common::model::{
    Id,
    post::{NewPost, Post, PostListing, PostMarker, PostUpdate},
    thread::ThreadMarker,
};
use sqlx::{Postgres, QueryBuilder, query_as, query_scalar};
use tracing::debug;

#[async_trait]
impl PostStore for DbClient {
    async fn insert_posts(&self, posts: &[NewPost]) -> Result<Vec<Post>> {
        if posts.is_empty() {
            return Ok(Vec::new());
        }

        let mut query = QueryBuilder::<Postgres>::new(
            "INSERT INTO posts (parent, author, message, forum, thread, created) ",
        );
        query.push_values(posts, |mut row, post| {
            row.push_bind(post.parent.get())
                .push_bind(post.author.clone())
                .push_bind(post.message.clone())
                .push_bind(post.forum.clone())
                .push_bind(post.thread.get())
                .push_bind(post.created);
        });
        query.push(concat!(" RETURNING ", post_columns!()));

        let mut tx = self.pool.begin().await?;

        let records = query
            .build_query_as::<PostRecord>()
            .fetch_all(&mut *tx)
            .await?;

        if records.len() != posts.len() {
            tx.rollback().await?;
            return Err(DbError::InsertCountMismatch {
                expected: posts.len(),
                returned: records.len(),
            });
        }

        tx.commit().await?;
        debug!(count = records.len(), thread = posts[0].thread.get(), "Inserted posts");
        Ok(records.into_iter().map(Post::from).collect())
    }

    async fn posts_exist_in_forum(&self, ids: &[Id<PostMarker>], forum: &str) -> Result<bool> {
        let ids: Vec<i64> = ids.iter().map(|id| id.get()).collect();

        let found: i64 = query_scalar(
            "SELECT COUNT(DISTINCT id) FROM posts WHERE forum = $1::citext AND id = ANY($2)",
        )
        .bind(forum)
        .bind(&ids)
        .fetch_one(&self.pool)
        .await?;

        Ok(usize::try_from(found).is_ok_and(|found| found == ids.len()))
    }

    async fn list_posts(
        &self,
        thread: Id<ThreadMarker>,
        listing: &PostListing,
    ) -> Result<Vec<Post>> {
        let mut query = posts_query(thread, listing);
        let records = query
            .build_query_as::<PostRecord>()
            .fetch_all(&self.pool)
            .await?;

        Ok(records.into_iter().map(Post::from).collect())
    }

    async fn fetch_post(&self, id: Id<PostMarker>) -> Result<Option<Post>> {
        let record: Option<PostRecord> = query_as(concat!(
            "SELECT ",
            post_columns!(),
            " FROM posts WHERE id = $1"
        ))
        .bind(id.get())
        .fetch_optional(&self.pool)
        .await?;

        Ok(record.map(Post::from))
    }

    async fn update_post(&self, id: Id<PostMarker>, update: &PostUpdate) -> Result<Option<Post>> {
        let mut tx = self.pool.begin().await?;

        // A message equal to the stored one is not an edit.
        let record: Option<PostRecord> = query_as(concat!(
            "
            UPDATE posts SET
                message = COALESCE($2, message),
                is_edited = CASE WHEN $2 IS NULL OR message = $2 THEN is_edited ELSE TRUE END
            WHERE id = $1
            RETURNING ",
            post_columns!()
        ))
        .bind(id.get())
        .bind(&update.message)
        .fetch_optional(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(record.map(Post::from))
    }
}
