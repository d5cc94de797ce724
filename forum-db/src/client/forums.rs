use crate::{
    client::{DbClient, Result},
    listing::forum_users_query,
    record::{ForumRecord, UserRecord, forum_columns},
    store::{ForumStore, UserListing},
};
use async_trait::async_trait;
use forum_common::model::{
    forum::{CreateForum, Forum},
    user::User,
};
use sqlx::query_as;

#[async_trait]
impl ForumStore for DbClient {
    async fn create_forum(&self, forum: &CreateForum) -> Result<Forum> {
        let mut tx = self.pool.begin().await?;

        let record: ForumRecord = query_as(concat!(
            "
            INSERT INTO forums (slug, title, author)
            VALUES (
                $1,
                $2,
                COALESCE((SELECT nickname FROM users WHERE nickname = $3::citext), $3::citext)
            )
            RETURNING ",
            forum_columns!()
        ))
        .bind(&forum.slug)
        .bind(&forum.title)
        .bind(&forum.user)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(record.into())
    }

    async fn fetch_forum(&self, slug: &str) -> Result<Option<Forum>> {
        let record: Option<ForumRecord> = query_as(concat!(
            "SELECT ",
            forum_columns!(),
            " FROM forums WHERE slug = $1::citext"
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record.map(Forum::from))
    }

    async fn list_forum_users(&self, slug: &str, listing: &UserListing) -> Result<Vec<User>> {
        let mut query = forum_users_query(slug, listing);
        let records = query
            .build_query_as::<UserRecord>()
            .fetch_all(&self.pool)
            .await?;

        Ok(records.into_iter().map(User::from).collect())
    }
}
