use crate::{
    client::{DbClient, Result},
    record::StatusRecord,
    store::ServiceStore,
};
use async_trait::async_trait;
use forum_common::model::status::Status;
use sqlx::{query, query_as};

#[async_trait]
impl ServiceStore for DbClient {
    async fn status(&self) -> Result<Status> {
        let record: StatusRecord = query_as(
            r#"
            SELECT
                (SELECT COUNT(*) FROM users) AS "user",
                (SELECT COUNT(*) FROM forums) AS forum,
                (SELECT COUNT(*) FROM threads) AS thread,
                (SELECT COUNT(*) FROM posts) AS post
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(record.into())
    }

    async fn clear(&self) -> Result<()> {
        query("TRUNCATE users, forums, threads, posts, votes, forum_users")
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
