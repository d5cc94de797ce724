use crate::{
    client::{DbClient, Result},
    store::VoteStore,
};
use async_trait::async_trait;
use forum_common::model::{Id, thread::ThreadMarker, vote::Vote};
use sqlx::query;

#[async_trait]
impl VoteStore for DbClient {
    async fn upsert_vote(&self, thread: Id<ThreadMarker>, vote: &Vote) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        query(
            "
            INSERT INTO votes (author, thread, voice)
            VALUES ($1::citext, $2, $3)
            ON CONFLICT (author, thread) DO UPDATE
            SET voice = EXCLUDED.voice, updated = now()
            ",
        )
        .bind(&vote.nickname)
        .bind(thread.get())
        .bind(vote.voice)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }
}
