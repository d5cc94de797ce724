use crate::{
    client::{DbClient, Result},
    listing::forum_threads_query,
    record::{ThreadRecord, ThreadRefRecord, thread_columns},
    store::{ThreadLookup, ThreadStore},
};
use async_trait::async_trait;
use forum_common::model::{
    Id,
    thread::{
        CreateThread, Thread, ThreadAddress, ThreadListing, ThreadMarker, ThreadRef, ThreadSlug,
        ThreadUpdate,
    },
};
use sqlx::query_as;
use time::OffsetDateTime;

#[async_trait]
impl ThreadLookup for DbClient {
    async fn lookup_thread(&self, address: &ThreadAddress) -> Result<Option<ThreadRef>> {
        let record: Option<ThreadRefRecord> = match address {
            ThreadAddress::Id(id) => {
                query_as("SELECT id, forum::text AS forum FROM threads WHERE id = $1")
                    .bind(id.get())
                    .fetch_optional(&self.pool)
                    .await?
            }
            ThreadAddress::Slug(slug) => {
                query_as("SELECT id, forum::text AS forum FROM threads WHERE slug = $1::citext")
                    .bind(slug.get())
                    .fetch_optional(&self.pool)
                    .await?
            }
        };

        Ok(record.map(ThreadRef::from))
    }
}

#[async_trait]
impl ThreadStore for DbClient {
    async fn create_thread(
        &self,
        forum: &str,
        thread: &CreateThread,
        created: OffsetDateTime,
    ) -> Result<Thread> {
        let mut tx = self.pool.begin().await?;

        let record: ThreadRecord = query_as(concat!(
            "
            INSERT INTO threads (title, author, forum, message, slug, created)
            VALUES (
                $1,
                $2::citext,
                COALESCE((SELECT slug FROM forums WHERE slug = $3::citext), $3::citext),
                $4,
                $5::citext,
                $6
            )
            RETURNING ",
            thread_columns!()
        ))
        .bind(&thread.title)
        .bind(&thread.author)
        .bind(forum)
        .bind(&thread.message)
        .bind(thread.slug.as_ref().map(ThreadSlug::get))
        .bind(created)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Thread::try_from(record)?)
    }

    async fn fetch_thread(&self, id: Id<ThreadMarker>) -> Result<Option<Thread>> {
        let record: Option<ThreadRecord> = query_as(concat!(
            "SELECT ",
            thread_columns!(),
            " FROM threads WHERE id = $1"
        ))
        .bind(id.get())
        .fetch_optional(&self.pool)
        .await?;

        Ok(record.map(Thread::try_from).transpose()?)
    }

    async fn fetch_thread_by_slug(&self, slug: &ThreadSlug) -> Result<Option<Thread>> {
        let record: Option<ThreadRecord> = query_as(concat!(
            "SELECT ",
            thread_columns!(),
            " FROM threads WHERE slug = $1::citext"
        ))
        .bind(slug.get())
        .fetch_optional(&self.pool)
        .await?;

        Ok(record.map(Thread::try_from).transpose()?)
    }

    async fn list_forum_threads(
        &self,
        forum: &str,
        listing: &ThreadListing,
    ) -> Result<Vec<Thread>> {
        let mut query = forum_threads_query(forum, listing);
        let records = query
            .build_query_as::<ThreadRecord>()
            .fetch_all(&self.pool)
            .await?;

        let threads = records
            .into_iter()
            .map(Thread::try_from)
            .collect::<Result<_, _>>()?;
        Ok(threads)
    }

    async fn update_thread(
        &self,
        id: Id<ThreadMarker>,
        update: &ThreadUpdate,
    ) -> Result<Option<Thread>> {
        let mut tx = self.pool.begin().await?;

        let record: Option<ThreadRecord> = query_as(concat!(
            "
            UPDATE threads SET
                title = COALESCE($2, title),
                message = COALESCE($3, message)
            WHERE id = $1
            RETURNING ",
            thread_columns!()
        ))
        .bind(id.get())
        .bind(&update.title)
        .bind(&update.message)
        .fetch_optional(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(record.map(Thread::try_from).transpose()?)
    }
}
