use crate::service::{Creation, Result, ServiceError, resolver::ThreadResolver};
use forum_common::model::thread::{CreateThread, Thread, ThreadAddress, ThreadListing, ThreadUpdate};
use forum_db::{
    DbError,
    store::{ForumStore, ThreadStore, UserStore},
};
use std::sync::Arc;
use time::OffsetDateTime;
use tracing::debug;

pub struct ThreadService {
    threads: Arc<dyn ThreadStore>,
    forums: Arc<dyn ForumStore>,
    users: Arc<dyn UserStore>,
    resolver: ThreadResolver,
}

impl ThreadService {
    pub fn new(
        threads: Arc<dyn ThreadStore>,
        forums: Arc<dyn ForumStore>,
        users: Arc<dyn UserStore>,
        resolver: ThreadResolver,
    ) -> Self {
        Self {
            threads,
            forums,
            users,
            resolver,
        }
    }

    /// Creates a thread in the forum, stamping it with the current time unless one is given.
    pub async fn create(&self, forum: &str, thread: CreateThread) -> Result<Creation<Thread>> {
        let forum = self
            .forums
            .fetch_forum(forum)
            .await?
            .ok_or_else(|| ServiceError::ForumNotFound(forum.to_owned()))?;
        let author = self
            .users
            .fetch_user(&thread.author)
            .await?
            .ok_or_else(|| ServiceError::UserNotFound(thread.author.clone()))?;

        let created = thread.created.unwrap_or_else(OffsetDateTime::now_utc);
        let thread = CreateThread {
            author: author.nickname,
            ..thread
        };

        match self
            .threads
            .create_thread(&forum.slug, &thread, created)
            .await
        {
            Ok(thread) => Ok(Creation::Created(thread)),
            Err(DbError::UniqueViolation(constraint)) => {
                let Some(slug) = &thread.slug else {
                    return Err(DbError::UniqueViolation(constraint).into());
                };
                debug!(%slug, "Thread already exists");

                self.threads
                    .fetch_thread_by_slug(slug)
                    .await?
                    .map(Creation::Conflict)
                    .ok_or_else(|| ServiceError::ThreadNotFound(slug.clone().into()))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// An existing forum without threads yields an empty list.
    pub async fn list(&self, forum: &str, listing: &ThreadListing) -> Result<Vec<Thread>> {
        let forum = self
            .forums
            .fetch_forum(forum)
            .await?
            .ok_or_else(|| ServiceError::ForumNotFound(forum.to_owned()))?;

        Ok(self.threads.list_forum_threads(&forum.slug, listing).await?)
    }

    pub async fn details(&self, address: &ThreadAddress) -> Result<Thread> {
        let thread = self.resolver.resolve(address).await?;

        self.threads
            .fetch_thread(thread.id)
            .await?
            .ok_or_else(|| ServiceError::ThreadNotFound(address.clone()))
    }

    pub async fn update(&self, address: &ThreadAddress, update: &ThreadUpdate) -> Result<Thread> {
        let thread = self.resolver.resolve(address).await?;

        self.threads
            .update_thread(thread.id, update)
            .await?
            .ok_or_else(|| ServiceError::ThreadNotFound(address.clone()))
    }
}
