use crate::service::{Result, ServiceError, resolver::ThreadResolver};
use forum_common::model::{
    Id,
    post::{
        CreatePost, NewPost, Post, PostDetails, PostListing, PostMarker, PostUpdate, ROOT_PARENT,
        Related,
    },
    thread::{ThreadAddress, ThreadRef},
};
use forum_db::{
    DbError,
    store::{ForumStore, PostStore, ThreadStore, UserStore},
};
use std::{collections::BTreeSet, sync::Arc};
use time::OffsetDateTime;
use tracing::debug;

/// Foreign key naming the author of a post.
pub const POST_AUTHOR_CONSTRAINT: &str = "posts_author_fkey";

pub struct PostService {
    posts: Arc<dyn PostStore>,
    threads: Arc<dyn ThreadStore>,
    forums: Arc<dyn ForumStore>,
    users: Arc<dyn UserStore>,
    resolver: ThreadResolver,
}

impl PostService {
    pub fn new(
        posts: Arc<dyn PostStore>,
        threads: Arc<dyn ThreadStore>,
        forums: Arc<dyn ForumStore>,
        users: Arc<dyn UserStore>,
        resolver: ThreadResolver,
    ) -> Self {
        Self {
            posts,
            threads,
            forums,
            users,
            resolver,
        }
    }

    /// Adds a batch of posts to a thread, all or nothing.
    ///
    /// Posts without a timestamp share one taken when the batch arrives. Parents are checked
    /// against the thread's forum unless they are posts of the same batch.
    pub async fn create(
        &self,
        address: &ThreadAddress,
        batch: Vec<CreatePost>,
    ) -> Result<Vec<Post>> {
        if batch.is_empty() {
            return Ok(Vec::new());
        }

        let thread = self.resolver.resolve(address).await?;
        let now = OffsetDateTime::now_utc();

        let parents = external_parents(&batch);
        if !parents.is_empty() {
            debug!(count = parents.len(), forum = %thread.forum, "Checking parent posts");
            if !self
                .posts
                .posts_exist_in_forum(&parents, &thread.forum)
                .await?
            {
                return Err(ServiceError::MissingParents {
                    forum: thread.forum,
                });
            }
        }

        let posts = stamp(batch, &thread, now);
        debug!(count = posts.len(), thread = %thread.id, "Inserting posts");

        match self.posts.insert_posts(&posts).await {
            Ok(posts) => Ok(posts),
            Err(DbError::ForeignKeyViolation(constraint))
                if constraint == POST_AUTHOR_CONSTRAINT =>
            {
                Err(ServiceError::PostAuthorNotFound)
            }
            Err(
                err @ (DbError::UniqueViolation(_)
                | DbError::ForeignKeyViolation(_)
                | DbError::InsertCountMismatch { .. }),
            ) => Err(ServiceError::PostConflict(err)),
            Err(err) => Err(err.into()),
        }
    }

    pub async fn list(&self, address: &ThreadAddress, listing: &PostListing) -> Result<Vec<Post>> {
        let thread = self.resolver.resolve(address).await?;
        Ok(self.posts.list_posts(thread.id, listing).await?)
    }

    /// The post, plus whichever of its author, thread and forum were asked for.
    pub async fn details(&self, id: Id<PostMarker>, related: Related) -> Result<PostDetails> {
        let post = self
            .posts
            .fetch_post(id)
            .await?
            .ok_or(ServiceError::PostNotFound(id))?;

        let author = if related.user {
            self.users.fetch_user(&post.author).await?
        } else {
            None
        };
        let thread = if related.thread {
            self.threads.fetch_thread(post.thread).await?
        } else {
            None
        };
        let forum = if related.forum {
            self.forums.fetch_forum(&post.forum).await?
        } else {
            None
        };

        Ok(PostDetails {
            post,
            author,
            thread,
            forum,
        })
    }

    pub async fn update(&self, id: Id<PostMarker>, update: &PostUpdate) -> Result<Post> {
        self.posts
            .update_post(id, update)
            .await?
            .ok_or(ServiceError::PostNotFound(id))
    }
}

/// Distinct non-root parents that are not client ids of posts in the same batch.
fn external_parents(batch: &[CreatePost]) -> Vec<Id<PostMarker>> {
    let batch_ids: BTreeSet<_> = batch.iter().filter_map(|post| post.id).collect();

    batch
        .iter()
        .map(|post| post.parent)
        .filter(|parent| *parent != ROOT_PARENT && !batch_ids.contains(parent))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn stamp(batch: Vec<CreatePost>, thread: &ThreadRef, now: OffsetDateTime) -> Vec<NewPost> {
    batch
        .into_iter()
        .map(|post| NewPost {
            parent: post.parent,
            author: post.author,
            message: post.message,
            forum: thread.forum.clone(),
            thread: thread.id,
            created: post.created.unwrap_or(now),
        })
        .collect()
}
