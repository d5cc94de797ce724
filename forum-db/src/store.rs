//! Repository traits, one per entity family.
//!
//! [`DbClient`](crate::DbClient) implements all of them. Services depend on the narrowest trait
//! they need, so a post service sees [`ThreadLookup`] rather than the whole thread repository.

use crate::client::Result;
use async_trait::async_trait;
use forum_common::model::{
    Id, Page,
    forum::{CreateForum, Forum},
    post::{NewPost, Post, PostListing, PostMarker, PostUpdate},
    status::Status,
    thread::{
        CreateThread, Thread, ThreadAddress, ThreadListing, ThreadMarker, ThreadRef, ThreadSlug,
        ThreadUpdate,
    },
    user::{User, UserUpdate},
    vote::Vote,
};
use time::OffsetDateTime;

/// Members of a forum, paginated by nickname. `since` is exclusive.
pub type UserListing = Page<String>;

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create_user(&self, user: &User) -> Result<User>;

    async fn fetch_user(&self, nickname: &str) -> Result<Option<User>>;

    /// Every user whose nickname or email equals the given ones.
    async fn fetch_users_by_nickname_or_email(&self, nickname: &str, email: &str)
    -> Result<Vec<User>>;

    /// Returns `None` when no user has that nickname.
    async fn update_user(&self, nickname: &str, update: &UserUpdate) -> Result<Option<User>>;
}

#[async_trait]
pub trait ForumStore: Send + Sync {
    /// The owner nickname is stored with the spelling of the existing user.
    async fn create_forum(&self, forum: &CreateForum) -> Result<Forum>;

    async fn fetch_forum(&self, slug: &str) -> Result<Option<Forum>>;

    async fn list_forum_users(&self, slug: &str, listing: &UserListing) -> Result<Vec<User>>;
}

/// Resolves a thread address to the thread's id and owning forum.
#[async_trait]
pub trait ThreadLookup: Send + Sync {
    async fn lookup_thread(&self, address: &ThreadAddress) -> Result<Option<ThreadRef>>;
}

#[async_trait]
pub trait ThreadStore: Send + Sync {
    async fn create_thread(
        &self,
        forum: &str,
        thread: &CreateThread,
        created: OffsetDateTime,
    ) -> Result<Thread>;

    async fn fetch_thread(&self, id: Id<ThreadMarker>) -> Result<Option<Thread>>;

    async fn fetch_thread_by_slug(&self, slug: &ThreadSlug) -> Result<Option<Thread>>;

    async fn list_forum_threads(&self, forum: &str, listing: &ThreadListing)
    -> Result<Vec<Thread>>;

    async fn update_thread(
        &self,
        id: Id<ThreadMarker>,
        update: &ThreadUpdate,
    ) -> Result<Option<Thread>>;
}

#[async_trait]
pub trait PostStore: Send + Sync {
    /// Inserts the whole batch or nothing.
    async fn insert_posts(&self, posts: &[NewPost]) -> Result<Vec<Post>>;

    /// Whether every one of the distinct `ids` is a post in `forum`.
    async fn posts_exist_in_forum(&self, ids: &[Id<PostMarker>], forum: &str) -> Result<bool>;

    async fn list_posts(&self, thread: Id<ThreadMarker>, listing: &PostListing)
    -> Result<Vec<Post>>;

    async fn fetch_post(&self, id: Id<PostMarker>) -> Result<Option<Post>>;

    async fn update_post(&self, id: Id<PostMarker>, update: &PostUpdate) -> Result<Option<Post>>;
}

#[async_trait]
pub trait VoteStore: Send + Sync {
    /// Inserts the vote, or overwrites the voice of an earlier vote by the same user.
    async fn upsert_vote(&self, thread: Id<ThreadMarker>, vote: &Vote) -> Result<()>;
}

#[async_trait]
pub trait ServiceStore: Send + Sync {
    async fn status(&self) -> Result<Status>;

    /// Removes every row of every table.
    async fn clear(&self) -> Result<()>;
}
