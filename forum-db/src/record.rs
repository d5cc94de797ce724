use forum_common::model::{
    ModelValidationError,
    forum::Forum,
    post::Post,
    status::Status,
    thread::{Thread, ThreadRef, ThreadSlug},
    user::User,
};
use sqlx::FromRow;
use time::OffsetDateTime;

// citext columns are selected as text so they decode as `String`.

macro_rules! user_columns {
    () => {
        "nickname::text AS nickname, fullname, about, email::text AS email"
    };
}

macro_rules! forum_columns {
    () => {
        "title, author::text AS author, slug::text AS slug, posts, threads"
    };
}

macro_rules! thread_columns {
    () => {
        "id, title, author::text AS author, forum::text AS forum, message, votes, \
        slug::text AS slug, created"
    };
}

macro_rules! post_columns {
    () => {
        "id, parent, author::text AS author, message, is_edited, forum::text AS forum, thread, \
        created"
    };
}

pub(crate) use {forum_columns, post_columns, thread_columns, user_columns};

#[derive(Clone, Eq, PartialEq, Debug, Default, Hash, FromRow)]
pub(crate) struct UserRecord {
    pub nickname: String,
    pub fullname: String,
    pub about: String,
    pub email: String,
}

#[derive(Clone, Eq, PartialEq, Debug, Default, Hash, FromRow)]
pub(crate) struct ForumRecord {
    pub title: String,
    pub author: String,
    pub slug: String,
    pub posts: i64,
    pub threads: i64,
}

#[derive(Clone, Eq, PartialEq, Debug, Hash, FromRow)]
pub(crate) struct ThreadRecord {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub forum: String,
    pub message: String,
    pub votes: i64,
    pub slug: Option<String>,
    pub created: OffsetDateTime,
}

#[derive(Clone, Eq, PartialEq, Debug, Default, Hash, FromRow)]
pub(crate) struct ThreadRefRecord {
    pub id: i64,
    pub forum: String,
}

#[derive(Clone, Eq, PartialEq, Debug, Hash, FromRow)]
pub(crate) struct PostRecord {
    pub id: i64,
    pub parent: i64,
    pub author: String,
    pub message: String,
    pub is_edited: bool,
    pub forum: String,
    pub thread: i64,
    pub created: OffsetDateTime,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, Default, Hash, FromRow)]
pub(crate) struct StatusRecord {
    pub user: i64,
    pub forum: i64,
    pub thread: i64,
    pub post: i64,
}

impl From<UserRecord> for User {
    fn from(value: UserRecord) -> Self {
        Self {
            nickname: value.nickname,
            fullname: value.fullname,
            about: value.about,
            email: value.email,
        }
    }
}

impl From<ForumRecord> for Forum {
    fn from(value: ForumRecord) -> Self {
        Self {
            title: value.title,
            user: value.author,
            slug: value.slug,
            posts: value.posts,
            threads: value.threads,
        }
    }
}

impl TryFrom<ThreadRecord> for Thread {
    type Error = ModelValidationError;

    fn try_from(value: ThreadRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id.into(),
            title: value.title,
            author: value.author,
            forum: value.forum,
            message: value.message,
            votes: value.votes,
            slug: value.slug.map(ThreadSlug::new).transpose()?,
            created: value.created,
        })
    }
}

impl From<ThreadRefRecord> for ThreadRef {
    fn from(value: ThreadRefRecord) -> Self {
        Self {
            id: value.id.into(),
            forum: value.forum,
        }
    }
}

impl From<PostRecord> for Post {
    fn from(value: PostRecord) -> Self {
        Self {
            id: value.id.into(),
            parent: value.parent.into(),
            author: value.author,
            message: value.message,
            is_edited: value.is_edited,
            forum: value.forum,
            thread: value.thread.into(),
            created: value.created,
        }
    }
}

impl From<StatusRecord> for Status {
    fn from(value: StatusRecord) -> Self {
        Self {
            user: value.user,
            forum: value.forum,
            thread: value.thread,
            post: value.post,
        }
    }
}
