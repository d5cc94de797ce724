use crate::model::{
    Id,
    forum::Forum,
    thread::{Thread, ThreadMarker},
    user::User,
};
use serde::{
    Deserialize, Deserializer, Serialize,
    de::{Error as _, Unexpected},
};
use std::str::FromStr;
use thiserror::Error;
use time::OffsetDateTime;

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash)]
pub struct PostMarker;

/// Parent reference of a post that starts a new branch of discussion.
pub const ROOT_PARENT: Id<PostMarker> = Id::new(0);

#[derive(Clone, Eq, PartialEq, Debug, Hash, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: Id<PostMarker>,
    pub parent: Id<PostMarker>,
    pub author: String,
    pub message: String,
    pub is_edited: bool,
    pub forum: String,
    pub thread: Id<ThreadMarker>,
    #[serde(with = "time::serde::rfc3339")]
    pub created: OffsetDateTime,
}

/// One member of a post batch as submitted by a client.
///
/// Thread and forum are always taken from the addressed thread.
#[derive(Clone, Eq, PartialEq, Debug, Hash, Deserialize, Serialize)]
pub struct CreatePost {
    #[serde(default)]
    pub id: Option<Id<PostMarker>>,
    #[serde(default)]
    pub parent: Id<PostMarker>,
    pub author: String,
    pub message: String,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub created: Option<OffsetDateTime>,
}

/// A post ready to be written, with its thread context resolved.
#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub struct NewPost {
    pub parent: Id<PostMarker>,
    pub author: String,
    pub message: String,
    pub forum: String,
    pub thread: Id<ThreadMarker>,
    pub created: OffsetDateTime,
}

#[derive(Clone, Eq, PartialEq, Debug, Default, Hash, Deserialize, Serialize)]
pub struct PostUpdate {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PostSort {
    /// By creation time, then id.
    #[default]
    Flat,
    /// Depth first, by ancestry path.
    Tree,
    /// Like `Tree`, but paginated by root post.
    ParentTree,
}

/// Query of the posts in a thread.
///
/// For [`PostSort::ParentTree`] the `limit` counts root posts, not posts.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default, Hash, Deserialize)]
pub struct PostListing {
    #[serde(default)]
    pub limit: Option<u64>,
    #[serde(default)]
    pub since: Option<Id<PostMarker>>,
    #[serde(default)]
    pub sort: PostSort,
    #[serde(default)]
    pub desc: bool,
}

impl PostListing {
    #[must_use]
    pub fn limit(&self) -> Option<u64> {
        self.limit.filter(|&limit| limit > 0)
    }

    /// The cursor post. Ids start at one, so zero or less means no cursor.
    #[must_use]
    pub fn since(&self) -> Option<Id<PostMarker>> {
        self.since.filter(|since| since.get() > 0)
    }
}

/// Which related entities to include alongside a post.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default, Hash)]
pub struct Related {
    pub user: bool,
    pub thread: bool,
    pub forum: bool,
}

#[derive(Clone, Eq, PartialEq, Debug, Default, Hash, Error)]
#[error("Unknown related entity: {0:?}")]
pub struct UnknownRelatedError(String);

impl FromStr for Related {
    type Err = UnknownRelatedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut related = Related::default();

        for part in s.split(',').filter(|part| !part.is_empty()) {
            match part {
                "user" => related.user = true,
                "thread" => related.thread = true,
                "forum" => related.forum = true,
                _ => return Err(UnknownRelatedError(part.to_owned())),
            }
        }

        Ok(related)
    }
}

impl<'de> Deserialize<'de> for Related {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let inner = String::deserialize(deserializer)?;
        inner.parse().map_err(|_| {
            D::Error::invalid_value(Unexpected::Str(&inner), &"a list of user, thread, forum")
        })
    }
}

#[derive(Clone, Eq, PartialEq, Debug, Hash, Deserialize, Serialize)]
pub struct PostDetails {
    pub post: Post,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<User>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread: Option<Thread>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forum: Option<Forum>,
}
