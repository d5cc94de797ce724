use crate::model::{Id, Page, Rfc3339};
use serde::{
    Deserialize, Deserializer, Serialize,
    de::{Error, Unexpected},
};
use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};
use thiserror::Error;
use time::OffsetDateTime;

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash)]
pub struct ThreadMarker;

#[derive(Clone, Eq, PartialEq, Debug, Hash, Deserialize, Serialize)]
pub struct Thread {
    pub id: Id<ThreadMarker>,
    pub title: String,
    pub author: String,
    pub forum: String,
    pub message: String,
    pub votes: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<ThreadSlug>,
    #[serde(with = "time::serde::rfc3339")]
    pub created: OffsetDateTime,
}

/// Thread payload; the owning forum comes from the request path.
#[derive(Clone, Eq, PartialEq, Debug, Hash, Deserialize, Serialize)]
pub struct CreateThread {
    pub title: String,
    pub author: String,
    pub message: String,
    #[serde(default)]
    pub slug: Option<ThreadSlug>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub created: Option<OffsetDateTime>,
}

#[derive(Clone, Eq, PartialEq, Debug, Default, Hash, Deserialize, Serialize)]
pub struct ThreadUpdate {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Threads of a forum, paginated by creation time. `since` is inclusive.
pub type ThreadListing = Page<Rfc3339>;

/// The minimum needed to attach posts or votes to a thread.
#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub struct ThreadRef {
    pub id: Id<ThreadMarker>,
    pub forum: String,
}

/// Human readable alternate key of a thread.
///
/// A slug never parses as an integer, so it can't be confused with a thread id when a
/// [`ThreadAddress`] is parsed.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash, Serialize)]
#[serde(transparent)]
pub struct ThreadSlug(String);

#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash, Error)]
#[error("The thread slug is invalid: {0:?}")]
pub struct InvalidThreadSlugError(String);

impl ThreadSlug {
    pub fn new(slug: String) -> Result<Self, InvalidThreadSlugError> {
        if slug.is_empty() || slug.parse::<i64>().is_ok() {
            Err(InvalidThreadSlugError(slug))
        } else {
            Ok(Self(slug))
        }
    }

    #[must_use]
    pub fn get(&self) -> &str {
        &self.0
    }
}

impl Display for ThreadSlug {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ThreadSlug {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let inner = String::deserialize(deserializer)?;
        ThreadSlug::new(inner)
            .map_err(|err| Error::invalid_value(Unexpected::Str(&err.0), &"a thread slug"))
    }
}

/// A caller supplied reference to a thread: either its numeric id or its slug.
#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub enum ThreadAddress {
    Id(Id<ThreadMarker>),
    Slug(ThreadSlug),
}

impl FromStr for ThreadAddress {
    type Err = InvalidThreadSlugError;

    /// Integers are ids; anything else is looked up as a slug.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.parse() {
            Ok(id) => Ok(Self::Id(id)),
            Err(_) => ThreadSlug::new(s.to_owned()).map(Self::Slug),
        }
    }
}

impl From<ThreadSlug> for ThreadAddress {
    fn from(value: ThreadSlug) -> Self {
        Self::Slug(value)
    }
}

impl Display for ThreadAddress {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ThreadAddress::Id(id) => Display::fmt(id, f),
            ThreadAddress::Slug(slug) => Display::fmt(slug, f),
        }
    }
}

impl<'de> Deserialize<'de> for ThreadAddress {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let inner = String::deserialize(deserializer)?;
        inner
            .parse()
            .map_err(|_| Error::invalid_value(Unexpected::Str(&inner), &"a thread id or slug"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_address_threads_by_id() {
        assert_eq!(
            "42".parse::<ThreadAddress>().unwrap(),
            ThreadAddress::Id(Id::new(42))
        );
        assert_eq!(
            "-7".parse::<ThreadAddress>().unwrap(),
            ThreadAddress::Id(Id::new(-7))
        );
    }

    #[test]
    fn everything_else_is_a_slug() {
        for token in ["t1", "42abc", "my-thread_9", "4 2"] {
            let address: ThreadAddress = token.parse().unwrap();
            assert_eq!(
                address,
                ThreadAddress::Slug(ThreadSlug::new(token.to_owned()).unwrap())
            );
            assert_eq!(address.to_string(), token);
        }
    }

    #[test]
    fn empty_address_is_rejected() {
        assert!("".parse::<ThreadAddress>().is_err());
    }

    #[test]
    fn numeric_slugs_are_rejected() {
        assert!(ThreadSlug::new("123".to_owned()).is_err());
        assert!(serde_json::from_str::<ThreadSlug>("\"123\"").is_err());
        assert!(serde_json::from_str::<ThreadSlug>("\"abc\"").is_ok());
    }

    #[test]
    fn absent_slug_is_omitted_from_json() {
        let thread = Thread {
            id: Id::new(1),
            title: "title".to_owned(),
            author: "author".to_owned(),
            forum: "forum".to_owned(),
            message: "message".to_owned(),
            votes: 0,
            slug: None,
            created: time::macros::datetime!(2024-01-01 00:00 UTC),
        };

        let json = serde_json::to_value(&thread).unwrap();
        assert!(json.get("slug").is_none());
        assert_eq!(json["created"], "2024-01-01T00:00:00Z");
    }
}
