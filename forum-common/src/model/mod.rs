pub mod forum;
pub mod post;
pub mod status;
pub mod thread;
pub mod user;
pub mod vote;

use crate::model::thread::InvalidThreadSlugError;
use derive_where::derive_where;
use serde::{Deserialize, Serialize};
use std::{fmt::Display, marker::PhantomData, num::ParseIntError, str::FromStr};
use thiserror::Error;
use time::OffsetDateTime;

#[derive(Clone, Eq, PartialEq, Debug, Hash, Error)]
pub enum ModelValidationError {
    #[error(transparent)]
    ThreadSlug(#[from] InvalidThreadSlugError),
}

/// Numeric identity assigned by the store, tagged with the entity it belongs to.
#[derive_where(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash)]
#[derive(Serialize, Deserialize)]
#[serde(transparent)]
pub struct Id<Marker>(i64, #[serde(skip)] PhantomData<Marker>);

impl<Marker> Id<Marker> {
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id, PhantomData)
    }

    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl<Marker> Display for Id<Marker> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl<Marker> FromStr for Id<Marker> {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        i64::from_str(s).map(Self::new)
    }
}

impl<Marker> From<i64> for Id<Marker> {
    fn from(value: i64) -> Self {
        Id::new(value)
    }
}

impl<Marker> From<Id<Marker>> for i64 {
    fn from(value: Id<Marker>) -> Self {
        value.get()
    }
}

/// An RFC 3339 timestamp, as used in query strings.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rfc3339(#[serde(with = "time::serde::rfc3339")] pub OffsetDateTime);

/// Cursor pagination shared by the listing endpoints.
///
/// A `limit` of zero is treated the same as an absent one.
#[derive_where(Default)]
#[derive(Clone, Eq, PartialEq, Debug, Hash, Deserialize)]
pub struct Page<Since> {
    #[serde(default)]
    pub limit: Option<u64>,
    pub since: Option<Since>,
    #[serde(default)]
    pub desc: bool,
}

impl<Since> Page<Since> {
    #[must_use]
    pub fn limit(&self) -> Option<u64> {
        self.limit.filter(|&limit| limit > 0)
    }
}
