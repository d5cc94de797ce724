//! Business rules above the stores: defaults, address resolution, parent checks and conflict
//! disambiguation.

use forum_common::model::{Id, post::PostMarker, thread::ThreadAddress};
use forum_db::DbError;
use thiserror::Error;

pub mod forums;
pub mod posts;
pub mod resolver;
pub mod status;
pub mod threads;
pub mod users;
pub mod votes;

pub type Result<T, E = ServiceError> = std::result::Result<T, E>;

/// Coarse classification of a [`ServiceError`], used to pick a response status.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub enum ErrorKind {
    NotFound,
    Conflict,
    Internal,
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Can't find thread by slug or id: {0}")]
    ThreadNotFound(ThreadAddress),
    #[error("Can't find user with nickname {0}")]
    UserNotFound(String),
    #[error("Can't find forum with slug {0}")]
    ForumNotFound(String),
    #[error("Can't find post with id {0}")]
    PostNotFound(Id<PostMarker>),
    #[error("A post author does not exist")]
    PostAuthorNotFound,
    #[error("A parent post was not created in forum {forum}")]
    MissingParents { forum: String },
    #[error("The post batch was rejected: {0}")]
    PostConflict(DbError),
    #[error("Email {0} is already registered by another user")]
    EmailTaken(String),
    #[error("The vote could not be recorded: {0}")]
    VoteRejected(DbError),
    #[error(transparent)]
    Database(#[from] DbError),
}

impl ServiceError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::ThreadNotFound(_)
            | ServiceError::UserNotFound(_)
            | ServiceError::ForumNotFound(_)
            | ServiceError::PostNotFound(_)
            | ServiceError::PostAuthorNotFound
            | ServiceError::VoteRejected(_) => ErrorKind::NotFound,
            ServiceError::MissingParents { .. }
            | ServiceError::PostConflict(_)
            | ServiceError::EmailTaken(_) => ErrorKind::Conflict,
            ServiceError::Database(_) => ErrorKind::Internal,
        }
    }
}

/// Outcome of a create operation whose conflicts are answered with the existing data.
#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub enum Creation<T, E = T> {
    Created(T),
    Conflict(E),
}
