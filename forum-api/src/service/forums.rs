use crate::service::{Creation, Result, ServiceError};
use forum_common::model::{
    forum::{CreateForum, Forum},
    user::User,
};
use forum_db::{
    DbError,
    store::{ForumStore, UserListing, UserStore},
};
use std::sync::Arc;
use tracing::debug;

pub struct ForumService {
    forums: Arc<dyn ForumStore>,
    users: Arc<dyn UserStore>,
}

impl ForumService {
    pub fn new(forums: Arc<dyn ForumStore>, users: Arc<dyn UserStore>) -> Self {
        Self { forums, users }
    }

    pub async fn create(&self, forum: CreateForum) -> Result<Creation<Forum>> {
        let owner = self
            .users
            .fetch_user(&forum.user)
            .await?
            .ok_or_else(|| ServiceError::UserNotFound(forum.user.clone()))?;
        let forum = CreateForum {
            user: owner.nickname,
            ..forum
        };

        match self.forums.create_forum(&forum).await {
            Ok(forum) => Ok(Creation::Created(forum)),
            Err(DbError::UniqueViolation(_)) => {
                debug!(slug = %forum.slug, "Forum already exists");
                self.details(&forum.slug).await.map(Creation::Conflict)
            }
            Err(DbError::ForeignKeyViolation(_)) => Err(ServiceError::UserNotFound(forum.user)),
            Err(err) => Err(err.into()),
        }
    }

    pub async fn details(&self, slug: &str) -> Result<Forum> {
        self.forums
            .fetch_forum(slug)
            .await?
            .ok_or_else(|| ServiceError::ForumNotFound(slug.to_owned()))
    }

    /// Users who started a thread or wrote a post in the forum.
    pub async fn members(&self, slug: &str, listing: &UserListing) -> Result<Vec<User>> {
        let forum = self.details(slug).await?;
        Ok(self.forums.list_forum_users(&forum.slug, listing).await?)
    }
}
