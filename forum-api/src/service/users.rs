use crate::service::{Creation, Result, ServiceError};
use forum_common::model::user::{CreateUser, User, UserUpdate};
use forum_db::{DbError, store::UserStore};
use std::sync::Arc;
use tracing::debug;

pub struct UserService {
    users: Arc<dyn UserStore>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    /// On a nickname or email clash, answers with every user holding either of them.
    pub async fn create(
        &self,
        nickname: String,
        profile: CreateUser,
    ) -> Result<Creation<User, Vec<User>>> {
        let user = profile.into_user(nickname);

        match self.users.create_user(&user).await {
            Ok(user) => Ok(Creation::Created(user)),
            Err(DbError::UniqueViolation(constraint)) => {
                debug!(nickname = %user.nickname, %constraint, "User already exists");
                let existing = self
                    .users
                    .fetch_users_by_nickname_or_email(&user.nickname, &user.email)
                    .await?;
                Ok(Creation::Conflict(existing))
            }
            Err(err) => Err(err.into()),
        }
    }

    pub async fn profile(&self, nickname: &str) -> Result<User> {
        self.users
            .fetch_user(nickname)
            .await?
            .ok_or_else(|| ServiceError::UserNotFound(nickname.to_owned()))
    }

    pub async fn update(&self, nickname: &str, update: &UserUpdate) -> Result<User> {
        if update.is_empty() {
            return self.profile(nickname).await;
        }

        match self.users.update_user(nickname, update).await {
            Ok(Some(user)) => Ok(user),
            Ok(None) => Err(ServiceError::UserNotFound(nickname.to_owned())),
            Err(DbError::UniqueViolation(_)) => Err(ServiceError::EmailTaken(
                update.email.clone().unwrap_or_default(),
            )),
            Err(err) => Err(err.into()),
        }
    }
}
