use crate::{
    client::{DbClient, Result},
    record::{UserRecord, user_columns},
    store::UserStore,
};
use async_trait::async_trait;
use forum_common::model::user::{User, UserUpdate};
use sqlx::query_as;

#[async_trait]
impl UserStore for DbClient {
    async fn create_user(&self, user: &User) -> Result<User> {
        let mut tx = self.pool.begin().await?;

        let record: UserRecord = query_as(concat!(
            "
            INSERT INTO users (nickname, fullname, about, email)
            VALUES ($1, $2, $3, $4)
            RETURNING ",
            user_columns!()
        ))
        .bind(&user.nickname)
        .bind(&user.fullname)
        .bind(&user.about)
        .bind(&user.email)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(record.into())
    }

    async fn fetch_user(&self, nickname: &str) -> Result<Option<User>> {
        let record: Option<UserRecord> = query_as(concat!(
            "SELECT ",
            user_columns!(),
            " FROM users WHERE nickname = $1::citext"
        ))
        .bind(nickname)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record.map(User::from))
    }

    async fn fetch_users_by_nickname_or_email(
        &self,
        nickname: &str,
        email: &str,
    ) -> Result<Vec<User>> {
        let records: Vec<UserRecord> = query_as(concat!(
            "SELECT ",
            user_columns!(),
            " FROM users WHERE nickname = $1::citext OR email = $2::citext ORDER BY nickname"
        ))
        .bind(nickname)
        .bind(email)
        .fetch_all(&self.pool)
        .await?;

        Ok(records.into_iter().map(User::from).collect())
    }

    async fn update_user(&self, nickname: &str, update: &UserUpdate) -> Result<Option<User>> {
        let mut tx = self.pool.begin().await?;

        let record: Option<UserRecord> = query_as(concat!(
            "
            UPDATE users SET
                fullname = COALESCE($2, fullname),
                about = COALESCE($3, about),
                email = COALESCE($4::citext, email)
            WHERE nickname = $1::citext
            RETURNING ",
            user_columns!()
        ))
        .bind(nickname)
        .bind(&update.fullname)
        .bind(&update.about)
        .bind(&update.email)
        .fetch_optional(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(record.map(User::from))
    }
}
