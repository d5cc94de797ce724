use crate::{
    server::{Result, ServerError, ServerRouter, extract::Json},
    service::{Creation, users::UserService},
};
use axum::extract::State;
use axum_extra::routing::{RouterExt, TypedPath};
use forum_common::model::user::{CreateUser, User, UserUpdate};
use serde::Deserialize;
use std::sync::Arc;

pub fn routes() -> ServerRouter {
    ServerRouter::new()
        .typed_post(create_user)
        .typed_get(get_profile)
        .typed_post(update_profile)
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/user/{nickname}/create", rejection(ServerError))]
struct CreateUserPath {
    nickname: String,
}

async fn create_user(
    CreateUserPath { nickname }: CreateUserPath,
    State(users): State<Arc<UserService>>,
    Json(profile): Json<CreateUser>,
) -> Result<Creation<User, Vec<User>>> {
    Ok(users.create(nickname, profile).await?)
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/user/{nickname}/profile", rejection(ServerError))]
struct ProfilePath {
    nickname: String,
}

async fn get_profile(
    ProfilePath { nickname }: ProfilePath,
    State(users): State<Arc<UserService>>,
) -> Result<Json<User>> {
    Ok(Json(users.profile(&nickname).await?))
}

async fn update_profile(
    ProfilePath { nickname }: ProfilePath,
    State(users): State<Arc<UserService>>,
    Json(update): Json<UserUpdate>,
) -> Result<Json<User>> {
    Ok(Json(users.update(&nickname, &update).await?))
}
