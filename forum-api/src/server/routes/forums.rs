use crate::{
    server::{
        Result, ServerError, ServerRouter,
        extract::{Json, Query},
    },
    service::{Creation, forums::ForumService, threads::ThreadService},
};
use axum::extract::State;
use axum_extra::routing::{RouterExt, TypedPath};
use forum_common::model::{
    forum::{CreateForum, Forum},
    thread::{CreateThread, Thread, ThreadListing},
    user::User,
};
use forum_db::store::UserListing;
use serde::Deserialize;
use std::sync::Arc;

pub fn routes() -> ServerRouter {
    ServerRouter::new()
        .typed_post(create_forum)
        .typed_get(get_forum)
        .typed_get(get_forum_users)
        .typed_post(create_thread)
        .typed_get(get_forum_threads)
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/forum/create", rejection(ServerError))]
struct CreateForumPath();

async fn create_forum(
    CreateForumPath(): CreateForumPath,
    State(forums): State<Arc<ForumService>>,
    Json(forum): Json<CreateForum>,
) -> Result<Creation<Forum>> {
    Ok(forums.create(forum).await?)
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/forum/{slug}/details", rejection(ServerError))]
struct ForumPath {
    slug: String,
}

async fn get_forum(
    ForumPath { slug }: ForumPath,
    State(forums): State<Arc<ForumService>>,
) -> Result<Json<Forum>> {
    Ok(Json(forums.details(&slug).await?))
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/forum/{slug}/users", rejection(ServerError))]
struct ForumUsersPath {
    slug: String,
}

async fn get_forum_users(
    ForumUsersPath { slug }: ForumUsersPath,
    State(forums): State<Arc<ForumService>>,
    Query(listing): Query<UserListing>,
) -> Result<Json<Vec<User>>> {
    Ok(Json(forums.members(&slug, &listing).await?))
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/forum/{slug}/create", rejection(ServerError))]
struct CreateThreadPath {
    slug: String,
}

async fn create_thread(
    CreateThreadPath { slug }: CreateThreadPath,
    State(threads): State<Arc<ThreadService>>,
    Json(thread): Json<CreateThread>,
) -> Result<Creation<Thread>> {
    Ok(threads.create(&slug, thread).await?)
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/forum/{slug}/threads", rejection(ServerError))]
struct ForumThreadsPath {
    slug: String,
}

async fn get_forum_threads(
    ForumThreadsPath { slug }: ForumThreadsPath,
    State(threads): State<Arc<ThreadService>>,
    Query(listing): Query<ThreadListing>,
) -> Result<Json<Vec<Thread>>> {
    Ok(Json(threads.list(&slug, &listing).await?))
}
