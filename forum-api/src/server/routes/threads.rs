use crate::{
    server::{
        Result, ServerError, ServerRouter,
        extract::{Json, Query},
    },
    service::{posts::PostService, threads::ThreadService, votes::VoteService},
};
use axum::{extract::State, http::StatusCode};
use axum_extra::routing::{RouterExt, TypedPath};
use forum_common::model::{
    post::{CreatePost, Post, PostListing},
    thread::{Thread, ThreadAddress, ThreadUpdate},
    vote::Vote,
};
use serde::Deserialize;
use std::sync::Arc;

pub fn routes() -> ServerRouter {
    ServerRouter::new()
        .typed_get(get_thread)
        .typed_post(update_thread)
        .typed_post(create_posts)
        .typed_get(get_thread_posts)
        .typed_post(vote)
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/thread/{slug_or_id}/details", rejection(ServerError))]
struct ThreadPath {
    slug_or_id: ThreadAddress,
}

async fn get_thread(
    ThreadPath { slug_or_id }: ThreadPath,
    State(threads): State<Arc<ThreadService>>,
) -> Result<Json<Thread>> {
    Ok(Json(threads.details(&slug_or_id).await?))
}

async fn update_thread(
    ThreadPath { slug_or_id }: ThreadPath,
    State(threads): State<Arc<ThreadService>>,
    Json(update): Json<ThreadUpdate>,
) -> Result<Json<Thread>> {
    Ok(Json(threads.update(&slug_or_id, &update).await?))
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/thread/{slug_or_id}/create", rejection(ServerError))]
struct CreatePostsPath {
    slug_or_id: ThreadAddress,
}

async fn create_posts(
    CreatePostsPath { slug_or_id }: CreatePostsPath,
    State(posts): State<Arc<PostService>>,
    Json(batch): Json<Vec<CreatePost>>,
) -> Result<(StatusCode, Json<Vec<Post>>)> {
    let posts = posts.create(&slug_or_id, batch).await?;

    Ok((StatusCode::CREATED, Json(posts)))
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/thread/{slug_or_id}/posts", rejection(ServerError))]
struct ThreadPostsPath {
    slug_or_id: ThreadAddress,
}

async fn get_thread_posts(
    ThreadPostsPath { slug_or_id }: ThreadPostsPath,
    State(posts): State<Arc<PostService>>,
    Query(listing): Query<PostListing>,
) -> Result<Json<Vec<Post>>> {
    Ok(Json(posts.list(&slug_or_id, &listing).await?))
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/thread/{slug_or_id}/vote", rejection(ServerError))]
struct VotePath {
    slug_or_id: ThreadAddress,
}

async fn vote(
    VotePath { slug_or_id }: VotePath,
    State(votes): State<Arc<VoteService>>,
    Json(vote): Json<Vote>,
) -> Result<Json<Thread>> {
    Ok(Json(votes.vote(&slug_or_id, &vote).await?))
}
