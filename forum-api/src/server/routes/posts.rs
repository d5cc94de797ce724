use crate::{
    server::{
        Result, ServerError, ServerRouter,
        extract::{Json, Query},
    },
    service::posts::PostService,
};
use axum::extract::State;
use axum_extra::routing::{RouterExt, TypedPath};
use forum_common::model::{
    Id,
    post::{Post, PostDetails, PostMarker, PostUpdate, Related},
};
use serde::Deserialize;
use std::sync::Arc;

pub fn routes() -> ServerRouter {
    ServerRouter::new()
        .typed_get(get_post)
        .typed_post(update_post)
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/post/{id}/details", rejection(ServerError))]
struct PostPath {
    id: Id<PostMarker>,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, Default, Hash, Deserialize)]
struct DetailsQuery {
    #[serde(default)]
    related: Related,
}

async fn get_post(
    PostPath { id }: PostPath,
    State(posts): State<Arc<PostService>>,
    Query(DetailsQuery { related }): Query<DetailsQuery>,
) -> Result<Json<PostDetails>> {
    Ok(Json(posts.details(id, related).await?))
}

async fn update_post(
    PostPath { id }: PostPath,
    State(posts): State<Arc<PostService>>,
    Json(update): Json<PostUpdate>,
) -> Result<Json<Post>> {
    Ok(Json(posts.update(id, &update).await?))
}
