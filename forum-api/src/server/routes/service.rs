use crate::{
    server::{Result, ServerError, ServerRouter, extract::Json},
    service::status::StatusService,
};
use axum::extract::State;
use axum_extra::routing::{RouterExt, TypedPath};
use forum_common::model::status::Status;
use serde::Deserialize;
use std::sync::Arc;

pub fn routes() -> ServerRouter {
    ServerRouter::new()
        .typed_get(get_status)
        .typed_post(clear)
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/service/status", rejection(ServerError))]
struct StatusPath();

async fn get_status(
    StatusPath(): StatusPath,
    State(service): State<Arc<StatusService>>,
) -> Result<Json<Status>> {
    Ok(Json(service.status().await?))
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/service/clear", rejection(ServerError))]
struct ClearPath();

/// Answers with a JSON `null`.
async fn clear(
    ClearPath(): ClearPath,
    State(service): State<Arc<StatusService>>,
) -> Result<Json<()>> {
    service.clear().await?;

    Ok(Json(()))
}
