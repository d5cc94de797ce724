use crate::service::{
    Creation, ErrorKind, ServiceError, forums::ForumService, posts::PostService,
    resolver::ThreadResolver, status::StatusService, threads::ThreadService, users::UserService,
    votes::VoteService,
};
use axum::{
    Router,
    extract::{
        FromRef, Request,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use extract::Json;
use forum_db::store::{
    ForumStore, PostStore, ServiceStore, ThreadLookup, ThreadStore, UserStore, VoteStore,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error};

mod extract;
mod routes;


pub type ServerRouter = Router<ServerState>;

#[derive(Clone, FromRef)]
pub struct ServerState {
    pub users: Arc<UserService>,
    pub forums: Arc<ForumService>,
    pub threads: Arc<ThreadService>,
    pub posts: Arc<PostService>,
    pub votes: Arc<VoteService>,
    pub status: Arc<StatusService>,
}

impl ServerState {
    /// Wires every service to one store implementing all repository traits.
    pub fn new<S>(store: Arc<S>) -> Self
    where
        S: UserStore
            + ForumStore
            + ThreadStore
            + ThreadLookup
            + PostStore
            + VoteStore
            + ServiceStore
            + 'static,
    {
        let resolver = ThreadResolver::new(store.clone());

        Self {
            users: Arc::new(UserService::new(store.clone())),
            forums: Arc::new(ForumService::new(store.clone(), store.clone())),
            threads: Arc::new(ThreadService::new(
                store.clone(),
                store.clone(),
                store.clone(),
                resolver.clone(),
            )),
            posts: Arc::new(PostService::new(
                store.clone(),
                store.clone(),
                store.clone(),
                store.clone(),
                resolver.clone(),
            )),
            votes: Arc::new(VoteService::new(store.clone(), store.clone(), resolver)),
            status: Arc::new(StatusService::new(store)),
        }
    }
}

/// Every route lives under `/api`.
pub fn routes() -> ServerRouter {
    Router::new()
        .nest("/api", routes::routes())
        .method_not_allowed_fallback(method_not_allowed)
        .fallback(fallback)
}

pub async fn fallback(request: Request) -> ServerError {
    ServerError::UnknownRoute(request.into_parts().0.uri)
}

pub async fn method_not_allowed(method: Method, uri: Uri) -> ServerError {
    ServerError::MethodNotAllowed(method, uri)
}

pub type Result<T, E = ServerError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Unknown route requested: {0}")]
    UnknownRoute(Uri),
    #[error("Method {0} is not allowed on {1}")]
    MethodNotAllowed(Method, Uri),
    #[error("Path rejected: {0}")]
    PathRejection(#[from] PathRejection),
    #[error("Incoming JSON rejected: {0}")]
    JsonRejection(#[from] JsonRejection),
    #[error("Query string rejected: {0}")]
    QueryRejection(#[from] QueryRejection),
    #[error("JSON response could not be serialized: {0}")]
    JsonResponse(#[from] serde_json::Error),
    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::UnknownRoute(_) | ServerError::PathRejection(_) => StatusCode::NOT_FOUND,
            ServerError::MethodNotAllowed(..) => StatusCode::METHOD_NOT_ALLOWED,
            ServerError::JsonRejection(_) | ServerError::QueryRejection(_) => {
                StatusCode::BAD_REQUEST
            }
            ServerError::JsonResponse(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ServerError::Service(err) => match err.kind() {
                ErrorKind::NotFound => StatusCode::NOT_FOUND,
                ErrorKind::Conflict => StatusCode::CONFLICT,
                ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash, Serialize, Deserialize)]
struct ErrorResponse {
    status: u16,
    message: String,
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            error!(error = %self, %status, "Replying with error");
        } else {
            debug!(error = %self, %status, "Replying with error");
        }

        let error_response = ErrorResponse {
            status: status.as_u16(),
            message: self.to_string(),
        };
        (status, Json(error_response)).into_response()
    }
}

/// `201 Created` with the new entity, or `409 Conflict` with what already exists.
impl<T: Serialize, E: Serialize> IntoResponse for Creation<T, E> {
    fn into_response(self) -> Response {
        match self {
            Creation::Created(created) => (StatusCode::CREATED, Json(created)).into_response(),
            Creation::Conflict(existing) => (StatusCode::CONFLICT, Json(existing)).into_response(),
        }
    }
}
