use crate::server::ServerRouter;
use axum::Router;

mod forums;
mod posts;
mod service;
mod threads;
mod users;

pub fn routes() -> ServerRouter {
    Router::new()
        .merge(forums::routes())
        .merge(posts::routes())
        .merge(service::routes())
        .merge(threads::routes())
        .merge(users::routes())
}
