pub mod client;
pub mod store;

mod listing;
mod record;

pub use client::{DbClient, DbError};
