use crate::service::{Result, ServiceError};
use forum_common::model::thread::{ThreadAddress, ThreadRef};
use forum_db::store::ThreadLookup;
use std::sync::Arc;
use tracing::debug;

/// Turns a slug-or-id token into the thread it names.
///
/// Shared by every operation that addresses a thread, so a miss is always reported the same way.
#[derive(Clone)]
pub struct ThreadResolver {
    lookup: Arc<dyn ThreadLookup>,
}

impl ThreadResolver {
    pub fn new(lookup: Arc<dyn ThreadLookup>) -> Self {
        Self { lookup }
    }

    pub async fn resolve(&self, address: &ThreadAddress) -> Result<ThreadRef> {
        let thread = self
            .lookup
            .lookup_thread(address)
            .await?
            .ok_or_else(|| ServiceError::ThreadNotFound(address.clone()))?;

        debug!(%address, id = %thread.id, forum = %thread.forum, "Resolved thread");
        Ok(thread)
    }
}
