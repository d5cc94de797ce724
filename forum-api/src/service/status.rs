use crate::service::Result;
use forum_common::model::status::Status;
use forum_db::store::ServiceStore;
use std::sync::Arc;
use tracing::info;

pub struct StatusService {
    store: Arc<dyn ServiceStore>,
}

impl StatusService {
    pub fn new(store: Arc<dyn ServiceStore>) -> Self {
        Self { store }
    }

    pub async fn status(&self) -> Result<Status> {
        Ok(self.store.status().await?)
    }

    /// Deletes every user, forum, thread, post and vote.
    pub async fn clear(&self) -> Result<()> {
        self.store.clear().await?;
        info!("Cleared all data");
        Ok(())
    }
}
