use crate::service::{Result, ServiceError, resolver::ThreadResolver};
use forum_common::model::{
    thread::{Thread, ThreadAddress},
    vote::Vote,
};
use forum_db::store::{ThreadStore, VoteStore};
use std::sync::Arc;
use tracing::debug;

pub struct VoteService {
    votes: Arc<dyn VoteStore>,
    threads: Arc<dyn ThreadStore>,
    resolver: ThreadResolver,
}

impl VoteService {
    pub fn new(
        votes: Arc<dyn VoteStore>,
        threads: Arc<dyn ThreadStore>,
        resolver: ThreadResolver,
    ) -> Self {
        Self {
            votes,
            threads,
            resolver,
        }
    }

    /// Records the vote and returns the thread with its updated tally.
    pub async fn vote(&self, address: &ThreadAddress, vote: &Vote) -> Result<Thread> {
        let thread = self.resolver.resolve(address).await?;

        self.votes
            .upsert_vote(thread.id, vote)
            .await
            .map_err(ServiceError::VoteRejected)?;
        debug!(thread = %thread.id, nickname = %vote.nickname, voice = vote.voice, "Recorded vote");

        self.threads
            .fetch_thread(thread.id)
            .await?
            .ok_or_else(|| ServiceError::ThreadNotFound(address.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{service::ErrorKind, testing::MemoryStore};

    fn service(store: &Arc<MemoryStore>) -> VoteService {
        VoteService::new(
            store.clone(),
            store.clone(),
            ThreadResolver::new(store.clone()),
        )
    }

    fn vote(nickname: &str, voice: i32) -> Vote {
        Vote {
            nickname: nickname.to_owned(),
            voice,
        }
    }

    #[tokio::test]
    async fn revote_replaces_the_previous_voice() {
        let store = MemoryStore::seeded();
        let votes = service(&store);
        let t1: ThreadAddress = "t1".parse().unwrap();

        assert_eq!(votes.vote(&t1, &vote("alice", 1)).await.unwrap().votes, 1);
        assert_eq!(votes.vote(&t1, &vote("ALICE", -1)).await.unwrap().votes, -1);
        let by_id = votes
            .vote(&"1".parse().unwrap(), &vote("alice", -1))
            .await
            .unwrap();
        assert_eq!(by_id.votes, -1);
    }

    #[tokio::test]
    async fn unknown_voter_is_reported_as_missing() {
        let store = MemoryStore::seeded();
        let votes = service(&store);

        let err = votes
            .vote(&"t1".parse().unwrap(), &vote("nobody", 1))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::VoteRejected(_)), "{err}");
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
