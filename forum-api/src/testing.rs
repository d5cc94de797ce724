//! In-memory stand-in for the Postgres stores.
//!
//! Keys compare case-insensitively and failures carry the constraint names the schema uses, so
//! services see the same errors they would get from [`forum_db::DbClient`].

use crate::service::posts::POST_AUTHOR_CONSTRAINT;
use async_trait::async_trait;
use forum_common::model::{
    Id,
    forum::{CreateForum, Forum},
    post::{NewPost, Post, PostListing, PostMarker, PostSort, PostUpdate},
    status::Status,
    thread::{
        CreateThread, Thread, ThreadAddress, ThreadListing, ThreadMarker, ThreadRef, ThreadSlug,
        ThreadUpdate,
    },
    user::{User, UserUpdate},
    vote::Vote,
};
use forum_db::{
    DbError,
    client::Result,
    store::{
        ForumStore, PostStore, ServiceStore, ThreadLookup, ThreadStore, UserListing, UserStore,
        VoteStore,
    },
};
use std::{
    cmp::Ordering,
    collections::BTreeSet,
    sync::{Arc, Mutex, MutexGuard},
};
use time::{OffsetDateTime, macros::datetime};

fn same(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

fn fold(value: &str) -> String {
    value.to_lowercase()
}

#[derive(Clone, Debug)]
struct StoredPost {
    post: Post,
    path: Vec<i64>,
}

impl StoredPost {
    fn key(&self) -> Vec<i64> {
        let mut key = self.path.clone();
        key.push(self.post.id.get());
        key
    }

    fn root(&self) -> i64 {
        self.path.first().copied().unwrap_or(self.post.id.get())
    }
}

#[derive(Clone, Debug, Default)]
struct State {
    users: Vec<User>,
    forums: Vec<Forum>,
    threads: Vec<Thread>,
    posts: Vec<StoredPost>,
    votes: Vec<(String, Id<ThreadMarker>, i32)>,
    members: BTreeSet<(String, String)>,
}

impl State {
    fn user(&self, nickname: &str) -> Option<&User> {
        self.users.iter().find(|user| same(&user.nickname, nickname))
    }

    fn forum(&self, slug: &str) -> Option<&Forum> {
        self.forums.iter().find(|forum| same(&forum.slug, slug))
    }

    fn forum_mut(&mut self, slug: &str) -> Option<&mut Forum> {
        self.forums.iter_mut().find(|forum| same(&forum.slug, slug))
    }

    fn thread(&self, id: Id<ThreadMarker>) -> Option<&Thread> {
        self.threads.iter().find(|thread| thread.id == id)
    }

    fn thread_mut(&mut self, id: Id<ThreadMarker>) -> Option<&mut Thread> {
        self.threads.iter_mut().find(|thread| thread.id == id)
    }

    fn post(&self, id: Id<PostMarker>) -> Option<&StoredPost> {
        self.posts.iter().find(|stored| stored.post.id == id)
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    /// User `alice`, forum `rust` owned by her, and her thread 1 with slug `t1`.
    pub fn seeded() -> Arc<Self> {
        let state = State {
            users: vec![User {
                nickname: "alice".to_owned(),
                fullname: "Alice".to_owned(),
                about: String::new(),
                email: "alice@example.com".to_owned(),
            }],
            forums: vec![Forum {
                title: "Rust".to_owned(),
                user: "alice".to_owned(),
                slug: "rust".to_owned(),
                posts: 0,
                threads: 1,
            }],
            threads: vec![Thread {
                id: Id::new(1),
                title: "Seed".to_owned(),
                author: "alice".to_owned(),
                forum: "rust".to_owned(),
                message: "Seed thread".to_owned(),
                votes: 0,
                slug: Some(ThreadSlug::new("t1".to_owned()).unwrap()),
                created: datetime!(2023-06-01 00:00 UTC),
            }],
            members: BTreeSet::from([("rust".to_owned(), "alice".to_owned())]),
            ..State::default()
        };

        Arc::new(Self {
            state: Mutex::new(state),
        })
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }
}

fn page<T>(items: &mut Vec<T>, desc: bool, limit: Option<u64>) {
    if desc {
        items.reverse();
    }
    if let Some(limit) = limit {
        items.truncate(usize::try_from(limit).unwrap());
    }
}

fn after(desc: bool, ordering: Ordering) -> bool {
    if desc {
        ordering == Ordering::Less
    } else {
        ordering == Ordering::Greater
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, user: &User) -> Result<User> {
        let mut state = self.state();
        if state.user(&user.nickname).is_some() {
            return Err(DbError::UniqueViolation("users_pkey".to_owned()));
        }
        if state.users.iter().any(|other| same(&other.email, &user.email)) {
            return Err(DbError::UniqueViolation("users_email_key".to_owned()));
        }

        state.users.push(user.clone());
        Ok(user.clone())
    }

    async fn fetch_user(&self, nickname: &str) -> Result<Option<User>> {
        Ok(self.state().user(nickname).cloned())
    }

    async fn fetch_users_by_nickname_or_email(
        &self,
        nickname: &str,
        email: &str,
    ) -> Result<Vec<User>> {
        let mut users: Vec<User> = self
            .state()
            .users
            .iter()
            .filter(|user| same(&user.nickname, nickname) || same(&user.email, email))
            .cloned()
            .collect();
        users.sort_by_key(|user| fold(&user.nickname));
        Ok(users)
    }

    async fn update_user(&self, nickname: &str, update: &UserUpdate) -> Result<Option<User>> {
        let mut state = self.state();
        if let Some(email) = &update.email
            && state
                .users
                .iter()
                .any(|user| same(&user.email, email) && !same(&user.nickname, nickname))
        {
            return Err(DbError::UniqueViolation("users_email_key".to_owned()));
        }

        let Some(user) = state
            .users
            .iter_mut()
            .find(|user| same(&user.nickname, nickname))
        else {
            return Ok(None);
        };
        if let Some(fullname) = &update.fullname {
            user.fullname.clone_from(fullname);
        }
        if let Some(about) = &update.about {
            user.about.clone_from(about);
        }
        if let Some(email) = &update.email {
            user.email.clone_from(email);
        }
        Ok(Some(user.clone()))
    }
}

#[async_trait]
impl ForumStore for MemoryStore {
    async fn create_forum(&self, forum: &CreateForum) -> Result<Forum> {
        let mut state = self.state();
        let Some(owner) = state.user(&forum.user).map(|user| user.nickname.clone()) else {
            return Err(DbError::ForeignKeyViolation("forums_author_fkey".to_owned()));
        };
        if state.forum(&forum.slug).is_some() {
            return Err(DbError::UniqueViolation("forums_pkey".to_owned()));
        }

        let forum = Forum {
            title: forum.title.clone(),
            user: owner,
            slug: forum.slug.clone(),
            posts: 0,
            threads: 0,
        };
        state.forums.push(forum.clone());
        Ok(forum)
    }

    async fn fetch_forum(&self, slug: &str) -> Result<Option<Forum>> {
        Ok(self.state().forum(slug).cloned())
    }

    async fn list_forum_users(&self, slug: &str, listing: &UserListing) -> Result<Vec<User>> {
        let state = self.state();
        let mut users: Vec<User> = state
            .members
            .iter()
            .filter(|(forum, _)| same(forum, slug))
            .filter_map(|(_, nickname)| state.user(nickname).cloned())
            .collect();
        users.sort_by_key(|user| fold(&user.nickname));
        if let Some(since) = &listing.since {
            users.retain(|user| after(listing.desc, fold(&user.nickname).cmp(&fold(since))));
        }

        page(&mut users, listing.desc, listing.limit());
        Ok(users)
    }
}

#[async_trait]
impl ThreadLookup for MemoryStore {
    async fn lookup_thread(&self, address: &ThreadAddress) -> Result<Option<ThreadRef>> {
        let state = self.state();
        let thread = state.threads.iter().find(|thread| match address {
            ThreadAddress::Id(id) => thread.id == *id,
            ThreadAddress::Slug(slug) => thread
                .slug
                .as_ref()
                .is_some_and(|own| same(own.get(), slug.get())),
        });

        Ok(thread.map(|thread| ThreadRef {
            id: thread.id,
            forum: thread.forum.clone(),
        }))
    }
}

#[async_trait]
impl ThreadStore for MemoryStore {
    async fn create_thread(
        &self,
        forum: &str,
        thread: &CreateThread,
        created: OffsetDateTime,
    ) -> Result<Thread> {
        let mut state = self.state();
        if state.user(&thread.author).is_none() {
            return Err(DbError::ForeignKeyViolation("threads_author_fkey".to_owned()));
        }
        let Some(forum) = state.forum(forum).map(|forum| forum.slug.clone()) else {
            return Err(DbError::ForeignKeyViolation("threads_forum_fkey".to_owned()));
        };
        if let Some(slug) = &thread.slug
            && state.threads.iter().any(|other| {
                other
                    .slug
                    .as_ref()
                    .is_some_and(|own| same(own.get(), slug.get()))
            })
        {
            return Err(DbError::UniqueViolation("threads_slug_key".to_owned()));
        }

        let thread = Thread {
            id: Id::new(i64::try_from(state.threads.len()).unwrap() + 1),
            title: thread.title.clone(),
            author: thread.author.clone(),
            forum: forum.clone(),
            message: thread.message.clone(),
            votes: 0,
            slug: thread.slug.clone(),
            created,
        };
        state.threads.push(thread.clone());
        if let Some(forum) = state.forum_mut(&forum) {
            forum.threads += 1;
        }
        state
            .members
            .insert((fold(&thread.forum), fold(&thread.author)));
        Ok(thread)
    }

    async fn fetch_thread(&self, id: Id<ThreadMarker>) -> Result<Option<Thread>> {
        Ok(self.state().thread(id).cloned())
    }

    async fn fetch_thread_by_slug(&self, slug: &ThreadSlug) -> Result<Option<Thread>> {
        let state = self.state();
        Ok(state
            .threads
            .iter()
            .find(|thread| {
                thread
                    .slug
                    .as_ref()
                    .is_some_and(|own| same(own.get(), slug.get()))
            })
            .cloned())
    }

    async fn list_forum_threads(
        &self,
        forum: &str,
        listing: &ThreadListing,
    ) -> Result<Vec<Thread>> {
        let mut threads: Vec<Thread> = self
            .state()
            .threads
            .iter()
            .filter(|thread| same(&thread.forum, forum))
            .cloned()
            .collect();
        threads.sort_by_key(|thread| (thread.created, thread.id));
        if let Some(since) = listing.since {
            threads.retain(|thread| {
                let ordering = thread.created.cmp(&since.0);
                ordering == Ordering::Equal || after(listing.desc, ordering)
            });
        }

        page(&mut threads, listing.desc, listing.limit());
        Ok(threads)
    }

    async fn update_thread(
        &self,
        id: Id<ThreadMarker>,
        update: &ThreadUpdate,
    ) -> Result<Option<Thread>> {
        let mut state = self.state();
        let Some(thread) = state.thread_mut(id) else {
            return Ok(None);
        };
        if let Some(title) = &update.title {
            thread.title.clone_from(title);
        }
        if let Some(message) = &update.message {
            thread.message.clone_from(message);
        }
        Ok(Some(thread.clone()))
    }
}

#[async_trait]
impl PostStore for MemoryStore {
    async fn insert_posts(&self, posts: &[NewPost]) -> Result<Vec<Post>> {
        let mut state = self.state();
        let first_id = i64::try_from(state.posts.len()).unwrap() + 1;
        let mut staged: Vec<StoredPost> = Vec::with_capacity(posts.len());

        for (id, post) in (first_id..).zip(posts) {
            if state.user(&post.author).is_none() {
                return Err(DbError::ForeignKeyViolation(
                    POST_AUTHOR_CONSTRAINT.to_owned(),
                ));
            }

            let path = if post.parent.get() == 0 {
                Vec::new()
            } else {
                let parent = state
                    .post(post.parent)
                    .or_else(|| staged.iter().find(|staged| staged.post.id == post.parent))
                    .filter(|parent| parent.post.thread == post.thread)
                    .ok_or_else(|| DbError::ForeignKeyViolation("posts_parent_fkey".to_owned()))?;
                parent.key()
            };

            staged.push(StoredPost {
                post: Post {
                    id: Id::new(id),
                    parent: post.parent,
                    author: post.author.clone(),
                    message: post.message.clone(),
                    is_edited: false,
                    forum: post.forum.clone(),
                    thread: post.thread,
                    created: post.created,
                },
                path,
            });
        }

        for stored in &staged {
            if let Some(forum) = state.forum_mut(&stored.post.forum) {
                forum.posts += 1;
            }
            state
                .members
                .insert((fold(&stored.post.forum), fold(&stored.post.author)));
        }
        let inserted = staged.iter().map(|stored| stored.post.clone()).collect();
        state.posts.extend(staged);
        Ok(inserted)
    }

    async fn posts_exist_in_forum(&self, ids: &[Id<PostMarker>], forum: &str) -> Result<bool> {
        let state = self.state();
        Ok(ids.iter().all(|id| {
            state
                .post(*id)
                .is_some_and(|stored| same(&stored.post.forum, forum))
        }))
    }

    async fn list_posts(
        &self,
        thread: Id<ThreadMarker>,
        listing: &PostListing,
    ) -> Result<Vec<Post>> {
        let state = self.state();
        let mut posts: Vec<StoredPost> = state
            .posts
            .iter()
            .filter(|stored| stored.post.thread == thread)
            .cloned()
            .collect();
        let since = listing.since().map(|since| state.post(since).cloned());
        let desc = listing.desc;

        match listing.sort {
            PostSort::Flat => {
                posts.sort_by_key(|stored| (stored.post.created, stored.post.id));
                if let Some(since) = listing.since() {
                    posts.retain(|stored| after(desc, stored.post.id.cmp(&since)));
                }
                page(&mut posts, desc, listing.limit());
            }
            PostSort::Tree => {
                posts.sort_by_key(StoredPost::key);
                if let Some(since) = since {
                    let since = since.map(|since| since.key());
                    posts.retain(|stored| {
                        since
                            .as_ref()
                            .is_some_and(|since| after(desc, stored.key().cmp(since)))
                    });
                }
                page(&mut posts, desc, listing.limit());
            }
            PostSort::ParentTree => {
                let mut roots: Vec<i64> = posts
                    .iter()
                    .filter(|stored| stored.post.parent.get() == 0)
                    .map(|stored| stored.post.id.get())
                    .collect();
                roots.sort_unstable();
                if let Some(since) = since {
                    let since = since.map(|since| since.root());
                    roots.retain(|root| since.is_some_and(|since| after(desc, root.cmp(&since))));
                }
                page(&mut roots, desc, listing.limit());

                posts.retain(|stored| roots.contains(&stored.root()));
                posts.sort_by(|a, b| {
                    let roots = if desc {
                        b.root().cmp(&a.root())
                    } else {
                        a.root().cmp(&b.root())
                    };
                    roots.then_with(|| a.key().cmp(&b.key()))
                });
            }
        }

        Ok(posts.into_iter().map(|stored| stored.post).collect())
    }

    async fn fetch_post(&self, id: Id<PostMarker>) -> Result<Option<Post>> {
        Ok(self.state().post(id).map(|stored| stored.post.clone()))
    }

    async fn update_post(&self, id: Id<PostMarker>, update: &PostUpdate) -> Result<Option<Post>> {
        let mut state = self.state();
        let Some(stored) = state.posts.iter_mut().find(|stored| stored.post.id == id) else {
            return Ok(None);
        };
        if let Some(message) = &update.message
            && *message != stored.post.message
        {
            stored.post.message.clone_from(message);
            stored.post.is_edited = true;
        }
        Ok(Some(stored.post.clone()))
    }
}

#[async_trait]
impl VoteStore for MemoryStore {
    async fn upsert_vote(&self, thread: Id<ThreadMarker>, vote: &Vote) -> Result<()> {
        let mut state = self.state();
        if state.user(&vote.nickname).is_none() {
            return Err(DbError::ForeignKeyViolation("votes_author_fkey".to_owned()));
        }
        if state.thread(thread).is_none() {
            return Err(DbError::ForeignKeyViolation("votes_thread_fkey".to_owned()));
        }

        let voter = fold(&vote.nickname);
        let previous = match state
            .votes
            .iter()
            .position(|(nickname, voted, _)| *nickname == voter && *voted == thread)
        {
            Some(index) => Some(std::mem::replace(&mut state.votes[index].2, vote.voice)),
            None => {
                state.votes.push((voter, thread, vote.voice));
                None
            }
        };

        if let Some(thread) = state.thread_mut(thread) {
            thread.votes += i64::from(vote.voice) - i64::from(previous.unwrap_or(0));
        }
        Ok(())
    }
}

#[async_trait]
impl ServiceStore for MemoryStore {
    async fn status(&self) -> Result<Status> {
        let state = self.state();
        let count = |len: usize| i64::try_from(len).unwrap();
        Ok(Status {
            user: count(state.users.len()),
            forum: count(state.forums.len()),
            thread: count(state.threads.len()),
            post: count(state.posts.len()),
        })
    }

    async fn clear(&self) -> Result<()> {
        *self.state() = State::default();
        Ok(())
    }
}
