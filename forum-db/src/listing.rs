//! SQL for the paginated listings.
//!
//! Every listing orders in one direction and uses `since` as a cursor strictly past (or, for
//! thread timestamps, at or past) the last item of the previous page.

use crate::{
    record::{post_columns, thread_columns},
    store::UserListing,
};
use forum_common::model::{
    Id,
    post::{PostListing, PostSort},
    thread::{ThreadListing, ThreadMarker},
};
use sqlx::{Postgres, QueryBuilder};

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
enum Direction {
    Ascending,
    Descending,
}

impl Direction {
    fn new(desc: bool) -> Self {
        if desc {
            Direction::Descending
        } else {
            Direction::Ascending
        }
    }

    fn keyword(self) -> &'static str {
        match self {
            Direction::Ascending => "ASC",
            Direction::Descending => "DESC",
        }
    }

    /// Comparison selecting rows that come after the cursor.
    fn after(self) -> &'static str {
        match self {
            Direction::Ascending => ">",
            Direction::Descending => "<",
        }
    }

    /// Like [`Direction::after`], but including the cursor itself.
    fn at_or_after(self) -> &'static str {
        match self {
            Direction::Ascending => ">=",
            Direction::Descending => "<=",
        }
    }
}

fn push_limit(builder: &mut QueryBuilder<'static, Postgres>, limit: Option<u64>) {
    if let Some(limit) = limit {
        builder
            .push(" LIMIT ")
            .push_bind(i64::try_from(limit).unwrap_or(i64::MAX));
    }
}

pub(crate) fn posts_query(
    thread: Id<ThreadMarker>,
    listing: &PostListing,
) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(concat!(
        "SELECT ",
        post_columns!(),
        " FROM posts WHERE thread = "
    ));
    builder.push_bind(thread.get());

    let direction = Direction::new(listing.desc);
    match listing.sort {
        PostSort::Flat => push_flat(&mut builder, listing, direction),
        PostSort::Tree => push_tree(&mut builder, listing, direction),
        PostSort::ParentTree => push_parent_tree(&mut builder, thread, listing, direction),
    }

    builder
}

fn push_flat(
    builder: &mut QueryBuilder<'static, Postgres>,
    listing: &PostListing,
    direction: Direction,
) {
    if let Some(since) = listing.since() {
        builder
            .push(" AND id ")
            .push(direction.after())
            .push(" ")
            .push_bind(since.get());
    }

    builder
        .push(" ORDER BY created ")
        .push(direction.keyword())
        .push(", id ")
        .push(direction.keyword());
    push_limit(builder, listing.limit());
}

fn push_tree(
    builder: &mut QueryBuilder<'static, Postgres>,
    listing: &PostListing,
    direction: Direction,
) {
    if let Some(since) = listing.since() {
        builder
            .push(" AND array_append(path, id) ")
            .push(direction.after())
            .push(" (SELECT array_append(path, id) FROM posts WHERE id = ")
            .push_bind(since.get())
            .push(")");
    }

    builder
        .push(" ORDER BY array_append(path, id) ")
        .push(direction.keyword());
    push_limit(builder, listing.limit());
}

/// Pages over root posts, then returns each selected root with its whole subtree.
///
/// Roots follow the requested direction; inside a subtree posts stay in depth first order.
fn push_parent_tree(
    builder: &mut QueryBuilder<'static, Postgres>,
    thread: Id<ThreadMarker>,
    listing: &PostListing,
    direction: Direction,
) {
    builder
        .push(" AND root IN (SELECT id FROM posts WHERE thread = ")
        .push_bind(thread.get())
        .push(" AND parent = 0");

    if let Some(since) = listing.since() {
        builder
            .push(" AND id ")
            .push(direction.after())
            .push(" (SELECT root FROM posts WHERE id = ")
            .push_bind(since.get())
            .push(")");
    }

    builder.push(" ORDER BY id ").push(direction.keyword());
    push_limit(builder, listing.limit());

    builder
        .push(") ORDER BY root ")
        .push(direction.keyword())
        .push(", array_append(path, id) ASC");
}

pub(crate) fn forum_threads_query(
    forum: &str,
    listing: &ThreadListing,
) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(concat!(
        "SELECT ",
        thread_columns!(),
        " FROM threads WHERE forum = "
    ));
    builder.push_bind(forum.to_owned()).push("::citext");

    let direction = Direction::new(listing.desc);
    if let Some(since) = listing.since {
        builder
            .push(" AND created ")
            .push(direction.at_or_after())
            .push(" ")
            .push_bind(since.0);
    }

    builder
        .push(" ORDER BY created ")
        .push(direction.keyword())
        .push(", id ")
        .push(direction.keyword());
    push_limit(&mut builder, listing.limit());

    builder
}

pub(crate) fn forum_users_query(
    forum: &str,
    listing: &UserListing,
) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(
        "SELECT u.nickname::text AS nickname, u.fullname, u.about, u.email::text AS email \
        FROM forum_users f JOIN users u ON u.nickname = f.nickname WHERE f.forum = ",
    );
    builder.push_bind(forum.to_owned()).push("::citext");

    let direction = Direction::new(listing.desc);
    if let Some(since) = &listing.since {
        builder
            .push(" AND f.nickname ")
            .push(direction.after())
            .push(" ")
            .push_bind(since.clone())
            .push("::citext");
    }

    builder
        .push(" ORDER BY f.nickname ")
        .push(direction.keyword());
    push_limit(&mut builder, listing.limit());

    builder
}
