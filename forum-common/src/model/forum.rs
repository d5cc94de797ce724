use serde::{Deserialize, Serialize};

#[derive(Clone, Eq, PartialEq, Debug, Default, Hash, Deserialize, Serialize)]
pub struct Forum {
    pub title: String,
    /// Nickname of the owning user.
    pub user: String,
    pub slug: String,
    pub posts: i64,
    pub threads: i64,
}

#[derive(Clone, Eq, PartialEq, Debug, Default, Hash, Deserialize, Serialize)]
pub struct CreateForum {
    pub title: String,
    pub user: String,
    pub slug: String,
}
