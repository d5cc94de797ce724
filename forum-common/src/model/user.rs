use serde::{Deserialize, Serialize};

#[derive(Clone, Eq, PartialEq, Debug, Default, Hash, Deserialize, Serialize)]
pub struct User {
    pub nickname: String,
    pub fullname: String,
    pub about: String,
    pub email: String,
}

/// Profile fields supplied on creation; the nickname comes from the request path.
#[derive(Clone, Eq, PartialEq, Debug, Default, Hash, Deserialize, Serialize)]
pub struct CreateUser {
    pub fullname: String,
    #[serde(default)]
    pub about: String,
    pub email: String,
}

impl CreateUser {
    #[must_use]
    pub fn into_user(self, nickname: String) -> User {
        User {
            nickname,
            fullname: self.fullname,
            about: self.about,
            email: self.email,
        }
    }
}

/// Omitted fields keep their stored value.
#[derive(Clone, Eq, PartialEq, Debug, Default, Hash, Deserialize, Serialize)]
pub struct UserUpdate {
    #[serde(default)]
    pub fullname: Option<String>,
    #[serde(default)]
    pub about: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl UserUpdate {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fullname.is_none() && self.about.is_none() && self.email.is_none()
    }
}
