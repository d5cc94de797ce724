use serde::{Deserialize, Serialize};

/// A user's voice on a thread. Re-voting replaces the previous voice.
#[derive(Clone, Eq, PartialEq, Debug, Default, Hash, Deserialize, Serialize)]
pub struct Vote {
    pub nickname: String,
    pub voice: i32,
}
