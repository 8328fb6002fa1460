use serde::{Deserialize, Serialize};

use crate::models::User;

// -- Commands --

/// A chat line delivered by the transport.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CommandRequest {
    pub channel: String,
    #[serde(default)]
    pub is_private: bool,
    pub user: User,
    pub message: String,
}

/// `reply` is `None` when the bot stays silent.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CommandResponse {
    pub reply: Option<String>,
}
