use serde::{Deserialize, Serialize};

/// A chat participant as seen by the transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub nick: String,
    pub real_name: String,
    /// Host part of the IRC-style prefix.
    pub id: String,
}

impl User {
    /// Full `nick!real_name@id` hostmask, as matched against userfile masks.
    pub fn fullhost(&self) -> String {
        format!("{}!{}@{}", self.nick, self.real_name, self.id)
    }
}

/// Where a command was issued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelContext {
    pub channel: String,
    #[serde(default)]
    pub is_private: bool,
}

/// Lifecycle of a stored quote. `Deleted` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteState {
    Active,
    Deleted,
}

impl QuoteState {
    pub fn from_flag(deleted: i64) -> Self {
        if deleted == 0 { Self::Active } else { Self::Deleted }
    }

    pub fn as_flag(self) -> i64 {
        match self {
            Self::Active => 0,
            Self::Deleted => 1,
        }
    }
}
