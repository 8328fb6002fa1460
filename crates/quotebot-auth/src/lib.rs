//! Channel/role authorization for write commands.
//!
//! The quote commands only depend on [`Authorizer`]; [`UserfileAuthorizer`]
//! is the hostmask-based implementation the bot ships with.

pub mod userfile;

pub use userfile::{Userfile, UserfileAuthorizer};

use quotebot_types::models::{ChannelContext, User};
use thiserror::Error;

/// Why a caller was not authorized. Never shown to chat users.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("that's not a channel")]
    NotAChannel,

    #[error("channel {0} doesn't exist")]
    UnknownChannel(String),

    #[error("role {0} doesn't exist in channel")]
    UnknownRole(String),

    #[error("no user matching {0}")]
    NoMatch(String),

    #[error("userfile unavailable: {0}")]
    Unavailable(String),
}

/// Decides whether `caller` holds `role` in a channel, resolving the
/// username that should be recorded for the action.
pub trait Authorizer: Send + Sync {
    fn authorize(&self, ctx: &ChannelContext, role: &str, caller: &User) -> Result<String, AuthError>;

    /// Refreshes whatever the decisions are based on. No-op by default.
    fn reload(&self) -> anyhow::Result<()> {
        Ok(())
    }
}
