use tracing::{info, warn};

use quotebot_auth::Authorizer;
use quotebot_db::{Database, StoreError};
use quotebot_types::models::{ChannelContext, User};

/// Role required to add or delete quotes.
pub const AUTHOR_ROLE: &str = "author";
/// Role required for bot administration such as reloading the userfile.
pub const ADMIN_ROLE: &str = "admin";

/// Result of a write that went through the gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gated<T> {
    Done(T),
    /// Authorization failed; nothing was written.
    Denied,
}

/// Runs quote writes only after the authorizer accepts the caller.
pub struct MutationGate<'a> {
    db: &'a Database,
    authorizer: &'a dyn Authorizer,
}

impl<'a> MutationGate<'a> {
    pub fn new(db: &'a Database, authorizer: &'a dyn Authorizer) -> Self {
        Self { db, authorizer }
    }

    /// Resolved username for `caller`, or `None` after logging the denial.
    pub fn check(&self, ctx: &ChannelContext, role: &str, caller: &User) -> Option<String> {
        match self.authorizer.authorize(ctx, role, caller) {
            Ok(username) => Some(username),
            Err(e) => {
                warn!(
                    "Could not authorize {} as {} in {}: {}",
                    caller.fullhost(),
                    role,
                    ctx.channel,
                    e
                );
                None
            }
        }
    }

    /// Stores `content` authored by the resolved username, never the raw nick.
    pub fn insert(
        &self,
        ctx: &ChannelContext,
        role: &str,
        caller: &User,
        content: &str,
    ) -> Result<Gated<i64>, StoreError> {
        let Some(author) = self.check(ctx, role, caller) else {
            return Ok(Gated::Denied);
        };

        let id = self.db.insert_quote(&ctx.channel, &author, content)?;
        info!("Quote inserted with id {} by {} in {}", id, author, ctx.channel);
        Ok(Gated::Done(id))
    }

    /// Soft-deletes quote `id`. `Done(0)` means nothing live matched.
    pub fn soft_delete(
        &self,
        ctx: &ChannelContext,
        role: &str,
        caller: &User,
        id: i64,
    ) -> Result<Gated<usize>, StoreError> {
        let Some(username) = self.check(ctx, role, caller) else {
            return Ok(Gated::Denied);
        };

        let affected = self.db.soft_delete_quote(&ctx.channel, id)?;
        if affected > 0 {
            info!("Quote id {} deleted by {} in {}", id, username, ctx.channel);
        }
        Ok(Gated::Done(affected))
    }
}
