use std::sync::Arc;

use quotebot_auth::Authorizer;
use quotebot_db::Database;

pub type AppState = Arc<AppStateInner>;

/// Process-wide handles, built once at startup and passed to every command.
pub struct AppStateInner {
    pub db: Database,
    pub authorizer: Box<dyn Authorizer>,
    /// Leading marker for command lines, e.g. `!`.
    pub prefix: String,
}
