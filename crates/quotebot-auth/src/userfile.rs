use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use anyhow::{Context, Result};
use quotebot_types::models::{ChannelContext, User};
use regex::Regex;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::{AuthError, Authorizer};

/// Role entry that lets anyone through, resolved to the caller's nick.
const ANYONE: &str = "*";

#[derive(Debug, Default, Deserialize)]
pub struct Userfile {
    #[serde(default)]
    pub channels: HashMap<String, ChannelRoles>,
    #[serde(default)]
    pub users: HashMap<String, UserEntry>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ChannelRoles {
    #[serde(default)]
    pub roles: HashMap<String, Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UserEntry {
    #[serde(default, rename = "masks")]
    pub raw_masks: Vec<String>,
    #[serde(skip)]
    masks: Vec<Regex>,
}

impl UserEntry {
    fn matches(&self, host: &str) -> bool {
        self.masks.iter().any(|mask| mask.is_match(host))
    }
}

impl Userfile {
    pub fn from_json(json: &str) -> Result<Self> {
        let mut userfile: Userfile = serde_json::from_str(json)?;
        for (username, user) in userfile.users.iter_mut() {
            user.masks = user
                .raw_masks
                .iter()
                .filter_map(|raw| match prepare_mask(raw) {
                    Ok(mask) => Some(mask),
                    Err(e) => {
                        warn!("Couldn't turn mask {} of {} into regex: {}", raw, username, e);
                        None
                    }
                })
                .collect();
        }
        Ok(userfile)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("could not read userfile {}", path.display()))?;
        Self::from_json(&json).with_context(|| format!("could not parse userfile {}", path.display()))
    }

    pub fn authorize(&self, ctx: &ChannelContext, role: &str, caller: &User) -> Result<String, AuthError> {
        if ctx.is_private {
            return Err(AuthError::NotAChannel);
        }

        let channel = self
            .channels
            .get(&ctx.channel)
            .ok_or_else(|| AuthError::UnknownChannel(ctx.channel.clone()))?;

        let usernames = channel
            .roles
            .get(role)
            .ok_or_else(|| AuthError::UnknownRole(role.to_string()))?;

        let fullhost = caller.fullhost();
        debug!("trying full host {}", fullhost);
        for username in usernames {
            if username == ANYONE {
                debug!("anyone can be {} in {}", role, ctx.channel);
                return Ok(caller.nick.clone());
            }

            let Some(user) = self.users.get(username) else {
                warn!("user {} in role {} of {} doesn't exist", username, role, ctx.channel);
                continue;
            };

            if user.matches(&fullhost) {
                return Ok(username.clone());
            }
        }

        Err(AuthError::NoMatch(fullhost))
    }
}

/// IRC-style glob to a whole-string, case-insensitive regex: `*` is any run,
/// `?` is one character, everything else is literal.
fn prepare_mask(mask: &str) -> Result<Regex, regex::Error> {
    let pattern = regex::escape(mask).replace(r"\*", ".*").replace(r"\?", ".");
    Regex::new(&format!("(?i)^{}$", pattern))
}

/// [`Authorizer`] backed by a reloadable JSON userfile.
pub struct UserfileAuthorizer {
    path: PathBuf,
    userfile: RwLock<Userfile>,
}

impl UserfileAuthorizer {
    /// Reads the userfile once. Failing here is a startup failure.
    pub fn load(path: &Path) -> Result<Self> {
        let userfile = Userfile::load(path)?;
        info!("Loaded userfile from {}", path.display());
        Ok(Self {
            path: path.to_path_buf(),
            userfile: RwLock::new(userfile),
        })
    }
}

impl Authorizer for UserfileAuthorizer {
    fn authorize(&self, ctx: &ChannelContext, role: &str, caller: &User) -> Result<String, AuthError> {
        let userfile = self
            .userfile
            .read()
            .map_err(|e| AuthError::Unavailable(e.to_string()))?;
        userfile.authorize(ctx, role, caller)
    }

    /// Re-reads the userfile. The previous one stays active if this fails.
    fn reload(&self) -> Result<()> {
        let fresh = Userfile::load(&self.path)?;
        let mut current = self
            .userfile
            .write()
            .map_err(|e| anyhow::anyhow!("Userfile lock poisoned: {}", e))?;
        *current = fresh;
        info!("Reloaded userfile from {}", self.path.display());
        Ok(())
    }
}
