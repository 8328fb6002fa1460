//! Quote commands: record, play back, inspect and delete quotes.

use tracing::{error, warn};

use crate::commands::Cmd;
use crate::gate::{ADMIN_ROLE, AUTHOR_ROLE, Gated, MutationGate};
use crate::selector::{self, Selection};
use crate::state::AppStateInner;

const DELETE_USAGE: &str = "Specify which quote you want to delete with `-id <id>`.";
const INFO_USAGE: &str = "Specify which quote you want to show info for with `-id <id>`.";

pub fn add_quote(state: &AppStateInner, cmd: &Cmd) -> Option<String> {
    let content = cmd.raw_args.trim();
    if content.is_empty() {
        return None;
    }

    let gate = MutationGate::new(&state.db, state.authorizer.as_ref());
    match gate.insert(&cmd.ctx, AUTHOR_ROLE, &cmd.user, content) {
        Ok(Gated::Done(id)) => Some(format!("Quote inserted with id {}.", id)),
        Ok(Gated::Denied) => None,
        Err(e) => {
            error!("Could not insert quote in {}: {}", cmd.ctx.channel, e);
            Some("Could not insert quote.".into())
        }
    }
}

pub fn get_quote(state: &AppStateInner, cmd: &Cmd) -> Option<String> {
    let selection = parse_selection(&cmd.args)?;
    show(state, cmd, &selection)
}

pub fn get_last_quote(state: &AppStateInner, cmd: &Cmd) -> Option<String> {
    show(state, cmd, &Selection::Latest)
}

pub fn delete_quote(state: &AppStateInner, cmd: &Cmd) -> Option<String> {
    if cmd.args.len() < 2 {
        return Some(DELETE_USAGE.into());
    }

    let id = parse_id_flag(&cmd.args)?;

    let gate = MutationGate::new(&state.db, state.authorizer.as_ref());
    match gate.soft_delete(&cmd.ctx, AUTHOR_ROLE, &cmd.user, id) {
        Ok(Gated::Done(0)) => Some("Could not delete quote.".into()),
        Ok(Gated::Done(_)) => Some("Quote deleted.".into()),
        Ok(Gated::Denied) => None,
        Err(e) => {
            error!("Could not delete quote {} in {}: {}", id, cmd.ctx.channel, e);
            Some("Could not delete quote.".into())
        }
    }
}

pub fn quote_info(state: &AppStateInner, cmd: &Cmd) -> Option<String> {
    if cmd.args.len() < 2 {
        return Some(INFO_USAGE.into());
    }

    let id = parse_id_flag(&cmd.args)?;
    let picked = read(state, cmd, &Selection::ById(id))?;
    let when = picked
        .quote
        .timestamp
        .map(|ts| ts.format("%Y-%m-%d, %H:%M").to_string())
        .unwrap_or_else(|| "an unknown date".into());

    Some(format!(
        "#{}: quoted by {} on {}",
        picked.quote.id, picked.quote.author, when
    ))
}

pub fn reload_users(state: &AppStateInner, cmd: &Cmd) -> Option<String> {
    let gate = MutationGate::new(&state.db, state.authorizer.as_ref());
    gate.check(&cmd.ctx, ADMIN_ROLE, &cmd.user)?;

    if let Err(e) = state.authorizer.reload() {
        error!("Could not reload users: {:#}", e);
    }
    None
}

/// Arguments of `quote`: `-id <id>`, or `<keyword...> [nth]`, or `[nth]`.
///
/// A trailing integer is the ordinal (`0` meaning unspecified); anything
/// that does not parse stays part of the keyword. `None` means the request
/// cannot match anything.
pub fn parse_selection(args: &[String]) -> Option<Selection> {
    let (number, rest) = match args.split_last() {
        Some((last, rest)) => match last.parse::<u64>() {
            Ok(n) => (Some(n), rest),
            Err(_) => (None, args),
        },
        None => (None, args),
    };

    match rest {
        [flag] if flag == "-id" => {
            let id = i64::try_from(number?).ok().filter(|id| *id > 0)?;
            Some(Selection::ById(id))
        }
        _ => Some(Selection::Search {
            keyword: (!rest.is_empty()).then(|| rest.join(" ")),
            ordinal: number.filter(|n| *n > 0),
        }),
    }
}

/// `-id <id>` with a positive id.
fn parse_id_flag(args: &[String]) -> Option<i64> {
    match args {
        [flag, id] if flag == "-id" => id.parse::<i64>().ok().filter(|id| *id > 0),
        _ => None,
    }
}

fn show(state: &AppStateInner, cmd: &Cmd, selection: &Selection) -> Option<String> {
    let picked = read(state, cmd, selection)?;
    Some(format!("#{}: {}", picked.quote.id, picked.annotated_content()))
}

/// Read failures are logged and treated as "not found".
fn read(state: &AppStateInner, cmd: &Cmd, selection: &Selection) -> Option<selector::Selected> {
    let mut rng = rand::rng();
    selector::select(&state.db, &cmd.ctx.channel, selection, &mut rng)
        .unwrap_or_else(|e| {
            warn!("Quote lookup {:?} in {} failed: {}", selection, cmd.ctx.channel, e);
            None
        })
}
