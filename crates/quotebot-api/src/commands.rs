use quotebot_types::api::CommandRequest;
use quotebot_types::models::{ChannelContext, User};

use crate::quotes;
use crate::state::AppStateInner;

/// A parsed command line: `<prefix><name> <args...>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cmd {
    pub ctx: ChannelContext,
    pub user: User,
    pub name: String,
    pub args: Vec<String>,
    /// Everything after the command name, leading whitespace removed.
    pub raw_args: String,
}

impl Cmd {
    /// `None` for lines that are not commands.
    pub fn parse(prefix: &str, req: CommandRequest) -> Option<Self> {
        let line = req.message.trim().strip_prefix(prefix)?;
        let (name, rest) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim_start()),
            None => (line, ""),
        };
        if name.is_empty() {
            return None;
        }

        Some(Self {
            ctx: ChannelContext {
                channel: req.channel,
                is_private: req.is_private,
            },
            user: req.user,
            name: name.to_string(),
            args: rest.split_whitespace().map(str::to_string).collect(),
            raw_args: rest.to_string(),
        })
    }
}

type Handler = fn(&AppStateInner, &Cmd) -> Option<String>;

pub struct CommandSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub usage: &'static str,
    handler: Handler,
}

pub static COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        name: "addquote",
        description: "Add a quote to the bot",
        usage: "<quote>",
        handler: quotes::add_quote,
    },
    CommandSpec {
        name: "quote",
        description: "Get a quote from the bot",
        usage: "[-id <id>|<querystring> [<nth match>]]",
        handler: quotes::get_quote,
    },
    CommandSpec {
        name: "q",
        description: "Alias for quote",
        usage: "[-id <id>|<querystring> [<nth match>]]",
        handler: quotes::get_quote,
    },
    CommandSpec {
        name: "lastquote",
        description: "Get the last quote that was added in this channel",
        usage: "",
        handler: quotes::get_last_quote,
    },
    CommandSpec {
        name: "delquote",
        description: "Delete a quote",
        usage: "-id <id>",
        handler: quotes::delete_quote,
    },
    CommandSpec {
        name: "quoteinfo",
        description: "Get info about a quote",
        usage: "-id <id>",
        handler: quotes::quote_info,
    },
    CommandSpec {
        name: "reloadusers",
        description: "Reload the user file",
        usage: "",
        handler: quotes::reload_users,
    },
    CommandSpec {
        name: "help",
        description: "List the available commands",
        usage: "",
        handler: help,
    },
];

/// Runs the registered handler for `cmd`. Blocking; call off the async runtime.
pub fn dispatch(state: &AppStateInner, cmd: &Cmd) -> Option<String> {
    let spec = COMMANDS.iter().find(|spec| spec.name == cmd.name)?;
    (spec.handler)(state, cmd)
}

fn help(state: &AppStateInner, _cmd: &Cmd) -> Option<String> {
    let lines: Vec<String> = COMMANDS
        .iter()
        .map(|spec| {
            let usage = if spec.usage.is_empty() {
                String::new()
            } else {
                format!(" {}", spec.usage)
            };
            format!("{}{}{} - {}", state.prefix, spec.name, usage, spec.description)
        })
        .collect();
    Some(lines.join("\n"))
}
