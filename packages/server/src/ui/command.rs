//! Command line parser.
//!
//! 1 行が 1 コマンド。先頭の `%` は省略可能で、最初のトークンが動詞になる。
//! `post` と `group_post` は残り全体を本文として扱う（空白を含んでよい）。

use thiserror::Error;

/// 登録済みの接続が送るコマンド
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Post(String),
    Join,
    Leave,
    Users,
    Groups,
    GroupJoin(String),
    GroupLeave(String),
    GroupPost { channel: String, body: String },
    GroupUsers(String),
    GroupMessages { channel: String, id: String },
    RetrieveMessage(String),
    Exit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("Usage: {0}")]
    Usage(&'static str),
    #[error("Unknown command '{0}'. Available commands: post, join, leave, users, groups, group_join, group_leave, group_post, group_users, group_messages, retrieve_message, exit.")]
    Unknown(String),
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let line = line.trim();
        let line = line.strip_prefix('%').unwrap_or(line);
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };
        let args: Vec<&str> = rest.split_whitespace().collect();

        match verb {
            "post" if rest.is_empty() => Err(CommandError::Usage("post <message>")),
            "post" => Ok(Self::Post(rest.to_string())),
            "join" => without_args(&args, Self::Join, "join"),
            "leave" => without_args(&args, Self::Leave, "leave"),
            "users" => without_args(&args, Self::Users, "users"),
            "groups" => without_args(&args, Self::Groups, "groups"),
            "exit" => without_args(&args, Self::Exit, "exit"),
            "group_join" => match args.as_slice() {
                [name] => Ok(Self::GroupJoin(name.to_string())),
                _ => Err(CommandError::Usage("group_join <group>")),
            },
            "group_leave" => match args.as_slice() {
                [name] => Ok(Self::GroupLeave(name.to_string())),
                _ => Err(CommandError::Usage("group_leave <group>")),
            },
            "group_users" => match args.as_slice() {
                [name] => Ok(Self::GroupUsers(name.to_string())),
                _ => Err(CommandError::Usage("group_users <group>")),
            },
            "group_messages" => match args.as_slice() {
                [name, id] => Ok(Self::GroupMessages {
                    channel: name.to_string(),
                    id: id.to_string(),
                }),
                _ => Err(CommandError::Usage("group_messages <group> <message_id>")),
            },
            "retrieve_message" => match args.as_slice() {
                [id] => Ok(Self::RetrieveMessage(id.to_string())),
                _ => Err(CommandError::Usage("retrieve_message <message_id>")),
            },
            "group_post" => match rest.split_once(char::is_whitespace) {
                Some((name, body)) if !body.trim().is_empty() => Ok(Self::GroupPost {
                    channel: name.to_string(),
                    body: body.trim().to_string(),
                }),
                _ => Err(CommandError::Usage("group_post <group> <message>")),
            },
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

fn without_args(args: &[&str], command: Command, usage: &'static str) -> Result<Command, CommandError> {
    if args.is_empty() {
        Ok(command)
    } else {
        Err(CommandError::Usage(usage))
    }
}
