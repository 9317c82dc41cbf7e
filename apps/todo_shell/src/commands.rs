//! Line commands typed at the shell prompt.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Add(String),
    Toggle(usize),
    Edit(usize),
    Draft(String),
    Save,
    Cancel,
    Remove(usize),
    Reload,
    List,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unknown command '{0}', type 'help' for a list")]
    Unknown(String),
    #[error("'{0}' expects a task number")]
    MissingPosition(&'static str),
    #[error("'{0}' is not a task number")]
    BadPosition(String),
}

impl ShellCommand {
    /// Commands that send a change to the server.
    pub fn mutates(&self) -> bool {
        matches!(
            self,
            Self::Add(_) | Self::Toggle(_) | Self::Save | Self::Remove(_)
        )
    }
}

pub const HELP: &str = "\
commands:
  add <title>     add a task
  toggle <n>      flip task n between done and not done
  edit <n>        start editing task n
  draft <text>    replace the edit draft
  save            save the edit draft
  cancel          stop editing
  rm <n>          delete task n
  reload          fetch the list again
  list            show the list
  quit            exit";

pub fn parse_command(line: &str) -> Result<ShellCommand, ParseError> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    match word {
        "add" | "a" => Ok(ShellCommand::Add(rest.to_string())),
        "toggle" | "t" => position("toggle", rest).map(ShellCommand::Toggle),
        "edit" | "e" => position("edit", rest).map(ShellCommand::Edit),
        "draft" | "d" => Ok(ShellCommand::Draft(rest.to_string())),
        "save" | "s" => Ok(ShellCommand::Save),
        "cancel" | "c" => Ok(ShellCommand::Cancel),
        "rm" | "delete" => position("rm", rest).map(ShellCommand::Remove),
        "reload" | "r" => Ok(ShellCommand::Reload),
        "" | "list" | "ls" => Ok(ShellCommand::List),
        "help" | "?" => Ok(ShellCommand::Help),
        "quit" | "exit" | "q" => Ok(ShellCommand::Quit),
        other => Err(ParseError::Unknown(other.to_string())),
    }
}

fn position(command: &'static str, rest: &str) -> Result<usize, ParseError> {
    if rest.is_empty() {
        return Err(ParseError::MissingPosition(command));
    }
    match rest.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ParseError::BadPosition(rest.to_string())),
    }
}
