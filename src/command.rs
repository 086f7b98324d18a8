//! Line-oriented command interpreter driving a [`BalancedIndex`].
//!
//! A script starts with the number of commands to run, followed by one
//! command per line:
//!
//! ```text
//! 3
//! insert "Alice Smith" 12345678
//! search 12345678
//! printLevelCount
//! ```
//!
//! Each command produces exactly one line of output. Any malformed argument
//! or failed tree operation is reported as `unsuccessful`.

use crate::error::IndexError;
use crate::index::{BalancedIndex, Order};
use std::io::{self, BufRead, Write};
use thiserror::Error;
use tracing::{debug, warn};

pub const SUCCESS: &str = "successful";
pub const FAILURE: &str = "unsuccessful";

/// Keys are rendered as eight digits, so nothing wider can be stored.
pub const MAX_KEY: u64 = 99_999_999;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("{0} expects more arguments")]
    MissingArgument(&'static str),
    #[error("invalid key {0:?}")]
    InvalidKey(String),
    #[error("invalid label {0:?}")]
    InvalidLabel(String),
    #[error("invalid rank {0:?}")]
    InvalidRank(String),
    #[error("unknown command {0:?}")]
    UnknownCommand(String),
    #[error(transparent)]
    Index(#[from] IndexError),
}

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("failed to read script: {0}")]
    Io(#[from] io::Error),
    #[error("expected a command count on the first line, got {0:?}")]
    Header(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Insert { key: u64, label: String },
    Remove(u64),
    SearchKey(u64),
    SearchLabel(String),
    Print(Order),
    LevelCount,
    RemoveNth(usize),
}

impl Command {
    /// Parses one script line. Blank lines yield `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Command>, CommandError> {
        let mut tokens = tokenize(line).into_iter();
        let Some(name) = tokens.next() else {
            return Ok(None);
        };
        let args: Vec<String> = tokens.collect();

        let command = match name.as_str() {
            "insert" => {
                let label = arg(&args, 0, "insert")?;
                let key = parse_key(arg(&args, 1, "insert")?)?;
                Command::Insert {
                    key,
                    label: parse_label(label)?,
                }
            }
            "remove" => Command::Remove(parse_key(arg(&args, 0, "remove")?)?),
            "search" => {
                let target = arg(&args, 0, "search")?;
                if target.starts_with('"') {
                    Command::SearchLabel(strip_quotes(target).to_string())
                } else {
                    Command::SearchKey(parse_key(target)?)
                }
            }
            "printPreorder" => Command::Print(Order::PreOrder),
            "printInorder" => Command::Print(Order::InOrder),
            "printPostorder" => Command::Print(Order::PostOrder),
            "printLevelCount" => Command::LevelCount,
            "removeInorder" => {
                let rank = arg(&args, 0, "removeInorder")?;
                let rank = parse_digits(rank)
                    .ok_or_else(|| CommandError::InvalidRank(rank.to_string()))?;
                Command::RemoveNth(rank)
            }
            _ => return Err(CommandError::UnknownCommand(name)),
        };
        Ok(Some(command))
    }

    /// Applies the command and renders its single output line.
    pub fn apply(self, index: &mut BalancedIndex) -> Result<String, CommandError> {
        let line = match self {
            Command::Insert { key, label } => {
                index.insert(key, label)?;
                SUCCESS.to_string()
            }
            Command::Remove(key) => {
                index.remove(key)?;
                SUCCESS.to_string()
            }
            Command::SearchKey(key) => index.get(key)?.to_string(),
            Command::SearchLabel(label) => index
                .find_by_label(&label)?
                .iter()
                .map(|key| format!("{key:08}"))
                .collect::<Vec<_>>()
                .join("\n"),
            Command::Print(order) => index.traverse(order).join(", "),
            Command::LevelCount => index.height().to_string(),
            Command::RemoveNth(rank) => {
                index.remove_nth(rank)?;
                SUCCESS.to_string()
            }
        };
        Ok(line)
    }
}

/// Splits a line on whitespace, keeping a `"`-quoted argument together
/// even when it spans several words.
pub fn tokenize(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut words = line.split_whitespace();
    while let Some(word) = words.next() {
        let mut token = word.to_string();
        if token.starts_with('"') {
            while token.len() == 1 || !token.ends_with('"') {
                match words.next() {
                    Some(next) => {
                        token.push(' ');
                        token.push_str(next);
                    }
                    None => break,
                }
            }
        }
        tokens.push(token);
    }
    tokens
}

fn arg<'a>(
    args: &'a [String],
    position: usize,
    command: &'static str,
) -> Result<&'a str, CommandError> {
    args.get(position)
        .map(String::as_str)
        .ok_or(CommandError::MissingArgument(command))
}

fn parse_digits<T: std::str::FromStr>(text: &str) -> Option<T> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

pub fn parse_key(text: &str) -> Result<u64, CommandError> {
    parse_digits::<u64>(text)
        .filter(|key| *key <= MAX_KEY)
        .ok_or_else(|| CommandError::InvalidKey(text.to_string()))
}

/// Validates a raw label argument and strips its surrounding quotes.
pub fn parse_label(text: &str) -> Result<String, CommandError> {
    let valid = text
        .chars()
        .all(|c| c.is_ascii_alphabetic() || c.is_ascii_whitespace() || c == '"');
    if !valid {
        return Err(CommandError::InvalidLabel(text.to_string()));
    }
    Ok(strip_quotes(text).to_string())
}

fn strip_quotes(text: &str) -> &str {
    let text = text.strip_prefix('"').unwrap_or(text);
    text.strip_suffix('"').unwrap_or(text)
}

/// Owns the index a script operates on.
#[derive(Debug, Default)]
pub struct Session {
    index: BalancedIndex,
}

impl Session {
    pub fn new() -> Self {
        Session {
            index: BalancedIndex::new(),
        }
    }

    pub fn index(&self) -> &BalancedIndex {
        &self.index
    }

    /// Runs one line, returning its output line or `None` for a blank line.
    pub fn execute(&mut self, line: &str) -> Option<String> {
        let result = match Command::parse(line) {
            Ok(None) => return None,
            Ok(Some(command)) => {
                debug!(?command, "executing");
                command.apply(&mut self.index)
            }
            Err(err) => Err(err),
        };
        match result {
            Ok(output) => Some(output),
            Err(err) => {
                debug!(%err, line, "command failed");
                Some(FAILURE.to_string())
            }
        }
    }

    /// Reads the command count, then executes that many lines, writing each
    /// output line to `out`. Returns the number of lines executed.
    pub fn run_script<R: BufRead, W: Write>(
        &mut self,
        mut input: R,
        out: &mut W,
    ) -> Result<usize, ScriptError> {
        let mut header = String::new();
        input.read_line(&mut header)?;
        let count: usize = header
            .trim()
            .parse()
            .map_err(|_| ScriptError::Header(header.trim().to_string()))?;

        let mut lines = input.lines();
        for executed in 0..count {
            let Some(line) = lines.next() else {
                warn!(expected = count, executed, "script ended early");
                return Ok(executed);
            };
            if let Some(output) = self.execute(&line?) {
                writeln!(out, "{output}")?;
            }
        }
        Ok(count)
    }
}
