//! Line-oriented command grammar.
//!
//! ```text
//! addent "X"
//! delent "X"
//! addrel "X" "Y" "R"
//! delrel "X" "Y" "R"
//! report
//! end
//! ```
//!
//! Names are double-quoted, non-empty, and may contain anything but a quote.

use std::fmt;

use smallvec::SmallVec;

use crate::error::{GraphError, Result};

/// One parsed command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// `addent "X"`
    AddEntity(String),
    /// `delent "X"`
    DeleteEntity(String),
    /// `addrel "X" "Y" "R"`: edge `X -> Y` in relation `R`.
    AddRelation {
        /// Source entity.
        source: String,
        /// Target entity.
        target: String,
        /// Relation name.
        relation: String,
    },
    /// `delrel "X" "Y" "R"`
    DeleteRelation {
        /// Source entity.
        source: String,
        /// Target entity.
        target: String,
        /// Relation name.
        relation: String,
    },
    /// `report`
    Report,
    /// `end`
    End,
}

impl Command {
    /// Returns `true` for commands that can change the relation set.
    pub fn is_mutation(&self) -> bool {
        !matches!(self, Command::Report | Command::End)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::AddEntity(name) => write!(f, "addent \"{name}\""),
            Command::DeleteEntity(name) => write!(f, "delent \"{name}\""),
            Command::AddRelation {
                source,
                target,
                relation,
            } => write!(f, "addrel \"{source}\" \"{target}\" \"{relation}\""),
            Command::DeleteRelation {
                source,
                target,
                relation,
            } => write!(f, "delrel \"{source}\" \"{target}\" \"{relation}\""),
            Command::Report => f.write_str("report"),
            Command::End => f.write_str("end"),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Token<'a> {
    Word(&'a str),
    Quoted(&'a str),
}

type Tokens<'a> = SmallVec<[Token<'a>; 4]>;

fn tokenize(line: &str, line_no: usize) -> Result<Tokens<'_>> {
    let mut tokens = Tokens::new();
    let mut rest = line.trim_start();
    while !rest.is_empty() {
        if let Some(body) = rest.strip_prefix('"') {
            let close = body
                .find('"')
                .ok_or_else(|| GraphError::parse(line_no, "unterminated quoted name"))?;
            if close == 0 {
                return Err(GraphError::parse(line_no, "name expected inside quotes"));
            }
            tokens.push(Token::Quoted(&body[..close]));
            rest = &body[close + 1..];
            if rest.starts_with(|c: char| !c.is_whitespace()) {
                return Err(GraphError::parse(
                    line_no,
                    "expected whitespace after closing quote",
                ));
            }
        } else {
            let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
            tokens.push(Token::Word(&rest[..end]));
            rest = &rest[end..];
        }
        rest = rest.trim_start();
    }
    Ok(tokens)
}

fn names<'a>(
    keyword: &str,
    args: &[Token<'a>],
    expected: usize,
    line_no: usize,
) -> Result<SmallVec<[&'a str; 3]>> {
    if args.len() != expected {
        return Err(GraphError::parse(
            line_no,
            format!(
                "{keyword} takes {expected} quoted name(s), got {}",
                args.len()
            ),
        ));
    }
    args.iter()
        .map(|token| match token {
            Token::Quoted(name) => Ok(*name),
            Token::Word(word) => Err(GraphError::parse(
                line_no,
                format!("{keyword}: expected a quoted name, found `{word}`"),
            )),
        })
        .collect()
}

/// Parses one input line. Blank lines yield `Ok(None)`.
///
/// `line_no` is 1-based and only used in error messages.
pub fn parse_line(line: &str, line_no: usize) -> Result<Option<Command>> {
    let tokens = tokenize(line, line_no)?;
    let Some((head, args)) = tokens.split_first() else {
        return Ok(None);
    };
    let Token::Word(keyword) = head else {
        return Err(GraphError::parse(line_no, "line must start with a command"));
    };

    let command = match *keyword {
        "addent" => {
            let n = names(keyword, args, 1, line_no)?;
            Command::AddEntity(n[0].to_owned())
        }
        "delent" => {
            let n = names(keyword, args, 1, line_no)?;
            Command::DeleteEntity(n[0].to_owned())
        }
        "addrel" => {
            let n = names(keyword, args, 3, line_no)?;
            Command::AddRelation {
                source: n[0].to_owned(),
                target: n[1].to_owned(),
                relation: n[2].to_owned(),
            }
        }
        "delrel" => {
            let n = names(keyword, args, 3, line_no)?;
            Command::DeleteRelation {
                source: n[0].to_owned(),
                target: n[1].to_owned(),
                relation: n[2].to_owned(),
            }
        }
        "report" => {
            names(keyword, args, 0, line_no)?;
            Command::Report
        }
        "end" => {
            names(keyword, args, 0, line_no)?;
            Command::End
        }
        other => {
            return Err(GraphError::parse(
                line_no,
                format!("unknown command `{other}`"),
            ))
        }
    };
    Ok(Some(command))
}
