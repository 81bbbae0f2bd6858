#![forbid(unsafe_code)]

//! Text command front end.
//!
//! Parses the line-oriented command language and replays it against a
//! [`RelationSet`](crate::storage::RelationSet), rendering `report` output.

/// Command grammar and line parser.
pub mod command;
/// Command stream execution.
pub mod session;

pub use command::{parse_line, Command};
pub use session::{RunSummary, Session};
