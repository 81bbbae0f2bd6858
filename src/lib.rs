//! Relgraph: named relations over named entities, each relation kept in
//! indegree order so its maximum-indegree entities can be reported
//! without a scan.
//!
//! The core lives in [`storage`]; [`cli`] replays text command streams
//! and [`admin`] checks structural invariants.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod admin;
pub mod cli;
pub mod config;
pub mod error;
pub mod primitives;
pub mod report;
pub mod storage;

pub use config::Config;
pub use error::{GraphError, Result};
pub use report::{RelationReport, Report};
pub use storage::{Relation, RelationSet};
