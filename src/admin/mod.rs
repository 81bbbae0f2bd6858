//! Administrative introspection over a [`RelationSet`](crate::storage::RelationSet).
//!
//! Provides the structural verifier used by tests and by the `verify`
//! command, plus simple counters.

mod stats;
mod verify;

pub use stats::{stats, RelationStats, StatsReport};
pub use verify::{
    verify, verify_relation, VerifyCounts, VerifyFinding, VerifyReport, VerifySeverity,
};
