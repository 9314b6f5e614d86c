//! Core logic for the banking command centre: the synthetic metrics
//! generator, derived-metric roll-ups, the threshold engine with its
//! bounded alert history, the rule-based query router, canned insight
//! narratives, and the key-value persistence abstraction.
//!
//! RULES:
//!   - All randomness flows through [`rng::DomainRng`] streams.
//!   - All persistence flows through the [`store::KvStore`] trait.
//!   - Snapshot and derived types are immutable records; each refresh
//!     builds fresh ones.

pub mod alerts;
pub mod catalog;
pub mod derived;
pub mod error;
pub mod generator;
pub mod insights;
pub mod query;
pub mod rng;
pub mod snapshot;
pub mod store;
pub mod thresholds;
pub mod types;
