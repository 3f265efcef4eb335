//! Coverage warmup heuristic of healer.
//!
//! Keeps the under-covered basic blocks the scheduler wants to explore, and a deny list
//! that stops re-selecting blocks whose hit count makes no progress.

use ahash::{AHashMap, AHashSet};

#[macro_use]
pub mod warmup_log;
pub mod config;
pub mod deny;
pub mod exec;
pub mod overlap;
pub mod record;
pub mod select;
pub mod snapshot;
pub mod stats;
pub mod warmup;

pub use crate::{
    config::{WarmupConfig, WarmupError},
    deny::{DenyInfo, DenyList},
    exec::CallExecInfo,
    record::WarmupCall,
    snapshot::UnderCovered,
    stats::{Stats, StatsSnapshot},
    warmup::Warmup,
};

pub type HashMap<K, V> = AHashMap<K, V>;
pub type HashSet<V> = AHashSet<V>;

/// Address of one basic block.
pub type Addr = u64;
/// Number of times one basic block has been hit so far.
pub type HitCount = u32;

/// Blocks the scheduler currently prioritizes.
pub type UnderCoveredSet = HashSet<Addr>;
/// Candidate blocks and whether each is currently selected.
pub type CandidateSet = HashMap<Addr, bool>;
/// Latest hit count of each block.
pub type HitCounts = HashMap<Addr, HitCount>;
/// Warmed blocks recorded per call index of one prog.
pub type WarmupCalls = HashMap<usize, WarmupCall>;
