//! Published under-covered snapshot.

use crate::{stats::Stats, CandidateSet, UnderCoveredSet};
use arc_swap::ArcSwap;
use std::{fmt, sync::Arc};

/// Under-covered blocks shared by all fuzzer threads.
///
/// The set is replaced as a whole and never modified after publication, so readers
/// only ever see a complete old set or a complete new one. Loading it takes no lock.
pub struct UnderCovered {
    inner: ArcSwap<UnderCoveredSet>,
    stats: Arc<Stats>,
}

impl Default for UnderCovered {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for UnderCovered {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnderCovered")
            .field("len", &self.len())
            .finish()
    }
}

impl UnderCovered {
    pub fn new() -> Self {
        Self::with_stats(Arc::new(Stats::new()))
    }

    pub fn with_stats(stats: Arc<Stats>) -> Self {
        Self {
            inner: ArcSwap::from_pointee(UnderCoveredSet::new()),
            stats,
        }
    }

    /// Publish `set`, replacing the current snapshot.
    pub fn update(&self, set: UnderCoveredSet) {
        self.stats.set_under_covered(set.len() as u64);
        self.inner.store(Arc::new(set));
    }

    /// Most recently published snapshot.
    #[inline]
    pub fn current(&self) -> Arc<UnderCoveredSet> {
        self.inner.load_full()
    }

    pub fn len(&self) -> usize {
        self.inner.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.load().is_empty()
    }

    #[inline]
    pub fn stats(&self) -> &Arc<Stats> {
        &self.stats
    }

    /// Guard over the current snapshot, for a consistent view within one operation.
    #[inline]
    pub(crate) fn load(&self) -> arc_swap::Guard<Arc<UnderCoveredSet>> {
        self.inner.load()
    }
}

/// Under-covered set made of every block present in `candidates`.
///
/// Membership is by presence: blocks deselected by the deny list stay in the set.
pub fn under_covered_of(candidates: &CandidateSet) -> UnderCoveredSet {
    candidates.keys().copied().collect()
}
