//! Deny list of under-covered blocks that stopped making progress.
//!
//! Every maintenance pass compares the tracked hit count of a block with its latest one.
//! A block whose count stays the same for more than `threshold` passes gets suppressed,
//! and is deselected from candidate sets until its count moves again.

use crate::{config::DEFAULT_DENY_THRESHOLD, Addr, CandidateSet, HashMap, HitCount, HitCounts};

/// Bookkeeping of one tracked block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DenyInfo {
    /// Hit count observed when the entry was last reset.
    pub hit_count: HitCount,
    /// Consecutive maintenance passes without hit count change.
    pub no_progress: u32,
    /// Excluded from candidate sets.
    pub suppressed: bool,
}

impl DenyInfo {
    pub fn new(hit_count: HitCount) -> Self {
        Self {
            hit_count,
            no_progress: 0,
            suppressed: false,
        }
    }

    fn reset(&mut self, hit_count: HitCount) {
        *self = Self::new(hit_count);
    }
}

#[derive(Debug, Clone)]
pub struct DenyList {
    entries: HashMap<Addr, DenyInfo>,
    threshold: u32,
}

impl Default for DenyList {
    fn default() -> Self {
        Self::new()
    }
}

impl DenyList {
    pub fn new() -> Self {
        Self::with_threshold(DEFAULT_DENY_THRESHOLD)
    }

    pub fn with_threshold(threshold: u32) -> Self {
        Self {
            entries: HashMap::new(),
            threshold,
        }
    }

    /// Deselect suppressed candidates whose hit count has not changed, returns the
    /// number of deselected candidates.
    ///
    /// A suppressed candidate whose hit count changed is released: its entry is reset and
    /// it is selected again. Candidates that are untracked, have no known hit count, or
    /// are tracked but not suppressed keep their flag. `candidates` is modified in place.
    pub fn deny_check(
        &mut self,
        candidates: Option<&mut CandidateSet>,
        hit_counts: Option<&HitCounts>,
    ) -> u32 {
        let candidates = match candidates {
            Some(c) if !c.is_empty() => c,
            _ => return 0,
        };
        let hit_counts = match hit_counts {
            Some(h) if !h.is_empty() => h,
            _ => return 0,
        };
        if self.entries.is_empty() {
            return 0;
        }

        let mut denied = 0;
        let mut released = 0;
        for (addr, selected) in candidates.iter_mut() {
            let info = match self.entries.get_mut(addr) {
                Some(info) => info,
                None => continue,
            };
            let hit_count = match hit_counts.get(addr) {
                Some(h) => *h,
                None => continue,
            };
            if !info.suppressed {
                continue;
            }

            if info.hit_count == hit_count {
                *selected = false;
                denied += 1;
            } else {
                info.reset(hit_count);
                *selected = true;
                released += 1;
            }
        }

        log::debug!(
            "deny check: {} candidates, {} denied, {} released",
            candidates.len(),
            denied,
            released
        );
        denied
    }

    /// Age tracked entries against `hit_counts` and admit newly selected candidates,
    /// returns the size of the deny list afterwards.
    pub fn update_deny_list(
        &mut self,
        candidates: Option<&CandidateSet>,
        hit_counts: Option<&HitCounts>,
    ) -> u32 {
        let (candidates, hit_counts) = match (candidates, hit_counts) {
            (Some(c), Some(h)) => (c, h),
            _ => return 0,
        };

        let mut newly_suppressed = 0;
        for (addr, info) in self.entries.iter_mut() {
            let hit_count = match hit_counts.get(addr) {
                Some(h) => *h,
                None => continue,
            };
            if info.hit_count == hit_count {
                info.no_progress = info.no_progress.saturating_add(1);
                if info.no_progress > self.threshold && !info.suppressed {
                    info.suppressed = true;
                    newly_suppressed += 1;
                }
            } else {
                info.reset(hit_count);
            }
        }

        let mut admitted = 0;
        for (addr, selected) in candidates.iter() {
            if !*selected || self.entries.contains_key(addr) {
                continue;
            }
            if let Some(h) = hit_counts.get(addr) {
                self.entries.insert(*addr, DenyInfo::new(*h));
                admitted += 1;
            }
        }

        log::debug!(
            "deny list updated: {} admitted, {} newly suppressed, {} tracked",
            admitted,
            newly_suppressed,
            self.entries.len()
        );
        self.entries.len() as u32
    }

    #[inline]
    pub fn get(&self, addr: Addr) -> Option<&DenyInfo> {
        self.entries.get(&addr)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    pub fn suppressed_count(&self) -> usize {
        self.entries.values().filter(|i| i.suppressed).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Addr, &DenyInfo)> {
        self.entries.iter()
    }
}
