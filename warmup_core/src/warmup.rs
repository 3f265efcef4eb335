use crate::{
    config::{WarmupConfig, WarmupError},
    deny::DenyList,
    exec::CallExecInfo,
    select::{entries_from_hit_counts, select_low_area, LowArea},
    snapshot::UnderCovered,
    stats::Stats,
    Addr, CandidateSet, HitCounts, UnderCoveredSet, WarmupCalls,
};
use std::sync::Arc;

/// Warmup state of one fuzzing session.
///
/// The under-covered snapshot is shared with fuzzer threads through [`Warmup::under_covered`],
/// the deny list is only touched through `&mut self` by the scheduler.
#[derive(Debug)]
pub struct Warmup {
    under_covered: Arc<UnderCovered>,
    deny_list: DenyList,
    config: WarmupConfig,
}

impl Default for Warmup {
    fn default() -> Self {
        Self {
            under_covered: Arc::new(UnderCovered::new()),
            deny_list: DenyList::new(),
            config: WarmupConfig::default(),
        }
    }
}

impl Warmup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: WarmupConfig) -> Result<Self, WarmupError> {
        config.check()?;
        Ok(Self {
            under_covered: Arc::new(UnderCovered::new()),
            deny_list: DenyList::with_threshold(config.deny_threshold),
            config,
        })
    }

    /// Publish a new under-covered snapshot.
    pub fn update(&self, set: UnderCoveredSet) {
        self.under_covered.update(set);
    }

    pub fn current_snapshot(&self) -> Arc<UnderCoveredSet> {
        self.under_covered.current()
    }

    /// See [`DenyList::deny_check`].
    pub fn deny_check(
        &mut self,
        candidates: Option<&mut CandidateSet>,
        hit_counts: Option<&HitCounts>,
    ) -> u32 {
        let denied = self.deny_list.deny_check(candidates, hit_counts);
        let stats = self.under_covered.stats();
        stats.add_denied(u64::from(denied));
        stats.set_suppressed(self.deny_list.suppressed_count() as u64);
        denied
    }

    /// See [`DenyList::update_deny_list`].
    pub fn update_deny_list(
        &mut self,
        candidates: Option<&CandidateSet>,
        hit_counts: Option<&HitCounts>,
    ) -> u32 {
        let n = self.deny_list.update_deny_list(candidates, hit_counts);
        let stats = self.under_covered.stats();
        stats.set_deny_list(self.deny_list.len() as u64);
        stats.set_suppressed(self.deny_list.suppressed_count() as u64);
        n
    }

    pub fn find_overlap(&self, covered: &[Addr]) -> Vec<Addr> {
        self.under_covered.find_overlap(covered)
    }

    /// See [`UnderCovered::check_per_call`].
    pub fn check_per_call(
        &self,
        info: Option<&CallExecInfo>,
        call: usize,
        calls: &mut Option<WarmupCalls>,
    ) {
        self.under_covered.check_per_call(info, call, calls)
    }

    /// Lowest hit blocks of `hit_counts`, by the configured percentage.
    pub fn low_area(&self, hit_counts: &HitCounts) -> LowArea {
        let entries = entries_from_hit_counts(hit_counts);
        // percentage already validated by `WarmupConfig::check`.
        select_low_area(&entries, self.config.low_area_percent).unwrap_or_default()
    }

    /// Handle to the shared snapshot, for fuzzer threads.
    pub fn under_covered(&self) -> Arc<UnderCovered> {
        Arc::clone(&self.under_covered)
    }

    pub fn deny_list(&self) -> &DenyList {
        &self.deny_list
    }

    pub fn stats(&self) -> &Arc<Stats> {
        self.under_covered.stats()
    }

    pub fn config(&self) -> &WarmupConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{deny::DenyInfo, snapshot::under_covered_of};
    use std::thread;

    fn candidates(items: &[(Addr, bool)]) -> CandidateSet {
        items.iter().copied().collect()
    }

    fn hits(items: &[(Addr, u32)]) -> HitCounts {
        items.iter().copied().collect()
    }

    #[test]
    fn suppression_scenario() {
        let mut warmup = Warmup::new();
        let mut c = candidates(&[(1, true), (2, true)]);
        let h = hits(&[(1, 5), (2, 5)]);

        assert_eq!(warmup.update_deny_list(Some(&c), Some(&h)), 2);
        assert_eq!(warmup.deny_list().get(1), Some(&DenyInfo::new(5)));
        assert_eq!(warmup.deny_list().get(2), Some(&DenyInfo::new(5)));

        for _ in 0..10 {
            warmup.update_deny_list(Some(&c), Some(&h));
        }
        assert_eq!(warmup.deny_list().get(1).unwrap().no_progress, 10);
        assert_eq!(warmup.deny_list().suppressed_count(), 0);

        warmup.update_deny_list(Some(&c), Some(&h));
        for addr in [1, 2].iter() {
            let info = warmup.deny_list().get(*addr).unwrap();
            assert_eq!(info.no_progress, 11);
            assert!(info.suppressed);
        }

        assert_eq!(warmup.deny_check(Some(&mut c), Some(&h)), 2);
        assert_eq!(c, candidates(&[(1, false), (2, false)]));

        let h = hits(&[(1, 9), (2, 5)]);
        assert_eq!(warmup.deny_check(Some(&mut c), Some(&h)), 1);
        assert_eq!(c, candidates(&[(1, true), (2, false)]));
        assert_eq!(warmup.deny_list().get(1), Some(&DenyInfo::new(9)));

        let s = warmup.stats().snapshot();
        assert_eq!(s.denied_total, 3);
        assert_eq!(s.deny_list, 2);
        assert_eq!(s.suppressed, 1);
    }

    #[test]
    fn publish_and_record() {
        let mut warmup = Warmup::new();
        let h = hits(&[(1, 1), (2, 1), (3, 50), (4, 70)]);
        let mut c = candidates(&[(1, true), (2, true)]);
        warmup.deny_check(Some(&mut c), Some(&h));
        warmup.update_deny_list(Some(&c), Some(&h));
        warmup.update(under_covered_of(&c));

        let shared = warmup.under_covered();
        let handle = thread::spawn(move || {
            let mut calls = None;
            let info = CallExecInfo::new(vec![4, 2, 3, 1, 2]);
            shared.check_per_call(Some(&info), 0, &mut calls);
            calls
        });
        let calls = handle.join().unwrap().unwrap();
        assert_eq!(calls.get(&0).unwrap().warmed, vec![2, 1, 2]);
        assert_eq!(warmup.stats().snapshot().warmed_calls, 1);
        assert_eq!(warmup.find_overlap(&[3, 1]), vec![1]);
    }

    #[test]
    fn low_area_uses_configured_percent() {
        let warmup = Warmup::with_config(WarmupConfig {
            deny_threshold: 10,
            low_area_percent: 50.0,
        })
        .unwrap();
        let h = hits(&[(1, 1), (2, 2), (3, 3), (4, 4)]);
        assert_eq!(warmup.low_area(&h).addrs, vec![1]);
    }

    #[test]
    fn invalid_config_rejected() {
        let r = Warmup::with_config(WarmupConfig {
            deny_threshold: 0,
            low_area_percent: 10.0,
        });
        assert!(r.is_err());
    }

    #[test]
    fn configured_threshold_reaches_deny_list() {
        let warmup = Warmup::with_config(WarmupConfig {
            deny_threshold: 3,
            ..Default::default()
        })
        .unwrap();
        assert_eq!(warmup.deny_list().threshold(), 3);
    }
}
