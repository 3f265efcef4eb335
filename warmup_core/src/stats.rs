use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct Stats {
    under_covered: AtomicU64,
    deny_list: AtomicU64,
    suppressed: AtomicU64,
    denied_total: AtomicU64,
    warmed_calls: AtomicU64,
    no_overlap: AtomicU64,
    no_exec_result: AtomicU64,
}

/// Plain copy of [`Stats`] at one moment.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub under_covered: u64,
    pub deny_list: u64,
    pub suppressed: u64,
    pub denied_total: u64,
    pub warmed_calls: u64,
    pub no_overlap: u64,
    pub no_exec_result: u64,
}

impl Stats {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn set_under_covered(&self, n: u64) {
        self.under_covered.store(n, Ordering::Relaxed);
    }

    pub(crate) fn set_deny_list(&self, n: u64) {
        self.deny_list.store(n, Ordering::Relaxed);
    }

    pub(crate) fn set_suppressed(&self, n: u64) {
        self.suppressed.store(n, Ordering::Relaxed);
    }

    pub(crate) fn add_denied(&self, n: u64) {
        self.denied_total.fetch_add(n, Ordering::Relaxed);
    }

    pub(crate) fn inc_warmed_calls(&self) {
        self.warmed_calls.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn inc_no_overlap(&self) {
        self.no_overlap.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn inc_no_exec_result(&self) {
        self.no_exec_result.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            under_covered: self.under_covered.load(Ordering::Relaxed),
            deny_list: self.deny_list.load(Ordering::Relaxed),
            suppressed: self.suppressed.load(Ordering::Relaxed),
            denied_total: self.denied_total.load(Ordering::Relaxed),
            warmed_calls: self.warmed_calls.load(Ordering::Relaxed),
            no_overlap: self.no_overlap.load(Ordering::Relaxed),
            no_exec_result: self.no_exec_result.load(Ordering::Relaxed),
        }
    }

    pub fn report(&self) {
        let s = self.snapshot();
        log::info!(
            "under-covered: {}, deny/suppressed {}/{}, denied: {}, warmed calls: {}, no overlap/result {}/{}",
            s.under_covered,
            s.deny_list,
            s.suppressed,
            s.denied_total,
            s.warmed_calls,
            s.no_overlap,
            s.no_exec_result
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate_and_gauges_overwrite() {
        let stats = Stats::new();
        stats.add_denied(2);
        stats.add_denied(1);
        stats.inc_warmed_calls();
        stats.set_deny_list(5);
        stats.set_deny_list(4);

        let s = stats.snapshot();
        assert_eq!(s.denied_total, 3);
        assert_eq!(s.warmed_calls, 1);
        assert_eq!(s.deny_list, 4);
        assert_eq!(s.no_overlap, 0);
    }
}
