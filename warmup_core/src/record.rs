use crate::{exec::CallExecInfo, snapshot::UnderCovered, Addr, WarmupCalls};

/// Under-covered blocks one call managed to hit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WarmupCall {
    pub warmed: Vec<Addr>,
}

impl UnderCovered {
    /// Record the under-covered blocks hit by call `call` into `calls`.
    ///
    /// Missing execution result or empty overlap leaves `calls` untouched; `calls` is
    /// created on the first recorded call.
    pub fn check_per_call(
        &self,
        info: Option<&CallExecInfo>,
        call: usize,
        calls: &mut Option<WarmupCalls>,
    ) {
        let info = match info {
            Some(info) => info,
            None => {
                self.stats().inc_no_exec_result();
                warmup_debug!("no execution result for call {}", call);
                return;
            }
        };

        let warmed = self.find_overlap(&info.cover);
        if warmed.is_empty() {
            self.stats().inc_no_overlap();
            warmup_debug!("no overlap for call {}", call);
            return;
        }

        let n = warmed.len();
        calls
            .get_or_insert_with(WarmupCalls::new)
            .insert(call, WarmupCall { warmed });
        self.stats().inc_warmed_calls();
        warmup_info!(
            "call {}: {} blocks overlapped with the under-covered ones",
            call,
            n
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn under_covered(addrs: &[Addr]) -> UnderCovered {
        let uc = UnderCovered::new();
        uc.update(addrs.iter().copied().collect());
        uc
    }

    #[test]
    fn missing_result_is_noop() {
        let uc = under_covered(&[1, 2]);
        let mut calls = None;
        uc.check_per_call(None, 0, &mut calls);
        assert!(calls.is_none());
        assert_eq!(uc.stats().snapshot().no_exec_result, 1);
    }

    #[test]
    fn no_overlap_is_noop() {
        let uc = under_covered(&[1, 2]);
        let info = CallExecInfo::new(vec![3, 4]);

        let mut calls = None;
        uc.check_per_call(Some(&info), 0, &mut calls);
        assert!(calls.is_none());

        let mut existing = Some(WarmupCalls::new());
        uc.check_per_call(Some(&info), 0, &mut existing);
        assert_eq!(existing, Some(WarmupCalls::new()));
        assert_eq!(uc.stats().snapshot().no_overlap, 2);
    }

    #[test]
    fn records_overlap_per_call() {
        let uc = under_covered(&[1, 2, 5]);
        let mut calls = None;

        uc.check_per_call(Some(&CallExecInfo::new(vec![2, 3, 2])), 1, &mut calls);
        uc.check_per_call(Some(&CallExecInfo::new(vec![5])), 4, &mut calls);

        let calls = calls.unwrap();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls.get(&1).unwrap().warmed, vec![2, 2]);
        assert_eq!(calls.get(&4).unwrap().warmed, vec![5]);
        assert_eq!(uc.stats().snapshot().warmed_calls, 2);
    }

    #[test]
    fn later_record_replaces_same_call() {
        let uc = under_covered(&[1, 2]);
        let mut calls = None;
        uc.check_per_call(Some(&CallExecInfo::new(vec![1])), 0, &mut calls);
        uc.check_per_call(Some(&CallExecInfo::new(vec![2])), 0, &mut calls);
        assert_eq!(calls.unwrap().get(&0).unwrap().warmed, vec![2]);
    }
}
