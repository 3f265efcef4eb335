//! Per-fuzzer log prefix.
//!
//! Each fuzzer thread records its warmed calls on the shared snapshot, so every line
//! logged from the heuristic carries the id of the thread that produced it.

use std::cell::Cell;

thread_local! {
    static FUZZER_ID: Cell<u64> = Cell::new(0);
}

#[inline]
pub fn set_fuzzer_id(id: u64) {
    FUZZER_ID.with(|r| r.set(id));
}

#[inline]
pub fn fuzzer_id() -> u64 {
    FUZZER_ID.with(|r| r.get())
}

#[macro_export]
macro_rules! warmup_debug {
    ($t: tt) => (
        log::debug!(std::concat!("fuzzer-{}: ", $t), $crate::warmup_log::fuzzer_id())
    );
    ($t: tt, $($arg:tt)*) => (
        log::debug!(std::concat!("fuzzer-{}: ", $t), $crate::warmup_log::fuzzer_id(), $($arg)*)
    )
}

#[macro_export]
macro_rules! warmup_info {
    ($t: tt) => (
        log::info!(std::concat!("fuzzer-{}: ", $t), $crate::warmup_log::fuzzer_id())
    );
    ($t: tt, $($arg:tt)*) => (
        log::info!(std::concat!("fuzzer-{}: ", $t), $crate::warmup_log::fuzzer_id(), $($arg)*)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn fuzzer_id_is_thread_local() {
        set_fuzzer_id(3);
        let other = thread::spawn(|| {
            let before = fuzzer_id();
            set_fuzzer_id(7);
            (before, fuzzer_id())
        })
        .join()
        .unwrap();
        assert_eq!(other, (0, 7));
        assert_eq!(fuzzer_id(), 3);
    }
}
