//! Execution result consumed by the warmup recorder.

use crate::Addr;

/// Execution of one call.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CallExecInfo {
    /// Block coverage, in the order reported by the executor.
    pub cover: Vec<Addr>,
}

impl CallExecInfo {
    pub fn new(cover: Vec<Addr>) -> Self {
        Self { cover }
    }
}

impl From<Vec<Addr>> for CallExecInfo {
    fn from(cover: Vec<Addr>) -> Self {
        Self::new(cover)
    }
}
