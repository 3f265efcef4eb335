//! Low-area selection: the least hit blocks become the under-covered candidates.

use crate::{
    config::{check_percent, WarmupError},
    Addr, CandidateSet, HashMap, HitCount, HitCounts,
};

/// Blocks sharing one hit count.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoverEntry {
    pub cover_number: HitCount,
    pub addrs: Vec<Addr>,
}

/// Statistics of the hit counts kept by a selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoverStats {
    pub median: f64,
    pub min: HitCount,
    pub max: HitCount,
    pub avg: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LowArea {
    /// Selected blocks, least hit first.
    pub addrs: Vec<Addr>,
    /// Hit count of each selected block.
    pub cover_numbers: Vec<HitCount>,
    /// Number of blocks the selection was made from.
    pub total_blocks: usize,
    /// `None` if nothing was selected.
    pub stats: Option<CoverStats>,
}

impl LowArea {
    /// Candidate set selecting every block of the area.
    pub fn candidates(&self) -> CandidateSet {
        self.addrs.iter().map(|a| (*a, true)).collect()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.addrs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.addrs.is_empty()
    }
}

/// Group blocks by hit count, least hit first.
pub fn entries_from_hit_counts(hit_counts: &HitCounts) -> Vec<CoverEntry> {
    let mut groups: HashMap<HitCount, Vec<Addr>> = HashMap::new();
    for (addr, n) in hit_counts.iter() {
        groups.entry(*n).or_default().push(*addr);
    }
    let mut entries = groups
        .into_iter()
        .map(|(cover_number, mut addrs)| {
            addrs.sort_unstable();
            CoverEntry {
                cover_number,
                addrs,
            }
        })
        .collect::<Vec<_>>();
    entries.sort_unstable_by_key(|e| e.cover_number);
    entries
}

/// Select the lowest `percent` of blocks from `entries`, which must be ordered by
/// ascending hit count.
///
/// The blocks sharing the hit count found at the cut are excluded altogether, so a
/// group of equally hit blocks is never split.
pub fn select_low_area(entries: &[CoverEntry], percent: f64) -> Result<LowArea, WarmupError> {
    check_percent(percent)?;

    let mut addrs = Vec::new();
    let mut cover_numbers = Vec::new();
    for e in entries {
        addrs.extend_from_slice(&e.addrs);
        cover_numbers.extend(std::iter::repeat(e.cover_number).take(e.addrs.len()));
    }
    let total_blocks = addrs.len();
    if total_blocks == 0 {
        return Ok(LowArea::default());
    }

    let highlight = ((total_blocks as f64 * percent / 100.0) as usize).max(1);
    let chosen = cover_numbers[highlight - 1];
    let mut keep = highlight - 1;
    while keep > 0 && cover_numbers[keep - 1] == chosen {
        keep -= 1;
    }
    addrs.truncate(keep);
    cover_numbers.truncate(keep);

    let stats = cover_stats(&cover_numbers);
    Ok(LowArea {
        addrs,
        cover_numbers,
        total_blocks,
        stats,
    })
}

fn cover_stats(cover_numbers: &[HitCount]) -> Option<CoverStats> {
    if cover_numbers.is_empty() {
        return None;
    }
    let mut sorted = cover_numbers.to_vec();
    sorted.sort_unstable();
    let n = sorted.len();
    let median = if n % 2 == 1 {
        f64::from(sorted[n / 2])
    } else {
        (f64::from(sorted[n / 2 - 1]) + f64::from(sorted[n / 2])) / 2.0
    };
    let sum: u64 = sorted.iter().map(|c| u64::from(*c)).sum();
    Some(CoverStats {
        median,
        min: sorted[0],
        max: sorted[n - 1],
        avg: sum as f64 / n as f64,
    })
}
