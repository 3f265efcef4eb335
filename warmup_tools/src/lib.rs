//! Offline tools around the warmup heuristic: low-area selection over recorded hit
//! counts, averaging of selection statistics, and replay of a warmup session.

use anyhow::Context;
use serde_derive::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fs::{create_dir_all, read_to_string, write},
    path::{Path, PathBuf},
};
use warmup_core::{
    select::{select_low_area, CoverEntry, LowArea},
    snapshot::under_covered_of,
    Addr, HitCount, HitCounts, Warmup, WarmupConfig,
};

#[derive(Debug, Deserialize)]
struct RawEntry {
    #[serde(rename = "CoverNumber", default)]
    cover_number: HitCount,
    #[serde(rename = "BBAddressList", default)]
    addrs: Vec<Addr>,
}

/// Recorded hit counts, either a bare list of entries or wrapped in `SelectedBBs`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CoverFile {
    List(Vec<RawEntry>),
    Selected {
        #[serde(rename = "SelectedBBs")]
        selected: Vec<RawEntry>,
    },
}

impl CoverFile {
    fn into_entries(self) -> Vec<CoverEntry> {
        let raw = match self {
            CoverFile::List(l) => l,
            CoverFile::Selected { selected } => selected,
        };
        raw.into_iter()
            .map(|r| CoverEntry {
                cover_number: r.cover_number,
                addrs: r.addrs,
            })
            .collect()
    }
}

pub fn load_cover_entries(path: &Path) -> anyhow::Result<Vec<CoverEntry>> {
    let content = read_to_string(path)
        .with_context(|| format!("failed to read cover file: {}", path.display()))?;
    let f: CoverFile = serde_json::from_str(&content)
        .with_context(|| format!("unsupported cover file: {}", path.display()))?;
    Ok(f.into_entries())
}

pub fn hit_counts_of(entries: &[CoverEntry]) -> HitCounts {
    let mut hit_counts = HitCounts::new();
    for e in entries {
        for addr in &e.addrs {
            hit_counts.insert(*addr, e.cover_number);
        }
    }
    hit_counts
}

/// Selection result as written to disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilteredArea {
    #[serde(rename = "FilteredBBAddressList")]
    pub addrs: Vec<Addr>,
    #[serde(rename = "FilteredCoverNumberList")]
    pub cover_numbers: Vec<HitCount>,
    #[serde(rename = "TotalBlocks")]
    pub total_blocks: usize,
    #[serde(rename = "MedianCoverNumber")]
    pub median: Option<f64>,
    #[serde(rename = "MinCoverNumber")]
    pub min: Option<HitCount>,
    #[serde(rename = "MaxCoverNumber")]
    pub max: Option<HitCount>,
    #[serde(rename = "AvgCoverNumber")]
    pub avg: Option<f64>,
}

impl From<LowArea> for FilteredArea {
    fn from(area: LowArea) -> Self {
        let stats = area.stats;
        Self {
            addrs: area.addrs,
            cover_numbers: area.cover_numbers,
            total_blocks: area.total_blocks,
            median: stats.map(|s| s.median),
            min: stats.map(|s| s.min),
            max: stats.map(|s| s.max),
            avg: stats.map(|s| s.avg),
        }
    }
}

/// Run low-area selection over each input file, write one filtered file per input into
/// `output_dir`. Inputs that fail to load or select no block are skipped. Returns the
/// written paths.
pub fn low_area_files(
    inputs: &[PathBuf],
    percent: f64,
    output_dir: &Path,
) -> anyhow::Result<Vec<PathBuf>> {
    create_dir_all(output_dir)
        .with_context(|| format!("failed to create output dir: {}", output_dir.display()))?;
    let mut written = Vec::new();

    for (idx, input) in inputs.iter().enumerate().map(|(i, f)| (i + 1, f)) {
        let entries = match load_cover_entries(input) {
            Ok(e) => e,
            Err(e) => {
                log::warn!("skip {}: {:#}", input.display(), e);
                continue;
            }
        };
        let area = select_low_area(&entries, percent)?;
        if area.stats.is_none() {
            log::warn!(
                "skip {}: no block selected out of {}",
                input.display(),
                area.total_blocks
            );
            continue;
        }
        let file_name = input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let out = output_dir.join(format!("filtered_{}_{}", file_name, idx));

        let filtered = FilteredArea::from(area);
        let content = serde_json::to_string_pretty(&filtered)?;
        write(&out, content).with_context(|| format!("failed to write: {}", out.display()))?;

        log::info!(
            "{}_{}: total blocks {}, filtered {}, median/min/max/avg {:?}/{:?}/{:?}/{:?}",
            file_name,
            idx,
            filtered.total_blocks,
            filtered.addrs.len(),
            filtered.median,
            filtered.min,
            filtered.max,
            filtered.avg
        );
        written.push(out);
    }
    Ok(written)
}

const METRICS: [&str; 4] = [
    "MedianCoverNumber",
    "MinCoverNumber",
    "MaxCoverNumber",
    "AvgCoverNumber",
];

/// Mean of each selection statistic over the filtered files in `inputs`.
///
/// A metric missing from a file counts as 0. Unreadable files and files without a
/// non-empty json object are skipped. Metrics without any value are left out.
pub fn average_metrics(inputs: &[PathBuf]) -> BTreeMap<String, f64> {
    let mut values: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for input in inputs {
        let data = match read_to_string(input)
            .map_err(anyhow::Error::from)
            .and_then(|c| serde_json::from_str::<serde_json::Value>(&c).map_err(Into::into))
        {
            Ok(serde_json::Value::Object(d)) if !d.is_empty() => d,
            Ok(_) => {
                log::warn!("skip {}: no statistics", input.display());
                continue;
            }
            Err(e) => {
                log::warn!("error loading file {}: {}", input.display(), e);
                continue;
            }
        };
        for m in METRICS.iter() {
            let v = data.get(*m).and_then(|v| v.as_f64()).unwrap_or(0.0);
            values.entry(*m).or_default().push(v);
        }
    }

    values
        .into_iter()
        .filter(|(_, v)| !v.is_empty())
        .map(|(m, v)| (m.to_string(), v.iter().sum::<f64>() / v.len() as f64))
        .collect()
}

pub fn average_files(inputs: &[PathBuf], output: &Path) -> anyhow::Result<BTreeMap<String, f64>> {
    let averages = average_metrics(inputs);
    let content = serde_json::to_string_pretty(&averages)?;
    write(output, content).with_context(|| format!("failed to write: {}", output.display()))?;
    Ok(averages)
}

pub fn load_config(path: &Path) -> anyhow::Result<WarmupConfig> {
    let content = read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    let config: WarmupConfig = serde_json::from_str(&content)
        .with_context(|| format!("bad config: {}", path.display()))?;
    Ok(config)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplaySummary {
    pub selected: usize,
    pub still_selected: usize,
    pub denied_last: u32,
    pub deny_list: u32,
    pub suppressed: usize,
}

/// Drive one warmup session over fixed hit counts for `rounds` scheduling rounds.
pub fn replay(
    entries: &[CoverEntry],
    config: WarmupConfig,
    rounds: usize,
) -> anyhow::Result<ReplaySummary> {
    let mut warmup = Warmup::with_config(config).context("warmup config error")?;
    let hit_counts = hit_counts_of(entries);
    let area = warmup.low_area(&hit_counts);
    log::info!(
        "low area: {} of {} blocks selected",
        area.len(),
        area.total_blocks
    );

    let mut candidates = area.candidates();
    let mut denied_last = 0;
    let mut deny_list = 0;
    for round in 0..rounds {
        denied_last = warmup.deny_check(Some(&mut candidates), Some(&hit_counts));
        deny_list = warmup.update_deny_list(Some(&candidates), Some(&hit_counts));
        warmup.update(under_covered_of(&candidates));
        log::debug!(
            "round {}: denied {}, deny list {}",
            round,
            denied_last,
            deny_list
        );
    }
    warmup.stats().report();

    Ok(ReplaySummary {
        selected: area.len(),
        still_selected: candidates.values().filter(|s| **s).count(),
        denied_last,
        deny_list,
        suppressed: warmup.deny_list().suppressed_count(),
    })
}
