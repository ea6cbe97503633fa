use std::{collections::BTreeMap, fs, path::Path};

use anyhow::{Context, Result};
use log::warn;
use megh_core::{Pos, RunSummary};
use serde::{Deserialize, Serialize};

pub const ATTEMPTS_PER_DAY: u8 = 3;

/// Best result and remaining tries for one daily seed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    pub seed: i64,
    pub optimal_length: usize,
    pub best_score: Option<usize>,
    #[serde(default)]
    pub best_path: Vec<Pos>,
    pub best_time_ms: Option<u64>,
    pub attempts_left: u8,
}

impl DailyRecord {
    pub fn new(seed: i64, optimal_length: usize) -> Self {
        Self { seed, optimal_length, best_score: None, best_path: Vec::new(), best_time_ms: None, attempts_left: ATTEMPTS_PER_DAY }
    }

    pub fn solved_optimally(&self) -> bool { self.best_score == Some(self.optimal_length) }

    fn beats_best(&self, steps: usize, time_ms: u64) -> bool {
        match (self.best_score, self.best_time_ms) {
            (None, _) => true,
            (Some(best), _) if steps < best => true,
            (Some(best), Some(t)) => steps == best && time_ms < t,
            (Some(best), None) => steps == best,
        }
    }
}

/// What recording an attempt changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recorded { NewBest, Solved, AttemptLost { attempts_left: u8 } }

/// Daily records keyed by seed, stored as one JSON object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordBook { days: BTreeMap<i64, DailyRecord> }

impl RecordBook {
    /// A missing or unreadable file yields an empty book.
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        let Ok(text) = fs::read_to_string(path) else { return Self::default() };
        serde_json::from_str(&text).unwrap_or_else(|e| {
            warn!("ignoring malformed record file {}: {e}", path.display());
            Self::default()
        })
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path.as_ref(), json).with_context(|| format!("writing {}", path.as_ref().display()))
    }

    pub fn get(&self, seed: i64) -> Option<&DailyRecord> { self.days.get(&seed) }

    pub fn iter(&self) -> impl Iterator<Item = &DailyRecord> { self.days.values() }

    pub fn attempts_left(&self, seed: i64) -> u8 { self.get(seed).map_or(ATTEMPTS_PER_DAY, |r| r.attempts_left) }

    /// Applies the daily policy: a loss costs an attempt, a win keeps the
    /// better of the old and new results.
    pub fn record(&mut self, run: &RunSummary) -> Recorded {
        let entry = self.days.entry(run.seed).or_insert_with(|| DailyRecord::new(run.seed, run.optimal_length));
        if !run.won {
            entry.attempts_left = entry.attempts_left.saturating_sub(1);
            return Recorded::AttemptLost { attempts_left: entry.attempts_left };
        }
        let time_ms = run.elapsed_ms.max(0.0).round() as u64;
        if !entry.beats_best(run.steps, time_ms) { return Recorded::Solved; }
        entry.best_score = Some(run.steps);
        entry.best_time_ms = Some(time_ms);
        entry.best_path = run.path.clone();
        Recorded::NewBest
    }
}
