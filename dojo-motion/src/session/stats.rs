//! Session results and the last/best stats record

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Final counters of one completed session
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResult {
    pub count: u32,
    pub duration_seconds: u32,
    pub date: String,
}

impl SessionResult {
    pub fn new(count: u32, duration_seconds: u32, date: impl Into<String>) -> Self {
        Self {
            count,
            duration_seconds,
            date: date.into(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PreviousStats {
    pub last_session: Option<SessionResult>,
    pub best_session: Option<SessionResult>,
    pub total_sessions: u32,
    pub total_reps: u64,
}

impl PreviousStats {
    /// Fold a finished session into the record
    pub fn record(&mut self, result: &SessionResult) {
        let is_best = self
            .best_session
            .as_ref()
            .map_or(true, |best| result.count > best.count);
        if is_best {
            self.best_session = Some(result.clone());
        }
        self.last_session = Some(result.clone());
        self.total_sessions += 1;
        self.total_reps += u64::from(result.count);
    }
}

/// Storage key for an exercise's record
pub fn stats_key(exercise: &str) -> String {
    format!("{}Stats", exercise)
}

/// Persistence collaborator; saving is fire-and-forget
pub trait StatsStore {
    fn load_previous_stats(&self, exercise: &str) -> PreviousStats;

    fn save_session_result(&mut self, exercise: &str, result: &SessionResult);
}

/// In-process store for native use and tests
#[derive(Debug, Default)]
pub struct MemoryStatsStore {
    records: HashMap<String, PreviousStats>,
}

impl MemoryStatsStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StatsStore for MemoryStatsStore {
    fn load_previous_stats(&self, exercise: &str) -> PreviousStats {
        self.records.get(&stats_key(exercise)).cloned().unwrap_or_default()
    }

    fn save_session_result(&mut self, exercise: &str, result: &SessionResult) {
        self.records.entry(stats_key(exercise)).or_default().record(result);
    }
}
