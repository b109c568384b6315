//! Browser localStorage stats store
//!
//! One JSON record per exercise under `"<exercise>Stats"`. Storage failures
//! are logged and otherwise ignored; saving is fire-and-forget.

use web_sys::Storage;

use crate::session::{stats_key, PreviousStats, SessionResult, StatsStore};

#[derive(Debug, Default)]
pub struct LocalStorageStats;

fn local_storage() -> Option<Storage> {
    web_sys::window()?.local_storage().ok()?
}

impl StatsStore for LocalStorageStats {
    fn load_previous_stats(&self, exercise: &str) -> PreviousStats {
        let key = stats_key(exercise);
        let stored = local_storage().and_then(|storage| storage.get_item(&key).ok().flatten());
        match stored {
            Some(json) => serde_json::from_str(&json).unwrap_or_else(|err| {
                log::warn!("discarding unreadable {}: {}", key, err);
                PreviousStats::default()
            }),
            None => PreviousStats::default(),
        }
    }

    fn save_session_result(&mut self, exercise: &str, result: &SessionResult) {
        let Some(storage) = local_storage() else {
            log::warn!("localStorage unavailable, {} result not saved", exercise);
            return;
        };

        let mut stats = self.load_previous_stats(exercise);
        stats.record(result);
        match serde_json::to_string(&stats) {
            Ok(json) => {
                if storage.set_item(&stats_key(exercise), &json).is_err() {
                    log::warn!("could not write {} stats", exercise);
                }
            }
            Err(err) => log::warn!("could not encode {} stats: {}", exercise, err),
        }
    }
}
