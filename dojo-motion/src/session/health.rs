//! Detector health monitor
//!
//! Counts consecutive ticks with nothing detected. Reports the detector as
//! unavailable once, and recovered once, without touching session state.

use serde::Serialize;

/// Missed ticks before reporting (~1.5s at 30fps)
pub const DEFAULT_UNAVAILABLE_AFTER: u32 = 45;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DetectorStatus {
    Unavailable { missed_ticks: u32 },
    Recovered,
}

pub struct DetectorMonitor {
    unavailable_after: u32,
    missed: u32,
    unavailable: bool,
}

impl DetectorMonitor {
    pub fn new(unavailable_after: u32) -> Self {
        Self {
            unavailable_after: unavailable_after.max(1),
            missed: 0,
            unavailable: false,
        }
    }

    /// Record one tick; `detected` is false for empty or failed detections
    pub fn observe(&mut self, detected: bool) -> Option<DetectorStatus> {
        if detected {
            self.missed = 0;
            if self.unavailable {
                self.unavailable = false;
                log::info!("pose detector recovered");
                return Some(DetectorStatus::Recovered);
            }
            return None;
        }

        self.missed = self.missed.saturating_add(1);
        if !self.unavailable && self.missed >= self.unavailable_after {
            self.unavailable = true;
            log::warn!("no pose detected for {} ticks", self.missed);
            return Some(DetectorStatus::Unavailable {
                missed_ticks: self.missed,
            });
        }
        None
    }

    pub fn is_unavailable(&self) -> bool {
        self.unavailable
    }

    pub fn reset(&mut self) {
        self.missed = 0;
        self.unavailable = false;
    }
}

impl Default for DetectorMonitor {
    fn default() -> Self {
        Self::new(DEFAULT_UNAVAILABLE_AFTER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reports_once_each_way() {
        let mut monitor = DetectorMonitor::new(3);
        assert_eq!(monitor.observe(false), None);
        assert_eq!(monitor.observe(false), None);
        assert_eq!(monitor.observe(false), Some(DetectorStatus::Unavailable { missed_ticks: 3 }));
        for _ in 0..10 {
            assert_eq!(monitor.observe(false), None);
        }
        assert_eq!(monitor.observe(true), Some(DetectorStatus::Recovered));
        assert_eq!(monitor.observe(true), None);
    }

    #[test]
    fn test_intermittent_misses_do_not_trip() {
        let mut monitor = DetectorMonitor::new(3);
        for _ in 0..20 {
            assert_eq!(monitor.observe(false), None);
            assert_eq!(monitor.observe(false), None);
            assert_eq!(monitor.observe(true), None);
        }
        assert!(!monitor.is_unavailable());
    }
}
