//! Hold timer - accumulates time spent in a target zone
//!
//! Time is credited from wall-clock deltas between consecutive in-zone
//! frames, so a slow detector doesn't shrink the total. Deltas longer than
//! `max_gap_ms` (detector stall, tab hidden) are not credited.

use serde::{Deserialize, Serialize};

/// Largest frame gap credited as hold time
pub const DEFAULT_MAX_GAP_MS: f64 = 250.0;

/// One frame's zone reading
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ZoneSample {
    /// Inside the scoring zone: time accumulates
    pub accumulate: bool,
    /// Inside the wider presence band; `None` when the pose was lost
    pub present: Option<bool>,
}

impl From<bool> for ZoneSample {
    fn from(in_zone: bool) -> Self {
        Self {
            accumulate: in_zone,
            present: Some(in_zone),
        }
    }
}

/// Two-band classification of a hold signal
///
/// The narrower `zone` band scores; the looser `presence` band only decides
/// whether the user has left the hold.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ZoneBands {
    pub zone: f32,
    pub presence: f32,
}

impl ZoneBands {
    pub fn classify(&self, signal: Option<f32>) -> ZoneSample {
        match signal {
            Some(v) => ZoneSample {
                accumulate: v >= self.zone,
                present: Some(v >= self.presence),
            },
            None => ZoneSample {
                accumulate: false,
                present: None,
            },
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HoldEvent {
    /// Fired once per exit from the zone, with the time held so far
    LeftZone { held_ms: f64 },
}

pub struct HoldTimer {
    max_gap_ms: f64,
    held_ms: f64,
    last_in_zone_ms: Option<f64>,
    was_in_zone: bool,
}

impl Default for HoldTimer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_GAP_MS)
    }
}

impl HoldTimer {
    pub fn new(max_gap_ms: f64) -> Self {
        Self {
            max_gap_ms,
            held_ms: 0.0,
            last_in_zone_ms: None,
            was_in_zone: false,
        }
    }

    pub fn update(&mut self, sample: impl Into<ZoneSample>, now_ms: f64) -> Option<HoldEvent> {
        let sample = sample.into();

        if sample.accumulate {
            if let Some(prev) = self.last_in_zone_ms {
                let dt = now_ms - prev;
                if dt > 0.0 && dt <= self.max_gap_ms {
                    self.held_ms += dt;
                }
            }
            self.last_in_zone_ms = Some(now_ms);
        } else {
            self.last_in_zone_ms = None;
        }

        match sample.present {
            Some(true) => {
                self.was_in_zone = true;
                None
            }
            Some(false) if self.was_in_zone => {
                self.was_in_zone = false;
                log::debug!("left hold zone after {:.0}ms", self.held_ms);
                Some(HoldEvent::LeftZone {
                    held_ms: self.held_ms,
                })
            }
            _ => None,
        }
    }

    pub fn held_ms(&self) -> f64 {
        self.held_ms
    }

    pub fn was_in_zone(&self) -> bool {
        self.was_in_zone
    }

    pub fn reset(&mut self) {
        self.held_ms = 0.0;
        self.last_in_zone_ms = None;
        self.was_in_zone = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_left_zone_fires_once() {
        let mut timer = HoldTimer::default();
        let seq = [true, true, true, false, false, true, true];
        let events: Vec<_> = seq
            .iter()
            .enumerate()
            .map(|(i, &z)| timer.update(z, i as f64 * 100.0))
            .collect();

        let fired: Vec<usize> = events
            .iter()
            .enumerate()
            .filter(|(_, e)| e.is_some())
            .map(|(i, _)| i)
            .collect();
        assert_eq!(fired, vec![3]);
        assert_eq!(events[3], Some(HoldEvent::LeftZone { held_ms: 200.0 }));
        // two more in-zone frames 100ms apart
        assert!((timer.held_ms() - 300.0).abs() < 1e-9);
    }

    #[test]
    fn test_never_in_zone_never_fires() {
        let mut timer = HoldTimer::default();
        for i in 0..10 {
            assert_eq!(timer.update(false, i as f64 * 100.0), None);
        }
        assert_eq!(timer.held_ms(), 0.0);
    }

    #[test]
    fn test_slow_frames_credit_wall_clock() {
        let mut timer = HoldTimer::default();
        for t in [0.0, 200.0, 400.0, 600.0] {
            timer.update(true, t);
        }
        assert!((timer.held_ms() - 600.0).abs() < 1e-9);
    }

    #[test]
    fn test_stall_not_credited() {
        let mut timer = HoldTimer::default();
        timer.update(true, 0.0);
        timer.update(true, 100.0);
        timer.update(true, 5_100.0);
        timer.update(true, 5_200.0);
        assert!((timer.held_ms() - 200.0).abs() < 1e-9);
    }

    #[test]
    fn test_lost_pose_holds_presence() {
        let bands = ZoneBands {
            zone: 160.0,
            presence: 145.0,
        };
        let mut timer = HoldTimer::default();
        timer.update(bands.classify(Some(170.0)), 0.0);
        assert_eq!(timer.update(bands.classify(None), 100.0), None);
        assert!(timer.was_in_zone());
        // yellow band: no credit, no exit
        assert_eq!(timer.update(bands.classify(Some(150.0)), 200.0), None);
        assert!(matches!(
            timer.update(bands.classify(Some(120.0)), 300.0),
            Some(HoldEvent::LeftZone { .. })
        ));
        assert_eq!(timer.held_ms(), 0.0);
    }

    #[test]
    fn test_reset() {
        let mut timer = HoldTimer::default();
        timer.update(true, 0.0);
        timer.update(true, 100.0);
        timer.reset();
        assert_eq!(timer.held_ms(), 0.0);
        assert!(!timer.was_in_zone());
    }
}
