//! Session module - clock, tick scheduling, detector health, camera lease, stats
//!
//! Re-exports only. All logic in submodules.

mod clock;
mod health;
mod scheduler;
mod source;
mod stats;

pub use clock::{ClockEvent, ClockState, CompletionReason, SessionClock, DEFAULT_COUNTDOWN_SECONDS};
pub use health::{DetectorMonitor, DetectorStatus, DEFAULT_UNAVAILABLE_AFTER};
pub use scheduler::{CancelToken, TickLoop, TickStart, TickTicket, DEFAULT_DETECTION_TIMEOUT_MS};
pub use source::{CameraLease, SourceLease, SourceSlot, VideoSource};
pub use stats::{stats_key, MemoryStatsStore, PreviousStats, SessionResult, StatsStore};
