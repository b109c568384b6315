//! Cooperative tick loop
//!
//! The host's per-frame callback asks for a ticket before running the
//! detector and hands the ticket back with the result. At most one
//! detection is in flight; a stuck one is abandoned after a timeout.
//! Results for a cancelled session or an abandoned ticket are dropped.

use std::cell::Cell;
use std::rc::Rc;

/// Detection older than this is abandoned (ms)
pub const DEFAULT_DETECTION_TIMEOUT_MS: f64 = 1000.0;

/// Shared stop flag checked at the top of every tick
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Rc<Cell<bool>>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

/// Permission to run one capture-and-detect cycle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickTicket {
    id: u32,
}

impl TickTicket {
    pub fn id(&self) -> u32 {
        self.id
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickStart {
    Issued(TickTicket),
    /// The previous detection timed out and was abandoned
    Replaced { abandoned: TickTicket, issued: TickTicket },
    /// A detection is still running
    Busy,
    Cancelled,
}

pub struct TickLoop {
    token: CancelToken,
    timeout_ms: f64,
    next_id: u32,
    in_flight: Option<(TickTicket, f64)>,
}

impl TickLoop {
    pub fn new(timeout_ms: f64) -> Self {
        Self {
            token: CancelToken::new(),
            timeout_ms,
            next_id: 0,
            in_flight: None,
        }
    }

    pub fn token(&self) -> CancelToken {
        self.token.clone()
    }

    pub fn begin(&mut self, now_ms: f64) -> TickStart {
        if self.token.is_cancelled() {
            return TickStart::Cancelled;
        }

        let abandoned = match self.in_flight {
            Some((ticket, issued_ms)) if now_ms - issued_ms > self.timeout_ms => {
                log::warn!("detection {} timed out after {:.0}ms", ticket.id, now_ms - issued_ms);
                Some(ticket)
            }
            Some(_) => return TickStart::Busy,
            None => None,
        };

        self.next_id = self.next_id.wrapping_add(1);
        let issued = TickTicket { id: self.next_id };
        self.in_flight = Some((issued, now_ms));

        match abandoned {
            Some(abandoned) => TickStart::Replaced { abandoned, issued },
            None => TickStart::Issued(issued),
        }
    }

    /// Accept a finished detection; `false` means drop its result
    pub fn complete(&mut self, ticket_id: u32) -> bool {
        if self.token.is_cancelled() {
            return false;
        }
        match self.in_flight {
            Some((ticket, _)) if ticket.id == ticket_id => {
                self.in_flight = None;
                true
            }
            _ => {
                log::debug!("dropping stale detection {}", ticket_id);
                false
            }
        }
    }

    pub fn in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Cancel the loop; pending and late results are discarded
    pub fn stop(&mut self) {
        self.token.cancel();
        self.in_flight = None;
    }
}

impl Default for TickLoop {
    fn default() -> Self {
        Self::new(DEFAULT_DETECTION_TIMEOUT_MS)
    }
}
