//! Exclusive video source
//!
//! One session at a time may hold the camera. The lease stops the stream
//! when dropped, whichever way the session ends.

use std::cell::Cell;
use std::ops::{Deref, DerefMut};
use std::rc::Rc;

use crate::error::{MotionError, Result};

/// Something that produces frames and must be shut down when done
pub trait VideoSource {
    fn stop(&mut self);
}

impl<S: VideoSource + ?Sized> VideoSource for Box<S> {
    fn stop(&mut self) {
        (**self).stop();
    }
}

/// Lease over whatever camera the host supplied
pub type CameraLease = SourceLease<Box<dyn VideoSource>>;

#[derive(Clone, Debug, Default)]
pub struct SourceSlot {
    leased: Rc<Cell<bool>>,
}

impl SourceSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lease<S: VideoSource>(&self, source: S) -> Result<SourceLease<S>> {
        if self.leased.get() {
            return Err(MotionError::SourceBusy);
        }
        self.leased.set(true);
        Ok(SourceLease {
            source,
            leased: Rc::clone(&self.leased),
        })
    }

    pub fn is_leased(&self) -> bool {
        self.leased.get()
    }
}

pub struct SourceLease<S: VideoSource> {
    source: S,
    leased: Rc<Cell<bool>>,
}

impl<S: VideoSource> Deref for SourceLease<S> {
    type Target = S;

    fn deref(&self) -> &S {
        &self.source
    }
}

impl<S: VideoSource> DerefMut for SourceLease<S> {
    fn deref_mut(&mut self) -> &mut S {
        &mut self.source
    }
}

impl<S: VideoSource> Drop for SourceLease<S> {
    fn drop(&mut self) {
        self.source.stop();
        self.leased.set(false);
        log::debug!("video source released");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeCamera {
        stops: Rc<Cell<u32>>,
    }

    impl VideoSource for FakeCamera {
        fn stop(&mut self) {
            self.stops.set(self.stops.get() + 1);
        }
    }

    fn camera() -> (FakeCamera, Rc<Cell<u32>>) {
        let stops = Rc::new(Cell::new(0));
        (FakeCamera { stops: stops.clone() }, stops)
    }

    #[test]
    fn test_second_lease_refused() {
        let slot = SourceSlot::new();
        let (a, _) = camera();
        let (b, _) = camera();
        let _lease = slot.lease(a).unwrap();
        assert!(matches!(slot.lease(b), Err(MotionError::SourceBusy)));
    }

    #[test]
    fn test_drop_stops_once_and_frees_slot() {
        let slot = SourceSlot::new();
        let (cam, stops) = camera();
        {
            let _lease = slot.lease(cam).unwrap();
            assert!(slot.is_leased());
        }
        assert_eq!(stops.get(), 1);
        assert!(!slot.is_leased());
    }

    #[test]
    fn test_boxed_source_stops_through_lease() {
        let slot = SourceSlot::new();
        let (cam, stops) = camera();
        let lease: CameraLease = slot.lease(Box::new(cam) as Box<dyn VideoSource>).unwrap();
        drop(lease);
        assert_eq!(stops.get(), 1);
        assert!(!slot.is_leased());
    }

    #[test]
    fn test_released_on_error_path() {
        fn failing_session(slot: &SourceSlot, cam: FakeCamera) -> Result<()> {
            let _lease = slot.lease(cam)?;
            Err(MotionError::SessionNotActive)
        }

        let slot = SourceSlot::new();
        let (cam, stops) = camera();
        assert!(failing_session(&slot, cam).is_err());
        assert_eq!(stops.get(), 1);
        assert!(!slot.is_leased());
    }
}
