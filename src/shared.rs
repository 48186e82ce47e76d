//! Interrupt-safe ride state.
//!
//! Frames usually arrive in a UART interrupt while the broadcast layer reads
//! telemetry from the main loop. [`SharedRide`] wraps a [`RideStatus`] in a
//! `critical_section::Mutex` so both sides can reach it through a `static`.

use core::cell::RefCell;
use core::fmt;

use critical_section::Mutex;

use crate::calibration::CalibrationTable;
use crate::message::BikeMessage;
use crate::ride::{RideConfig, RideStatus, Telemetry};

/// A [`RideStatus`] behind a critical section.
///
/// # Example
/// ```rust
/// use bikebus::ride::RideConfig;
/// use bikebus::shared::SharedRide;
///
/// static RIDE: SharedRide = SharedRide::new(RideConfig::new());
///
/// let telemetry = RIDE.snapshot();
/// assert_eq!(telemetry.rpm, 0);
/// ```
pub struct SharedRide {
    inner: Mutex<RefCell<RideStatus>>,
}

impl SharedRide {
    /// Creates a fresh ride, usable as a `static` initializer.
    pub const fn new(config: RideConfig) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(RideStatus::new(config))),
        }
    }

    /// Applies a decoded reply. See [`RideStatus::update`].
    pub fn update(&self, message: &BikeMessage, now_ms: u32, table: &CalibrationTable) -> bool {
        self.with(|ride| ride.update(message, now_ms, table))
    }

    /// Runs `f` with exclusive access to the ride.
    ///
    /// `f` runs inside a critical section; keep it short.
    pub fn with<R>(&self, f: impl FnOnce(&mut RideStatus) -> R) -> R {
        critical_section::with(|cs| f(&mut *self.inner.borrow_ref_mut(cs)))
    }

    /// A consistent copy of the current telemetry.
    pub fn snapshot(&self) -> Telemetry {
        self.with(|ride| ride.snapshot())
    }

    /// Starts a new ride, keeping the configuration.
    pub fn reset(&self) {
        self.with(RideStatus::reset)
    }
}

impl fmt::Debug for SharedRide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedRide").finish_non_exhaustive()
    }
}

impl Default for SharedRide {
    fn default() -> Self {
        Self::new(RideConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::bike_frame;

    #[test]
    fn test_update_through_static() {
        static RIDE: SharedRide = SharedRide::new(RideConfig::new());
        let table = CalibrationTable::new();

        let rpm = BikeMessage::decode(&bike_frame(0x41, b"09")).unwrap();
        assert!(RIDE.update(&rpm, 10, &table));
        assert_eq!(RIDE.snapshot().rpm, 90);
        assert_eq!(RIDE.with(|ride| ride.last_crank_rev_ms()), 10);
    }

    #[test]
    fn test_reset() {
        let ride = SharedRide::default();
        let table = CalibrationTable::new();

        let power = BikeMessage::decode(&bike_frame(0x44, b"0051")).unwrap();
        assert!(ride.update(&power, 0, &table));
        assert!(ride.update(&power, 1000, &table));
        assert!(ride.snapshot().energy_kj > 0.0);

        ride.reset();
        assert_eq!(ride.snapshot(), Telemetry::default());
    }
}
