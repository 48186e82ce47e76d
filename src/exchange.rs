//! Request/response pairing between the head unit and the sensor head.
//!
//! The link is half duplex: the head unit asks, the sensor head answers. Most
//! answers are self-describing, but the reply to a calibration point read only
//! says "calibration response", and the point it answers is known only from the
//! head unit's preceding request. [`Exchange`] remembers that request and routes
//! each reply accordingly.

use crate::calibration::CalibrationTable;
use crate::frame::HeadUnitPacket;
use crate::message::{BikeMessage, CalibrationIndex, DecodeError, HeadUnitMessage, Request};
use crate::ride::RideStatus;

/// What a sensor-head reply turned out to be.
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Event {
    /// Cadence, power or resistance, applied to the ride.
    Telemetry(Request),
    /// A calibration point, written into the table.
    CalibrationPoint {
        /// Which point.
        index: CalibrationIndex,
        /// Its raw reading.
        raw: u16,
    },
    /// The bike identifier reply.
    BikeId,
    /// The startup handshake reply.
    Startup,
    /// A reply with no use here, including a calibration response with no
    /// matching head-unit request.
    Ignored(Request),
}

/// Pairs head-unit requests with the sensor-head replies that follow them.
#[derive(Default, Debug)]
pub struct Exchange {
    pending: Option<HeadUnitMessage>,
}

impl Exchange {
    /// Creates an exchange with no outstanding request.
    pub const fn new() -> Self {
        Self { pending: None }
    }

    /// The outstanding head-unit request, if any.
    pub fn pending(&self) -> Option<HeadUnitMessage> {
        self.pending
    }

    /// Decodes a head-unit frame and remembers it as the outstanding request.
    ///
    /// A malformed frame clears the outstanding request.
    pub fn head_unit_frame(&mut self, bytes: &[u8]) -> Result<HeadUnitMessage, DecodeError> {
        self.pending = None;
        let message = HeadUnitMessage::decode(bytes)?;
        self.pending = Some(message);
        Ok(message)
    }

    /// Decodes a sensor-head frame and applies it.
    ///
    /// # Behavior
    /// - Cadence, power and resistance replies go to `ride` via [`RideStatus::update`]
    /// - A calibration reply updates the matching point of `table`
    /// - The outstanding request is consumed whether or not decoding succeeds
    pub fn bike_frame(
        &mut self,
        bytes: &[u8],
        now_ms: u32,
        ride: &mut RideStatus,
        table: &mut CalibrationTable,
    ) -> Result<Event, DecodeError> {
        let pending = self.pending.take();
        let message = BikeMessage::decode(bytes)?;

        let event = match message.request() {
            request @ (Request::Rpm | Request::Power | Request::Resistance) => {
                let _ = ride.update(&message, now_ms, table);
                Event::Telemetry(request)
            }
            Request::CalibrationPoint(index) => Self::capture(table, index, message.value()),
            Request::CalibrationResponse => match pending.map(|p| (p.packet(), p.request())) {
                Some((HeadUnitPacket::ReadCalibration, Request::CalibrationPoint(index))) => {
                    Self::capture(table, index, message.value())
                }
                _ => {
                    warn!("calibration response without a matching request");
                    Event::Ignored(Request::CalibrationResponse)
                }
            },
            Request::BikeId => Event::BikeId,
            Request::Startup => Event::Startup,
            other @ Request::Unknown(_) => {
                warn!("unexpected reply: request {}", u8::from(other));
                Event::Ignored(other)
            }
        };
        Ok(event)
    }

    fn capture(table: &mut CalibrationTable, index: CalibrationIndex, raw: u16) -> Event {
        debug!("calibration point {} = {}", index.get(), raw);
        table.set(index, raw);
        Event::CalibrationPoint { index, raw }
    }
}
