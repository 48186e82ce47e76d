//! Typed decoding of validated frames.
//!
//! A frame that passes [`validate_frame`](crate::frame::validate_frame) is
//! turned into one of two immutable messages, depending on who sent it:
//!
//! - [`BikeMessage`]: a sensor-head reply, carrying a [`Request`] and a decoded
//!   numeric value.
//! - [`HeadUnitMessage`]: a head-unit query, carrying its [`HeadUnitPacket`]
//!   type and the [`Request`] it asks for.
//!
//! ## Numeric payloads
//!
//! The sensor head sends numbers as ASCII decimal digits, least significant
//! digit first. [`decode_ascii_decimal`] reads them from the last payload byte
//! back to the first, so the payload `b"570"` is the number 75. The result must
//! fit in 16 bits; anything larger is rejected rather than wrapped.
//!
//! ## Errors
//!
//! Decoding never panics. Every malformed input, including a numeric overflow,
//! comes back as a [`DecodeError`], and callers are expected to drop the frame.

use thiserror::Error;

use crate::consts::{
    BIKE_PAYLOAD_OFFSET, CALIBRATION_MAX_INDEX, REQUEST_BIKE_ID, REQUEST_CALIBRATION_RESPONSE,
    REQUEST_POWER, REQUEST_RESISTANCE, REQUEST_RPM, REQUEST_STARTUP,
};
use crate::frame::{FrameError, HeadUnitPacket, Origin, validate_frame};

/// Index of one of the 31 resistance calibration points.
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Debug)]
pub struct CalibrationIndex(u8);

impl CalibrationIndex {
    /// Wraps `index` if it names a calibration point (0 through 30).
    pub const fn new(index: u8) -> Option<Self> {
        if index <= CALIBRATION_MAX_INDEX {
            Some(Self(index))
        } else {
            None
        }
    }

    /// The raw index.
    pub const fn get(self) -> u8 {
        self.0
    }
}

/// What a frame asks for or answers, from its request byte.
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Request {
    /// Read calibration point N (`0x00..=0x1E`).
    CalibrationPoint(CalibrationIndex),
    /// Cadence in RPM (`0x41`).
    Rpm,
    /// Power in deciwatts (`0x44`).
    Power,
    /// Raw resistance reading (`0x4A`).
    Resistance,
    /// The sensor head's answer to a calibration point read (`0xF7`).
    CalibrationResponse,
    /// Bike identifier (`0xFB`).
    BikeId,
    /// Startup handshake (`0xFE`).
    Startup,
    /// Any other request byte.
    Unknown(u8),
}

impl From<u8> for Request {
    fn from(value: u8) -> Self {
        match value {
            REQUEST_RPM => Request::Rpm,
            REQUEST_POWER => Request::Power,
            REQUEST_RESISTANCE => Request::Resistance,
            REQUEST_CALIBRATION_RESPONSE => Request::CalibrationResponse,
            REQUEST_BIKE_ID => Request::BikeId,
            REQUEST_STARTUP => Request::Startup,
            other => match CalibrationIndex::new(other) {
                Some(index) => Request::CalibrationPoint(index),
                None => Request::Unknown(other),
            },
        }
    }
}

impl From<Request> for u8 {
    fn from(value: Request) -> Self {
        match value {
            Request::CalibrationPoint(index) => index.get(),
            Request::Rpm => REQUEST_RPM,
            Request::Power => REQUEST_POWER,
            Request::Resistance => REQUEST_RESISTANCE,
            Request::CalibrationResponse => REQUEST_CALIBRATION_RESPONSE,
            Request::BikeId => REQUEST_BIKE_ID,
            Request::Startup => REQUEST_STARTUP,
            Request::Unknown(other) => other,
        }
    }
}

/// Reasons a frame cannot be decoded into a message.
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
#[derive(Error, PartialEq, Eq, Clone, Copy, Debug)]
pub enum DecodeError {
    /// The frame itself is malformed.
    #[error(transparent)]
    Frame(#[from] FrameError),
    /// The frame is well formed but came from the other side of the link.
    #[error("Frame from the wrong origin (header {0:#04x}).")]
    WrongOrigin(u8),
    /// The payload encodes a number larger than 65535.
    #[error("Numeric payload overflows 16 bits.")]
    Overflow,
}

/// Decodes a least-significant-digit-first ASCII decimal payload.
///
/// Bytes are consumed from the end of `payload` back to its start, each step
/// computing `value * 10 + (byte - b'0')`. Bytes are not range-checked: the
/// sensor head sends values of 1000 and above in three bytes, with `b':'`
/// standing for 10 in the top place.
///
/// # Errors
/// [`DecodeError::Overflow`] if the value would exceed `u16::MAX`.
pub fn decode_ascii_decimal(payload: &[u8]) -> Result<u16, DecodeError> {
    let mut value: u16 = 0;
    for &byte in payload.iter().rev() {
        let digit = byte.wrapping_sub(b'0') as u16;
        if value > (u16::MAX - digit) / 10 {
            return Err(DecodeError::Overflow);
        }
        value = value * 10 + digit;
    }
    Ok(value)
}

/// A decoded sensor-head frame.
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct BikeMessage {
    request: Request,
    value: u16,
}

impl BikeMessage {
    /// Decodes a sensor-head frame.
    ///
    /// # Behavior
    /// - Validates the frame and requires the sensor-head header
    /// - A bike identifier reply carries no number and decodes with `value == 0`
    /// - Any other reply has its payload decoded with [`decode_ascii_decimal`]
    ///
    /// # Errors
    /// Any [`DecodeError`]; the frame should then be discarded.
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        match validate_frame(bytes)? {
            Origin::Bike => {}
            Origin::HeadUnit(packet) => return Err(DecodeError::WrongOrigin(packet.header())),
        }

        let request = Request::from(bytes[1]);
        if request == Request::BikeId {
            return Ok(Self { request, value: 0 });
        }

        let payload_len = bytes[2] as usize;
        let payload = &bytes[BIKE_PAYLOAD_OFFSET..BIKE_PAYLOAD_OFFSET + payload_len];
        let value = decode_ascii_decimal(payload)?;
        Ok(Self { request, value })
    }

    /// What this reply answers.
    pub fn request(&self) -> Request {
        self.request
    }

    /// The decoded number; zero for a bike identifier reply.
    pub fn value(&self) -> u16 {
        self.value
    }
}

/// A decoded head-unit frame.
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct HeadUnitMessage {
    packet: HeadUnitPacket,
    request: Request,
}

impl HeadUnitMessage {
    /// Decodes a head-unit frame.
    ///
    /// # Errors
    /// [`DecodeError::Frame`] for a malformed frame, [`DecodeError::WrongOrigin`]
    /// for a well-formed sensor-head frame.
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        match validate_frame(bytes)? {
            Origin::HeadUnit(packet) => Ok(Self {
                packet,
                request: Request::from(bytes[1]),
            }),
            Origin::Bike => Err(DecodeError::WrongOrigin(bytes[0])),
        }
    }

    /// The packet type from the header byte.
    pub fn packet(&self) -> HeadUnitPacket {
        self.packet
    }

    /// What the head unit is asking for.
    pub fn request(&self) -> Request {
        self.request
    }
}
