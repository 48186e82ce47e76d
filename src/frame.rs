//! Frame validation for the bike/head-unit serial protocol.
//!
//! Every message on the wire, whichever side sent it, is delimited the same way:
//!
//! ```text
//! head unit:   [header][request][checksum][0xF6]
//! sensor head: [0xF1][request][len][payload; len][checksum][0xF6]
//! ```
//!
//! The checksum is the wrapping 8-bit sum of every byte before it. This module
//! checks a complete frame against those rules and reports which side sent it.
//! It keeps no state and never inspects the payload.

use thiserror::Error;

use crate::consts::{
    BIKE_FRAME_OVERHEAD, FRAME_TERMINATOR, HEADER_BIKE, HEADER_HU_READ_BIKE,
    HEADER_HU_READ_CALIBRATION, HEADER_HU_STARTUP, HU_FRAME_LEN,
};

/// Packet type of a head-unit frame, carried in its header byte.
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum HeadUnitPacket {
    /// Startup handshake, sent once at power-on.
    Startup,
    /// Read one point of the resistance calibration table.
    ReadCalibration,
    /// Read the bike identifier or a live telemetry value.
    ReadBike,
}

impl HeadUnitPacket {
    /// Maps a header byte to a head-unit packet type.
    ///
    /// Returns `None` for the sensor-head header and for unknown bytes.
    pub const fn from_header(header: u8) -> Option<Self> {
        match header {
            HEADER_HU_STARTUP => Some(Self::Startup),
            HEADER_HU_READ_CALIBRATION => Some(Self::ReadCalibration),
            HEADER_HU_READ_BIKE => Some(Self::ReadBike),
            _ => None,
        }
    }

    /// The header byte that introduces this packet type.
    pub const fn header(self) -> u8 {
        match self {
            Self::Startup => HEADER_HU_STARTUP,
            Self::ReadCalibration => HEADER_HU_READ_CALIBRATION,
            Self::ReadBike => HEADER_HU_READ_BIKE,
        }
    }
}

/// Which side of the link produced a frame.
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Origin {
    /// The console, with its packet type.
    HeadUnit(HeadUnitPacket),
    /// The sensor head in the flywheel housing.
    Bike,
}

/// Reasons a frame is rejected.
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
#[derive(Error, PartialEq, Eq, Clone, Copy, Debug)]
pub enum FrameError {
    /// Fewer bytes than the smallest frame needs.
    #[error("Frame too short ({0} bytes).")]
    TooShort(usize),
    /// Last byte is not the terminator.
    #[error("Invalid terminator ({0:#04x}).")]
    BadTerminator(u8),
    /// First byte is not a known header.
    #[error("Invalid header ({0:#04x}).")]
    UnknownHeader(u8),
    /// Frame length disagrees with what the header (and length byte) require.
    #[error("Invalid length: expected {expected}, got {actual}.")]
    LengthMismatch {
        /// Length implied by the header and length byte.
        expected: usize,
        /// Length actually received.
        actual: usize,
    },
    /// Stored checksum differs from the computed one.
    #[error("Checksum mismatch: stored {stored:#04x}, computed {computed:#04x}.")]
    ChecksumMismatch {
        /// Second-to-last byte of the frame.
        stored: u8,
        /// Wrapping sum of the preceding bytes.
        computed: u8,
    },
}

/// Accumulates bytes into the protocol's 8-bit wrapping checksum.
pub fn checksum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0u8, |acc, b| acc.wrapping_add(*b))
}

/// Checks a complete frame against the wire-format rules.
///
/// # Rules
/// 1. At least two bytes, the last one being the terminator `0xF6`.
/// 2. The first byte is one of the four known headers.
/// 3. Sensor-head frames are exactly `bytes[2] + 5` long; head-unit frames
///    are exactly 4 bytes long.
/// 4. The second-to-last byte equals the wrapping sum of all bytes before it.
///
/// # Returns
/// The frame's [`Origin`] if every rule holds, or the first rule that failed.
pub fn validate_frame(bytes: &[u8]) -> Result<Origin, FrameError> {
    let len = bytes.len();
    if len < 2 {
        return Err(FrameError::TooShort(len));
    }

    let terminator = bytes[len - 1];
    if terminator != FRAME_TERMINATOR {
        return Err(FrameError::BadTerminator(terminator));
    }

    let header = bytes[0];
    let (origin, expected) = if header == HEADER_BIKE {
        // The length byte sits at offset 2, which a two-byte frame lacks
        let payload_len = *bytes.get(2).ok_or(FrameError::TooShort(len))?;
        (Origin::Bike, payload_len as usize + BIKE_FRAME_OVERHEAD)
    } else {
        let packet = HeadUnitPacket::from_header(header).ok_or(FrameError::UnknownHeader(header))?;
        (Origin::HeadUnit(packet), HU_FRAME_LEN)
    };
    if len != expected {
        return Err(FrameError::LengthMismatch {
            expected,
            actual: len,
        });
    }

    let stored = bytes[len - 2];
    let computed = checksum(&bytes[..len - 2]);
    if stored != computed {
        return Err(FrameError::ChecksumMismatch { stored, computed });
    }

    Ok(origin)
}

/// Returns `true` if `bytes` is a well-formed frame from either side.
///
/// See [`validate_frame`] for the rules and for the reason a frame fails.
pub fn is_valid_frame(bytes: &[u8]) -> bool {
    match validate_frame(bytes) {
        Ok(_) => true,
        Err(e) => {
            trace!("frame rejected: {}", e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{bike_frame, hu_frame};

    #[test]
    fn test_checksum_wraps() {
        assert_eq!(checksum(&[]), 0);
        assert_eq!(checksum(&[0xF5, 0x41]), 0x36);
        assert_eq!(checksum(&[0xFF, 0x02]), 0x01);
    }

    #[test]
    fn test_head_unit_frames_validate() {
        assert_eq!(
            validate_frame(&[0xF5, 0x41, 0x36, 0xF6]),
            Ok(Origin::HeadUnit(HeadUnitPacket::ReadBike))
        );
        assert_eq!(
            validate_frame(&hu_frame(0xFE, 0x00)),
            Ok(Origin::HeadUnit(HeadUnitPacket::Startup))
        );
        assert_eq!(
            validate_frame(&hu_frame(0xF7, 0x1E)),
            Ok(Origin::HeadUnit(HeadUnitPacket::ReadCalibration))
        );
    }

    #[test]
    fn test_bike_frame_validates() {
        let frame = bike_frame(0x41, b"570");
        assert_eq!(frame.len(), 8);
        assert_eq!(validate_frame(&frame), Ok(Origin::Bike));
        assert!(is_valid_frame(&frame));
    }

    #[test]
    fn test_single_byte_corruption_is_detected() {
        let frame = bike_frame(0x44, b"05510");
        for i in 3..(frame.len() - 2) {
            let mut corrupted = frame.clone();
            corrupted[i] ^= 0x01;
            assert!(
                matches!(
                    validate_frame(&corrupted),
                    Err(FrameError::ChecksumMismatch { .. })
                ),
                "flipping payload byte {i} went unnoticed"
            );
        }
    }

    #[test]
    fn test_rejects_bad_terminator() {
        assert_eq!(
            validate_frame(&[0xF5, 0x41, 0x36, 0xF7]),
            Err(FrameError::BadTerminator(0xF7))
        );
    }

    #[test]
    fn test_rejects_unknown_header() {
        assert_eq!(
            validate_frame(&[0xA0, 0x41, 0xE1, 0xF6]),
            Err(FrameError::UnknownHeader(0xA0))
        );
    }

    #[test]
    fn test_rejects_short_frames() {
        assert_eq!(validate_frame(&[]), Err(FrameError::TooShort(0)));
        assert_eq!(validate_frame(&[0xF6]), Err(FrameError::TooShort(1)));
        assert_eq!(validate_frame(&[0xF1, 0xF6]), Err(FrameError::TooShort(2)));
    }

    #[test]
    fn test_head_unit_length_is_fixed() {
        // Checksum is right for the first three bytes but the frame is too long
        let frame = [0xF5, 0x41, 0x00, 0x36, 0xF6];
        assert_eq!(
            validate_frame(&frame),
            Err(FrameError::LengthMismatch {
                expected: 4,
                actual: 5
            })
        );
    }

    #[test]
    fn test_bike_length_byte_is_enforced() {
        let mut frame = bike_frame(0x41, b"570");
        // Claim a 4-byte payload and fix up the checksum so only the length is wrong
        frame[2] = 4;
        let n = frame.len();
        frame[n - 2] = checksum(&frame[..n - 2]);
        assert_eq!(
            validate_frame(&frame),
            Err(FrameError::LengthMismatch {
                expected: 9,
                actual: 8
            })
        );
        assert!(!is_valid_frame(&frame));
    }
}
