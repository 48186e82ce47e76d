//! Constants used across the bike/head-unit protocol implementation.
//!
//! This module collects every magic number of the wire format and of the
//! telemetry model in one place: header bytes, request identifiers, the frame
//! terminator, calibration table geometry and the integrator's timing limits.
//!
//! ## Key Concepts
//!
//! - **Headers**: The first byte of a frame identifies its origin. The head unit
//!   sends fixed 4-byte control frames, the sensor head answers with a
//!   length-prefixed ASCII payload.
//! - **Requests**: The second byte names what is being asked for (or answered).
//! - **Sentinels**: `0xFFFF` marks an uncalibrated table slot in storage and
//!   `0xFF` an unknown resistance on the output side.
//!
//! Logic elsewhere in the crate compares against these names only, never
//! against raw literals.

/// Terminator byte closing every frame.
pub const FRAME_TERMINATOR: u8 = 0xF6;

/// Header of a frame sent by the sensor head.
pub const HEADER_BIKE: u8 = 0xF1;

/// Header of the head unit's startup frame.
pub const HEADER_HU_STARTUP: u8 = 0xFE;

/// Header of a head-unit request for one calibration table point.
pub const HEADER_HU_READ_CALIBRATION: u8 = 0xF7;

/// Header of a head-unit request for live telemetry or the bike identifier.
pub const HEADER_HU_READ_BIKE: u8 = 0xF5;

/// Fixed length of every head-unit frame: header, request, checksum, terminator.
pub const HU_FRAME_LEN: usize = 4;

/// Bytes of a sensor-head frame that are not payload: header, request,
/// length, checksum, terminator.
pub const BIKE_FRAME_OVERHEAD: usize = 5;

/// Offset of the first payload byte within a sensor-head frame.
pub const BIKE_PAYLOAD_OFFSET: usize = 3;

/// Largest frame seen on the wire (a 15-digit payload plus overhead).
pub const MAX_FRAME_LEN: usize = 20;

/// Request: cadence in revolutions per minute.
pub const REQUEST_RPM: u8 = 0x41;

/// Request: power in deciwatts.
pub const REQUEST_POWER: u8 = 0x44;

/// Request: raw resistance reading.
pub const REQUEST_RESISTANCE: u8 = 0x4A;

/// Request byte of the sensor head's reply to a calibration point read.
pub const REQUEST_CALIBRATION_RESPONSE: u8 = 0xF7;

/// Request: bike identifier.
pub const REQUEST_BIKE_ID: u8 = 0xFB;

/// Request: startup handshake.
pub const REQUEST_STARTUP: u8 = 0xFE;

/// Number of points in the resistance calibration table.
pub const CALIBRATION_POINTS: usize = 31;

/// Highest valid calibration point index.
pub const CALIBRATION_MAX_INDEX: u8 = (CALIBRATION_POINTS - 1) as u8;

/// Storage value of a calibration slot that has never been written.
pub const CALIBRATION_SENTINEL: u16 = 0xFFFF;

/// Salt XOR-ed into the calibration table checksum.
pub const CALIBRATION_CHECKSUM_SALT: u16 = 0xB01D;

/// Resistance percentage between two adjacent calibration points.
pub const CALIBRATION_SPACING: f32 = 100.0 / 30.0;

/// Wire value reported for an unknown (uncalibrated or out of range) resistance.
pub const RESISTANCE_UNKNOWN: u8 = 0xFF;

/// A stream silent for longer than this many milliseconds is considered idle.
pub const STALENESS_WINDOW_MS: u32 = 5_000;

/// Largest integer an `f32` accumulator holds exactly (2^24 - 1).
pub const MAX_EXACT_REVOLUTIONS: f32 = 16_777_215.0;

/// Millimetres in one statute mile.
pub const MM_PER_MILE: f32 = 1_609_344.0;

/// Milliseconds in one hour.
pub const MS_PER_HOUR: f32 = 3_600_000.0;

/// Circumference of a 700c x 25 road wheel, in millimetres.
pub const DEFAULT_WHEEL_CIRCUMFERENCE_MM: f32 = 2_105.0;

/// Wheel revolutions per millisecond for every mile per hour of speed, for the
/// default 2105 mm wheel.
pub const WHEEL_REVS_PER_MS_PER_MPH: f32 = 2.1237e-4;

/// Kilojoules per deciwatt-millisecond.
pub const KJ_PER_DECIWATT_MS: f32 = 1e-7;

/// Crank revolutions per millisecond for every RPM.
pub const REVS_PER_MS_PER_RPM: f32 = 1.0 / 60_000.0;
