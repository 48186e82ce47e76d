//! Non-volatile storage map and access trait.
//!
//! The crate never talks to an EEPROM directly. Instead it consumes the
//! byte-addressable [`Storage`] trait, and this module fixes where each
//! persisted value lives:
//!
//! | Address  | Contents                                          |
//! |----------|---------------------------------------------------|
//! | 0..62    | Calibration table, 31 little-endian `u16` slots   |
//! | 62..64   | Calibration table checksum (little-endian `u16`)  |
//! | 64       | Force the protocol simulator at startup (bool)    |
//! | 65..=73  | Broadcast-layer attribute identifiers, one byte each |
//!
//! [`MemoryStorage`] is a RAM-backed implementation for hosts and tests.

use thiserror::Error;

use crate::consts::CALIBRATION_POINTS;

/// Address of calibration slot 0; slot `i` lives at `base + 2 * i`.
pub const CALIBRATION_BASE_ADDRESS: u16 = 0;

/// Address of the calibration table checksum.
pub const CALIBRATION_CHECKSUM_ADDRESS: u16 =
    CALIBRATION_BASE_ADDRESS + 2 * CALIBRATION_POINTS as u16;

/// Address of the "force simulator at startup" flag.
pub const FORCE_SIMULATION_ADDRESS: u16 = CALIBRATION_CHECKSUM_ADDRESS + 2;

/// Address of the first broadcast attribute identifier.
pub const ATTRIBUTE_ID_BASE_ADDRESS: u16 = FORCE_SIMULATION_ADDRESS + 1;

/// One past the last address used by the map.
pub const STORAGE_LEN: u16 = ATTRIBUTE_ID_BASE_ADDRESS + Attribute::COUNT;

/// A flat byte-addressable non-volatile store.
///
/// Only the byte accessors must be implemented; the `u16` helpers store the
/// low byte first.
pub trait Storage {
    /// Error raised by the underlying medium.
    type Error;

    /// Reads one byte.
    fn read(&mut self, address: u16) -> Result<u8, Self::Error>;

    /// Writes one byte.
    fn write(&mut self, address: u16, value: u8) -> Result<(), Self::Error>;

    /// Reads a little-endian `u16` from `address` and `address + 1`.
    fn read_u16(&mut self, address: u16) -> Result<u16, Self::Error> {
        let lo = self.read(address)?;
        let hi = self.read(address + 1)?;
        Ok(u16::from_le_bytes([lo, hi]))
    }

    /// Writes a little-endian `u16` to `address` and `address + 1`.
    fn write_u16(&mut self, address: u16, value: u16) -> Result<(), Self::Error> {
        let [lo, hi] = value.to_le_bytes();
        self.write(address, lo)?;
        self.write(address + 1, hi)
    }
}

/// Errors of [`MemoryStorage`].
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
#[derive(Error, PartialEq, Eq, Clone, Copy, Debug)]
pub enum StorageError {
    /// The address lies past the end of the store.
    #[error("Address {0} out of bounds.")]
    OutOfBounds(u16),
}

/// A RAM-backed [`Storage`] of `N` bytes, initially erased to `0xFF`.
#[derive(Clone, Debug)]
pub struct MemoryStorage<const N: usize> {
    bytes: [u8; N],
}

impl<const N: usize> MemoryStorage<N> {
    /// Creates an erased store.
    pub const fn new() -> Self {
        Self { bytes: [0xFF; N] }
    }

    /// The raw contents.
    pub fn as_bytes(&self) -> &[u8; N] {
        &self.bytes
    }
}

impl<const N: usize> Default for MemoryStorage<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> Storage for MemoryStorage<N> {
    type Error = StorageError;

    fn read(&mut self, address: u16) -> Result<u8, Self::Error> {
        self.bytes
            .get(address as usize)
            .copied()
            .ok_or(StorageError::OutOfBounds(address))
    }

    fn write(&mut self, address: u16, value: u8) -> Result<(), Self::Error> {
        let slot = self
            .bytes
            .get_mut(address as usize)
            .ok_or(StorageError::OutOfBounds(address))?;
        *slot = value;
        Ok(())
    }
}

/// Attribute identifiers the broadcast layer persists across reboots.
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Attribute {
    /// Cycling power service.
    PowerService,
    /// Cycling power feature characteristic.
    PowerFeature,
    /// Cycling power measurement characteristic.
    PowerMeasurement,
    /// Cycling power sensor location characteristic.
    PowerSensorLocation,
    /// Speed and cadence service.
    CadenceService,
    /// Speed and cadence feature characteristic.
    CadenceFeature,
    /// Speed and cadence measurement characteristic.
    CadenceMeasurement,
    /// Speed and cadence sensor location characteristic.
    CadenceSensorLocation,
    /// Speed and cadence control point characteristic.
    CadenceControlPoint,
}

impl Attribute {
    /// Number of attribute slots.
    pub const COUNT: u16 = 9;

    /// Storage address of this attribute's identifier.
    pub const fn address(self) -> u16 {
        ATTRIBUTE_ID_BASE_ADDRESS + self as u16
    }
}

/// Reads the "force simulator at startup" flag. Any non-zero byte other than
/// the erased value `0xFF` counts as set.
pub fn force_simulation<S: Storage>(store: &mut S) -> Result<bool, S::Error> {
    let flag = store.read(FORCE_SIMULATION_ADDRESS)?;
    Ok(flag != 0 && flag != 0xFF)
}

/// Writes the "force simulator at startup" flag.
pub fn set_force_simulation<S: Storage>(store: &mut S, enabled: bool) -> Result<(), S::Error> {
    store.write(FORCE_SIMULATION_ADDRESS, enabled as u8)
}

/// Reads a persisted attribute identifier.
pub fn attribute_id<S: Storage>(store: &mut S, attribute: Attribute) -> Result<u8, S::Error> {
    store.read(attribute.address())
}

/// Persists an attribute identifier.
pub fn set_attribute_id<S: Storage>(
    store: &mut S,
    attribute: Attribute,
    id: u8,
) -> Result<(), S::Error> {
    store.write(attribute.address(), id)
}
