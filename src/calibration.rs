//! Resistance calibration table.
//!
//! The sensor head reports resistance as an uncalibrated raw reading. The head
//! unit owns a 31-point table mapping raw readings to the 0–100 resistance
//! scale, the points being spaced 100/30 percent apart. [`CalibrationTable`]
//! keeps a copy of that table, persists it, and translates raw readings by
//! linear interpolation.
//!
//! ## Validity
//!
//! A table is usable only if every point has been filled in and the points
//! strictly increase. Checking that is deferred: any mutation moves the table
//! to [`Validity::Dirty`], and the next [`CalibrationTable::is_valid`] call
//! settles it to [`Validity::Valid`] or [`Validity::Invalid`].
//!
//! ## Persistence
//!
//! The table is stored as 31 `u16` slots followed by a checksum, the wrapping
//! sum of the slots XOR `0xB01D`. A table whose checksum or invariants fail on
//! load is wiped to "never calibrated". Empty slots are `0xFFFF` in storage and
//! `None` in memory.

use core::fmt;

use thiserror::Error;

use crate::consts::{
    CALIBRATION_CHECKSUM_SALT, CALIBRATION_POINTS, CALIBRATION_SENTINEL, CALIBRATION_SPACING,
    RESISTANCE_UNKNOWN,
};
use crate::message::CalibrationIndex;
use crate::storage::{CALIBRATION_BASE_ADDRESS, CALIBRATION_CHECKSUM_ADDRESS, Storage};

/// Memoized outcome of the table invariant check.
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Validity {
    /// Checked: every point present and strictly increasing.
    Valid,
    /// Checked, or known without checking: unusable.
    Invalid,
    /// Mutated since the last check.
    Dirty,
}

/// Errors raised while editing the table.
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
#[derive(Error, PartialEq, Eq, Clone, Copy, Debug)]
pub enum CalibrationError {
    /// The index does not name one of the 31 points.
    #[error("Calibration index {0} out of range.")]
    IndexOutOfRange(u8),
}

/// Computes the salted checksum stored alongside the raw table.
pub fn table_checksum(raw: &[u16; CALIBRATION_POINTS]) -> u16 {
    raw.iter().fold(0u16, |acc, v| acc.wrapping_add(*v)) ^ CALIBRATION_CHECKSUM_SALT
}

/// A 31-point raw-to-percentage resistance lookup table.
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct CalibrationTable {
    points: [Option<u16>; CALIBRATION_POINTS],
    validity: Validity,
}

impl Default for CalibrationTable {
    fn default() -> Self {
        Self::new()
    }
}

impl CalibrationTable {
    /// Creates an empty, never-calibrated table.
    pub const fn new() -> Self {
        Self {
            points: [None; CALIBRATION_POINTS],
            validity: Validity::Invalid,
        }
    }

    /// Builds a table from its stored form.
    ///
    /// # Behavior
    /// The table is valid only if the invariants hold **and**
    /// [`table_checksum`] of `raw` equals `stored_checksum`. Otherwise every
    /// point is wiped, so callers can tell the bike has never been calibrated.
    pub fn from_raw(raw: [u16; CALIBRATION_POINTS], stored_checksum: u16) -> Self {
        let checksum_ok = table_checksum(&raw) == stored_checksum;
        let mut table = Self {
            points: raw.map(|v| (v != CALIBRATION_SENTINEL).then_some(v)),
            validity: Validity::Dirty,
        };
        if checksum_ok && table.revalidate() {
            debug!("calibration table loaded");
        } else {
            debug!("calibration table invalid (checksum ok: {}), wiping", checksum_ok);
            table = Self::new();
        }
        table
    }

    /// Loads the table from `store`. See [`from_raw`](Self::from_raw).
    pub fn load<S: Storage>(store: &mut S) -> Result<Self, S::Error> {
        let mut raw = [CALIBRATION_SENTINEL; CALIBRATION_POINTS];
        let mut address = CALIBRATION_BASE_ADDRESS;
        for slot in raw.iter_mut() {
            *slot = store.read_u16(address)?;
            address += 2;
        }
        let stored_checksum = store.read_u16(CALIBRATION_CHECKSUM_ADDRESS)?;
        Ok(Self::from_raw(raw, stored_checksum))
    }

    /// Writes the table and its checksum to `store`, if the table is valid.
    ///
    /// # Returns
    /// - `Ok(true)` if the table was written
    /// - `Ok(false)` if the table is invalid and nothing was written
    pub fn persist<S: Storage>(&mut self, store: &mut S) -> Result<bool, S::Error> {
        if !self.is_valid() {
            return Ok(false);
        }
        let raw = self.raw();
        let mut address = CALIBRATION_BASE_ADDRESS;
        for value in raw {
            store.write_u16(address, value)?;
            address += 2;
        }
        store.write_u16(CALIBRATION_CHECKSUM_ADDRESS, table_checksum(&raw))?;
        debug!("calibration table persisted");
        Ok(true)
    }

    /// The memoized validity, without settling a pending check.
    pub fn validity(&self) -> Validity {
        self.validity
    }

    /// Checks the invariants and memoizes the outcome.
    pub fn revalidate(&mut self) -> bool {
        let valid = self.check();
        self.validity = if valid {
            Validity::Valid
        } else {
            Validity::Invalid
        };
        valid
    }

    /// Whether the table is usable, revalidating only if it changed since the
    /// last check. The stored checksum is not consulted here.
    pub fn is_valid(&mut self) -> bool {
        match self.validity {
            Validity::Valid => true,
            Validity::Invalid => false,
            Validity::Dirty => self.revalidate(),
        }
    }

    /// Sets point `index` to `raw`.
    ///
    /// Writing the sentinel `0xFFFF` clears the point and invalidates the
    /// table at once; any other value leaves it [`Validity::Dirty`].
    ///
    /// # Errors
    /// [`CalibrationError::IndexOutOfRange`] if `index > 30`; the table is left
    /// untouched.
    pub fn update_entry(&mut self, index: u8, raw: u16) -> Result<(), CalibrationError> {
        let index = CalibrationIndex::new(index).ok_or(CalibrationError::IndexOutOfRange(index))?;
        self.set(index, raw);
        Ok(())
    }

    /// Sets an already range-checked point. See [`update_entry`](Self::update_entry).
    pub fn set(&mut self, index: CalibrationIndex, raw: u16) {
        let point = (raw != CALIBRATION_SENTINEL).then_some(raw);
        self.points[index.get() as usize] = point;
        self.validity = match point {
            Some(_) => Validity::Dirty,
            None => Validity::Invalid,
        };
    }

    /// The raw reading for point `index`, if it has been filled in.
    pub fn entry(&self, index: CalibrationIndex) -> Option<u16> {
        self.points[index.get() as usize]
    }

    /// The points in storage form, empty slots as `0xFFFF`.
    pub fn raw(&self) -> [u16; CALIBRATION_POINTS] {
        self.points.map(|p| p.unwrap_or(CALIBRATION_SENTINEL))
    }

    /// Translates a raw resistance reading to the 0–100 scale.
    ///
    /// # Behavior
    /// - Finds the pair of adjacent points bracketing `raw` by linear scan
    /// - Interpolates linearly between them
    /// - Truncates to a whole percentage
    ///
    /// # Returns
    /// `None` if the table is unusable or `raw` lies outside the first and last
    /// points.
    pub fn translate(&self, raw: u16) -> Option<u8> {
        let usable = match self.validity {
            Validity::Valid => true,
            Validity::Invalid => false,
            Validity::Dirty => self.check(),
        };
        if !usable {
            return None;
        }
        let points = self.raw();
        let (first, last) = (points[0], points[CALIBRATION_POINTS - 1]);
        if raw < first || raw > last {
            return None;
        }

        let lb = (0..CALIBRATION_POINTS - 2)
            .find(|&i| raw >= points[i] && raw <= points[i + 1])
            .unwrap_or(CALIBRATION_POINTS - 2);
        let span = (points[lb + 1] - points[lb]) as f32;
        let proportion = (raw - points[lb]) as f32 / span;
        let percent = (CALIBRATION_SPACING * (proportion + lb as f32)) as u8;
        debug_assert!(percent <= 100, "interpolated {} from {}", percent, raw);
        Some(percent)
    }

    /// [`translate`](Self::translate) in wire form: `0xFF` for unknown.
    pub fn translate_raw(&self, raw: u16) -> u8 {
        self.translate(raw).unwrap_or(RESISTANCE_UNKNOWN)
    }

    fn check(&self) -> bool {
        let mut previous: Option<u16> = None;
        for point in self.points {
            let Some(value) = point else {
                return false;
            };
            if previous.is_some_and(|p| value <= p) {
                return false;
            }
            previous = Some(value);
        }
        true
    }
}

/// One-line status dump: the validity followed by all 31 points, `--` for an
/// empty one.
impl fmt::Display for CalibrationTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let validity = match self.validity {
            Validity::Valid => "valid",
            Validity::Invalid => "invalid",
            Validity::Dirty => "dirty",
        };
        write!(f, "calibration {}:", validity)?;
        for point in self.points {
            match point {
                Some(raw) => write!(f, " {}", raw)?,
                None => f.write_str(" --")?,
            }
        }
        Ok(())
    }
}
