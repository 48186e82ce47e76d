//! # bikebus
//!
//! A portable, no_std Rust decoder for the serial link between an exercise
//! bike's sensor head and its head unit, with a ride integrator that turns the
//! decoded replies into broadcastable telemetry.
//!
//! The crate sits between a byte source and a broadcast layer:
//! - framing and checksum validation for both sides of the half-duplex link
//! - decoding of the sensor head's least-significant-digit-first ASCII numbers
//! - a 31-point resistance calibration table with checksummed persistence
//! - cumulative crank and wheel revolutions with back-dated event times,
//!   accumulated energy, and speed estimated from power
//!
//! ## Crate features
//! | Feature                 | Description |
//! |-------------------------|-------------|
//! | `std`                   | Disables `#![no_std]` |
//! | `shared-ride` (default) | Adds [`shared::SharedRide`], a `critical-section` guarded ride |
//! | `defmt-0-3`             | Uses `defmt` logging |
//! | `log`                   | Uses `log` logging |
//!
//! ## Usage
//!
//! ```rust
//! use bikebus::calibration::CalibrationTable;
//! use bikebus::exchange::{Event, Exchange};
//! use bikebus::message::Request;
//! use bikebus::ride::RideStatus;
//!
//! let mut exchange = Exchange::new();
//! let mut ride = RideStatus::default();
//! let mut table = CalibrationTable::new();
//!
//! // Head unit asks for cadence, sensor head answers "570" (75 rpm)
//! exchange.head_unit_frame(&[0xF5, 0x41, 0x36, 0xF6]).unwrap();
//! let event = exchange
//!     .bike_frame(
//!         &[0xF1, 0x41, 0x03, b'5', b'7', b'0', 0xD1, 0xF6],
//!         1_000,
//!         &mut ride,
//!         &mut table,
//!     )
//!     .unwrap();
//! assert_eq!(event, Event::Telemetry(Request::Rpm));
//! assert_eq!(ride.current_rpm(), 75);
//! ```
//!
//! ## Integration Notes
//!
//! - Frames must be split on the `0xF6` terminator by the caller
//! - Timestamps are milliseconds from any free-running `u32` clock
//! - The calibration table lives in any byte-addressable [`storage::Storage`]
//!
//! --
//! Designed for `#![no_std]` use in resource-constrained embedded environments.

#![deny(
    bad_style,
    dead_code,
    improper_ctypes,
    non_shorthand_field_patterns,
    no_mangle_generic_items,
    overflowing_literals,
    path_statements,
    patterns_in_fns_without_body,
    unconditional_recursion,
    unused,
    while_true,
    missing_debug_implementations,
    missing_docs,
    trivial_casts,
    trivial_numeric_casts,
    unused_extern_crates,
    unused_import_braces,
    unused_qualifications,
    unused_results
)]
#![cfg_attr(not(feature = "std"), no_std)]

#[macro_use]
mod fmt;

#[cfg(feature = "shared-ride")]
pub use critical_section;

pub use heapless;

pub mod calibration;
pub mod consts;
pub mod exchange;
pub mod frame;
pub mod message;
pub mod ride;
#[cfg(feature = "shared-ride")]
pub mod shared;
pub mod storage;
