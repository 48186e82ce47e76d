//! Ride telemetry integrator.
//!
//! This module provides [`RideStatus`], which turns the sensor head's discrete
//! cadence, power and resistance replies into the continuous quantities a
//! cycling speed/cadence or power profile needs: cumulative crank and wheel
//! revolutions with the timestamp of the last completed revolution,
//! accumulated energy, and estimated speed.
//!
//! ## Signals
//!
//! Cadence and power are integrated independently. Each one is either
//! **idle** (never seen, or silent for longer than the staleness window) or
//! **active**. The first message after an idle period zeroes that signal's
//! counters before integrating; after a long gap the old counts mean nothing.
//!
//! ## Revolution timestamps
//!
//! Receivers compute cadence and speed from the time of the *last completed
//! revolution*, not from the time a sample arrived. [`advance`] back-dates the
//! event timestamp to the instant the running total crossed an integer.
//!
//! ## Precision
//!
//! Totals are `f32`, which stops representing whole numbers exactly past 2^24.
//! Once a total exceeds that it drops its integer part and keeps counting from
//! the fraction; consumers of the revolution counts must tolerate rollover.
//!
//! ## Time
//!
//! All timestamps come from the caller's millisecond clock. Differences use
//! wrapping arithmetic, so the 49.7-day `u32` wrap is harmless.

use core::fmt;

use libm::sqrtf;

use crate::calibration::CalibrationTable;
use crate::consts::{
    KJ_PER_DECIWATT_MS, MAX_EXACT_REVOLUTIONS, MM_PER_MILE, MS_PER_HOUR, REVS_PER_MS_PER_RPM,
    STALENESS_WINDOW_MS, WHEEL_REVS_PER_MS_PER_MPH,
};
use crate::message::{BikeMessage, Request};

/// Tunables of the integrator.
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
#[derive(PartialEq, Clone, Copy, Debug)]
pub struct RideConfig {
    /// A signal silent for longer than this is idle and resets on its next message.
    pub staleness_ms: u32,
    /// Wheel revolutions per millisecond for each mile per hour of speed.
    pub wheel_revs_per_ms_per_mph: f32,
}

impl RideConfig {
    /// 5 s staleness window and a 2105 mm (700c x 25) wheel.
    pub const fn new() -> Self {
        Self {
            staleness_ms: STALENESS_WINDOW_MS,
            wheel_revs_per_ms_per_mph: WHEEL_REVS_PER_MS_PER_MPH,
        }
    }

    /// Derives the wheel constant from a circumference in millimetres.
    ///
    /// 1 mph is `MM_PER_MILE / circumference` revolutions per hour.
    pub const fn with_wheel_circumference_mm(mut self, circumference_mm: f32) -> Self {
        self.wheel_revs_per_ms_per_mph = MM_PER_MILE / circumference_mm / MS_PER_HOUR;
        self
    }

    /// Replaces the staleness window.
    pub const fn with_staleness_ms(mut self, staleness_ms: u32) -> Self {
        self.staleness_ms = staleness_ms;
        self
    }
}

impl Default for RideConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// A running revolution count and the time its last whole revolution completed.
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
#[derive(PartialEq, Clone, Copy, Default, Debug)]
pub struct Revolutions {
    /// Revolutions since the last reset, including the partial one in progress.
    pub total: f32,
    /// Clock time (ms) at which the last whole revolution completed.
    pub last_event_ms: u32,
}

impl Revolutions {
    /// No revolutions, with the event clock set to `now_ms`.
    pub const fn starting_at(now_ms: u32) -> Self {
        Self {
            total: 0.0,
            last_event_ms: now_ms,
        }
    }
}

/// Adds `incremental` revolutions to `revs`, turning at `rev_per_ms`, as of `now_ms`.
///
/// If the whole part of the total changed, at least one revolution completed
/// during the interval. The event timestamp then moves back from `now_ms` by the
/// time the current partial revolution took: `fract(total) / rev_per_ms`,
/// truncated to whole milliseconds. Otherwise the timestamp is left alone.
pub fn advance(revs: Revolutions, incremental: f32, rev_per_ms: f32, now_ms: u32) -> Revolutions {
    let previous_whole = revs.total as u32;
    let total = revs.total + incremental;
    let whole = total as u32;
    if whole == previous_whole {
        return Revolutions { total, ..revs };
    }
    let partial = total - whole as f32;
    let ms_since_completion = partial / rev_per_ms;
    Revolutions {
        total,
        last_event_ms: now_ms.wrapping_sub(ms_since_completion as u32),
    }
}

/// Drops the integer part of a total too large to count exactly.
fn roll_over(total: f32) -> f32 {
    if total > MAX_EXACT_REVOLUTIONS {
        total - (total as u32) as f32
    } else {
        total
    }
}

/// Estimates speed in mph from power in deciwatts.
///
/// A piecewise cubic in the square root of power, fitted to logged rides.
/// The low segment covers less than 27 W.
pub fn speed_from_power(deciwatts: u16) -> f32 {
    const LOW: [f32; 4] = [-0.07605, 0.74063, -0.14023, 0.04660];
    const HIGH: [f32; 4] = [0.00087, -0.05685, 2.23594, -1.31158];

    let power = deciwatts as f32 * 0.1;
    let root = sqrtf(power);
    let coefs = if power < 27.0 { &LOW } else { &HIGH };
    ((coefs[0] * root + coefs[1]) * root + coefs[2]) * root + coefs[3]
}

fn is_idle(last_ms: Option<u32>, now_ms: u32, staleness_ms: u32) -> bool {
    match last_ms {
        None => true,
        Some(last) => now_ms.wrapping_sub(last) > staleness_ms,
    }
}

/// A consistent copy of every value the broadcast layer reads.
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
#[derive(PartialEq, Clone, Copy, Default, Debug)]
pub struct Telemetry {
    /// Cadence in RPM.
    pub rpm: u16,
    /// Power in whole watts, rounded half up.
    pub watts: u16,
    /// Power in deciwatts, as reported.
    pub deciwatts: u16,
    /// Estimated speed in mph.
    pub speed_mph: f32,
    /// Energy since the power stream last went active, in kJ.
    pub energy_kj: f32,
    /// Whole crank revolutions.
    pub crank_revolutions: u16,
    /// Time of the last completed crank revolution, in ms.
    pub last_crank_event_ms: u32,
    /// Whole wheel revolutions.
    pub wheel_revolutions: u32,
    /// Time of the last completed wheel revolution, in ms.
    pub last_wheel_event_ms: u32,
    /// Raw resistance reading.
    pub raw_resistance: u16,
    /// Calibrated resistance, 0–100, or `None` if unknown.
    pub resistance: Option<u8>,
}

impl Telemetry {
    /// Renders the one-line status into a fixed-capacity string.
    ///
    /// Output longer than the capacity is cut short.
    pub fn status_line(&self) -> heapless::String<96> {
        use fmt::Write;

        let mut line = heapless::String::new();
        let _ = write!(line, "{}", self);
        line
    }
}

impl fmt::Display for Telemetry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:>3}rpm {:>4.1}mph {:>4}.{}W {:>8.3}kJ ",
            self.rpm,
            self.speed_mph,
            self.deciwatts / 10,
            self.deciwatts % 10,
            self.energy_kj,
        )?;
        match self.resistance {
            Some(level) => write!(f, "res {}({})", level, self.raw_resistance),
            None => write!(f, "res --({})", self.raw_resistance),
        }
    }
}

/// The integrator's state for one ride.
///
/// ## Example
///
/// ```rust
/// use bikebus::calibration::CalibrationTable;
/// use bikebus::ride::{RideConfig, RideStatus};
///
/// let table = CalibrationTable::new();
/// let mut ride = RideStatus::new(RideConfig::new());
/// ride.on_power(1500, 0);
/// ride.on_power(1500, 1_000);
/// ride.on_resistance(400, &table);
/// assert_eq!(ride.current_watts(), 150);
/// assert_eq!(ride.resistance(), None);
/// ```
#[derive(PartialEq, Clone, Debug)]
pub struct RideStatus {
    config: RideConfig,
    crank: Revolutions,
    last_cadence_ms: Option<u32>,
    rpm: u16,
    wheel: Revolutions,
    last_power_ms: Option<u32>,
    power_deciwatts: u16,
    energy_kj: f32,
    speed_mph: f32,
    raw_resistance: u16,
    resistance: Option<u8>,
}

impl Default for RideStatus {
    fn default() -> Self {
        Self::new(RideConfig::new())
    }
}

impl RideStatus {
    /// Creates the state for a new ride; both signals start idle.
    pub const fn new(config: RideConfig) -> Self {
        Self {
            config,
            crank: Revolutions::starting_at(0),
            last_cadence_ms: None,
            rpm: 0,
            wheel: Revolutions::starting_at(0),
            last_power_ms: None,
            power_deciwatts: 0,
            energy_kj: 0.0,
            speed_mph: 0.0,
            raw_resistance: 0,
            resistance: None,
        }
    }

    /// Clears everything for a new ride, keeping the configuration.
    pub fn reset(&mut self) {
        *self = Self::new(self.config);
    }

    /// The configuration in use.
    pub fn config(&self) -> &RideConfig {
        &self.config
    }

    /// Integrates a cadence sample.
    ///
    /// # Behavior
    /// 1. If cadence is idle, zero the crank total and restart both clocks at `now_ms`
    /// 2. Integrate `rpm / 60000` revolutions per ms over the time since the
    ///    previous cadence sample, back-dating the crank event via [`advance`]
    /// 3. Roll the total over once it leaves `f32`'s exact range
    pub fn on_cadence(&mut self, rpm: u16, now_ms: u32) {
        if is_idle(self.last_cadence_ms, now_ms, self.config.staleness_ms) {
            debug!("cadence idle, resetting crank revolutions at {}", now_ms);
            self.crank = Revolutions::starting_at(now_ms);
            self.last_cadence_ms = Some(now_ms);
        }
        let elapsed_ms = now_ms.wrapping_sub(self.last_cadence_ms.unwrap_or(now_ms));
        self.rpm = rpm;
        self.last_cadence_ms = Some(now_ms);

        let rev_per_ms = REVS_PER_MS_PER_RPM * rpm as f32;
        let incremental = rev_per_ms * elapsed_ms as f32;
        self.crank = advance(self.crank, incremental, rev_per_ms, now_ms);
        self.crank.total = roll_over(self.crank.total);
        trace!("crank {} @ {}", self.crank.total, self.crank.last_event_ms);
    }

    /// Integrates a power sample.
    ///
    /// # Behavior
    /// 1. If power is idle, zero energy and wheel total and restart both clocks
    /// 2. Estimate speed with [`speed_from_power`]
    /// 3. Add `deciwatts * elapsed_ms * 1e-7` kJ of energy
    /// 4. Integrate wheel revolutions at the estimated speed via [`advance`]
    /// 5. Roll the wheel total over once it leaves `f32`'s exact range
    pub fn on_power(&mut self, deciwatts: u16, now_ms: u32) {
        if is_idle(self.last_power_ms, now_ms, self.config.staleness_ms) {
            debug!("power idle, resetting energy and wheel revolutions at {}", now_ms);
            self.wheel = Revolutions::starting_at(now_ms);
            self.energy_kj = 0.0;
            self.last_power_ms = Some(now_ms);
        }
        let elapsed_ms = now_ms.wrapping_sub(self.last_power_ms.unwrap_or(now_ms));
        self.last_power_ms = Some(now_ms);
        self.power_deciwatts = deciwatts;
        self.speed_mph = speed_from_power(deciwatts);

        let deciwatt_ms = deciwatts as u64 * elapsed_ms as u64;
        self.energy_kj += deciwatt_ms as f32 * KJ_PER_DECIWATT_MS;

        let rev_per_ms = self.config.wheel_revs_per_ms_per_mph * self.speed_mph;
        let incremental = rev_per_ms * elapsed_ms as f32;
        self.wheel = advance(self.wheel, incremental, rev_per_ms, now_ms);
        self.wheel.total = roll_over(self.wheel.total);
        trace!("wheel {} @ {}", self.wheel.total, self.wheel.last_event_ms);
    }

    /// Records a raw resistance reading and its calibrated value.
    pub fn on_resistance(&mut self, raw: u16, table: &CalibrationTable) {
        self.raw_resistance = raw;
        self.resistance = table.translate(raw);
    }

    /// Applies a decoded sensor-head reply.
    ///
    /// # Returns
    /// `true` if the reply was cadence, power or resistance and was integrated;
    /// `false` for any other request, which is left for the caller.
    pub fn update(&mut self, message: &BikeMessage, now_ms: u32, table: &CalibrationTable) -> bool {
        match message.request() {
            Request::Rpm => self.on_cadence(message.value(), now_ms),
            Request::Power => self.on_power(message.value(), now_ms),
            Request::Resistance => self.on_resistance(message.value(), table),
            other => {
                warn!("not a telemetry reply: request {}", u8::from(other));
                return false;
            }
        }
        true
    }

    /// Cadence in RPM.
    pub fn current_rpm(&self) -> u16 {
        self.rpm
    }

    /// Power in whole watts, rounded half up.
    pub fn current_watts(&self) -> u16 {
        let watts = self.power_deciwatts / 10;
        if self.power_deciwatts % 10 >= 5 {
            watts + 1
        } else {
            watts
        }
    }

    /// Power in deciwatts.
    pub fn current_deciwatts(&self) -> u16 {
        self.power_deciwatts
    }

    /// Estimated speed in mph.
    pub fn current_mph(&self) -> f32 {
        self.speed_mph
    }

    /// Accumulated energy in kJ.
    pub fn energy_kj(&self) -> f32 {
        self.energy_kj
    }

    /// Accumulated energy in whole kJ.
    pub fn total_kj(&self) -> u16 {
        self.energy_kj as u16
    }

    /// Whole crank revolutions, wrapping at 16 bits.
    pub fn integral_crank_revolutions(&self) -> u16 {
        self.crank.total as u32 as u16
    }

    /// Whole wheel revolutions.
    pub fn integral_wheel_revolutions(&self) -> u32 {
        self.wheel.total as u32
    }

    /// Crank revolution total and event time.
    pub fn crank(&self) -> Revolutions {
        self.crank
    }

    /// Wheel revolution total and event time.
    pub fn wheel(&self) -> Revolutions {
        self.wheel
    }

    /// Time of the last completed crank revolution, in ms.
    pub fn last_crank_rev_ms(&self) -> u32 {
        self.crank.last_event_ms
    }

    /// Time of the last completed wheel revolution, in ms.
    pub fn last_wheel_rev_ms(&self) -> u32 {
        self.wheel.last_event_ms
    }

    /// Raw resistance reading.
    pub fn raw_resistance(&self) -> u16 {
        self.raw_resistance
    }

    /// Calibrated resistance, 0–100, or `None` if unknown.
    pub fn resistance(&self) -> Option<u8> {
        self.resistance
    }

    /// Copies every broadcast value at once.
    pub fn snapshot(&self) -> Telemetry {
        Telemetry {
            rpm: self.rpm,
            watts: self.current_watts(),
            deciwatts: self.power_deciwatts,
            speed_mph: self.speed_mph,
            energy_kj: self.energy_kj,
            crank_revolutions: self.integral_crank_revolutions(),
            last_crank_event_ms: self.crank.last_event_ms,
            wheel_revolutions: self.integral_wheel_revolutions(),
            last_wheel_event_ms: self.wheel.last_event_ms,
            raw_resistance: self.raw_resistance,
            resistance: self.resistance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::table_checksum;
    use crate::consts::{CALIBRATION_POINTS, DEFAULT_WHEEL_CIRCUMFERENCE_MM};
    use crate::testutil::bike_frame;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn test_advance_back_dates_event() {
        let revs = Revolutions {
            total: 0.9,
            last_event_ms: 500,
        };
        let revs = advance(revs, 0.3, 0.01, 1000);
        assert!(close(revs.total, 1.2));
        assert_eq!(revs.last_event_ms, 980);
    }

    #[test]
    fn test_advance_without_completed_revolution_keeps_event() {
        let revs = Revolutions {
            total: 0.2,
            last_event_ms: 500,
        };
        let revs = advance(revs, 0.3, 0.01, 1000);
        assert!(close(revs.total, 0.5));
        assert_eq!(revs.last_event_ms, 500);
    }

    #[test]
    fn test_advance_wraps_clock() {
        let revs = advance(Revolutions::starting_at(0), 1.5, 0.01, 10);
        assert_eq!(revs.last_event_ms, 10u32.wrapping_sub(50));
    }

    #[test]
    fn test_roll_over() {
        assert_eq!(roll_over(12.5), 12.5);
        assert_eq!(roll_over(MAX_EXACT_REVOLUTIONS), MAX_EXACT_REVOLUTIONS);
        assert!(roll_over(MAX_EXACT_REVOLUTIONS + 2.0) < 1.0);
    }

    #[test]
    fn test_speed_from_power() {
        assert!(close(speed_from_power(0), 0.0466));
        assert!(close(speed_from_power(269), 8.63194));
        // 27 W switches to the high segment
        assert!(close(speed_from_power(270), 8.89381));
        assert!(close(speed_from_power(1500), 19.14377));
        assert!((0..=u16::MAX).all(|dw| speed_from_power(dw) > 0.0));
    }

    #[test]
    fn test_config_wheel_constant() {
        let config = RideConfig::new().with_wheel_circumference_mm(DEFAULT_WHEEL_CIRCUMFERENCE_MM);
        assert!((config.wheel_revs_per_ms_per_mph - WHEEL_REVS_PER_MS_PER_MPH).abs() < 1e-7);
        assert_eq!(RideConfig::default().staleness_ms, 5_000);
    }

    #[test]
    fn test_first_cadence_message_resets_and_integrates_nothing() {
        let mut ride = RideStatus::default();
        ride.on_cadence(90, 1_000);
        assert_eq!(ride.current_rpm(), 90);
        assert_eq!(ride.crank().total, 0.0);
        assert_eq!(ride.last_crank_rev_ms(), 1_000);
    }

    #[test]
    fn test_cadence_integrates_and_back_dates() {
        let mut ride = RideStatus::default();
        ride.on_cadence(90, 1_000);
        ride.on_cadence(90, 2_000);
        // 1.5 revolutions; the first completed 333 ms ago
        assert!(close(ride.crank().total, 1.5));
        assert_eq!(ride.integral_crank_revolutions(), 1);
        assert_eq!(ride.last_crank_rev_ms(), 1_667);
    }

    #[test]
    fn test_cadence_staleness_resets_counter() {
        let mut ride = RideStatus::default();
        ride.on_cadence(60, 1_000);
        ride.on_cadence(60, 7_000);
        assert_eq!(ride.crank().total, 0.0);
        assert_eq!(ride.last_crank_rev_ms(), 7_000);
        assert_eq!(ride.current_rpm(), 60);
    }

    #[test]
    fn test_cadence_exactly_at_window_is_not_stale() {
        let mut ride = RideStatus::default();
        ride.on_cadence(60, 1_000);
        ride.on_cadence(60, 6_000);
        assert!(close(ride.crank().total, 5.0));
    }

    #[test]
    fn test_cadence_survives_clock_wrap() {
        let mut ride = RideStatus::default();
        ride.on_cadence(60, u32::MAX - 499);
        ride.on_cadence(60, 500);
        assert!(close(ride.crank().total, 1.0));
    }

    #[test]
    fn test_cadence_at_time_zero_is_not_forgotten() {
        let mut ride = RideStatus::default();
        ride.on_cadence(60, 0);
        ride.on_cadence(60, 1_000);
        assert!(close(ride.crank().total, 1.0));
    }

    #[test]
    fn test_crank_total_rolls_over() {
        let mut ride = RideStatus::default();
        ride.on_cadence(90, 0);
        ride.crank.total = MAX_EXACT_REVOLUTIONS;
        ride.on_cadence(90, 1_000);
        assert!(ride.crank().total < 1.0);
    }

    #[test]
    fn test_crank_count_wraps_at_16_bits() {
        let mut ride = RideStatus::default();
        ride.on_cadence(90, 0);
        ride.crank.total = 65_535.9;
        ride.on_cadence(90, 1_000);
        // Past 2^16 an f32 only resolves to 1/128
        let total = ride.crank().total;
        assert!(total > 65_537.3 && total < 65_537.5);
        assert_eq!(ride.integral_crank_revolutions(), 1);
        assert_eq!(ride.snapshot().crank_revolutions, 1);
    }

    #[test]
    fn test_wheel_total_rolls_over() {
        let mut ride = RideStatus::default();
        ride.on_power(1500, 0);
        ride.wheel.total = MAX_EXACT_REVOLUTIONS;
        ride.on_power(1500, 1_000);
        assert!(ride.wheel().total < 1.0);
        assert_eq!(ride.integral_wheel_revolutions(), 0);
        assert!(close(ride.energy_kj(), 0.15));
    }

    #[test]
    fn test_power_energy_after_reset() {
        let mut ride = RideStatus::default();
        ride.on_power(1500, 0);
        assert_eq!(ride.energy_kj(), 0.0);
        ride.on_power(1500, 1_000);
        assert!(close(ride.energy_kj(), 0.15));
        assert_eq!(ride.total_kj(), 0);
        assert_eq!(ride.current_watts(), 150);
        assert!(close(ride.current_mph(), 19.14377));
    }

    #[test]
    fn test_power_integrates_wheel_revolutions() {
        let mut ride = RideStatus::default();
        ride.on_power(1500, 0);
        ride.on_power(1500, 1_000);
        assert_eq!(ride.integral_wheel_revolutions(), 4);
        assert_eq!(ride.last_wheel_rev_ms(), 984);
    }

    #[test]
    fn test_power_staleness_resets_energy_and_wheel() {
        let mut ride = RideStatus::default();
        ride.on_power(1500, 0);
        ride.on_power(1500, 4_000);
        assert!(close(ride.energy_kj(), 0.6));
        ride.on_power(2000, 9_001);
        assert_eq!(ride.energy_kj(), 0.0);
        assert_eq!(ride.wheel().total, 0.0);
        assert_eq!(ride.last_wheel_rev_ms(), 9_001);
        assert_eq!(ride.current_deciwatts(), 2000);
    }

    #[test]
    fn test_watts_round_half_up() {
        let mut ride = RideStatus::default();
        ride.on_power(1554, 0);
        assert_eq!(ride.current_watts(), 155);
        ride.on_power(1555, 10);
        assert_eq!(ride.current_watts(), 156);
    }

    #[test]
    fn test_resistance_uses_calibration() {
        let raw: [u16; CALIBRATION_POINTS] = core::array::from_fn(|i| 100 * (i as u16 + 1));
        let table = CalibrationTable::from_raw(raw, table_checksum(&raw));
        let mut ride = RideStatus::default();
        ride.on_resistance(1600, &table);
        assert_eq!(ride.raw_resistance(), 1600);
        assert_eq!(ride.resistance(), Some(50));
        ride.on_resistance(50, &table);
        assert_eq!(ride.resistance(), None);
    }

    #[test]
    fn test_update_dispatches_telemetry() {
        let table = CalibrationTable::new();
        let mut ride = RideStatus::default();
        let rpm = BikeMessage::decode(&bike_frame(0x41, b"570")).unwrap();
        assert!(ride.update(&rpm, 0, &table));
        assert_eq!(ride.current_rpm(), 75);

        let power = BikeMessage::decode(&bike_frame(0x44, b"05510")).unwrap();
        assert!(ride.update(&power, 0, &table));
        assert_eq!(ride.current_deciwatts(), 1550);

        let id = BikeMessage::decode(&bike_frame(0xFB, b"0000000")).unwrap();
        assert!(!ride.update(&id, 0, &table));
    }

    #[test]
    fn test_reset_keeps_config() {
        let config = RideConfig::new().with_staleness_ms(1_000);
        let mut ride = RideStatus::new(config);
        ride.on_power(1500, 0);
        ride.reset();
        assert_eq!(ride, RideStatus::new(config));
    }

    #[test]
    fn test_snapshot_and_status_line() {
        let mut ride = RideStatus::default();
        ride.on_cadence(90, 0);
        ride.on_cadence(90, 1_000);
        ride.on_power(1505, 0);
        let snapshot = ride.snapshot();
        assert_eq!(snapshot.rpm, 90);
        assert_eq!(snapshot.watts, 151);
        assert_eq!(snapshot.crank_revolutions, 1);
        assert_eq!(snapshot.resistance, None);
        assert!(snapshot.status_line().starts_with(" 90rpm"));
        assert!(snapshot.status_line().ends_with("res --(0)"));
    }
}
