//! Capacitive touch sensing on the nose pad

use core::fmt::Debug;

/// Raw capacitive touch measurement on one pin.
pub trait CapacitiveSensor {
    type Error: Debug;

    /// Current raw reading; higher means more capacitance.
    fn raw_value(&mut self) -> Result<u16, Self::Error>;
}

/// Added to the first reading to get the initial threshold.
pub const CALIBRATION_MARGIN: u16 = 100;

/// Threshold the board sets on the nose pad.
pub const NOSE_THRESHOLD: u16 = 180;

/// Touch pad with a detection threshold.
///
/// Construction takes one reading and calibrates the threshold to that
/// baseline plus [`CALIBRATION_MARGIN`].
#[derive(Debug)]
pub struct NoseTouch<T> {
    sensor: T,
    threshold: u16,
}

impl<T> NoseTouch<T>
where
    T: CapacitiveSensor,
{
    pub fn new(mut sensor: T) -> Result<Self, T::Error> {
        let baseline = sensor.raw_value()?;
        Ok(Self {
            sensor,
            threshold: baseline.saturating_add(CALIBRATION_MARGIN),
        })
    }

    pub fn threshold(&self) -> u16 {
        self.threshold
    }

    pub fn set_threshold(&mut self, threshold: u16) {
        self.threshold = threshold;
    }

    pub fn raw_value(&mut self) -> Result<u16, T::Error> {
        self.sensor.raw_value()
    }

    /// Touched when the raw reading is strictly above the threshold.
    pub fn is_touched(&mut self) -> Result<bool, T::Error> {
        Ok(self.sensor.raw_value()? > self.threshold)
    }

    pub fn into_inner(self) -> T {
        self.sensor
    }
}
