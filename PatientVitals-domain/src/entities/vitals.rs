use std::fmt;
use std::str::FromStr;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A blood pressure measurement in mmHg
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BloodPressure {
    /// Systolic blood pressure (the higher number)
    pub systolic: u16,

    /// Diastolic blood pressure (the lower number)
    pub diastolic: u16,
}

impl BloodPressure {
    pub const fn new(systolic: u16, diastolic: u16) -> Self {
        Self { systolic, diastolic }
    }
}

impl fmt::Display for BloodPressure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} mmHg", self.systolic, self.diastolic)
    }
}

/// Invalid temperature readings
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TemperatureError {
    /// NaN or infinite input
    #[error("Temperature must be a finite number, got {0}")]
    NotFinite(f64),

    /// Finite but beyond what a decimal can hold
    #[error("Temperature out of range: {0}")]
    OutOfRange(f64),
}

/// Body temperature in degrees Celsius, held as an exact decimal
///
/// A reading keeps every digit it was given, so 35.099 is 1.501 away from
/// 36.6 and never rounds onto the 1.5 threshold. Serialized as a plain
/// number of degrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Temperature {
    celsius: Decimal,
}

impl Temperature {
    pub const fn new(celsius: Decimal) -> Self {
        Self { celsius }
    }

    /// Build from degrees, keeping the shortest decimal form of the value
    pub fn from_celsius(celsius: f64) -> Result<Self, TemperatureError> {
        if !celsius.is_finite() {
            return Err(TemperatureError::NotFinite(celsius));
        }

        // Display prints the shortest digits that round-trip, never an exponent
        Decimal::from_str(&celsius.to_string())
            .map(Self::new)
            .map_err(|_| TemperatureError::OutOfRange(celsius))
    }

    pub const fn decimal(self) -> Decimal {
        self.celsius
    }

    /// Nearest `f64` to the decimal value
    pub fn celsius(self) -> f64 {
        self.celsius.to_string().parse().unwrap_or_default()
    }

    /// Absolute difference between two temperatures in degrees
    pub fn difference(self, other: Temperature) -> Decimal {
        self.celsius
            .checked_sub(other.celsius)
            .map(|diff| diff.abs())
            .unwrap_or(Decimal::MAX)
    }
}

impl TryFrom<f64> for Temperature {
    type Error = TemperatureError;

    fn try_from(celsius: f64) -> Result<Self, Self::Error> {
        Self::from_celsius(celsius)
    }
}

impl From<Temperature> for f64 {
    fn from(temperature: Temperature) -> Self {
        temperature.celsius()
    }
}

impl fmt::Display for Temperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} °C", self.celsius)
    }
}
