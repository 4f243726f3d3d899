use rust_decimal::Decimal;

use crate::entities::vitals::{BloodPressure, Temperature};

/// Allowed deviation of either blood pressure value, in mmHg. Zero means exact match.
pub const BLOOD_PRESSURE_TOLERANCE_MMHG: u16 = 0;

/// Allowed temperature deviation in degrees (1.5 °C)
pub const TEMPERATURE_TOLERANCE: Decimal = Decimal::from_parts(15, 0, 0, false, 1);

/// Alert text sent for a patient whose reading is out of tolerance
pub fn alert_message(patient_id: &str) -> String {
    format!("Warning, patient with id: {}, need help", patient_id)
}

/// True when either value deviates from the baseline by more than the tolerance
pub fn blood_pressure_out_of_tolerance(baseline: BloodPressure, observed: BloodPressure) -> bool {
    baseline.systolic.abs_diff(observed.systolic) > BLOOD_PRESSURE_TOLERANCE_MMHG
        || baseline.diastolic.abs_diff(observed.diastolic) > BLOOD_PRESSURE_TOLERANCE_MMHG
}

/// True when the absolute deviation from the baseline is strictly greater than 1.5 °C
pub fn temperature_out_of_tolerance(baseline: Temperature, observed: Temperature) -> bool {
    baseline.difference(observed) > TEMPERATURE_TOLERANCE
}
