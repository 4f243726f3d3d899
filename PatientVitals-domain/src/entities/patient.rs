use serde::{Deserialize, Serialize};
use chrono::NaiveDate;
use validator::Validate;

use super::vitals::{BloodPressure, Temperature};

/// A patient's baseline vital signs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthInfo {
    /// Normal body temperature
    pub normal_temperature: Temperature,

    /// Normal blood pressure
    pub blood_pressure: BloodPressure,
}

impl HealthInfo {
    pub fn new(normal_temperature: Temperature, blood_pressure: BloodPressure) -> Self {
        Self { normal_temperature, blood_pressure }
    }
}

/// Domain model for a patient
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientInfo {
    /// Unique identifier for the patient
    pub id: String,

    /// Patient's first name
    pub first_name: String,

    /// Patient's last name
    pub last_name: String,

    /// Date of birth
    pub birth_date: NaiveDate,

    /// Baseline the checks compare against
    pub health_info: HealthInfo,
}

/// Request payload for registering a new patient
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreatePatientRequest {
    /// Optional identifier. A UUID is generated when absent.
    pub id: Option<String>,

    #[validate(length(min = 1, max = 100, message = "First name must be between 1 and 100 characters"))]
    pub first_name: String,

    #[validate(length(min = 1, max = 100, message = "Last name must be between 1 and 100 characters"))]
    pub last_name: String,

    /// Date of birth, must not be in the future
    pub birth_date: NaiveDate,

    /// Baseline body temperature in degrees Celsius
    pub normal_temperature: f64,

    /// Baseline systolic blood pressure
    pub systolic: u16,

    /// Baseline diastolic blood pressure
    pub diastolic: u16,
}

/// Baseline vital signs checked against plausible ranges, on registration and on update
#[derive(Debug, Clone, Copy, PartialEq, Validate)]
pub struct BaselineValues {
    #[validate(range(min = 30.0, max = 45.0, message = "Temperature must be between 30.0 and 45.0"))]
    pub normal_temperature: f64,

    #[validate(range(min = 40, max = 300, message = "Systolic must be between 40 and 300"))]
    pub systolic: u16,

    #[validate(range(min = 20, max = 200, message = "Diastolic must be between 20 and 200"))]
    pub diastolic: u16,
}

impl From<&CreatePatientRequest> for BaselineValues {
    fn from(request: &CreatePatientRequest) -> Self {
        Self {
            normal_temperature: request.normal_temperature,
            systolic: request.systolic,
            diastolic: request.diastolic,
        }
    }
}

impl From<&HealthInfo> for BaselineValues {
    fn from(health_info: &HealthInfo) -> Self {
        Self {
            normal_temperature: health_info.normal_temperature.celsius(),
            systolic: health_info.blood_pressure.systolic,
            diastolic: health_info.blood_pressure.diastolic,
        }
    }
}
