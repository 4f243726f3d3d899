use serde::{Deserialize, Serialize};
use chrono::NaiveDate;

/// Storage model for a patient and their baseline vital signs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientRecord {
    /// Unique identifier for the patient
    pub id: String,

    /// Patient's first name
    pub first_name: String,

    /// Patient's last name
    pub last_name: String,

    /// Date of birth
    pub birth_date: NaiveDate,

    /// Baseline body temperature in degrees Celsius
    pub normal_temperature: f64,

    /// Baseline systolic blood pressure (the higher number)
    pub systolic: u16,

    /// Baseline diastolic blood pressure (the lower number)
    pub diastolic: u16,
}

/// Input data for adding a new patient record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatePatientRecord {
    /// Identifier to store the patient under. A UUID is generated when absent.
    pub id: Option<String>,

    /// Patient's first name
    pub first_name: String,

    /// Patient's last name
    pub last_name: String,

    /// Date of birth
    pub birth_date: NaiveDate,

    /// Baseline body temperature in degrees Celsius
    pub normal_temperature: f64,

    /// Baseline systolic blood pressure
    pub systolic: u16,

    /// Baseline diastolic blood pressure
    pub diastolic: u16,
}

impl CreatePatientRecord {
    /// Turn the request into a storable record, generating an id if none was given
    pub fn into_record(self) -> PatientRecord {
        let id = self.id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        PatientRecord {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            birth_date: self.birth_date,
            normal_temperature: self.normal_temperature,
            systolic: self.systolic,
            diastolic: self.diastolic,
        }
    }
}
