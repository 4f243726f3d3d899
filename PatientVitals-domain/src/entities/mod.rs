// Domain entities and value objects
pub mod vitals;
pub mod patient;
pub mod conversions;

// Re-export common types for easier imports
pub use vitals::{BloodPressure, Temperature, TemperatureError};
pub use patient::{BaselineValues, CreatePatientRequest, HealthInfo, PatientInfo};
