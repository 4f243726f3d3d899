pub mod patient;

pub use patient::{CreatePatientRecord, PatientRecord};
