// PatientVitals Domain
// This crate contains the vital-sign checks and alerting for PatientVitals

// Services that implement business logic
pub mod services;

// Domain entities
pub mod entities;

// Environment loading and tracing setup
pub mod telemetry;

// Re-export the database module from the data crate for convenience
pub use patient_vitals_data::database;

// Testing utilities - only available with mock feature
#[cfg(any(test, feature = "mock"))]
pub mod testing;
