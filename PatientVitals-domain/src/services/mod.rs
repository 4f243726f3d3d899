pub mod alert;
pub mod tolerance;
pub mod vitals;
pub mod patient;

// Domain services
// Vital-sign checks, alert delivery and patient registration.

// Re-export service traits and implementations
pub use alert::{LoggingNotifier, NotifierTrait, WriterNotifier};
pub use tolerance::{
    alert_message, blood_pressure_out_of_tolerance, temperature_out_of_tolerance,
    BLOOD_PRESSURE_TOLERANCE_MMHG, TEMPERATURE_TOLERANCE,
};
pub use vitals::{create_default_vitals_checker, VitalsCheckError, VitalsChecker, VitalsCheckerTrait};
pub use patient::{PatientService, PatientServiceError, PatientServiceTrait};
