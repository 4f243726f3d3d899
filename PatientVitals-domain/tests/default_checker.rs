//! The environment-configured checker. Kept in its own test binary because it sets process env vars.

use patient_vitals_domain::entities::{BloodPressure, CreatePatientRequest};
use patient_vitals_domain::services::{
    create_default_vitals_checker, PatientService, PatientServiceTrait, VitalsCheckerTrait,
};
use patient_vitals_data::repository::PatientInfoRepository;

#[test]
fn test_default_checker_reads_storage_from_environment() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("patients.json");

    let service = PatientService::new(PatientInfoRepository::with_file(&path));
    service
        .register_patient(CreatePatientRequest {
            id: Some("001".to_string()),
            first_name: "Ivan".to_string(),
            last_name: "Petrov".to_string(),
            birth_date: chrono::NaiveDate::from_ymd_opt(1970, 1, 1).unwrap(),
            normal_temperature: 36.6,
            systolic: 120,
            diastolic: 80,
        })
        .unwrap();

    std::env::set_var("PATIENT_STORAGE", "file");
    std::env::set_var("PATIENT_FILE_PATH", &path);

    let checker = create_default_vitals_checker().unwrap();
    checker.check_blood_pressure("001", BloodPressure::new(120, 80)).unwrap();
    checker.check_blood_pressure("001", BloodPressure::new(150, 95)).unwrap();
    assert!(checker.check_blood_pressure("404", BloodPressure::new(120, 80)).is_err());

    std::env::set_var("PATIENT_STORAGE", "carrier-pigeon");
    let err = create_default_vitals_checker().unwrap_err();
    assert!(format!("{:#}", err).contains("carrier-pigeon"));
}
