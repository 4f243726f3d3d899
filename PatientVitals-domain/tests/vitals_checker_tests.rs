//! End-to-end checks wiring the vitals checker to real repository backends

use std::sync::Arc;

use chrono::NaiveDate;
use patient_vitals_data::repository::PatientInfoRepository;
use patient_vitals_domain::entities::{BloodPressure, CreatePatientRequest, HealthInfo, Temperature};
use patient_vitals_domain::services::{
    PatientService, PatientServiceTrait, VitalsCheckError, VitalsChecker, VitalsCheckerTrait,
    WriterNotifier,
};

fn registration(id: &str) -> CreatePatientRequest {
    CreatePatientRequest {
        id: Some(id.to_string()),
        first_name: "Ivan".to_string(),
        last_name: "Petrov".to_string(),
        birth_date: NaiveDate::from_ymd_opt(1970, 1, 1).unwrap(),
        normal_temperature: 36.6,
        systolic: 120,
        diastolic: 80,
    }
}

/// Register patients "001" and "002" with baseline 36.6 °C, 120/80
fn seed(repository: &PatientInfoRepository) {
    let service = PatientService::new(repository);
    service.register_patient(registration("001")).unwrap();
    service.register_patient(registration("002")).unwrap();
}

/// Run the documented scenarios and return the alert lines
fn run_scenarios(repository: &PatientInfoRepository) -> Vec<String> {
    let notifier = WriterNotifier::new(Vec::new());

    {
        let checker = VitalsChecker::new(repository, &notifier);

        checker.check_blood_pressure("001", BloodPressure::new(130, 90)).unwrap();
        checker.check_blood_pressure("002", BloodPressure::new(110, 70)).unwrap();
        checker.check_blood_pressure("001", BloodPressure::new(120, 80)).unwrap();
        checker.check_temperature("001", Temperature::from_celsius(30.0).unwrap()).unwrap();
        checker.check_temperature("002", Temperature::from_celsius(35.0).unwrap()).unwrap();
        checker.check_temperature("002", Temperature::from_celsius(36.9).unwrap()).unwrap();
    }

    String::from_utf8(notifier.into_inner())
        .unwrap()
        .lines()
        .map(String::from)
        .collect()
}

fn expected_alerts() -> Vec<String> {
    vec![
        "Warning, patient with id: 001, need help".to_string(),
        "Warning, patient with id: 002, need help".to_string(),
        "Warning, patient with id: 001, need help".to_string(),
        "Warning, patient with id: 002, need help".to_string(),
    ]
}

#[test]
fn test_scenarios_with_in_memory_repository() {
    let repository = PatientInfoRepository::new();
    seed(&repository);

    assert_eq!(run_scenarios(&repository), expected_alerts());
}

#[test]
fn test_scenarios_with_file_repository() {
    let dir = tempfile::tempdir().unwrap();
    let repository = PatientInfoRepository::with_file(dir.path().join("patients.json"));
    seed(&repository);

    assert_eq!(run_scenarios(&repository), expected_alerts());
}

#[cfg(feature = "sqlite")]
#[test]
fn test_scenarios_with_sqlite_repository() {
    let pool = patient_vitals_domain::database::open_in_memory_sqlite_pool().unwrap();
    let repository = PatientInfoRepository::with_database(pool);
    seed(&repository);

    assert_eq!(run_scenarios(&repository), expected_alerts());
}

#[test]
fn test_unknown_patient_with_real_repository() {
    let repository = PatientInfoRepository::new();
    let notifier = WriterNotifier::new(Vec::new());

    {
        let checker = VitalsChecker::new(&repository, &notifier);
        let err = checker.check_temperature("nobody", Temperature::from_celsius(40.0).unwrap()).unwrap_err();
        assert!(matches!(err, VitalsCheckError::PatientNotFound(_)));
    }

    assert!(notifier.into_inner().is_empty());
}

#[test]
fn test_updated_baseline_is_used_by_next_check() {
    let repository = Arc::new(PatientInfoRepository::new());
    seed(&repository);

    let notifier = WriterNotifier::new(Vec::new());
    {
        let checker = VitalsChecker::new(Arc::clone(&repository), &notifier);
        let service = PatientService::new(Arc::clone(&repository));

        // 130/90 deviates from the registered 120/80
        checker.check_blood_pressure("001", BloodPressure::new(130, 90)).unwrap();

        service
            .update_baseline(
                "001",
                HealthInfo::new(Temperature::from_celsius(36.6).unwrap(), BloodPressure::new(130, 90)),
            )
            .unwrap();

        // Same reading now matches the baseline
        checker.check_blood_pressure("001", BloodPressure::new(130, 90)).unwrap();
    }

    let output = String::from_utf8(notifier.into_inner()).unwrap();
    assert_eq!(output.lines().count(), 1);
}

#[test]
fn test_checker_is_shareable_across_threads() {
    let repository = PatientInfoRepository::new();
    seed(&repository);
    let notifier = Arc::new(WriterNotifier::new(Vec::new()));
    let checker = Arc::new(VitalsChecker::new(repository, Arc::clone(&notifier)));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let checker = Arc::clone(&checker);
            std::thread::spawn(move || {
                checker.check_blood_pressure("001", BloodPressure::new(130, 90)).unwrap();
                checker.check_temperature("002", Temperature::from_celsius(36.6).unwrap()).unwrap();
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    drop(checker);
    let notifier = Arc::try_unwrap(notifier).ok().unwrap();
    let output = String::from_utf8(notifier.into_inner()).unwrap();
    let lines: Vec<&str> = output.lines().collect();

    assert_eq!(lines, vec!["Warning, patient with id: 001, need help"; 4]);
}

#[test]
fn test_registration_keeps_baseline_precision() {
    let repository = PatientInfoRepository::new();
    let service = PatientService::new(&repository);
    let mut request = registration("003");
    request.normal_temperature = 36.649;
    service.register_patient(request).unwrap();

    let notifier = WriterNotifier::new(Vec::new());
    {
        let checker = VitalsChecker::new(&repository, &notifier);
        // 1.500 away stays quiet, 1.501 away alerts
        checker.check_temperature("003", Temperature::from_celsius(35.149).unwrap()).unwrap();
        checker.check_temperature("003", Temperature::from_celsius(35.148).unwrap()).unwrap();
    }

    let output = String::from_utf8(notifier.into_inner()).unwrap();
    assert_eq!(output, "Warning, patient with id: 003, need help\n");
}

#[test]
fn test_registration_rejects_non_finite_temperature() {
    let repository = PatientInfoRepository::new();
    let service = PatientService::new(&repository);
    let mut request = registration("004");
    request.normal_temperature = f64::NAN;

    assert!(service.register_patient(request).is_err());
    assert!(service.get_patient("004").is_err());
}
