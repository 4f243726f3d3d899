use anyhow::Context;
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::entities::conversions;
use crate::entities::patient::HealthInfo;
use crate::entities::vitals::{BloodPressure, Temperature};
use crate::services::alert::{LoggingNotifier, NotifierTrait};
use crate::services::tolerance::{
    alert_message, blood_pressure_out_of_tolerance, temperature_out_of_tolerance,
};
use patient_vitals_data::database::StorageConfig;
use patient_vitals_data::repository::{PatientInfoRepository, PatientInfoRepositoryTrait, RepositoryError};

/// Vitals check errors
#[derive(Debug, Error)]
pub enum VitalsCheckError {
    /// No stored baseline for the patient
    #[error("Patient not found: {0}")]
    PatientNotFound(String),

    /// Repository error
    #[error("Repository error: {0}")]
    RepositoryError(String),
}

/// Trait for vital-sign checks against a patient's baseline
pub trait VitalsCheckerTrait {
    /// Alert when either blood pressure value differs from the baseline
    fn check_blood_pressure(
        &self,
        patient_id: &str,
        observed: BloodPressure,
    ) -> Result<(), VitalsCheckError>;

    /// Alert when the temperature is more than 1.5 °C away from the baseline
    fn check_temperature(
        &self,
        patient_id: &str,
        observed: Temperature,
    ) -> Result<(), VitalsCheckError>;
}

/// Compares new readings to stored baselines and notifies on deviation
///
/// Holds no state of its own; every check fetches the baseline afresh.
#[derive(Debug, Clone)]
pub struct VitalsChecker<R, N> {
    repository: R,
    notifier: N,
}

impl<R, N> VitalsChecker<R, N>
where
    R: PatientInfoRepositoryTrait,
    N: NotifierTrait,
{
    /// Create a new vitals checker
    pub fn new(repository: R, notifier: N) -> Self {
        Self { repository, notifier }
    }

    /// Map repository errors to check errors
    fn map_repo_error(&self, err: RepositoryError) -> VitalsCheckError {
        match err {
            RepositoryError::NotFound(id) => VitalsCheckError::PatientNotFound(id),
            _ => VitalsCheckError::RepositoryError(err.to_string()),
        }
    }

    fn baseline(&self, patient_id: &str) -> Result<HealthInfo, VitalsCheckError> {
        let record = self.repository.get_by_id(patient_id)
            .map_err(|e| {
                error!("Baseline lookup failed for patient {}: {}", patient_id, e);
                self.map_repo_error(e)
            })?
            .ok_or_else(|| {
                error!("No baseline stored for patient {}", patient_id);
                VitalsCheckError::PatientNotFound(patient_id.to_string())
            })?;

        conversions::convert_to_domain_health_info(&record).map_err(|e| {
            error!("Stored baseline for patient {} is unusable: {}", patient_id, e);
            VitalsCheckError::RepositoryError(format!("Invalid stored baseline for {}: {}", patient_id, e))
        })
    }

    fn alert(&self, patient_id: &str) {
        self.notifier.send(&alert_message(patient_id));
    }
}

impl<R, N> VitalsCheckerTrait for VitalsChecker<R, N>
where
    R: PatientInfoRepositoryTrait,
    N: NotifierTrait,
{
    fn check_blood_pressure(
        &self,
        patient_id: &str,
        observed: BloodPressure,
    ) -> Result<(), VitalsCheckError> {
        let baseline = self.baseline(patient_id)?.blood_pressure;

        if blood_pressure_out_of_tolerance(baseline, observed) {
            warn!(
                "Blood pressure out of tolerance for patient {}: observed {}, baseline {}",
                patient_id, observed, baseline
            );
            self.alert(patient_id);
        } else {
            debug!("Blood pressure within tolerance for patient {}", patient_id);
        }

        Ok(())
    }

    fn check_temperature(
        &self,
        patient_id: &str,
        observed: Temperature,
    ) -> Result<(), VitalsCheckError> {
        let baseline = self.baseline(patient_id)?.normal_temperature;

        if temperature_out_of_tolerance(baseline, observed) {
            warn!(
                "Temperature out of tolerance for patient {}: observed {}, baseline {}",
                patient_id, observed, baseline
            );
            self.alert(patient_id);
        } else {
            debug!("Temperature within tolerance for patient {}", patient_id);
        }

        Ok(())
    }
}

/// Create a checker over the repository configured in the environment, alerting through tracing
pub fn create_default_vitals_checker() -> anyhow::Result<VitalsChecker<PatientInfoRepository, LoggingNotifier>> {
    crate::telemetry::load_env();

    let config = StorageConfig::from_env().context("invalid storage configuration")?;
    let repository = PatientInfoRepository::from_config(&config)
        .with_context(|| format!("cannot open {:?} patient storage", config.storage_type))?;

    Ok(VitalsChecker::new(repository, LoggingNotifier::new()))
}
