use chrono::Utc;
use thiserror::Error;
use tracing::{error, info};
use validator::{Validate, ValidationErrors};

use crate::entities::conversions;
use crate::entities::patient::{BaselineValues, CreatePatientRequest, HealthInfo, PatientInfo};
use crate::entities::vitals::{Temperature, TemperatureError};
use patient_vitals_data::repository::{PatientInfoRepositoryTrait, RepositoryError};

/// Patient service errors
#[derive(Debug, Error)]
pub enum PatientServiceError {
    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Not found error
    #[error("Patient not found: {0}")]
    NotFound(String),

    /// Repository error
    #[error("Repository error: {0}")]
    RepositoryError(String),
}

/// Trait for patient registration and baseline maintenance
pub trait PatientServiceTrait {
    /// Validate a registration request
    fn validate_create_request(&self, request: &CreatePatientRequest) -> Result<(), PatientServiceError>;

    /// Register a new patient with their baseline
    fn register_patient(&self, request: CreatePatientRequest) -> Result<PatientInfo, PatientServiceError>;

    /// Get a patient by id
    fn get_patient(&self, id: &str) -> Result<PatientInfo, PatientServiceError>;

    /// Replace a patient's baseline vital signs
    fn update_baseline(&self, id: &str, health_info: HealthInfo) -> Result<PatientInfo, PatientServiceError>;
}

/// Patient service for domain logic
pub struct PatientService<R: PatientInfoRepositoryTrait> {
    repository: R,
}

impl<R: PatientInfoRepositoryTrait> PatientService<R> {
    /// Create a new patient service
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    /// Map repository errors to service errors
    fn map_repo_error(&self, err: RepositoryError) -> PatientServiceError {
        match err {
            RepositoryError::NotFound(msg) => PatientServiceError::NotFound(msg),
            RepositoryError::Validation(msg) => PatientServiceError::ValidationError(msg),
            _ => PatientServiceError::RepositoryError(err.to_string()),
        }
    }

    /// A stored record whose baseline cannot be read back
    fn map_stored_temperature_error(&self, err: TemperatureError) -> PatientServiceError {
        PatientServiceError::RepositoryError(format!("Invalid stored baseline: {}", err))
    }

    /// Range checks shared by registration and baseline updates
    fn validate_baseline(&self, baseline: &BaselineValues) -> Result<(), PatientServiceError> {
        Temperature::from_celsius(baseline.normal_temperature)
            .map_err(|e| PatientServiceError::ValidationError(e.to_string()))?;

        baseline
            .validate()
            .map_err(|e| PatientServiceError::ValidationError(validation_message(&e)))?;

        if baseline.systolic <= baseline.diastolic {
            return Err(PatientServiceError::ValidationError(
                "Systolic pressure must be greater than diastolic pressure".to_string(),
            ));
        }

        Ok(())
    }
}

/// Flatten field errors into one readable message
fn validation_message(errors: &ValidationErrors) -> String {
    let mut fields: Vec<String> = errors
        .field_errors()
        .iter()
        .map(|(field, errors)| {
            let error_msgs: Vec<String> = errors
                .iter()
                .map(|err| match &err.message {
                    Some(msg) => msg.to_string(),
                    None => format!("Invalid {}", field),
                })
                .collect();
            format!("{}: {}", field, error_msgs.join(", "))
        })
        .collect();
    fields.sort();

    fields.join("; ")
}

impl<R: PatientInfoRepositoryTrait> PatientServiceTrait for PatientService<R> {
    fn validate_create_request(&self, request: &CreatePatientRequest) -> Result<(), PatientServiceError> {
        request
            .validate()
            .map_err(|e| PatientServiceError::ValidationError(validation_message(&e)))?;

        self.validate_baseline(&BaselineValues::from(request))?;

        if request.birth_date > Utc::now().date_naive() {
            return Err(PatientServiceError::ValidationError(
                "Birth date cannot be in the future".to_string(),
            ));
        }

        Ok(())
    }

    fn register_patient(&self, request: CreatePatientRequest) -> Result<PatientInfo, PatientServiceError> {
        self.validate_create_request(&request)?;

        let data_request = conversions::convert_to_data_create_request(&request);

        let record = self.repository.add(data_request).map_err(|e| {
            error!("Failed to register patient: {}", e);
            self.map_repo_error(e)
        })?;

        info!("Registered patient {}", record.id);
        conversions::convert_to_domain_patient(record).map_err(|e| self.map_stored_temperature_error(e))
    }

    fn get_patient(&self, id: &str) -> Result<PatientInfo, PatientServiceError> {
        let record = self.repository.get_by_id(id)
            .map_err(|e| self.map_repo_error(e))?
            .ok_or_else(|| PatientServiceError::NotFound(
                format!("Patient with ID {} not found", id)
            ))?;

        conversions::convert_to_domain_patient(record).map_err(|e| self.map_stored_temperature_error(e))
    }

    fn update_baseline(&self, id: &str, health_info: HealthInfo) -> Result<PatientInfo, PatientServiceError> {
        self.validate_baseline(&BaselineValues::from(&health_info))?;

        let mut patient = self.get_patient(id)?;
        patient.health_info = health_info;

        let record = self.repository
            .update(conversions::convert_to_data_patient(&patient))
            .map_err(|e| self.map_repo_error(e))?;

        info!("Updated baseline for patient {}", record.id);
        conversions::convert_to_domain_patient(record).map_err(|e| self.map_stored_temperature_error(e))
    }
}
