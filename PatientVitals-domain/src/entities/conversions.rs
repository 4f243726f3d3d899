use patient_vitals_data::models::patient::{
    CreatePatientRecord as DataCreatePatientRecord, PatientRecord as DataPatientRecord,
};

use crate::entities::patient::{CreatePatientRequest, HealthInfo, PatientInfo};
use crate::entities::vitals::{BloodPressure, Temperature, TemperatureError};

/// Conversion functions between domain entities and data models
/// These functions follow the pattern convert_to_[target_layer]_[model_name]

/// Convert from data model to domain entity for a patient
pub fn convert_to_domain_patient(record: DataPatientRecord) -> Result<PatientInfo, TemperatureError> {
    Ok(PatientInfo {
        health_info: convert_to_domain_health_info(&record)?,
        id: record.id,
        first_name: record.first_name,
        last_name: record.last_name,
        birth_date: record.birth_date,
    })
}

/// Extract the baseline from a stored patient record
pub fn convert_to_domain_health_info(record: &DataPatientRecord) -> Result<HealthInfo, TemperatureError> {
    Ok(HealthInfo {
        normal_temperature: Temperature::from_celsius(record.normal_temperature)?,
        blood_pressure: BloodPressure::new(record.systolic, record.diastolic),
    })
}

/// Convert from domain entity to data model for a patient
pub fn convert_to_data_patient(patient: &PatientInfo) -> DataPatientRecord {
    DataPatientRecord {
        id: patient.id.clone(),
        first_name: patient.first_name.clone(),
        last_name: patient.last_name.clone(),
        birth_date: patient.birth_date,
        normal_temperature: patient.health_info.normal_temperature.celsius(),
        systolic: patient.health_info.blood_pressure.systolic,
        diastolic: patient.health_info.blood_pressure.diastolic,
    }
}

/// Convert from domain entity to data model for create request
pub fn convert_to_data_create_request(request: &CreatePatientRequest) -> DataCreatePatientRecord {
    DataCreatePatientRecord {
        id: request.id.clone(),
        first_name: request.first_name.clone(),
        last_name: request.last_name.clone(),
        birth_date: request.birth_date,
        normal_temperature: request.normal_temperature,
        systolic: request.systolic,
        diastolic: request.diastolic,
    }
}
