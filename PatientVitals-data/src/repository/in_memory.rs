use std::sync::{Arc, Mutex};
use std::collections::HashMap;

use crate::models::patient::PatientRecord;
use super::errors::RepositoryError;

/// In-memory storage implementation for patient records
#[derive(Debug, Clone)]
pub struct InMemoryStorage {
    /// Storage for patient records, keyed by patient id
    patients: Arc<Mutex<HashMap<String, PatientRecord>>>,
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStorage {
    /// Create a new in-memory storage
    pub fn new() -> Self {
        Self {
            patients: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Insert a record that must not exist yet
    pub fn insert(&self, record: &PatientRecord) -> Result<PatientRecord, RepositoryError> {
        let mut store = self.patients.lock()?;
        if store.contains_key(&record.id) {
            return Err(RepositoryError::Validation(format!(
                "Patient with id {} already exists",
                record.id
            )));
        }
        store.insert(record.id.clone(), record.clone());
        Ok(record.clone())
    }

    /// Replace an existing record
    pub fn replace(&self, record: &PatientRecord) -> Result<PatientRecord, RepositoryError> {
        let mut store = self.patients.lock()?;
        match store.get_mut(&record.id) {
            Some(existing) => {
                *existing = record.clone();
                Ok(record.clone())
            }
            None => Err(RepositoryError::NotFound(record.id.clone())),
        }
    }

    /// Get a record by id
    pub fn get_by_id(&self, id: &str) -> Result<Option<PatientRecord>, RepositoryError> {
        let store = self.patients.lock()?;
        Ok(store.get(id).cloned())
    }

    /// Get all records ordered by id
    pub fn get_all(&self) -> Result<Vec<PatientRecord>, RepositoryError> {
        let store = self.patients.lock()?;
        let mut patients: Vec<PatientRecord> = store.values().cloned().collect();
        patients.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(patients)
    }
}
