use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::debug;

use crate::models::patient::PatientRecord;
use super::errors::RepositoryError;

/// JSON file storage for patient records
///
/// The file holds a single JSON array. It is re-read on every call and
/// rewritten through a temporary file on every mutation.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
    /// Serializes read-modify-write cycles within this process
    lock: Arc<Mutex<()>>,
}

impl FileStorage {
    /// Create a storage backed by the given file. The file need not exist yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Arc::new(Mutex::new(())),
        }
    }

    /// Insert a record that must not exist yet
    pub fn insert(&self, record: &PatientRecord) -> Result<PatientRecord, RepositoryError> {
        let _guard = self.lock.lock()?;
        let mut patients = self.load()?;

        if patients.iter().any(|p| p.id == record.id) {
            return Err(RepositoryError::Validation(format!(
                "Patient with id {} already exists",
                record.id
            )));
        }

        patients.push(record.clone());
        self.save(&patients)?;
        Ok(record.clone())
    }

    /// Replace an existing record
    pub fn replace(&self, record: &PatientRecord) -> Result<PatientRecord, RepositoryError> {
        let _guard = self.lock.lock()?;
        let mut patients = self.load()?;

        let existing = patients
            .iter_mut()
            .find(|p| p.id == record.id)
            .ok_or_else(|| RepositoryError::NotFound(record.id.clone()))?;
        *existing = record.clone();

        self.save(&patients)?;
        Ok(record.clone())
    }

    /// Get a record by id
    pub fn get_by_id(&self, id: &str) -> Result<Option<PatientRecord>, RepositoryError> {
        let _guard = self.lock.lock()?;
        Ok(self.load()?.into_iter().find(|p| p.id == id))
    }

    /// Get all records ordered by id
    pub fn get_all(&self) -> Result<Vec<PatientRecord>, RepositoryError> {
        let _guard = self.lock.lock()?;
        let mut patients = self.load()?;
        patients.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(patients)
    }

    fn load(&self) -> Result<Vec<PatientRecord>, RepositoryError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Patient file {:?} does not exist yet, treating as empty", self.path);
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }

        Ok(serde_json::from_str(&contents)?)
    }

    fn save(&self, patients: &[PatientRecord]) -> Result<(), RepositoryError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, serde_json::to_string_pretty(patients)?)?;
        fs::rename(&tmp, &self.path)?;

        debug!("Wrote {} patient records to {:?}", patients.len(), self.path);
        Ok(())
    }
}
