use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error};

use crate::database::{StorageConfig, StorageType};
use crate::models::patient::{CreatePatientRecord, PatientRecord};
use super::errors::RepositoryError;
use super::file::FileStorage;
use super::in_memory::InMemoryStorage;

#[cfg(feature = "sqlite")]
use crate::database::DatabasePool;
#[cfg(feature = "sqlite")]
use super::storage::DatabaseStorage;

/// Repository trait for patient records
///
/// `get_by_id` answers `Ok(None)` for an unknown id; errors are reserved for
/// storage failures.
pub trait PatientInfoRepositoryTrait {
    /// Add a new patient, generating an id when the request carries none
    fn add(&self, request: CreatePatientRecord) -> Result<PatientRecord, RepositoryError>;

    /// Get a patient by id
    fn get_by_id(&self, id: &str) -> Result<Option<PatientRecord>, RepositoryError>;

    /// Replace the stored record with the same id
    fn update(&self, record: PatientRecord) -> Result<PatientRecord, RepositoryError>;

    /// Get all patients ordered by id
    fn get_all(&self) -> Result<Vec<PatientRecord>, RepositoryError>;
}

impl<T: PatientInfoRepositoryTrait + ?Sized> PatientInfoRepositoryTrait for &T {
    fn add(&self, request: CreatePatientRecord) -> Result<PatientRecord, RepositoryError> {
        (**self).add(request)
    }

    fn get_by_id(&self, id: &str) -> Result<Option<PatientRecord>, RepositoryError> {
        (**self).get_by_id(id)
    }

    fn update(&self, record: PatientRecord) -> Result<PatientRecord, RepositoryError> {
        (**self).update(record)
    }

    fn get_all(&self) -> Result<Vec<PatientRecord>, RepositoryError> {
        (**self).get_all()
    }
}

impl<T: PatientInfoRepositoryTrait + ?Sized> PatientInfoRepositoryTrait for Arc<T> {
    fn add(&self, request: CreatePatientRecord) -> Result<PatientRecord, RepositoryError> {
        (**self).add(request)
    }

    fn get_by_id(&self, id: &str) -> Result<Option<PatientRecord>, RepositoryError> {
        (**self).get_by_id(id)
    }

    fn update(&self, record: PatientRecord) -> Result<PatientRecord, RepositoryError> {
        (**self).update(record)
    }

    fn get_all(&self) -> Result<Vec<PatientRecord>, RepositoryError> {
        (**self).get_all()
    }
}

#[derive(Debug, Clone)]
enum Backend {
    Memory(InMemoryStorage),
    File(FileStorage),
    #[cfg(feature = "sqlite")]
    Database(DatabasePool),
}

/// Repository for patient records.
/// In-memory storage is the default; JSON file and SQLite backends are chosen explicitly or from config.
#[derive(Debug, Clone)]
pub struct PatientInfoRepository {
    backend: Backend,
}

impl Default for PatientInfoRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl PatientInfoRepository {
    /// Create a new repository backed by process memory
    pub fn new() -> Self {
        Self {
            backend: Backend::Memory(InMemoryStorage::new()),
        }
    }

    /// Create a repository backed by a JSON file
    pub fn with_file(path: impl Into<PathBuf>) -> Self {
        Self {
            backend: Backend::File(FileStorage::new(path)),
        }
    }

    /// Create a repository backed by a SQLite pool
    #[cfg(feature = "sqlite")]
    pub fn with_database(pool: DatabasePool) -> Self {
        Self {
            backend: Backend::Database(pool),
        }
    }

    /// Create the repository described by a storage configuration
    pub fn from_config(config: &StorageConfig) -> Result<Self, RepositoryError> {
        let repository = match config.storage_type {
            StorageType::Memory => Self::new(),
            StorageType::File => Self::with_file(&config.file_path),
            #[cfg(feature = "sqlite")]
            StorageType::Sqlite => Self::with_database(crate::database::open_sqlite_pool(config)?),
        };

        debug!("Patient repository ready: {:?}", config.storage_type);
        Ok(repository)
    }

    /// Name of the active backend, for diagnostics
    pub fn backend_name(&self) -> &'static str {
        match self.backend {
            Backend::Memory(_) => "memory",
            Backend::File(_) => "file",
            #[cfg(feature = "sqlite")]
            Backend::Database(_) => "sqlite",
        }
    }
}

impl PatientInfoRepositoryTrait for PatientInfoRepository {
    fn add(&self, request: CreatePatientRecord) -> Result<PatientRecord, RepositoryError> {
        let record = request.into_record();
        debug!("Adding patient: id={}", record.id);

        let result = match &self.backend {
            Backend::Memory(storage) => storage.insert(&record),
            Backend::File(storage) => storage.insert(&record),
            #[cfg(feature = "sqlite")]
            Backend::Database(pool) => DatabaseStorage::insert(pool, &record),
        };

        if let Err(e) = &result {
            error!("Failed to add patient {}: {}", record.id, e);
        }
        result
    }

    fn get_by_id(&self, id: &str) -> Result<Option<PatientRecord>, RepositoryError> {
        match &self.backend {
            Backend::Memory(storage) => storage.get_by_id(id),
            Backend::File(storage) => storage.get_by_id(id),
            #[cfg(feature = "sqlite")]
            Backend::Database(pool) => DatabaseStorage::get_by_id(pool, id),
        }
    }

    fn update(&self, record: PatientRecord) -> Result<PatientRecord, RepositoryError> {
        debug!("Updating patient: id={}", record.id);

        match &self.backend {
            Backend::Memory(storage) => storage.replace(&record),
            Backend::File(storage) => storage.replace(&record),
            #[cfg(feature = "sqlite")]
            Backend::Database(pool) => DatabaseStorage::replace(pool, &record),
        }
    }

    fn get_all(&self) -> Result<Vec<PatientRecord>, RepositoryError> {
        match &self.backend {
            Backend::Memory(storage) => storage.get_all(),
            Backend::File(storage) => storage.get_all(),
            #[cfg(feature = "sqlite")]
            Backend::Database(pool) => DatabaseStorage::get_all(pool),
        }
    }
}

/// Mock repository and test helpers
#[cfg(any(test, feature = "mock"))]
pub mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Build a record with the given baseline, for tests
    pub fn patient_record(id: &str, normal_temperature: f64, systolic: u16, diastolic: u16) -> PatientRecord {
        PatientRecord {
            id: id.to_string(),
            first_name: "Ivan".to_string(),
            last_name: "Petrov".to_string(),
            birth_date: NaiveDate::from_ymd_opt(1970, 1, 1).expect("valid date"),
            normal_temperature,
            systolic,
            diastolic,
        }
    }

    /// Mock patient repository holding a fixed set of records
    #[derive(Debug, Default)]
    pub struct MockPatientInfoRepository {
        patients: Mutex<Vec<PatientRecord>>,
        lookups: AtomicUsize,
        fail_with: Option<String>,
    }

    impl MockPatientInfoRepository {
        /// Create an empty mock repository
        pub fn new() -> Self {
            Self::default()
        }

        /// Add a pre-defined record to the mock
        pub fn with_patient(self, record: PatientRecord) -> Self {
            if let Ok(mut patients) = self.patients.lock() {
                patients.push(record);
            }
            self
        }

        /// Make every call fail with a database error carrying `message`
        pub fn with_failure(mut self, message: &str) -> Self {
            self.fail_with = Some(message.to_string());
            self
        }

        /// Number of `get_by_id` calls made so far
        pub fn lookup_count(&self) -> usize {
            self.lookups.load(Ordering::SeqCst)
        }

        fn check_failure(&self) -> Result<(), RepositoryError> {
            match &self.fail_with {
                Some(message) => Err(RepositoryError::Database(message.clone().into())),
                None => Ok(()),
            }
        }
    }

    impl PatientInfoRepositoryTrait for MockPatientInfoRepository {
        fn add(&self, request: CreatePatientRecord) -> Result<PatientRecord, RepositoryError> {
            self.check_failure()?;
            let record = request.into_record();
            let mut patients = self.patients.lock()?;
            if patients.iter().any(|p| p.id == record.id) {
                return Err(RepositoryError::Validation(format!(
                    "Patient with id {} already exists",
                    record.id
                )));
            }
            patients.push(record.clone());
            Ok(record)
        }

        fn get_by_id(&self, id: &str) -> Result<Option<PatientRecord>, RepositoryError> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            self.check_failure()?;
            let patients = self.patients.lock()?;
            Ok(patients.iter().find(|p| p.id == id).cloned())
        }

        fn update(&self, record: PatientRecord) -> Result<PatientRecord, RepositoryError> {
            self.check_failure()?;
            let mut patients = self.patients.lock()?;
            let existing = patients
                .iter_mut()
                .find(|p| p.id == record.id)
                .ok_or_else(|| RepositoryError::NotFound(record.id.clone()))?;
            *existing = record.clone();
            Ok(record)
        }

        fn get_all(&self) -> Result<Vec<PatientRecord>, RepositoryError> {
            self.check_failure()?;
            let mut patients = self.patients.lock()?.clone();
            patients.sort_by(|a, b| a.id.cmp(&b.id));
            Ok(patients)
        }
    }
}

#[cfg(test)]
mod repository_tests {
    use super::*;
    use super::tests::{patient_record, MockPatientInfoRepository};
    use chrono::NaiveDate;

    fn create_request(id: Option<&str>, systolic: u16, diastolic: u16) -> CreatePatientRecord {
        CreatePatientRecord {
            id: id.map(String::from),
            first_name: "Semen".to_string(),
            last_name: "Mikhailov".to_string(),
            birth_date: NaiveDate::from_ymd_opt(1982, 1, 16).unwrap(),
            normal_temperature: 36.6,
            systolic,
            diastolic,
        }
    }

    /// Exercise the full trait contract against one repository
    fn assert_repository_contract(repo: &PatientInfoRepository) {
        // Unknown id is a distinguished absent result, not an error
        assert!(repo.get_by_id("missing").unwrap().is_none());
        assert!(repo.get_all().unwrap().is_empty());

        let added = repo.add(create_request(Some("002"), 125, 78)).unwrap();
        assert_eq!(added.id, "002");
        let generated = repo.add(create_request(None, 130, 85)).unwrap();
        assert!(!generated.id.is_empty());

        let fetched = repo.get_by_id("002").unwrap().unwrap();
        assert_eq!(fetched, added);

        // Duplicate ids are rejected
        let duplicate = repo.add(create_request(Some("002"), 120, 80));
        assert!(matches!(duplicate, Err(RepositoryError::Validation(_))));

        // Update replaces the baseline
        let mut changed = fetched.clone();
        changed.systolic = 140;
        changed.normal_temperature = 37.1;
        repo.update(changed.clone()).unwrap();
        assert_eq!(repo.get_by_id("002").unwrap().unwrap(), changed);

        // Updating an unknown patient is NotFound
        let ghost = patient_record("ghost", 36.6, 120, 80);
        assert!(matches!(repo.update(ghost), Err(RepositoryError::NotFound(_))));

        let all = repo.get_all().unwrap();
        assert_eq!(all.len(), 2);
        assert!(all.windows(2).all(|w| w[0].id <= w[1].id));
    }

    #[test]
    fn test_in_memory_repository() {
        let repo = PatientInfoRepository::new();
        assert_eq!(repo.backend_name(), "memory");
        assert_repository_contract(&repo);
    }

    #[test]
    fn test_file_repository() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store/patients.json");

        let repo = PatientInfoRepository::with_file(&path);
        assert_eq!(repo.backend_name(), "file");
        assert_repository_contract(&repo);

        // A second repository over the same file sees the same records
        let reopened = PatientInfoRepository::with_file(&path);
        assert_eq!(reopened.get_all().unwrap().len(), 2);
    }

    #[test]
    fn test_file_repository_rejects_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("patients.json");
        std::fs::write(&path, "{ not json").unwrap();

        let repo = PatientInfoRepository::with_file(&path);
        assert!(matches!(repo.get_by_id("001"), Err(RepositoryError::Serialization(_))));
    }

    #[cfg(feature = "sqlite")]
    #[test]
    fn test_sqlite_repository() {
        let pool = crate::database::open_in_memory_sqlite_pool().unwrap();
        let repo = PatientInfoRepository::with_database(pool);
        assert_eq!(repo.backend_name(), "sqlite");
        assert_repository_contract(&repo);
    }

    #[test]
    fn test_from_config_file_backend() {
        let dir = tempfile::tempdir().unwrap();
        let config = StorageConfig {
            storage_type: StorageType::File,
            file_path: dir.path().join("p.json").to_string_lossy().into_owned(),
            ..StorageConfig::default()
        };

        let repo = PatientInfoRepository::from_config(&config).unwrap();
        assert_eq!(repo.backend_name(), "file");
    }

    #[test]
    fn test_shared_repository_through_arc() {
        let repo = Arc::new(PatientInfoRepository::new());
        let shared = Arc::clone(&repo);
        shared.add(create_request(Some("001"), 120, 80)).unwrap();
        assert!(repo.get_by_id("001").unwrap().is_some());
    }

    #[test]
    fn test_mock_repository_counts_lookups_and_fails_on_demand() {
        let mock = MockPatientInfoRepository::new().with_patient(patient_record("001", 36.6, 120, 80));
        assert!(mock.get_by_id("001").unwrap().is_some());
        assert!(mock.get_by_id("002").unwrap().is_none());
        assert_eq!(mock.lookup_count(), 2);

        let failing = MockPatientInfoRepository::new().with_failure("disk on fire");
        let err = failing.get_by_id("001").unwrap_err();
        assert!(err.to_string().contains("disk on fire"));
    }
}
