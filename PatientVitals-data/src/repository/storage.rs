use chrono::NaiveDate;
use rusqlite::{params, ErrorCode, OptionalExtension, Row};
use tracing::debug;

use crate::database::DatabasePool;
use crate::models::patient::PatientRecord;
use super::errors::RepositoryError;

const DATE_FORMAT: &str = "%Y-%m-%d";

const SELECT_COLUMNS: &str =
    "SELECT id, first_name, last_name, birth_date, normal_temperature, systolic, diastolic
     FROM patients";

/// Database storage operations for patient records
pub struct DatabaseStorage;

/// A patients row before its text and integer columns are checked
struct PatientRow {
    id: String,
    first_name: String,
    last_name: String,
    birth_date: String,
    normal_temperature: f64,
    systolic: i64,
    diastolic: i64,
}

impl PatientRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(PatientRow {
            id: row.get(0)?,
            first_name: row.get(1)?,
            last_name: row.get(2)?,
            birth_date: row.get(3)?,
            normal_temperature: row.get(4)?,
            systolic: row.get(5)?,
            diastolic: row.get(6)?,
        })
    }

    fn into_record(self) -> Result<PatientRecord, RepositoryError> {
        let birth_date = NaiveDate::parse_from_str(&self.birth_date, DATE_FORMAT)
            .map_err(|e| RepositoryError::DateParse(format!("{}: {}", self.birth_date, e)))?;

        let systolic = u16::try_from(self.systolic).map_err(|_| {
            RepositoryError::Validation(format!("Stored systolic out of range: {}", self.systolic))
        })?;
        let diastolic = u16::try_from(self.diastolic).map_err(|_| {
            RepositoryError::Validation(format!("Stored diastolic out of range: {}", self.diastolic))
        })?;

        Ok(PatientRecord {
            id: self.id,
            first_name: self.first_name,
            last_name: self.last_name,
            birth_date,
            normal_temperature: self.normal_temperature,
            systolic,
            diastolic,
        })
    }
}

impl DatabaseStorage {
    /// Store a new record in the database
    pub fn insert(pool: &DatabasePool, record: &PatientRecord) -> Result<PatientRecord, RepositoryError> {
        debug!("Storing patient record in database: id={}", record.id);

        let conn = pool.get()?;
        let result = conn.execute(
            "INSERT INTO patients
             (id, first_name, last_name, birth_date, normal_temperature, systolic, diastolic)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                &record.id,
                &record.first_name,
                &record.last_name,
                record.birth_date.format(DATE_FORMAT).to_string(),
                record.normal_temperature,
                record.systolic,
                record.diastolic,
            ],
        );

        match result {
            Ok(_) => Ok(record.clone()),
            Err(rusqlite::Error::SqliteFailure(err, _)) if err.code == ErrorCode::ConstraintViolation => {
                Err(RepositoryError::Validation(format!(
                    "Patient with id {} already exists",
                    record.id
                )))
            }
            Err(e) => Err(RepositoryError::Sqlite(e)),
        }
    }

    /// Replace an existing record in the database
    pub fn replace(pool: &DatabasePool, record: &PatientRecord) -> Result<PatientRecord, RepositoryError> {
        debug!("Updating patient record in database: id={}", record.id);

        let conn = pool.get()?;
        let changed = conn.execute(
            "UPDATE patients
             SET first_name = ?2, last_name = ?3, birth_date = ?4,
                 normal_temperature = ?5, systolic = ?6, diastolic = ?7
             WHERE id = ?1",
            params![
                &record.id,
                &record.first_name,
                &record.last_name,
                record.birth_date.format(DATE_FORMAT).to_string(),
                record.normal_temperature,
                record.systolic,
                record.diastolic,
            ],
        )?;

        if changed == 0 {
            return Err(RepositoryError::NotFound(record.id.clone()));
        }

        Ok(record.clone())
    }

    /// Get a record by id from the database
    pub fn get_by_id(pool: &DatabasePool, id: &str) -> Result<Option<PatientRecord>, RepositoryError> {
        debug!("Getting patient record by ID from database: id={}", id);

        let conn = pool.get()?;
        let mut stmt = conn.prepare(&format!("{} WHERE id = ?1", SELECT_COLUMNS))?;

        let row = stmt.query_row([id], PatientRow::from_row).optional()?;
        row.map(PatientRow::into_record).transpose()
    }

    /// Get all records from the database ordered by id
    pub fn get_all(pool: &DatabasePool) -> Result<Vec<PatientRecord>, RepositoryError> {
        debug!("Getting all patient records from database");

        let conn = pool.get()?;
        let mut stmt = conn.prepare(&format!("{} ORDER BY id", SELECT_COLUMNS))?;

        let rows = stmt.query_map([], PatientRow::from_row)?;

        let mut result = Vec::new();
        for row in rows {
            result.push(row?.into_record()?);
        }

        Ok(result)
    }
}
