//! Storage configuration and SQLite connection handling
//!
//! Patient records can live in one of three places:
//! - process memory (default)
//! - a JSON file
//! - a SQLite database (feature `sqlite`)

use std::env;
use std::str::FromStr;
use thiserror::Error;
use tracing::{info, warn};

#[cfg(feature = "sqlite")]
use std::sync::Arc;

/// Default location of the JSON patient store
pub const DEFAULT_FILE_PATH: &str = "./data/patients.json";

/// Default location of the SQLite patient database
pub const DEFAULT_SQLITE_PATH: &str = "./data/patients.db";

/// SQLite connection pool shared by every repository built from it
#[cfg(feature = "sqlite")]
pub type DatabasePool = Arc<r2d2::Pool<r2d2_sqlite::SqliteConnectionManager>>;

/// Supported storage backends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageType {
    /// Records kept in process memory
    Memory,
    /// Records kept in a JSON file
    File,
    /// SQLite database (file-based)
    #[cfg(feature = "sqlite")]
    Sqlite,
}

impl FromStr for StorageType {
    type Err = DatabaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "memory" | "in-memory" | "in_memory" => Ok(StorageType::Memory),
            "file" | "json" => Ok(StorageType::File),
            #[cfg(feature = "sqlite")]
            "sqlite" => Ok(StorageType::Sqlite),
            _ => Err(DatabaseError::UnsupportedStorageType(s.to_string())),
        }
    }
}

/// Database error
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Unsupported storage type
    #[error("Unsupported storage type: {0}")]
    UnsupportedStorageType(String),

    /// Configuration error
    #[error("Database configuration error: {0}")]
    ConfigError(String),

    /// SQLite error
    #[cfg(feature = "sqlite")]
    #[error("SQLite error: {0}")]
    SqliteError(#[from] rusqlite::Error),

    /// SQLite connection pool error
    #[cfg(feature = "sqlite")]
    #[error("SQLite connection pool error: {0}")]
    SqlitePoolError(#[from] r2d2::Error),

    /// Migration error
    #[error("Database migration error: {0}")]
    MigrationError(String),

    /// Generic database error
    #[error("Database error: {0}")]
    GenericError(String),
}

impl From<String> for DatabaseError {
    fn from(error: String) -> Self {
        DatabaseError::GenericError(error)
    }
}

/// Storage configuration
#[derive(Debug, Clone, PartialEq)]
pub struct StorageConfig {
    /// Storage backend (memory, file, sqlite)
    pub storage_type: StorageType,
    /// Path to the JSON patient store
    pub file_path: String,
    /// Path to SQLite database file
    pub sqlite_path: String,
    /// Maximum number of pooled SQLite connections
    pub max_connections: u32,
    /// Connection timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            storage_type: StorageType::Memory,
            file_path: DEFAULT_FILE_PATH.to_string(),
            sqlite_path: DEFAULT_SQLITE_PATH.to_string(),
            max_connections: 5,
            timeout_seconds: 30,
        }
    }
}

impl StorageConfig {
    /// Create a new storage configuration from environment variables
    pub fn from_env() -> Result<Self, DatabaseError> {
        let defaults = Self::default();

        let storage_type = match env::var("PATIENT_STORAGE") {
            Ok(value) => value.parse::<StorageType>()?,
            Err(_) => defaults.storage_type,
        };

        let file_path = env::var("PATIENT_FILE_PATH").unwrap_or(defaults.file_path);
        let sqlite_path = env::var("DB_SQLITE_PATH").unwrap_or(defaults.sqlite_path);

        let max_connections = parse_env_or("DB_MAX_CONNECTIONS", defaults.max_connections);
        let timeout_seconds = parse_env_or("DB_TIMEOUT_SECONDS", defaults.timeout_seconds);

        if max_connections == 0 {
            return Err(DatabaseError::ConfigError(
                "DB_MAX_CONNECTIONS must be at least 1".to_string(),
            ));
        }

        info!(
            "Storage configuration: type={:?}, max_connections={}, timeout={}s",
            storage_type, max_connections, timeout_seconds
        );

        Ok(StorageConfig {
            storage_type,
            file_path,
            sqlite_path,
            max_connections,
            timeout_seconds,
        })
    }
}

fn parse_env_or<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => match raw.parse::<T>() {
            Ok(value) => value,
            Err(_) => {
                warn!("Ignoring unparsable {}={:?}, using default", key, raw);
                default
            }
        },
        Err(_) => default,
    }
}

/// Open a SQLite connection pool at the configured path and run migrations
#[cfg(feature = "sqlite")]
pub fn open_sqlite_pool(config: &StorageConfig) -> Result<DatabasePool, DatabaseError> {
    use rusqlite::OpenFlags;
    use std::fs;
    use std::path::Path;

    info!("Initializing SQLite database at: {}", config.sqlite_path);

    if let Some(parent) = Path::new(&config.sqlite_path).parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            info!("Creating parent directory: {:?}", parent);
            fs::create_dir_all(parent).map_err(|e| {
                DatabaseError::ConfigError(format!("Cannot create {:?}: {}", parent, e))
            })?;
        }
    }

    let manager = r2d2_sqlite::SqliteConnectionManager::file(&config.sqlite_path)
        .with_flags(OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE);

    let pool = r2d2::Pool::builder()
        .max_size(config.max_connections)
        .connection_timeout(std::time::Duration::from_secs(config.timeout_seconds))
        .build(manager)?;

    let conn = pool.get()?;
    super::migrations::run_sqlite_migrations(&conn).map_err(DatabaseError::MigrationError)?;

    info!("SQLite connection pool created successfully");
    Ok(Arc::new(pool))
}

/// Open a private in-memory SQLite database
///
/// Every connection to `:memory:` is its own database, so the pool holds exactly one.
#[cfg(feature = "sqlite")]
pub fn open_in_memory_sqlite_pool() -> Result<DatabasePool, DatabaseError> {
    info!("Initializing in-memory SQLite database");

    let manager = r2d2_sqlite::SqliteConnectionManager::memory();
    let pool = r2d2::Pool::builder()
        .max_size(1)
        .build(manager)?;

    let conn = pool.get()?;
    super::migrations::run_sqlite_migrations(&conn).map_err(DatabaseError::MigrationError)?;

    Ok(Arc::new(pool))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_type_from_str() {
        assert_eq!("memory".parse::<StorageType>().unwrap(), StorageType::Memory);
        assert_eq!(" JSON ".parse::<StorageType>().unwrap(), StorageType::File);
        #[cfg(feature = "sqlite")]
        assert_eq!("SQLite".parse::<StorageType>().unwrap(), StorageType::Sqlite);

        let err = "oracle".parse::<StorageType>().unwrap_err();
        assert!(err.to_string().contains("oracle"));
    }

    #[test]
    fn test_default_config() {
        let config = StorageConfig::default();
        assert_eq!(config.storage_type, StorageType::Memory);
        assert_eq!(config.file_path, DEFAULT_FILE_PATH);
        assert_eq!(config.max_connections, 5);
    }

    #[cfg(feature = "sqlite")]
    #[test]
    fn test_open_sqlite_pool_creates_schema() {
        let dir = tempfile::tempdir().unwrap();
        let config = StorageConfig {
            storage_type: StorageType::Sqlite,
            sqlite_path: dir.path().join("nested/patients.db").to_string_lossy().into_owned(),
            ..StorageConfig::default()
        };

        let pool = open_sqlite_pool(&config).unwrap();
        let conn = pool.get().unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM patients", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }
}
