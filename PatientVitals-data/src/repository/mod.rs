// Repository module structure
pub mod errors;
mod patient;
mod in_memory;
mod file;
#[cfg(feature = "sqlite")]
mod storage;

// Re-export commonly used types
pub use errors::RepositoryError;
pub use patient::{PatientInfoRepository, PatientInfoRepositoryTrait};

// Re-export test modules for both testing and when mock feature is enabled
#[cfg(any(test, feature = "mock"))]
pub use patient::tests;
