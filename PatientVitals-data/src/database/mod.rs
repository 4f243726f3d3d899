// Storage configuration and SQLite connectivity
pub mod connection;

#[cfg(feature = "sqlite")]
pub mod migrations;

// Re-export database connection functions
pub use connection::*;
