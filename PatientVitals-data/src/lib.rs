// PatientVitals Data
// This crate handles patient baseline storage behind a single repository trait

// Storage configuration and SQLite connection management
pub mod database;

// Repository implementations for data access
pub mod repository;

// Data storage models
pub mod models;
