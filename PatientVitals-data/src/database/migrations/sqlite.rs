use rusqlite::Connection;
use tracing::info;

/// Run SQLite migrations
pub fn run_migrations(conn: &Connection) -> Result<(), String> {
    info!("Running SQLite migrations");

    create_patients_table(conn)?;

    info!("SQLite migrations completed successfully");
    Ok(())
}

/// Create the patients table
fn create_patients_table(conn: &Connection) -> Result<(), String> {
    info!("Creating patients table if not exists");

    conn.execute(
        "CREATE TABLE IF NOT EXISTS patients (
            id TEXT PRIMARY KEY,
            first_name TEXT NOT NULL,
            last_name TEXT NOT NULL,
            birth_date TEXT NOT NULL,
            normal_temperature REAL NOT NULL,
            systolic INTEGER NOT NULL,
            diastolic INTEGER NOT NULL
        )",
        [],
    ).map_err(|e| e.to_string())?;

    Ok(())
}
