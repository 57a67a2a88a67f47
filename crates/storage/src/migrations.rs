//! Database migrations, gated on `PRAGMA user_version`.

use rusqlite::Connection;

pub const SCHEMA_VERSION: i32 = 1;

pub fn run_migrations(conn: &Connection) -> Result<(), rusqlite::Error> {
    let current_version: i32 =
        conn.pragma_query_value(None, "user_version", |row| row.get(0))?;

    tracing::info!(
        "Database schema version: {} (target: {})",
        current_version,
        SCHEMA_VERSION
    );

    if current_version < 1 {
        tracing::info!("Running migration v1: normalized plant schema");
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS locations (
                location_id INTEGER PRIMARY KEY,
                location_name_en TEXT NOT NULL UNIQUE,
                location_name_ja TEXT NOT NULL UNIQUE
            );

            CREATE TABLE IF NOT EXISTS families (
                family_id INTEGER PRIMARY KEY,
                family_name_en TEXT NOT NULL UNIQUE,
                family_name_ja TEXT NOT NULL UNIQUE
            );

            CREATE TABLE IF NOT EXISTS plant_names (
                plant_name_id INTEGER PRIMARY KEY,
                plant_name_en TEXT NOT NULL UNIQUE,
                plant_name_ja TEXT NOT NULL UNIQUE
            );

            CREATE TABLE IF NOT EXISTS plants (
                plant_id INTEGER PRIMARY KEY AUTOINCREMENT,
                plant_name_id INTEGER NOT NULL REFERENCES plant_names(plant_name_id),
                family_id INTEGER NOT NULL REFERENCES families(family_id),
                location_id INTEGER NOT NULL REFERENCES locations(location_id),
                botanical_name TEXT NOT NULL UNIQUE,
                image_path TEXT NOT NULL UNIQUE,
                plant_date TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_plants_plant_date ON plants(plant_date);
            "#,
        )?;
    }

    if current_version < SCHEMA_VERSION {
        conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
    }

    Ok(())
}
