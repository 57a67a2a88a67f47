//! SQLite repository for plants and their bilingual dimension tables.

use chrono::NaiveDate;
use herbarium_core::{Language, Plant, SortOrder};
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::Serialize;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use crate::error::StorageError;
use crate::migrations;

/// Joined projection used by every plant read.
const PLANT_SELECT_BASE: &str = r#"
    SELECT
        plants.plant_id,
        plant_names.plant_name_en,
        plant_names.plant_name_ja,
        families.family_name_en,
        families.family_name_ja,
        locations.location_name_en,
        locations.location_name_ja,
        plants.botanical_name,
        plants.plant_date,
        plants.image_path
    FROM plants
    JOIN plant_names ON plants.plant_name_id = plant_names.plant_name_id
    JOIN families ON plants.family_id = families.family_id
    JOIN locations ON plants.location_id = locations.location_id
"#;

/// One of the three bilingual lookup tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Location,
    Family,
    PlantName,
}

impl Dimension {
    fn table(self) -> &'static str {
        match self {
            Self::Location => "locations",
            Self::Family => "families",
            Self::PlantName => "plant_names",
        }
    }

    fn id_column(self) -> &'static str {
        match self {
            Self::Location => "location_id",
            Self::Family => "family_id",
            Self::PlantName => "plant_name_id",
        }
    }

    fn en_column(self) -> &'static str {
        match self {
            Self::Location => "location_name_en",
            Self::Family => "family_name_en",
            Self::PlantName => "plant_name_en",
        }
    }

    fn ja_column(self) -> &'static str {
        match self {
            Self::Location => "location_name_ja",
            Self::Family => "family_name_ja",
            Self::PlantName => "plant_name_ja",
        }
    }

    /// Human-readable entity name for error messages.
    pub fn entity(self) -> &'static str {
        match self {
            Self::Location => "location",
            Self::Family => "family",
            Self::PlantName => "plant name",
        }
    }
}

/// Row counts across the plant and dimension tables.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct StoreStats {
    pub plants: i64,
    pub locations: i64,
    pub families: i64,
    pub plant_names: i64,
}

pub struct Storage {
    conn: Mutex<Connection>,
}

fn lock_conn(mutex: &Mutex<Connection>) -> Result<MutexGuard<'_, Connection>, StorageError> {
    mutex.lock().map_err(|_| StorageError::Poisoned)
}

fn plant_from_row(row: &Row<'_>) -> rusqlite::Result<Plant> {
    let date_str: String = row.get(8)?;
    let plant_date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
        .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
    Ok(Plant {
        plant_id: row.get(0)?,
        plant_name_en: row.get(1)?,
        plant_name_ja: row.get(2)?,
        plant_class_en: row.get(3)?,
        plant_class_ja: row.get(4)?,
        location_en: row.get(5)?,
        location_ja: row.get(6)?,
        botanical_name: row.get(7)?,
        plant_date,
        image_path: row.get(9)?,
    })
}

/// Escapes `%`, `_`, and the escape character itself for a LIKE pattern.
fn like_pattern(query: &str) -> String {
    let escaped = query.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_");
    format!("%{escaped}%")
}

impl Storage {
    pub fn new(db_path: &Path) -> Result<Self, StorageError> {
        let conn = Connection::open(db_path).map_err(StorageError::Database)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;").map_err(StorageError::Database)?;
        // Another handle on the same file must wait out a writer's lock
        // rather than surface SQLITE_BUSY.
        conn.busy_timeout(std::time::Duration::from_secs(5))
            .map_err(StorageError::Database)?;
        migrations::run_migrations(&conn).map_err(StorageError::Database)?;
        Ok(Self { conn: Mutex::new(conn) })
    }

    /// Find-or-create for a bilingual pair; returns the dimension row id.
    ///
    /// A pair matching an existing row on one language column but not the
    /// other is a conflict, never a silent overwrite. A lost insert race is
    /// resolved by re-running the lookup.
    pub fn resolve_dimension(
        &self,
        dim: Dimension,
        name_en: &str,
        name_ja: &str,
    ) -> Result<i64, StorageError> {
        let conn = lock_conn(&self.conn)?;
        Self::resolve_dimension_on(&conn, dim, name_en, name_ja)
    }

    fn resolve_dimension_on(
        conn: &Connection,
        dim: Dimension,
        name_en: &str,
        name_ja: &str,
    ) -> Result<i64, StorageError> {
        if let Some(id) = Self::find_pair(conn, dim, name_en, name_ja)? {
            return Ok(id);
        }

        // The exact pair is excluded so a concurrent writer landing the same
        // pair between our lookup and this count reads as a lost insert race
        // (resolved below), not a conflict.
        let partial_sql = format!(
            "SELECT COUNT(*) FROM {table} WHERE ({en} = ?1 OR {ja} = ?2) \
             AND NOT ({en} = ?1 AND {ja} = ?2)",
            table = dim.table(),
            en = dim.en_column(),
            ja = dim.ja_column()
        );
        let partial: i64 = conn
            .query_row(&partial_sql, params![name_en, name_ja], |row| row.get(0))
            .map_err(StorageError::from)?;
        if partial > 0 {
            return Err(StorageError::Conflict(format!(
                "{} pair ({name_en}, {name_ja}) conflicts with an existing entry",
                dim.entity()
            )));
        }

        let insert_sql = format!(
            "INSERT INTO {} ({}, {}) VALUES (?1, ?2)",
            dim.table(),
            dim.en_column(),
            dim.ja_column()
        );
        match conn.execute(&insert_sql, params![name_en, name_ja]) {
            Ok(_) => Ok(conn.last_insert_rowid()),
            Err(err) => match StorageError::from(err) {
                // Lost a race to a concurrent writer. If the winner inserted
                // our exact pair we reuse it; otherwise the pair is in
                // partial conflict with whatever just landed.
                StorageError::Conflict(_) => {
                    Self::find_pair(conn, dim, name_en, name_ja)?.ok_or_else(|| {
                        StorageError::Conflict(format!(
                            "{} pair ({name_en}, {name_ja}) conflicts with an existing entry",
                            dim.entity()
                        ))
                    })
                }
                other => Err(other),
            },
        }
    }

    fn find_pair(
        conn: &Connection,
        dim: Dimension,
        name_en: &str,
        name_ja: &str,
    ) -> Result<Option<i64>, StorageError> {
        let sql = format!(
            "SELECT {} FROM {} WHERE {} = ?1 AND {} = ?2",
            dim.id_column(),
            dim.table(),
            dim.en_column(),
            dim.ja_column()
        );
        conn.query_row(&sql, params![name_en, name_ja], |row| row.get(0))
            .optional()
            .map_err(StorageError::from)
    }

    pub fn insert_plant(
        &self,
        plant_name_id: i64,
        family_id: i64,
        location_id: i64,
        botanical_name: &str,
        image_path: &str,
        plant_date: NaiveDate,
    ) -> Result<i64, StorageError> {
        let mut conn = lock_conn(&self.conn)?;
        let tx = conn.transaction().map_err(StorageError::Database)?;
        tx.execute(
            r#"INSERT INTO plants
               (plant_name_id, family_id, location_id, botanical_name, image_path, plant_date)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6)"#,
            params![
                plant_name_id,
                family_id,
                location_id,
                botanical_name,
                image_path,
                plant_date.to_string(),
            ],
        )?;
        let plant_id = tx.last_insert_rowid();
        tx.commit().map_err(StorageError::Database)?;
        Ok(plant_id)
    }

    pub fn update_plant(
        &self,
        plant_id: i64,
        plant_name_id: i64,
        family_id: i64,
        location_id: i64,
        botanical_name: &str,
        image_path: &str,
        plant_date: NaiveDate,
    ) -> Result<(), StorageError> {
        let mut conn = lock_conn(&self.conn)?;
        let tx = conn.transaction().map_err(StorageError::Database)?;
        let changed = tx.execute(
            r#"UPDATE plants
               SET plant_name_id = ?2,
                   family_id = ?3,
                   location_id = ?4,
                   botanical_name = ?5,
                   image_path = ?6,
                   plant_date = ?7
               WHERE plant_id = ?1"#,
            params![
                plant_id,
                plant_name_id,
                family_id,
                location_id,
                botanical_name,
                image_path,
                plant_date.to_string(),
            ],
        )?;
        if changed == 0 {
            return Err(StorageError::NotFound { entity: "plant", id: plant_id });
        }
        tx.commit().map_err(StorageError::Database)?;
        Ok(())
    }

    /// Hard delete of the plant row only; dimension rows are shared and
    /// never removed here.
    pub fn delete_plant(&self, plant_id: i64) -> Result<(), StorageError> {
        let conn = lock_conn(&self.conn)?;
        let deleted = conn.execute("DELETE FROM plants WHERE plant_id = ?1", params![plant_id])?;
        if deleted == 0 {
            return Err(StorageError::NotFound { entity: "plant", id: plant_id });
        }
        Ok(())
    }

    pub fn get_plant(&self, plant_id: i64) -> Result<Option<Plant>, StorageError> {
        let conn = lock_conn(&self.conn)?;
        let sql = format!("{PLANT_SELECT_BASE} WHERE plants.plant_id = ?1");
        conn.query_row(&sql, params![plant_id], plant_from_row)
            .optional()
            .map_err(StorageError::from)
    }

    pub fn list_plants(&self, sort: SortOrder) -> Result<Vec<Plant>, StorageError> {
        let order = match sort {
            SortOrder::Insertion => "ORDER BY plants.plant_id ASC",
            SortOrder::ByDate => "ORDER BY plants.plant_date DESC, plants.plant_id DESC",
        };
        let conn = lock_conn(&self.conn)?;
        let sql = format!("{PLANT_SELECT_BASE} {order}");
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map([], plant_from_row)?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(StorageError::from)
    }

    /// Case-insensitive substring match on the plant name in `lang`.
    pub fn search_plants(&self, query: &str, lang: Language) -> Result<Vec<Plant>, StorageError> {
        let column = match lang {
            Language::En => "plant_names.plant_name_en",
            Language::Ja => "plant_names.plant_name_ja",
        };
        let conn = lock_conn(&self.conn)?;
        let sql = format!(
            "{PLANT_SELECT_BASE} WHERE {column} LIKE ?1 ESCAPE '\\' ORDER BY plants.plant_id ASC"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params![like_pattern(query)], plant_from_row)?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(StorageError::from)
    }

    pub fn stats(&self) -> Result<StoreStats, StorageError> {
        let conn = lock_conn(&self.conn)?;
        let count = |table: &str| -> Result<i64, StorageError> {
            conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
                .map_err(StorageError::from)
        };
        Ok(StoreStats {
            plants: count("plants")?,
            locations: count("locations")?,
            families: count("families")?,
            plant_names: count("plant_names")?,
        })
    }
}
