use anyhow::Result;
use rusqlite::Connection;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::db::PrefStore;
use crate::models::prefs::UiPreferences;

pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    pub fn new(data_dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&data_dir)?;
        let db_path = data_dir.join("veritas.db");
        let conn = Connection::open(db_path)?;
        let db = Self {
            conn: Mutex::new(conn),
        };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS ui_prefs (
                id TEXT PRIMARY KEY DEFAULT 'default',
                data TEXT NOT NULL,
                updated_at TEXT NOT NULL DEFAULT (datetime('now'))
            );
            ",
        )?;
        Ok(())
    }

    pub fn save_prefs(&self, prefs: &UiPreferences) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        let data = serde_json::to_string(prefs)?;
        conn.execute(
            "INSERT OR REPLACE INTO ui_prefs (id, data, updated_at) VALUES ('default', ?1, datetime('now'))",
            rusqlite::params![data],
        )?;
        Ok(())
    }

    pub fn load_prefs(&self) -> Result<UiPreferences> {
        let conn = self.conn.lock().unwrap();
        let result = conn.query_row(
            "SELECT data FROM ui_prefs WHERE id = 'default'",
            [],
            |row| {
                let data: String = row.get(0)?;
                Ok(data)
            },
        );
        match result {
            Ok(data) => Ok(serde_json::from_str(&data)?),
            Err(rusqlite::Error::QueryReturnedNoRows) => {
                let default = UiPreferences::default();
                drop(conn);
                self.save_prefs(&default)?;
                Ok(default)
            }
            Err(e) => Err(e.into()),
        }
    }
}

impl PrefStore for Database {
    fn load(&self) -> Result<UiPreferences> {
        self.load_prefs()
    }

    fn save(&self, prefs: &UiPreferences) -> Result<()> {
        self.save_prefs(prefs)
    }
}
