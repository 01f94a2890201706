use anyhow::Result;
use rusqlite::{params, OptionalExtension};

use super::Database;
use crate::store::KeyValueStore;

impl Database {
    pub fn get_setting(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM app_settings WHERE key = ?",
                [key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    pub fn set_setting(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO app_settings (key, value) VALUES (?, ?)",
            params![key, value],
        )?;
        Ok(())
    }

    /// Returns true if a row was removed.
    pub fn delete_setting(&self, key: &str) -> Result<bool> {
        let rows = self
            .conn
            .execute("DELETE FROM app_settings WHERE key = ?", [key])?;
        Ok(rows > 0)
    }
}

impl KeyValueStore for Database {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.get_setting(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.set_setting(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.delete_setting(key).map(|_| ())
    }
}
