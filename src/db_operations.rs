use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension};

use crate::constants::{DARK_MODE_KEY, SELECTED_CANTEEN_KEY};

/// Small persistent key-value store for user preferences.
pub struct SettingsStore {
    conn: Connection,
}

impl SettingsStore {
    pub fn open(path: impl AsRef<Path>) -> rusqlite::Result<Self> {
        let store = SettingsStore {
            conn: Connection::open(path)?,
        };
        store.check_or_create_table()?;
        Ok(store)
    }

    pub fn open_in_memory() -> rusqlite::Result<Self> {
        let store = SettingsStore {
            conn: Connection::open_in_memory()?,
        };
        store.check_or_create_table()?;
        Ok(store)
    }

    fn check_or_create_table(&self) -> rusqlite::Result<()> {
        self.conn
            .prepare(
                "create table if not exists settings (
                key text not null unique primary key,
                value text not null
                )",
            )?
            .execute([])?;

        Ok(())
    }

    pub fn get_string(&self, key: &str) -> rusqlite::Result<Option<String>> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT value FROM settings WHERE key = ?1")?;

        let value = stmt.query_row(params![key], |row| row.get(0)).optional()?;
        Ok(value)
    }

    pub fn put_string(&self, key: &str, value: &str) -> rusqlite::Result<()> {
        let mut stmt = self.conn.prepare_cached(
            "replace into settings (key, value)
                values (?1, ?2)",
        )?;

        stmt.execute(params![key, value])?;
        Ok(())
    }

    /// Drops the backing table so that every following write fails.
    #[cfg(test)]
    pub(crate) fn break_for_tests(&self) {
        self.conn
            .execute_batch("DROP TABLE settings")
            .expect("settings table should exist");
    }

    pub fn get_bool(&self, key: &str) -> rusqlite::Result<Option<bool>> {
        Ok(self.get_string(key)?.map(|value| value == "true"))
    }

    pub fn put_bool(&self, key: &str, value: bool) -> rusqlite::Result<()> {
        self.put_string(key, if value { "true" } else { "false" })
    }

    pub fn selected_canteen_id(&self) -> rusqlite::Result<Option<String>> {
        self.get_string(SELECTED_CANTEEN_KEY)
    }

    pub fn set_selected_canteen_id(&self, canteen_id: &str) -> rusqlite::Result<()> {
        self.put_string(SELECTED_CANTEEN_KEY, canteen_id)
    }

    pub fn dark_mode(&self) -> rusqlite::Result<bool> {
        Ok(self.get_bool(DARK_MODE_KEY)?.unwrap_or(false))
    }

    pub fn set_dark_mode(&self, dark_mode: bool) -> rusqlite::Result<()> {
        self.put_bool(DARK_MODE_KEY, dark_mode)
    }
}
