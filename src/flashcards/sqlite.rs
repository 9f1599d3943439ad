//! SQLite-backed status store

use std::path::Path;

use rusqlite::{params, Connection};

use super::models::{CardStatus, StatusMap};
use super::storage::{Result, StatusStore};

pub struct SqliteStatusStore {
    conn: Connection,
}

impl SqliteStatusStore {
    /// Open (or create) the database file at `path`
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    pub fn open_in_memory() -> Result<Self> {
        let store = Self {
            conn: Connection::open_in_memory()?,
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS card_status (
                set_id          TEXT NOT NULL,
                card_id         TEXT NOT NULL,
                easiness        REAL NOT NULL,
                interval_days   INTEGER NOT NULL,
                repetitions     INTEGER NOT NULL,
                next_review     INTEGER NOT NULL,
                is_completed    INTEGER NOT NULL,
                PRIMARY KEY (set_id, card_id)
            )",
            (),
        )?;
        Ok(())
    }
}

impl StatusStore for SqliteStatusStore {
    fn get(&self, set_id: &str) -> Result<StatusMap> {
        let mut stmt = self.conn.prepare(
            "SELECT card_id, easiness, interval_days, repetitions, next_review, is_completed
             FROM card_status WHERE set_id = ?1",
        )?;

        let rows = stmt
            .query_map(params![set_id], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    CardStatus {
                        easiness: row.get(1)?,
                        interval: row.get(2)?,
                        repetitions: row.get(3)?,
                        next_review: row.get(4)?,
                        is_completed: row.get(5)?,
                    },
                ))
            })?
            .collect::<rusqlite::Result<StatusMap>>()?;

        Ok(rows)
    }

    fn put(&self, set_id: &str, statuses: &StatusMap) -> Result<()> {
        // Rolled back on drop if any statement fails
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM card_status WHERE set_id = ?1", params![set_id])?;
        {
            let mut insert = tx.prepare(
                "INSERT INTO card_status
                 (set_id, card_id, easiness, interval_days, repetitions, next_review, is_completed)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;
            for (card_id, status) in statuses {
                insert.execute(params![
                    set_id,
                    card_id,
                    status.easiness,
                    status.interval,
                    status.repetitions,
                    status.next_review,
                    status.is_completed,
                ])?;
            }
        }
        tx.commit()?;

        log::debug!("Saved {} statuses for set {}", statuses.len(), set_id);
        Ok(())
    }

    fn delete_set(&self, set_id: &str) -> Result<()> {
        let removed = self
            .conn
            .execute("DELETE FROM card_status WHERE set_id = ?1", params![set_id])?;
        if removed > 0 {
            log::info!("Deleted {} statuses for set {}", removed, set_id);
        }
        Ok(())
    }

    fn remove_card(&self, set_id: &str, card_id: &str) -> Result<()> {
        self.conn.execute(
            "DELETE FROM card_status WHERE set_id = ?1 AND card_id = ?2",
            params![set_id, card_id],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tempfile::TempDir;

    fn sample_statuses() -> StatusMap {
        let now = Utc::now();
        let mut statuses = StatusMap::new();
        statuses.insert("a".to_string(), CardStatus::new(now));
        statuses.insert(
            "b".to_string(),
            CardStatus {
                easiness: 1.84,
                interval: 15,
                repetitions: 3,
                next_review: now.timestamp_millis() + 1_000,
                is_completed: false,
            },
        );
        let mut done = CardStatus::new(now);
        done.is_completed = true;
        done.repetitions = 4;
        statuses.insert("c".to_string(), done);
        statuses
    }

    #[test]
    fn test_put_and_get() {
        let store = SqliteStatusStore::open_in_memory().unwrap();
        let statuses = sample_statuses();

        store.put("verbs", &statuses).unwrap();
        assert_eq!(store.get("verbs").unwrap(), statuses);
        assert!(store.get("nouns").unwrap().is_empty());
    }

    #[test]
    fn test_put_replaces_set_only() {
        let store = SqliteStatusStore::open_in_memory().unwrap();
        store.put("verbs", &sample_statuses()).unwrap();
        store.put("nouns", &sample_statuses()).unwrap();

        store.put("verbs", &StatusMap::new()).unwrap();
        assert!(store.get("verbs").unwrap().is_empty());
        assert_eq!(store.get("nouns").unwrap().len(), 3);
    }

    #[test]
    fn test_remove_card_and_delete_set() {
        let store = SqliteStatusStore::open_in_memory().unwrap();
        store.put("verbs", &sample_statuses()).unwrap();

        store.remove_card("verbs", "b").unwrap();
        assert!(!store.get("verbs").unwrap().contains_key("b"));

        store.delete_set("verbs").unwrap();
        assert!(store.get("verbs").unwrap().is_empty());
    }

    #[test]
    fn test_persists_across_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("db").join("statuses.sqlite3");
        let statuses = sample_statuses();

        {
            let store = SqliteStatusStore::open(&path).unwrap();
            store.put("verbs", &statuses).unwrap();
        }

        let store = SqliteStatusStore::open(&path).unwrap();
        assert_eq!(store.get("verbs").unwrap(), statuses);
    }

    #[test]
    fn test_failed_put_keeps_previous_rows() {
        let store = SqliteStatusStore::open_in_memory().unwrap();
        let statuses = sample_statuses();
        store.put("verbs", &statuses).unwrap();

        // NaN binds as NULL and violates the NOT NULL constraint
        let mut broken = StatusMap::new();
        broken.insert("x".to_string(), CardStatus::new(Utc::now()));
        let mut bad = CardStatus::new(Utc::now());
        bad.easiness = f64::NAN;
        broken.insert("y".to_string(), bad);

        assert!(store.put("verbs", &broken).is_err());
        assert_eq!(store.get("verbs").unwrap(), statuses);
    }
}
