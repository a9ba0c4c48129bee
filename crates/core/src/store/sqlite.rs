//! SQLite-backed item store implementation.

use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use super::{ItemRecord, ItemStore, StoreError, StoreStats, Trend};

/// SQLite-backed item store.
pub struct SqliteItemStore {
    conn: Mutex<Connection>,
}

impl SqliteItemStore {
    /// Create a new SQLite store, creating the database file and tables if needed.
    pub fn new(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(|e| StoreError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory SQLite store (useful for testing).
    pub fn in_memory() -> Result<Self, StoreError> {
        let conn =
            Connection::open_in_memory().map_err(|e| StoreError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), StoreError> {
        conn.execute_batch(
            r#"
            -- Canonical item records (one row per item id)
            CREATE TABLE IF NOT EXISTS items (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                description TEXT NOT NULL,
                item_type TEXT NOT NULL,
                icon TEXT NOT NULL,
                icon_large TEXT NOT NULL,
                members INTEGER NOT NULL,
                current_price INTEGER NOT NULL CHECK (current_price >= 0),
                current_trend TEXT NOT NULL,
                today_price_change INTEGER NOT NULL,
                today_trend TEXT NOT NULL,
                first_ingested_at TEXT NOT NULL,
                last_ingested_at TEXT NOT NULL,
                ingest_count INTEGER NOT NULL DEFAULT 1
            );

            CREATE INDEX IF NOT EXISTS idx_items_name ON items(name);
            CREATE INDEX IF NOT EXISTS idx_items_last_ingested ON items(last_ingested_at);
            "#,
        )
        .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    /// Convert a row to an ItemRecord.
    fn row_to_record(row: &rusqlite::Row) -> rusqlite::Result<ItemRecord> {
        let current_trend_str: String = row.get(8)?;
        let today_trend_str: String = row.get(10)?;
        let first_str: String = row.get(11)?;
        let last_str: String = row.get(12)?;

        Ok(ItemRecord {
            id: row.get(0)?,
            name: row.get(1)?,
            description: row.get(2)?,
            item_type: row.get(3)?,
            icon: row.get(4)?,
            icon_large: row.get(5)?,
            members: row.get(6)?,
            current_price: row.get(7)?,
            current_trend: Trend::parse(&current_trend_str).unwrap_or_default(),
            today_price_change: row.get(9)?,
            today_trend: Trend::parse(&today_trend_str).unwrap_or_default(),
            first_ingested_at: parse_timestamp(&first_str),
            last_ingested_at: parse_timestamp(&last_str),
            ingest_count: row.get(13)?,
        })
    }
}

fn parse_timestamp(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

const SELECT_COLUMNS: &str = "id, name, description, item_type, icon, icon_large, members, \
     current_price, current_trend, today_price_change, today_trend, \
     first_ingested_at, last_ingested_at, ingest_count";

impl ItemStore for SqliteItemStore {
    fn get(&self, id: i64) -> Result<ItemRecord, StoreError> {
        let conn = self.conn.lock().unwrap();

        conn.query_row(
            &format!("SELECT {} FROM items WHERE id = ?", SELECT_COLUMNS),
            params![id],
            Self::row_to_record,
        )
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound(id),
            _ => StoreError::Database(e.to_string()),
        })
    }

    fn put(&self, record: &ItemRecord) -> Result<(), StoreError> {
        let conn = self.conn.lock().unwrap();

        conn.execute(
            "INSERT INTO items (id, name, description, item_type, icon, icon_large, members,
                                current_price, current_trend, today_price_change, today_trend,
                                first_ingested_at, last_ingested_at, ingest_count)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                description = excluded.description,
                item_type = excluded.item_type,
                icon = excluded.icon,
                icon_large = excluded.icon_large,
                members = excluded.members,
                current_price = excluded.current_price,
                current_trend = excluded.current_trend,
                today_price_change = excluded.today_price_change,
                today_trend = excluded.today_trend,
                last_ingested_at = excluded.last_ingested_at,
                ingest_count = excluded.ingest_count",
            params![
                record.id,
                &record.name,
                &record.description,
                &record.item_type,
                &record.icon,
                &record.icon_large,
                record.members,
                record.current_price,
                record.current_trend.as_str(),
                record.today_price_change,
                record.today_trend.as_str(),
                record.first_ingested_at.to_rfc3339(),
                record.last_ingested_at.to_rfc3339(),
                record.ingest_count,
            ],
        )
        .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    fn all(&self) -> Result<Vec<ItemRecord>, StoreError> {
        let conn = self.conn.lock().unwrap();

        let mut stmt = conn
            .prepare(&format!(
                "SELECT {} FROM items ORDER BY id",
                SELECT_COLUMNS
            ))
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let rows = stmt
            .query_map([], Self::row_to_record)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row.map_err(|e| StoreError::Database(e.to_string()))?);
        }
        Ok(records)
    }

    fn count(&self) -> Result<u64, StoreError> {
        let conn = self.conn.lock().unwrap();

        conn.query_row("SELECT COUNT(*) FROM items", [], |row| row.get(0))
            .map_err(|e| StoreError::Database(e.to_string()))
    }

    fn stats(&self) -> Result<StoreStats, StoreError> {
        let conn = self.conn.lock().unwrap();

        let total_items: u64 = conn
            .query_row("SELECT COUNT(*) FROM items", [], |row| row.get(0))
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let oldest_ingest: Option<DateTime<Utc>> = conn
            .query_row("SELECT MIN(first_ingested_at) FROM items", [], |row| {
                let s: Option<String> = row.get(0)?;
                Ok(s)
            })
            .map_err(|e| StoreError::Database(e.to_string()))?
            .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
            .map(|dt| dt.with_timezone(&Utc));

        let newest_ingest: Option<DateTime<Utc>> = conn
            .query_row("SELECT MAX(last_ingested_at) FROM items", [], |row| {
                let s: Option<String> = row.get(0)?;
                Ok(s)
            })
            .map_err(|e| StoreError::Database(e.to_string()))?
            .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
            .map(|dt| dt.with_timezone(&Utc));

        Ok(StoreStats {
            total_items,
            oldest_ingest,
            newest_ingest,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_store() -> SqliteItemStore {
        SqliteItemStore::in_memory().unwrap()
    }

    fn create_test_record(id: i64, name: &str, price: i64) -> ItemRecord {
        let now = Utc::now();
        ItemRecord {
            id,
            name: name.to_string(),
            description: format!("{} description", name),
            item_type: "Melee weapons".to_string(),
            icon: format!("https://example.com/{}.png", id),
            icon_large: format!("https://example.com/{}_large.png", id),
            members: true,
            current_price: price,
            current_trend: Trend::Neutral,
            today_price_change: 0,
            today_trend: Trend::Neutral,
            first_ingested_at: now,
            last_ingested_at: now,
            ingest_count: 1,
        }
    }

    #[test]
    fn test_put_and_get() {
        let store = create_test_store();
        let record = create_test_record(4151, "Abyssal whip", 12_000);

        store.put(&record).unwrap();

        let fetched = store.get(4151).unwrap();
        assert_eq!(fetched.id, 4151);
        assert_eq!(fetched.name, "Abyssal whip");
        assert_eq!(fetched.current_price, 12_000);
        assert_eq!(fetched.ingest_count, 1);
    }

    #[test]
    fn test_get_nonexistent() {
        let store = create_test_store();
        let result = store.get(999);
        assert!(matches!(result, Err(StoreError::NotFound(999))));
    }

    #[test]
    fn test_put_upserts_by_id() {
        let store = create_test_store();
        let first = create_test_record(4151, "Abyssal whip", 12_000);
        store.put(&first).unwrap();

        let mut second = create_test_record(4151, "Abyssal whip", 12_500);
        second.today_price_change = 500;
        second.today_trend = Trend::Up;
        second.first_ingested_at = first.first_ingested_at;
        second.ingest_count = 2;
        store.put(&second).unwrap();

        assert_eq!(store.count().unwrap(), 1);

        let fetched = store.get(4151).unwrap();
        assert_eq!(fetched.current_price, 12_500);
        assert_eq!(fetched.today_price_change, 500);
        assert_eq!(fetched.today_trend, Trend::Up);
        assert_eq!(fetched.ingest_count, 2);
    }

    #[test]
    fn test_put_rejects_negative_price() {
        let store = create_test_store();
        let mut record = create_test_record(1, "Bad item", 0);
        record.current_price = -5;

        let result = store.put(&record);
        assert!(matches!(result, Err(StoreError::Database(_))));
    }

    #[test]
    fn test_all_ordered_by_id() {
        let store = create_test_store();
        store.put(&create_test_record(20, "Rune sword", 100)).unwrap();
        store.put(&create_test_record(5, "Rune axe", 200)).unwrap();
        store.put(&create_test_record(13, "Bronze dagger", 3)).unwrap();

        let records = store.all().unwrap();
        let ids: Vec<i64> = records.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![5, 13, 20]);
    }

    #[test]
    fn test_count() {
        let store = create_test_store();
        assert_eq!(store.count().unwrap(), 0);

        store.put(&create_test_record(1, "One", 10)).unwrap();
        store.put(&create_test_record(2, "Two", 20)).unwrap();
        assert_eq!(store.count().unwrap(), 2);
    }

    #[test]
    fn test_stats() {
        let store = create_test_store();

        let stats = store.stats().unwrap();
        assert_eq!(stats.total_items, 0);
        assert!(stats.oldest_ingest.is_none());
        assert!(stats.newest_ingest.is_none());

        store.put(&create_test_record(1, "One", 10)).unwrap();
        store.put(&create_test_record(2, "Two", 20)).unwrap();

        let stats = store.stats().unwrap();
        assert_eq!(stats.total_items, 2);
        assert!(stats.oldest_ingest.is_some());
        assert!(stats.newest_ingest.is_some());
    }

    #[test]
    fn test_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("items.db");

        {
            let store = SqliteItemStore::new(&path).unwrap();
            store
                .put(&create_test_record(4151, "Abyssal whip", 12_000))
                .unwrap();
        }

        let store = SqliteItemStore::new(&path).unwrap();
        let fetched = store.get(4151).unwrap();
        assert_eq!(fetched.name, "Abyssal whip");
        assert_eq!(fetched.current_price, 12_000);
    }

    #[test]
    fn test_trend_fields_roundtrip() {
        let store = create_test_store();
        let mut record = create_test_record(1, "One", 10);
        record.current_trend = Trend::Down;
        record.today_price_change = -3;
        record.today_trend = Trend::Down;
        store.put(&record).unwrap();

        let fetched = store.get(1).unwrap();
        assert_eq!(fetched.current_trend, Trend::Down);
        assert_eq!(fetched.today_trend, Trend::Down);
        assert_eq!(fetched.today_price_change, -3);
    }
}
