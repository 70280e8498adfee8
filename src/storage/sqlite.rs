//! SQLite Persistent Storage for the Ledger
//!
//! Provides durable storage for host zones and records that survives restarts.
//! Uses connection pooling via r2d2.

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, OptionalExtension};
use std::path::Path;

use super::traits::{LedgerStats, LedgerStore, StorageError, StorageResult};
use crate::types::{DepositRecord, DepositRecordStatus, HostZone, UserRedemptionRecord, Validator};

/// SQLite-backed ledger store with connection pooling
pub struct SqliteLedgerStore {
    pool: Pool<SqliteConnectionManager>,
}

impl SqliteLedgerStore {
    /// Create a new store with the given database path
    ///
    /// Creates the database file and runs migrations if needed.
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self, StorageError> {
        if let Some(parent) = db_path.as_ref().parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                StorageError::Connection(format!("cannot create {}: {}", parent.display(), e))
            })?;
        }

        let manager = SqliteConnectionManager::file(db_path);
        let pool = Pool::builder()
            .max_size(4)
            .build(manager)
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        let store = Self { pool };
        store.run_migrations()?;

        Ok(store)
    }

    /// Create an in-memory store (for testing)
    pub fn in_memory() -> Result<Self, StorageError> {
        let manager = SqliteConnectionManager::memory();
        let pool = Pool::builder()
            .max_size(1)
            .build(manager)
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        let store = Self { pool };
        store.run_migrations()?;

        Ok(store)
    }

    fn conn(&self) -> Result<PooledConnection<SqliteConnectionManager>, StorageError> {
        self.pool
            .get()
            .map_err(|e| StorageError::Connection(e.to_string()))
    }

    fn run_migrations(&self) -> Result<(), StorageError> {
        let conn = self.conn()?;

        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS host_zones (
                chain_id TEXT PRIMARY KEY,
                staked_bal INTEGER NOT NULL DEFAULT 0,
                validators TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS deposit_records (
                id INTEGER PRIMARY KEY,
                host_zone_id TEXT NOT NULL,
                amount INTEGER NOT NULL,
                denom TEXT NOT NULL,
                status TEXT NOT NULL DEFAULT 'transfer',
                epoch_number INTEGER NOT NULL DEFAULT 0
            );

            CREATE TABLE IF NOT EXISTS user_redemption_records (
                id INTEGER PRIMARY KEY,
                sender TEXT NOT NULL,
                receiver TEXT NOT NULL,
                amount INTEGER NOT NULL,
                denom TEXT NOT NULL,
                host_zone_id TEXT NOT NULL,
                epoch_number INTEGER NOT NULL DEFAULT 0,
                is_claimable INTEGER NOT NULL DEFAULT 0
            );

            CREATE INDEX IF NOT EXISTS idx_deposit_records_host_zone ON deposit_records(host_zone_id);
            CREATE INDEX IF NOT EXISTS idx_user_redemption_records_claimable ON user_redemption_records(is_claimable);
            "#,
        )
        .map_err(|e| StorageError::Database(e.to_string()))?;

        Ok(())
    }

    fn row_to_host_zone(row: &rusqlite::Row) -> rusqlite::Result<(String, i64, String)> {
        Ok((row.get("chain_id")?, row.get("staked_bal")?, row.get("validators")?))
    }

    fn row_to_deposit_record(row: &rusqlite::Row) -> rusqlite::Result<DepositRecord> {
        let status_idx = row.as_ref().column_index("status")?;
        let status_str: String = row.get(status_idx)?;
        let status: DepositRecordStatus = status_str.parse().map_err(|e: String| {
            rusqlite::Error::FromSqlConversionFailure(status_idx, rusqlite::types::Type::Text, e.into())
        })?;

        Ok(DepositRecord {
            id: row.get::<_, i64>("id")? as u64,
            host_zone_id: row.get("host_zone_id")?,
            amount: row.get::<_, i64>("amount")? as u64,
            denom: row.get("denom")?,
            status,
            epoch_number: row.get::<_, i64>("epoch_number")? as u64,
        })
    }

    fn row_to_user_redemption_record(row: &rusqlite::Row) -> rusqlite::Result<UserRedemptionRecord> {
        Ok(UserRedemptionRecord {
            id: row.get::<_, i64>("id")? as u64,
            sender: row.get("sender")?,
            receiver: row.get("receiver")?,
            amount: row.get::<_, i64>("amount")? as u64,
            denom: row.get("denom")?,
            host_zone_id: row.get("host_zone_id")?,
            epoch_number: row.get::<_, i64>("epoch_number")? as u64,
            is_claimable: row.get::<_, i64>("is_claimable")? != 0,
        })
    }

    fn count(&self, sql: &str) -> StorageResult<u64> {
        let conn = self.conn()?;
        let count: i64 = conn
            .query_row(sql, [], |row| row.get(0))
            .map_err(|e| StorageError::Database(e.to_string()))?;
        Ok(count as u64)
    }
}

impl LedgerStore for SqliteLedgerStore {
    fn get_host_zone(&self, chain_id: &str) -> StorageResult<Option<HostZone>> {
        let conn = self.conn()?;

        let row = conn
            .query_row(
                "SELECT * FROM host_zones WHERE chain_id = ?1",
                params![chain_id],
                |row| Self::row_to_host_zone(row),
            )
            .optional()
            .map_err(|e| StorageError::Database(e.to_string()))?;

        let Some((chain_id, staked_bal, validators)) = row else {
            return Ok(None);
        };

        let validators: Vec<Validator> = serde_json::from_str(&validators)
            .map_err(|e| StorageError::InvalidData(format!("host zone {}: {}", chain_id, e)))?;

        Ok(Some(HostZone {
            chain_id,
            validators,
            staked_bal: staked_bal as u64,
        }))
    }

    fn set_host_zone(&mut self, zone: &HostZone) -> StorageResult<()> {
        let validators = serde_json::to_string(&zone.validators)
            .map_err(|e| StorageError::InvalidData(e.to_string()))?;
        let conn = self.conn()?;

        conn.execute(
            "INSERT OR REPLACE INTO host_zones (chain_id, staked_bal, validators) VALUES (?1, ?2, ?3)",
            params![zone.chain_id, zone.staked_bal as i64, validators],
        )
        .map_err(|e| StorageError::Database(e.to_string()))?;

        Ok(())
    }

    fn get_deposit_record(&self, id: u64) -> StorageResult<Option<DepositRecord>> {
        let conn = self.conn()?;

        let record = conn
            .query_row(
                "SELECT * FROM deposit_records WHERE id = ?1",
                params![id as i64],
                |row| Self::row_to_deposit_record(row),
            )
            .optional()
            .map_err(|e| StorageError::Database(e.to_string()))?;

        Ok(record)
    }

    fn set_deposit_record(&mut self, record: &DepositRecord) -> StorageResult<()> {
        let conn = self.conn()?;

        conn.execute(
            r#"
            INSERT OR REPLACE INTO deposit_records (
                id, host_zone_id, amount, denom, status, epoch_number
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                record.id as i64,
                record.host_zone_id,
                record.amount as i64,
                record.denom,
                record.status.to_string(),
                record.epoch_number as i64,
            ],
        )
        .map_err(|e| StorageError::Database(e.to_string()))?;

        Ok(())
    }

    fn remove_deposit_record(&mut self, id: u64) -> StorageResult<bool> {
        let conn = self.conn()?;

        let rows_affected = conn
            .execute("DELETE FROM deposit_records WHERE id = ?1", params![id as i64])
            .map_err(|e| StorageError::Database(e.to_string()))?;

        Ok(rows_affected > 0)
    }

    fn get_user_redemption_record(&self, id: u64) -> StorageResult<Option<UserRedemptionRecord>> {
        let conn = self.conn()?;

        let record = conn
            .query_row(
                "SELECT * FROM user_redemption_records WHERE id = ?1",
                params![id as i64],
                |row| Self::row_to_user_redemption_record(row),
            )
            .optional()
            .map_err(|e| StorageError::Database(e.to_string()))?;

        Ok(record)
    }

    fn set_user_redemption_record(&mut self, record: &UserRedemptionRecord) -> StorageResult<()> {
        let conn = self.conn()?;

        conn.execute(
            r#"
            INSERT OR REPLACE INTO user_redemption_records (
                id, sender, receiver, amount, denom, host_zone_id, epoch_number, is_claimable
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                record.id as i64,
                record.sender,
                record.receiver,
                record.amount as i64,
                record.denom,
                record.host_zone_id,
                record.epoch_number as i64,
                record.is_claimable as i64,
            ],
        )
        .map_err(|e| StorageError::Database(e.to_string()))?;

        Ok(())
    }

    fn remove_user_redemption_record(&mut self, id: u64) -> StorageResult<bool> {
        let conn = self.conn()?;

        let rows_affected = conn
            .execute(
                "DELETE FROM user_redemption_records WHERE id = ?1",
                params![id as i64],
            )
            .map_err(|e| StorageError::Database(e.to_string()))?;

        Ok(rows_affected > 0)
    }

    fn stats(&self) -> StorageResult<LedgerStats> {
        Ok(LedgerStats {
            host_zones: self.count("SELECT COUNT(*) FROM host_zones")?,
            deposit_records: self.count("SELECT COUNT(*) FROM deposit_records")?,
            user_redemption_records: self.count("SELECT COUNT(*) FROM user_redemption_records")?,
            claimable_redemptions: self
                .count("SELECT COUNT(*) FROM user_redemption_records WHERE is_claimable = 1")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_zone_roundtrip() {
        let mut store = SqliteLedgerStore::in_memory().unwrap();
        let mut zone = HostZone::new("GAIA", ["val1", "val2"]);
        zone.add_delegation_to_validator("val2", 1_234).unwrap();

        store.set_host_zone(&zone).unwrap();

        assert_eq!(store.get_host_zone("GAIA").unwrap(), Some(zone));
        assert!(store.get_host_zone("OSMO").unwrap().is_none());
    }

    #[test]
    fn test_set_overwrites_record() {
        let mut store = SqliteLedgerStore::in_memory().unwrap();
        let mut record = UserRedemptionRecord::new(3, "stride1a", "cosmos1a", 50, "GAIA");
        store.set_user_redemption_record(&record).unwrap();

        record.mark_claimable();
        store.set_user_redemption_record(&record).unwrap();

        let retrieved = store.get_user_redemption_record(3).unwrap().unwrap();
        assert!(retrieved.is_claimable);
        assert_eq!(store.stats().unwrap().claimable_redemptions, 1);
    }

    #[test]
    fn test_remove_records() {
        let mut store = SqliteLedgerStore::in_memory().unwrap();
        let mut deposit = DepositRecord::new(9, "GAIA", 500, "uatom");
        deposit.status = DepositRecordStatus::Stake;
        store.set_deposit_record(&deposit).unwrap();
        assert_eq!(store.get_deposit_record(9).unwrap(), Some(deposit));

        assert!(store.remove_deposit_record(9).unwrap());
        assert!(!store.remove_deposit_record(9).unwrap());
        assert!(!store.remove_user_redemption_record(1).unwrap());
    }

    #[test]
    fn test_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger").join("stakeibc.db");

        {
            let mut store = SqliteLedgerStore::new(&path).unwrap();
            store.set_deposit_record(&DepositRecord::new(1, "GAIA", 10, "uatom")).unwrap();
        }

        let store = SqliteLedgerStore::new(&path).unwrap();
        assert!(store.get_deposit_record(1).unwrap().is_some());
        assert_eq!(store.stats().unwrap().deposit_records, 1);
    }

    #[test]
    fn test_corrupt_status_is_reported() {
        let store = SqliteLedgerStore::in_memory().unwrap();
        store
            .conn()
            .unwrap()
            .execute(
                "INSERT INTO deposit_records (id, host_zone_id, amount, denom, status) VALUES (4, 'GAIA', 10, 'uatom', 'bogus')",
                [],
            )
            .unwrap();

        let err = store.get_deposit_record(4).unwrap_err();
        assert!(matches!(err, StorageError::Database(ref msg) if msg.contains("bogus")));
    }

    #[test]
    fn test_unusable_db_directory_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, b"").unwrap();

        let result = SqliteLedgerStore::new(blocker.join("stakeibc.db"));
        assert!(matches!(result, Err(StorageError::Connection(_))));
    }
}
