//! SQLite storage for materiality versions

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;
use std::sync::Mutex;

use crate::calculation::{MaterialityCalculation, MaterialityThresholds};
use crate::error::LedgerError;
use crate::ledger::{check_append, check_approval, VersionLedger};

const SELECT_COLUMNS: &str = "id, engagement_id, version, inputs_json, overall, performance,
    clearly_trivial, advisories_json, inputs_hash, is_current, created_at, created_by,
    approved_at, approved_by";

/// Version ledger backed by a SQLite database
pub struct SqliteLedger {
    conn: Mutex<Connection>,
}

impl SqliteLedger {
    /// Open (or create) a ledger at the given database path
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, LedgerError> {
        let conn = Connection::open(path)?;
        let ledger = Self {
            conn: Mutex::new(conn),
        };
        ledger.init_schema()?;
        Ok(ledger)
    }

    /// Create an in-memory ledger (for testing)
    pub fn in_memory() -> Result<Self, LedgerError> {
        let conn = Connection::open_in_memory()?;
        let ledger = Self {
            conn: Mutex::new(conn),
        };
        ledger.init_schema()?;
        Ok(ledger)
    }

    fn init_schema(&self) -> Result<(), LedgerError> {
        let conn = self.conn.lock().map_err(|_| LedgerError::Poisoned)?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS materiality_versions (
                id TEXT PRIMARY KEY,
                engagement_id TEXT NOT NULL,
                version INTEGER NOT NULL,
                inputs_json TEXT NOT NULL,
                overall TEXT NOT NULL,
                performance TEXT NOT NULL,
                clearly_trivial TEXT NOT NULL,
                advisories_json TEXT NOT NULL,
                inputs_hash TEXT NOT NULL,
                is_current INTEGER NOT NULL,
                created_at TEXT NOT NULL,
                created_by TEXT NOT NULL,
                approved_at TEXT,
                approved_by TEXT,
                UNIQUE (engagement_id, version)
            )",
            [],
        )?;

        // At most one current version per engagement
        conn.execute(
            "CREATE UNIQUE INDEX IF NOT EXISTS idx_materiality_versions_current
             ON materiality_versions(engagement_id) WHERE is_current = 1",
            [],
        )?;

        Ok(())
    }

    /// Total versions across all engagements
    pub fn count(&self) -> Result<usize, LedgerError> {
        let conn = self.conn.lock().map_err(|_| LedgerError::Poisoned)?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM materiality_versions", [], |row| {
            row.get(0)
        })?;
        Ok(count as usize)
    }
}

/// Raw column values, decoded outside the rusqlite row closure
struct StoredRow {
    id: String,
    engagement_id: String,
    version: u32,
    inputs_json: String,
    overall: String,
    performance: String,
    clearly_trivial: String,
    advisories_json: String,
    inputs_hash: String,
    is_current: bool,
    created_at: String,
    created_by: String,
    approved_at: Option<String>,
    approved_by: Option<String>,
}

impl StoredRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            engagement_id: row.get(1)?,
            version: row.get(2)?,
            inputs_json: row.get(3)?,
            overall: row.get(4)?,
            performance: row.get(5)?,
            clearly_trivial: row.get(6)?,
            advisories_json: row.get(7)?,
            inputs_hash: row.get(8)?,
            is_current: row.get(9)?,
            created_at: row.get(10)?,
            created_by: row.get(11)?,
            approved_at: row.get(12)?,
            approved_by: row.get(13)?,
        })
    }

    fn into_calculation(self) -> Result<MaterialityCalculation, LedgerError> {
        let inputs = serde_json::from_str(&self.inputs_json)?;
        let advisories = serde_json::from_str(&self.advisories_json)?;
        let thresholds = MaterialityThresholds {
            overall: parse_decimal(&self.overall)?,
            performance: parse_decimal(&self.performance)?,
            clearly_trivial: parse_decimal(&self.clearly_trivial)?,
        };
        let approved_at = self.approved_at.as_deref().map(parse_time).transpose()?;

        Ok(MaterialityCalculation {
            id: self.id,
            engagement_id: self.engagement_id,
            version: self.version,
            inputs,
            thresholds,
            advisories,
            inputs_hash: self.inputs_hash,
            is_current: self.is_current,
            created_at: parse_time(&self.created_at)?,
            created_by: self.created_by,
            approved_at,
            approved_by: self.approved_by,
        })
    }
}

fn parse_decimal(value: &str) -> Result<Decimal, LedgerError> {
    Decimal::from_str(value).map_err(|_| LedgerError::Corrupt(format!("invalid amount: {}", value)))
}

fn parse_time(value: &str) -> Result<DateTime<Utc>, LedgerError> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|_| LedgerError::Corrupt(format!("invalid date: {}", value)))
}

fn query_one(
    conn: &Connection,
    filter: &str,
    key: &str,
) -> Result<Option<MaterialityCalculation>, LedgerError> {
    let sql = format!("SELECT {} FROM materiality_versions WHERE {}", SELECT_COLUMNS, filter);
    let row = conn
        .query_row(&sql, params![key], StoredRow::from_row)
        .optional()?;
    row.map(StoredRow::into_calculation).transpose()
}

fn current_id(conn: &Connection, engagement_id: &str) -> Result<Option<String>, LedgerError> {
    let id = conn
        .query_row(
            "SELECT id FROM materiality_versions WHERE engagement_id = ?1 AND is_current = 1",
            params![engagement_id],
            |row| row.get(0),
        )
        .optional()?;
    Ok(id)
}

impl VersionLedger for SqliteLedger {
    fn append(
        &self,
        expected_current: Option<&str>,
        mut calc: MaterialityCalculation,
    ) -> Result<MaterialityCalculation, LedgerError> {
        let mut conn = self.conn.lock().map_err(|_| LedgerError::Poisoned)?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let actual_current = current_id(&tx, &calc.engagement_id)?;
        let highest: u32 = tx.query_row(
            "SELECT COALESCE(MAX(version), 0) FROM materiality_versions WHERE engagement_id = ?1",
            params![calc.engagement_id],
            |row| row.get(0),
        )?;
        let id_taken: bool = tx.query_row(
            "SELECT EXISTS(SELECT 1 FROM materiality_versions WHERE id = ?1)",
            params![calc.id],
            |row| row.get(0),
        )?;

        check_append(
            &calc,
            expected_current,
            actual_current.as_deref(),
            highest,
            id_taken,
        )?;

        tx.execute(
            "UPDATE materiality_versions SET is_current = 0
             WHERE engagement_id = ?1 AND is_current = 1",
            params![calc.engagement_id],
        )?;

        calc.is_current = true;
        let inputs_json = serde_json::to_string(&calc.inputs)?;
        let advisories_json = serde_json::to_string(&calc.advisories)?;

        tx.execute(
            "INSERT INTO materiality_versions
             (id, engagement_id, version, inputs_json, overall, performance, clearly_trivial,
              advisories_json, inputs_hash, is_current, created_at, created_by,
              approved_at, approved_by)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
            params![
                calc.id,
                calc.engagement_id,
                calc.version,
                inputs_json,
                calc.thresholds.overall.to_string(),
                calc.thresholds.performance.to_string(),
                calc.thresholds.clearly_trivial.to_string(),
                advisories_json,
                calc.inputs_hash,
                calc.is_current,
                calc.created_at.to_rfc3339(),
                calc.created_by,
                calc.approved_at.map(|t| t.to_rfc3339()),
                calc.approved_by,
            ],
        )?;

        tx.commit()?;
        Ok(calc)
    }

    fn get(&self, version_id: &str) -> Result<Option<MaterialityCalculation>, LedgerError> {
        let conn = self.conn.lock().map_err(|_| LedgerError::Poisoned)?;
        query_one(&conn, "id = ?1", version_id)
    }

    fn get_current(
        &self,
        engagement_id: &str,
    ) -> Result<Option<MaterialityCalculation>, LedgerError> {
        let conn = self.conn.lock().map_err(|_| LedgerError::Poisoned)?;
        query_one(&conn, "engagement_id = ?1 AND is_current = 1", engagement_id)
    }

    fn get_history(&self, engagement_id: &str) -> Result<Vec<MaterialityCalculation>, LedgerError> {
        let conn = self.conn.lock().map_err(|_| LedgerError::Poisoned)?;
        let sql = format!(
            "SELECT {} FROM materiality_versions WHERE engagement_id = ?1 ORDER BY version ASC",
            SELECT_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;

        let rows = stmt
            .query_map(params![engagement_id], StoredRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter().map(StoredRow::into_calculation).collect()
    }

    fn mark_approved(
        &self,
        version_id: &str,
        approver: &str,
        approved_at: DateTime<Utc>,
    ) -> Result<MaterialityCalculation, LedgerError> {
        let mut conn = self.conn.lock().map_err(|_| LedgerError::Poisoned)?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let mut calc = query_one(&tx, "id = ?1", version_id)?
            .ok_or_else(|| LedgerError::VersionNotFound(version_id.to_string()))?;
        let current = current_id(&tx, &calc.engagement_id)?;

        check_approval(&calc, current.as_deref())?;

        let rows = tx.execute(
            "UPDATE materiality_versions SET approved_at = ?1, approved_by = ?2
             WHERE id = ?3 AND is_current = 1 AND approved_at IS NULL",
            params![approved_at.to_rfc3339(), approver, version_id],
        )?;
        if rows != 1 {
            return Err(LedgerError::Corrupt(format!(
                "approval of {} updated {} rows",
                version_id, rows
            )));
        }

        tx.commit()?;

        calc.approved_at = Some(approved_at);
        calc.approved_by = Some(approver.to_string());
        Ok(calc)
    }
}
