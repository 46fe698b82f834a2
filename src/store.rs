//! SQLite reference table of companies, keyed by `corp_code`.

use crate::error::{ExplainerError, Result};
use crate::schema::Company;
use log::{debug, info};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

pub const SEARCH_LIMIT: usize = 10;

const SCHEMA: &str = r"
CREATE TABLE IF NOT EXISTS companies (
    corp_code  VARCHAR(8) PRIMARY KEY NOT NULL,
    corp_name  VARCHAR(100),
    stock_code VARCHAR(6)
);
CREATE INDEX IF NOT EXISTS ix_companies_corp_name ON companies (corp_name);
";

#[derive(Clone)]
pub struct CompanyStore {
    conn: Arc<Mutex<Connection>>,
}

impl CompanyStore {
    pub fn open(db_path: &Path) -> Result<Self> {
        Self::with_connection(Connection::open(db_path)?)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| ExplainerError::Store(format!("lock poisoned: {}", e)))
    }

    /// Companies whose name contains `query` literally, at most [`SEARCH_LIMIT`].
    pub fn search_by_name(&self, query: &str) -> Result<Vec<Company>> {
        let conn = self.lock()?;
        let pattern = format!("%{}%", escape_like(query));

        let mut stmt = conn.prepare(
            r"
            SELECT corp_name, corp_code, stock_code
            FROM companies
            WHERE corp_name LIKE ?1 ESCAPE '\'
            LIMIT ?2
            ",
        )?;

        let companies = stmt
            .query_map(params![pattern, SEARCH_LIMIT as i64], company_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        debug!("Company search '{}' matched {} rows", query, companies.len());
        Ok(companies)
    }

    pub fn get(&self, corp_code: &str) -> Result<Option<Company>> {
        let conn = self.lock()?;
        let company = conn
            .query_row(
                "SELECT corp_name, corp_code, stock_code FROM companies WHERE corp_code = ?1",
                params![corp_code],
                company_from_row,
            )
            .optional()?;
        Ok(company)
    }

    pub fn count(&self) -> Result<usize> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM companies", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Swaps the whole table for `companies` in one transaction.
    ///
    /// Duplicate `corp_code`s keep the last occurrence.
    pub fn replace_all(&self, companies: &[Company]) -> Result<usize> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        let removed = tx.execute("DELETE FROM companies", [])?;
        {
            let mut stmt = tx.prepare(
                "INSERT OR REPLACE INTO companies (corp_code, corp_name, stock_code) VALUES (?1, ?2, ?3)",
            )?;
            for company in companies {
                stmt.execute(params![company.corp_code, company.corp_name, company.stock_code])?;
            }
        }
        tx.commit()?;

        info!(
            "Replaced {} companies with {} new rows",
            removed,
            companies.len()
        );
        Ok(companies.len())
    }
}

fn company_from_row(row: &Row<'_>) -> rusqlite::Result<Company> {
    Ok(Company {
        corp_name: row.get::<_, Option<String>>(0)?.unwrap_or_default(),
        corp_code: row.get(1)?,
        stock_code: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
    })
}

fn escape_like(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len());
    for c in query.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
