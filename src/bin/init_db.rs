//! Loads `CORPCODE.xml` into the company reference table.
//!
//! Usage: `init_db [path/to/CORPCODE.xml]`. The database path comes from
//! `COMPANY_DB_PATH` (default `companies.db`); existing rows are replaced.

use dart_financial_explainer::corp_codes::{parse_corp_codes, CORP_CODE_XML_NAME};
use dart_financial_explainer::{init_logging, AppConfig, CompanyStore};
use log::info;
use std::error::Error;
use std::path::PathBuf;

fn main() -> Result<(), Box<dyn Error>> {
    dotenv::dotenv().ok();
    init_logging();

    let config = AppConfig::from_env()?;
    let xml_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(CORP_CODE_XML_NAME));

    info!("Reading {}", xml_path.display());
    let xml = std::fs::read_to_string(&xml_path)?;
    let companies = parse_corp_codes(&xml)?;

    let store = CompanyStore::open(&config.database_path)?;
    let inserted = store.replace_all(&companies)?;
    info!(
        "Loaded {} companies into {}",
        inserted,
        config.database_path.display()
    );

    Ok(())
}
