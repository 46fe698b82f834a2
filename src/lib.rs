//! # DART Financial Explainer
//!
//! A thin web backend over the Korean OpenDART disclosure API.
//!
//! ## Core Concepts
//!
//! - **Reference table**: company name -> `corp_code` lookup in SQLite, loaded
//!   from the `CORPCODE.xml` corpus OpenDART publishes
//! - **Normalization**: the flat `fnlttSinglAcnt` record list becomes a
//!   [`FinancialModel`] with one sequence per statement (`BS`, `IS`, `CF`, `SC`)
//!   and year labels taken from the first record
//! - **Amounts**: kept as separator-free strings, never parsed to numbers
//! - **Explanation**: the model is rendered into a Korean prompt and sent to
//!   Gemini; the reply is returned verbatim
//!
//! ## Example
//!
//! ```rust,ignore
//! use dart_financial_explainer::*;
//! use std::sync::Arc;
//!
//! let config = AppConfig::from_env()?;
//! let service = FinancialService::new(
//!     Arc::new(OpenDartClient::from_config(&config)),
//!     Arc::new(GeminiClient::from_config(&config)),
//! );
//!
//! let query = statement_query(Some("00126380".to_string()), Some("2023".to_string()), None)?;
//! let model = service.fetch_statements(&query).await?;
//! let text = service
//!     .explain(&ExplainRequest::from_model("삼성전자", model))
//!     .await?;
//! ```

pub mod config;
pub mod corp_codes;
pub mod disclosure;
pub mod error;
pub mod llm;
pub mod normalizer;
pub mod routes;
pub mod schema;
pub mod service;
pub mod store;

#[cfg(test)]
mod test_support;

pub use config::AppConfig;
pub use disclosure::{DisclosureSource, OpenDartClient};
pub use error::{ExplainerError, Result};
pub use llm::{build_explanation_prompt, GeminiClient, TextGenerator};
pub use normalizer::normalize;
pub use routes::{build_router, AppState};
pub use schema::*;
pub use service::{statement_query, FinancialService};
pub use store::CompanyStore;

use tracing_subscriber::EnvFilter;

/// Installs the fmt subscriber used by every binary. `RUST_LOG` overrides the
/// default `info` level; `log` records from the library are bridged.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,hyper=warn,reqwest=warn,rustls=warn"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
