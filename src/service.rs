use crate::disclosure::DisclosureSource;
use crate::error::{ExplainerError, Result};
use crate::llm::{build_explanation_prompt, TextGenerator};
use crate::normalizer::normalize;
use crate::schema::{ExplainRequest, FinancialModel, ReportType, StatementQuery};
use chrono::{Datelike, Local};
use log::{error, info};
use std::sync::Arc;

/// Fiscal year used when a caller does not pick one: the previous calendar year.
pub fn default_business_year() -> String {
    (Local::now().year() - 1).to_string()
}

pub fn default_report_code() -> String {
    ReportType::Annual.code().to_string()
}

/// Builds a [`StatementQuery`], filling the year and report code defaults.
pub fn statement_query(
    corp_code: Option<String>,
    bsns_year: Option<String>,
    reprt_code: Option<String>,
) -> Result<StatementQuery> {
    let present = |value: Option<String>| {
        value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let corp_code = present(corp_code).ok_or_else(|| {
        ExplainerError::InvalidRequest("corp_code 파라미터가 필요합니다.".to_string())
    })?;

    Ok(StatementQuery {
        corp_code,
        bsns_year: present(bsns_year).unwrap_or_else(default_business_year),
        reprt_code: present(reprt_code).unwrap_or_else(default_report_code),
    })
}

#[derive(Clone)]
pub struct FinancialService {
    source: Arc<dyn DisclosureSource>,
    generator: Arc<dyn TextGenerator>,
}

impl FinancialService {
    pub fn new(source: Arc<dyn DisclosureSource>, generator: Arc<dyn TextGenerator>) -> Self {
        Self { source, generator }
    }

    pub async fn fetch_statements(&self, query: &StatementQuery) -> Result<FinancialModel> {
        let items = self.source.fetch_single_accounts(query).await?;
        let model = normalize(&items);

        info!(
            "Processed financial data for {}: {} entries, years {:?}",
            query.corp_code,
            model.total_entries(),
            model.years
        );
        Ok(model)
    }

    /// Renders the prompt and returns the generated text untouched.
    pub async fn explain(&self, request: &ExplainRequest) -> Result<String> {
        let prompt = build_explanation_prompt(request);

        match self.generator.generate(&prompt).await {
            Ok(text) => Ok(text),
            Err(ExplainerError::GenerationFailed(message)) => {
                error!("Gemini API error: {}", message);
                Err(ExplainerError::GenerationFailed(message))
            }
            Err(other) => {
                error!("Gemini API error: {}", other);
                Err(ExplainerError::GenerationFailed(other.to_string()))
            }
        }
    }
}
