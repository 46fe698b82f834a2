//! HTTP routes.

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use chrono::{Datelike, Local};
use log::{error, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::ExplainerError;
use crate::schema::{Company, ExplainRequest, FinancialModel, ReportType};
use crate::service::{statement_query, FinancialService};
use crate::store::CompanyStore;

const AVAILABLE_YEAR_SPAN: i32 = 5;
const INTERNAL_ERROR_MESSAGE: &str = "요청을 처리하는 중 오류가 발생했습니다.";

pub struct AppState {
    pub service: FinancialService,
    pub store: CompanyStore,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/search_company", get(search_company))
        .route("/financial_data", get(financial_data))
        .route("/explain_financial", post(explain_financial))
        .with_state(Arc::new(state))
}

// ============================================================================
// Request / Response Types
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub service: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReportTypeInfo {
    pub code: String,
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct IndexResponse {
    pub available_years: Vec<i32>,
    pub report_types: Vec<ReportTypeInfo>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExplainResponse {
    pub explanation: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct FinancialDataParams {
    pub corp_code: Option<String>,
    pub bsns_year: Option<String>,
    pub reprt_code: Option<String>,
}

// ============================================================================
// Error Mapping
// ============================================================================

impl IntoResponse for ExplainerError {
    fn into_response(self) -> Response {
        let status = match &self {
            ExplainerError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ExplainerError::SourceUnavailable(_) | ExplainerError::SourceRejected { .. } => {
                StatusCode::BAD_GATEWAY
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let message = if self.is_user_facing() {
            self.to_string()
        } else {
            error!("Internal error: {}", self);
            INTERNAL_ERROR_MESSAGE.to_string()
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// Years offered by the UI (the last five plus the current one) and the report codes.
pub async fn index() -> Json<IndexResponse> {
    let current_year = Local::now().year();
    Json(IndexResponse {
        available_years: (current_year - AVAILABLE_YEAR_SPAN..=current_year).collect(),
        report_types: ReportType::ALL
            .iter()
            .map(|report| ReportTypeInfo {
                code: report.code().to_string(),
                name: report.korean_name().to_string(),
            })
            .collect(),
    })
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        service: env!("CARGO_PKG_NAME").to_string(),
    })
}

pub async fn search_company(
    State(state): State<Arc<AppState>>,
    params: Option<Query<SearchParams>>,
) -> Result<Json<Vec<Company>>, ExplainerError> {
    let params = params.map(|Query(params)| params).unwrap_or_default();
    let companies = state.store.search_by_name(&params.query)?;
    Ok(Json(companies))
}

pub async fn financial_data(
    State(state): State<Arc<AppState>>,
    params: Option<Query<FinancialDataParams>>,
) -> Result<Json<FinancialModel>, ExplainerError> {
    let params = params.map(|Query(params)| params).unwrap_or_default();
    let query = statement_query(params.corp_code, params.bsns_year, params.reprt_code)?;

    let model = state.service.fetch_statements(&query).await.map_err(|e| {
        warn!("Financial data request for {} failed: {}", query.corp_code, e);
        e
    })?;
    Ok(Json(model))
}

pub async fn explain_financial(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ExplainRequest>, JsonRejection>,
) -> Result<Json<ExplainResponse>, ExplainerError> {
    let Json(request) =
        payload.map_err(|rejection| ExplainerError::InvalidRequest(rejection.body_text()))?;

    let explanation = state.service.explain(&request).await?;
    Ok(Json(ExplainResponse { explanation }))
}
