//! OpenDART client.
//!
//! Only two endpoints are used: `fnlttSinglAcnt.json` for the key accounts
//! of one company/year/report and `corpCode.xml` for the zipped corpus of
//! company identifiers.

use crate::config::AppConfig;
use crate::error::{ExplainerError, Result};
use crate::schema::{DisclosureItem, DisclosureResponse, StatementQuery};
use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::Client;

pub const DART_BASE_URL: &str = "https://opendart.fss.or.kr";
pub const DART_SUCCESS_STATUS: &str = "000";
const UNKNOWN_ERROR_MESSAGE: &str = "알 수 없는 오류가 발생했습니다.";

/// Where raw statement records come from.
#[async_trait]
pub trait DisclosureSource: Send + Sync {
    async fn fetch_single_accounts(&self, query: &StatementQuery) -> Result<Vec<DisclosureItem>>;
}

#[derive(Clone)]
pub struct OpenDartClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl OpenDartClient {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: DART_BASE_URL.to_string(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.dart_api_key.clone()).with_base_url(config.dart_base_url.clone())
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.as_deref().unwrap_or_default()
    }

    /// Downloads the zipped corp-code corpus as raw bytes.
    pub async fn download_corp_codes(&self) -> Result<Vec<u8>> {
        let url = format!("{}/api/corpCode.xml", self.base_url);
        info!("Downloading corp code archive from {}", url);

        let res = self
            .client
            .get(&url)
            .query(&[("crtfc_key", self.api_key())])
            .header(reqwest::header::ACCEPT, "application/zip")
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            return Err(ExplainerError::CorpCode(format!(
                "corp code download failed (HTTP {})",
                status
            )));
        }

        let bytes = res.bytes().await?;
        debug!("Downloaded {} bytes of corp code archive", bytes.len());
        Ok(bytes.to_vec())
    }
}

/// Validates the envelope and hands back the item list.
pub fn unwrap_disclosure_response(response: DisclosureResponse) -> Result<Vec<DisclosureItem>> {
    if response.status != DART_SUCCESS_STATUS {
        let message = response
            .message
            .filter(|message| !message.is_empty())
            .unwrap_or_else(|| UNKNOWN_ERROR_MESSAGE.to_string());
        warn!("OpenDART rejected request: [{}] {}", response.status, message);
        return Err(ExplainerError::SourceRejected {
            status: response.status,
            message,
        });
    }

    Ok(response.list.unwrap_or_default())
}

#[async_trait]
impl DisclosureSource for OpenDartClient {
    async fn fetch_single_accounts(&self, query: &StatementQuery) -> Result<Vec<DisclosureItem>> {
        let url = format!("{}/api/fnlttSinglAcnt.json", self.base_url);
        info!(
            "Requesting financial data: corp_code={} bsns_year={} reprt_code={}",
            query.corp_code, query.bsns_year, query.reprt_code
        );

        let res = self
            .client
            .get(&url)
            .query(&[
                ("crtfc_key", self.api_key()),
                ("corp_code", query.corp_code.as_str()),
                ("bsns_year", query.bsns_year.as_str()),
                ("reprt_code", query.reprt_code.as_str()),
            ])
            .send()
            .await
            .map_err(|e| ExplainerError::SourceUnavailable(e.without_url().to_string()))?;

        let status = res.status();
        info!("OpenDART response status: {}", status);
        if !status.is_success() {
            return Err(ExplainerError::SourceUnavailable(format!("HTTP {}", status)));
        }

        let body: DisclosureResponse = res
            .json()
            .await
            .map_err(|e| {
                ExplainerError::SourceUnavailable(format!("invalid payload: {}", e.without_url()))
            })?;

        let items = unwrap_disclosure_response(body)?;
        debug!("OpenDART returned {} records", items.len());
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::spawn_stub;
    use axum::{extract::Query, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
    use serde_json::json;
    use std::collections::HashMap;

    fn query() -> StatementQuery {
        StatementQuery {
            corp_code: "00126380".to_string(),
            bsns_year: "2023".to_string(),
            reprt_code: "11011".to_string(),
        }
    }

    async fn single_accounts(Query(params): Query<HashMap<String, String>>) -> impl IntoResponse {
        if params.get("crtfc_key").map(String::as_str) != Some("dart-key") {
            return Json(json!({ "status": "010", "message": "등록되지 않은 키입니다." }));
        }
        Json(json!({
            "status": "000",
            "message": "정상",
            "list": [{
                "rcept_no": "20240312000736",
                "bsns_year": params["bsns_year"],
                "corp_code": params["corp_code"],
                "sj_div": "BS",
                "account_nm": "유동자산",
                "thstrm_dt": "2023.12.31 현재",
                "thstrm_amount": "195,936,557,000,000",
                "frmtrm_amount": "218,470,581,000,000",
                "ord": "1",
                "currency": "KRW"
            }]
        }))
    }

    #[tokio::test]
    async fn test_fetch_passes_parameters_and_decodes_list() {
        let router = Router::new().route("/api/fnlttSinglAcnt.json", get(single_accounts));
        let base = spawn_stub(router).await;
        let client = OpenDartClient::new(Some("dart-key".to_string())).with_base_url(base);

        let items = client.fetch_single_accounts(&query()).await.unwrap();
        assert_eq!(items.len(), 1);
        match &items[0] {
            DisclosureItem::Record(record) => {
                assert_eq!(record.account_nm.as_deref(), Some("유동자산"));
                assert_eq!(record.thstrm_amount.as_deref(), Some("195,936,557,000,000"));
                assert!(record.bfefrmtrm_amount.is_none());
            }
            other => panic!("expected record, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_payload_status_is_rejection() {
        let router = Router::new().route("/api/fnlttSinglAcnt.json", get(single_accounts));
        let base = spawn_stub(router).await;
        let client = OpenDartClient::new(None).with_base_url(base);

        match client.fetch_single_accounts(&query()).await {
            Err(ExplainerError::SourceRejected { status, message }) => {
                assert_eq!(status, "010");
                assert_eq!(message, "등록되지 않은 키입니다.");
            }
            other => panic!("expected SourceRejected, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_http_failure_is_unavailable() {
        let router = Router::new().fallback(|| async { StatusCode::SERVICE_UNAVAILABLE });
        let base = spawn_stub(router).await;
        let client = OpenDartClient::new(Some("dart-key".to_string())).with_base_url(base);

        match client.fetch_single_accounts(&query()).await {
            Err(ExplainerError::SourceUnavailable(message)) => assert!(message.contains("503")),
            other => panic!("expected SourceUnavailable, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_error_does_not_expose_key() {
        let client =
            OpenDartClient::new(Some("dart-secret-key".to_string())).with_base_url("http://127.0.0.1:1");

        match client.fetch_single_accounts(&query()).await {
            Err(e @ ExplainerError::SourceUnavailable(_)) => {
                let message = e.to_string();
                assert!(!message.contains("dart-secret-key"));
                assert!(!message.contains("crtfc_key"));
            }
            other => panic!("expected SourceUnavailable, got {:?}", other),
        }

        match client.download_corp_codes().await {
            Err(e) => {
                let message = e.to_string();
                assert!(!message.contains("dart-secret-key"));
                assert!(!message.contains("crtfc_key"));
            }
            Ok(_) => panic!("expected download to fail"),
        }
    }

    #[test]
    fn test_rejection_without_message_uses_fallback_text() {
        let response: DisclosureResponse =
            serde_json::from_value(json!({ "status": "013" })).unwrap();
        match unwrap_disclosure_response(response) {
            Err(e @ ExplainerError::SourceRejected { .. }) => {
                assert_eq!(e.to_string(), "API Error: 알 수 없는 오류가 발생했습니다.");
            }
            other => panic!("expected SourceRejected, got {:?}", other),
        }
    }

    #[test]
    fn test_success_without_list_is_empty() {
        let response: DisclosureResponse =
            serde_json::from_value(json!({ "status": "000", "message": "정상" })).unwrap();
        assert!(unwrap_disclosure_response(response).unwrap().is_empty());
    }
}
