//! The corp-code corpus: OpenDART ships every registered company as a zip
//! holding a single `CORPCODE.xml`. These helpers turn that archive into
//! [`Company`] rows for the reference table.

use crate::disclosure::OpenDartClient;
use crate::error::{ExplainerError, Result};
use crate::schema::Company;
use log::{debug, info};
use serde::Deserialize;
use std::io::{Cursor, Read};

pub const CORP_CODE_ZIP_NAME: &str = "corpCode.zip";
pub const CORP_CODE_XML_NAME: &str = "CORPCODE.xml";

const ZIP_MAGIC: &[u8] = b"PK";
const ERROR_PREVIEW_CHARS: usize = 200;

#[derive(Debug, Deserialize)]
struct CorpCodeDocument {
    #[serde(rename = "list", default)]
    list: Vec<CorpCodeEntry>,
}

#[derive(Debug, Deserialize)]
struct CorpCodeEntry {
    #[serde(default)]
    corp_code: Option<String>,
    #[serde(default)]
    corp_name: Option<String>,
    #[serde(default)]
    stock_code: Option<String>,
}

fn trimmed(value: Option<String>) -> String {
    value.map(|v| v.trim().to_string()).unwrap_or_default()
}

/// Downloads the corpus and returns the zip bytes.
///
/// OpenDART answers errors (bad key, quota) with a small XML body instead of
/// a zip, so anything without the zip signature is reported with a preview.
pub async fn download_corp_code_archive(client: &OpenDartClient) -> Result<Vec<u8>> {
    let bytes = client.download_corp_codes().await?;
    ensure_zip(&bytes)?;
    Ok(bytes)
}

pub fn ensure_zip(bytes: &[u8]) -> Result<()> {
    if bytes.starts_with(ZIP_MAGIC) {
        return Ok(());
    }
    let preview: String = String::from_utf8_lossy(bytes)
        .chars()
        .take(ERROR_PREVIEW_CHARS)
        .collect();
    Err(ExplainerError::CorpCode(format!(
        "downloaded file is not a zip archive: {}",
        preview
    )))
}

/// Returns the text of the first `.xml` entry in the archive.
pub fn extract_corp_code_xml(bytes: &[u8]) -> Result<String> {
    ensure_zip(bytes)?;
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;

    for idx in 0..archive.len() {
        let mut file = archive.by_index(idx)?;
        if !file.name().to_ascii_lowercase().ends_with(".xml") {
            continue;
        }
        debug!("Extracting {} ({} bytes)", file.name(), file.size());
        let mut xml = String::new();
        file.read_to_string(&mut xml)?;
        return Ok(xml);
    }

    Err(ExplainerError::CorpCode(
        "archive does not contain an XML file".to_string(),
    ))
}

/// Parses `CORPCODE.xml`. Entries without a `corp_code` are dropped.
pub fn parse_corp_codes(xml: &str) -> Result<Vec<Company>> {
    let document: CorpCodeDocument = quick_xml::de::from_str(xml)?;
    let total = document.list.len();

    let companies: Vec<Company> = document
        .list
        .into_iter()
        .map(|entry| Company {
            corp_code: trimmed(entry.corp_code),
            corp_name: trimmed(entry.corp_name),
            stock_code: trimmed(entry.stock_code),
        })
        .filter(|company| !company.corp_code.is_empty())
        .collect();

    info!("Parsed {} companies ({} entries)", companies.len(), total);
    Ok(companies)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::spawn_stub;
    use axum::{routing::get, Router};
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    const SAMPLE_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<result>
    <list>
        <corp_code>00126380</corp_code>
        <corp_name>삼성전자</corp_name>
        <corp_eng_name>SAMSUNG ELECTRONICS CO,.LTD</corp_eng_name>
        <stock_code>005930</stock_code>
        <modify_date>20231214</modify_date>
    </list>
    <list>
        <corp_code>00434003</corp_code>
        <corp_name> 다코 </corp_name>
        <corp_eng_name>Daco corporation</corp_eng_name>
        <stock_code> </stock_code>
        <modify_date>20170630</modify_date>
    </list>
    <list>
        <corp_code>00430964</corp_code>
        <corp_name>굿앤엘에스</corp_name>
        <modify_date>20170630</modify_date>
    </list>
</result>"#;

    fn zip_with(name: &str, contents: &str) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer.start_file(name, SimpleFileOptions::default()).unwrap();
        writer.write_all(contents.as_bytes()).unwrap();
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_parse_trims_and_defaults_stock_code() {
        let companies = parse_corp_codes(SAMPLE_XML).unwrap();
        assert_eq!(companies.len(), 3);
        assert_eq!(
            companies[0],
            Company {
                corp_name: "삼성전자".to_string(),
                corp_code: "00126380".to_string(),
                stock_code: "005930".to_string(),
            }
        );
        assert_eq!(companies[1].corp_name, "다코");
        assert_eq!(companies[1].stock_code, "");
        assert_eq!(companies[2].stock_code, "");
    }

    #[test]
    fn test_extract_reads_xml_entry() {
        let archive = zip_with(CORP_CODE_XML_NAME, SAMPLE_XML);
        let xml = extract_corp_code_xml(&archive).unwrap();
        assert_eq!(xml, SAMPLE_XML);
    }

    #[test]
    fn test_archive_without_xml_is_an_error() {
        let archive = zip_with("readme.txt", "nothing here");
        assert!(matches!(
            extract_corp_code_xml(&archive),
            Err(ExplainerError::CorpCode(_))
        ));
    }

    #[test]
    fn test_non_zip_reply_is_reported_with_preview() {
        let body = r#"<?xml version="1.0" encoding="UTF-8"?><result><status>010</status><message>등록되지 않은 키입니다.</message></result>"#;
        match extract_corp_code_xml(body.as_bytes()) {
            Err(ExplainerError::CorpCode(message)) => assert!(message.contains("010")),
            other => panic!("expected CorpCode error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_download_returns_archive_bytes() {
        let archive = zip_with(CORP_CODE_XML_NAME, SAMPLE_XML);
        let served = archive.clone();
        let router = Router::new().route(
            "/api/corpCode.xml",
            get(move || {
                let body = served.clone();
                async move { body }
            }),
        );
        let client = OpenDartClient::new(Some("dart-key".to_string())).with_base_url(spawn_stub(router).await);

        let bytes = download_corp_code_archive(&client).await.unwrap();
        assert_eq!(bytes, archive);
        assert_eq!(parse_corp_codes(&extract_corp_code_xml(&bytes).unwrap()).unwrap().len(), 3);
    }
}
