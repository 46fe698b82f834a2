//! Downloads the OpenDART corp-code corpus and unpacks `CORPCODE.xml`.
//!
//! Usage: `download_corp_codes [output_dir]` (defaults to the current directory).

use dart_financial_explainer::corp_codes::{
    download_corp_code_archive, extract_corp_code_xml, parse_corp_codes, CORP_CODE_XML_NAME,
    CORP_CODE_ZIP_NAME,
};
use dart_financial_explainer::{init_logging, AppConfig, OpenDartClient};
use log::info;
use std::error::Error;
use std::path::PathBuf;

const PREVIEW_COUNT: usize = 5;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv::dotenv().ok();
    init_logging();

    let config = AppConfig::from_env()?;
    config.warn_missing_credentials();
    let output_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));

    let client = OpenDartClient::from_config(&config);
    let archive = download_corp_code_archive(&client).await?;

    let zip_path = output_dir.join(CORP_CODE_ZIP_NAME);
    tokio::fs::write(&zip_path, &archive).await?;
    info!("Saved {}", zip_path.display());

    let xml = extract_corp_code_xml(&archive)?;
    let xml_path = output_dir.join(CORP_CODE_XML_NAME);
    tokio::fs::write(&xml_path, &xml).await?;
    info!("Saved {}", xml_path.display());

    let companies = parse_corp_codes(&xml)?;
    println!("회사 코드 예시 (처음 {}개):", PREVIEW_COUNT);
    for company in companies.iter().take(PREVIEW_COUNT) {
        let stock_code = if company.stock_code.is_empty() {
            "없음"
        } else {
            company.stock_code.as_str()
        };
        println!(
            "회사명: {}, 고유번호: {}, 종목코드: {}",
            company.corp_name, company.corp_code, stock_code
        );
    }
    println!("총 {}개 회사", companies.len());

    Ok(())
}
