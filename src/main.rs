use dart_financial_explainer::{
    build_router, init_logging, AppConfig, AppState, CompanyStore, FinancialService,
    GeminiClient, OpenDartClient,
};
use log::info;
use std::error::Error;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv::dotenv().ok();
    init_logging();

    let config = AppConfig::from_env()?;
    info!(
        "OPEN_DART_API_KEY: {}",
        if config.dart_api_key.is_some() { "set" } else { "not set" }
    );
    config.warn_missing_credentials();

    let store = CompanyStore::open(&config.database_path)?;
    info!(
        "Company store {} holds {} companies",
        config.database_path.display(),
        store.count()?
    );

    let service = FinancialService::new(
        Arc::new(OpenDartClient::from_config(&config)),
        Arc::new(GeminiClient::from_config(&config)),
    );
    let app = build_router(AppState { service, store });

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
