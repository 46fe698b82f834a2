use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExplainerError {
    #[error("데이터를 가져오는데 실패했습니다. ({0})")]
    SourceUnavailable(String),

    #[error("API Error: {message}")]
    SourceRejected { status: String, message: String },

    #[error("Skipped record: {0}")]
    RecordSkipped(String),

    #[error("Gemini API 호출 중 오류가 발생했습니다. 상세: {0}")]
    GenerationFailed(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Corp code corpus error: {0}")]
    CorpCode(String),

    #[error("Company store error: {0}")]
    Store(String),

    #[error("Database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),

    #[error("HTTP error: {0}")]
    HttpError(reqwest::Error),

    #[error("Zip archive error: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("XML error: {0}")]
    XmlError(#[from] quick_xml::DeError),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Request URLs carry the API key as a query parameter, so they are dropped.
impl From<reqwest::Error> for ExplainerError {
    fn from(e: reqwest::Error) -> Self {
        ExplainerError::HttpError(e.without_url())
    }
}

impl ExplainerError {
    /// Whether the message is safe to hand back to an API caller verbatim.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            ExplainerError::SourceUnavailable(_)
                | ExplainerError::SourceRejected { .. }
                | ExplainerError::GenerationFailed(_)
                | ExplainerError::InvalidRequest(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, ExplainerError>;
