/// Errors raised by the core dashboard operations.
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid page size: {0} (allowed: 5, 10, 20, 30, 40, 50)")]
    InvalidPageSize(usize),
    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("CSV output was not valid UTF-8: {0}")]
    CsvUtf8(std::string::FromUtf8Error),
    #[error("failed to read resource file: {0}")]
    FileRead(std::io::Error),
    #[error("failed to deserialize resources: {0}")]
    Deserialization(serde_json::Error),
}

pub type DashboardResult<T> = std::result::Result<T, DashboardError>;
