use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Required field is empty: {0}")]
    MissingField(&'static str),
    #[error("Unknown unit of measure: {0}")]
    UnknownUnit(String),
    #[error("Not a valid numeric value: {0}")]
    InvalidNumber(String),
    #[error("Failed to create PDF: {0}")]
    PdfError(String),
    #[error("Failed to read items file: {0}")]
    ItemsError(String),
    #[error("Invalid date format: {0}")]
    DateError(String),
    #[error("Failed to load logo: {0}")]
    LogoError(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
