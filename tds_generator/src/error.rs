use thiserror::Error;

/// Data source generator error
///
/// Enum which manages errors in the tdsgenerator crate
#[derive(Debug, Error)]
pub enum TdsGeneratorError {
    /// A required setting is missing or inconsistent
    #[error("configuration error: {0}")]
    Configuration(String),
    /// A file named by the caller does not exist
    #[error("missing file: {0}")]
    MissingFile(String),
    /// Error generating the output XML structure
    #[error("error generating the output XML structure: {0}")]
    Xml(String),
    /// Error reading a spreadsheet data file
    #[error("spreadsheet error: {0}")]
    Spreadsheet(String),
    /// Error reported by a columnar engine implementation
    #[error("columnar engine error: {0}")]
    Columnar(String),
    /// Error reading or writing a file
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// Error parsing a manifest or repository JSON file
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    /// Error reading a CSV data file
    #[error(transparent)]
    Csv(#[from] csv::Error),
    /// Error writing the packaged archive
    #[error(transparent)]
    Zip(#[from] zip::result::ZipError),
}

impl From<xml_builder::XMLError> for TdsGeneratorError {
    fn from(error: xml_builder::XMLError) -> Self {
        TdsGeneratorError::Xml(error.to_string())
    }
}
