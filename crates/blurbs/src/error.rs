#[derive(thiserror::Error, Debug, serde::Deserialize, serde::Serialize)]
pub enum Error {
    #[error("Could not find {0}.json")]
    CatalogFileMissing(String),

    #[error("No PDF files found in {0}")]
    NoDocuments(String),
}
