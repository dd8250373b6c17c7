use thiserror::Error;

/// Anything that can go wrong while talking to the menu backend.
///
/// These never leave [`crate::data_backend::MealsRepository`]: every public
/// query logs the error and degrades to an empty result.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Anfrage fehlgeschlagen: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Backend antwortete mit Status {0}")]
    Status(u16),
    #[error("Antwort konnte nicht gelesen werden: {0}")]
    Decode(#[from] serde_json::Error),
}
