//! Fehlertypen fuer das Relay-Protokoll

use thiserror::Error;

/// Fehler beim Kodieren/Dekodieren von Relay-Nachrichten
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("JSON-Fehler: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Ungueltige Nachricht: {0}")]
    UngueltigeNachricht(String),
}

pub type ProtocolResult<T> = Result<T, ProtocolError>;
