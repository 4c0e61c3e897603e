//! Fehlertypen fuer das Session-Protokoll

use thiserror::Error;
use umbra_core::UmbraError;
use umbra_crypto::CryptoError;
use umbra_protocol::ProtocolError;

/// Fehler im Session-Protokoll
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Ungueltige Raum-ID: {0}")]
    UngueltigeRaumId(String),

    #[error("Kein Transport verbunden")]
    NichtVerbunden,

    #[error("Kommando im Zustand {aktuell} nicht erlaubt")]
    FalscherZustand { aktuell: &'static str },

    #[error("Krypto-Fehler: {0}")]
    Krypto(#[from] CryptoError),

    #[error("Protokoll-Fehler: {0}")]
    Protokoll(#[from] ProtocolError),

    #[error(transparent)]
    Kern(#[from] UmbraError),
}

pub type SessionResult<T> = Result<T, SessionError>;
