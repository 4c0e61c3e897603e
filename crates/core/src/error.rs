//! Fehlertypen fuer Umbra
//!
//! Zentraler Fehler-Enum der alle moeglichen Fehlerzustaende abdeckt.
//! Untermodule koennen eigene Fehler definieren und via `#[from]` konvertieren.

use thiserror::Error;

/// Globaler Result-Alias fuer Umbra
pub type Result<T> = std::result::Result<T, UmbraError>;

/// Alle moeglichen Fehler im Umbra-System
#[derive(Debug, Error)]
pub enum UmbraError {
    // --- Verbindung & Netzwerk (von Transport-Implementierungen) ---
    #[error("Verbindung fehlgeschlagen: {0}")]
    Verbindung(String),

    // --- Raum ---
    #[error("Ungueltige Raum-ID: {0}")]
    UngueltigeRaumId(String),

    // --- Protokoll ---
    #[error("Ungueltige Nachricht: {0}")]
    UngueltigeNachricht(String),

    // --- Intern ---
    #[error("Interner Fehler: {0}")]
    Intern(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fehler_anzeige() {
        let e = UmbraError::UngueltigeRaumId("Raum-ID darf nicht leer sein".into());
        assert_eq!(
            e.to_string(),
            "Ungueltige Raum-ID: Raum-ID darf nicht leer sein"
        );

        let e = UmbraError::Verbindung("Relay nicht erreichbar".into());
        assert_eq!(e.to_string(), "Verbindung fehlgeschlagen: Relay nicht erreichbar");
    }
}
