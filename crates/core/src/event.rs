//! Session-Ereignisse fuer die Praesentationsschicht
//!
//! Die Praesentationsschicht (Screens, Animationen) liegt ausserhalb
//! dieses Systems. Sie konsumiert ausschliesslich diese Ereignisse –
//! Schluesselmaterial oder Ciphertext tauchen hier nie auf.

use crate::types::{ChatMessage, MemberId, RoomId};
use serde::{Deserialize, Serialize};

/// Alle Ereignisse die eine Session an die Praesentationsschicht meldet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SessionEvent {
    /// Transport wurde geoeffnet
    Verbunden,

    /// Der Raum wurde erfolgreich betreten
    RaumBetreten {
        raum: RoomId,
        mitglied: MemberId,
    },

    /// Die Session wurde beendet und aller Zustand verworfen
    RaumVerlassen,

    /// Eine neue Nachricht ist im Verlauf angekommen
    /// (lokal gesendet, entfernt entschluesselt oder System)
    Nachricht(ChatMessage),

    /// Die lokal beobachtete Mitgliederzahl hat sich geaendert
    MitgliederZahl { anzahl: u32 },

    /// Transport wurde geschlossen (Session bleibt im aktuellen Screen)
    Getrennt { grund: String },

    /// Benutzer-sichtbarer Fehler (z.B. leere Raum-ID, fehlender
    /// Gruppenschluessel beim Senden)
    Fehler { text: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_ist_serde_kompatibel() {
        let event = SessionEvent::RaumBetreten {
            raum: RoomId::new("4711"),
            mitglied: MemberId::new("m-1"),
        };
        let json = serde_json::to_string(&event).unwrap();
        let _: SessionEvent = serde_json::from_str(&json).unwrap();
    }

    #[test]
    fn fehler_event_traegt_text() {
        let event = SessionEvent::Fehler {
            text: "Raum-ID darf nicht leer sein".into(),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("Raum-ID"));
    }
}
