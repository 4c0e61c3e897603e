//! Gemeinsame Identifikations- und Nachrichtentypen fuer Umbra
//!
//! IDs verwenden das Newtype-Pattern um Verwechslungen zwischen
//! verschiedenen ID-Arten zur Compilezeit auszuschliessen. Anders als
//! bei persistenten Systemen sind alle IDs hier fluechtig: die
//! Mitglieds-ID wird vom Relay pro Verbindung vergeben, die Raum-ID
//! ist ein Wegwerf-Wert.

use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Vom Relay vergebene Mitglieds-ID
///
/// Opakes String-Token, eindeutig pro verbundener Session. Dient nur
/// als Routing-Adresse und Anzeige-Label, wird nie persistiert.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MemberId(pub String);

impl MemberId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Gekuerzte Form fuer Anzeige-Zwecke (erste 6 Zeichen)
    ///
    /// Die ID kommt vom Relay und kann beliebiges UTF-8 enthalten;
    /// gekuerzt wird deshalb an Zeichen-, nie an Byte-Grenzen.
    pub fn kurz(&self) -> &str {
        match self.0.char_indices().nth(6) {
            Some((ende, _)) => &self.0[..ende],
            None => &self.0,
        }
    }
}

impl std::fmt::Display for MemberId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Numerische Raum-ID als String
///
/// Wird lokal generiert und nicht global auf Eindeutigkeit geprueft –
/// Kollisionen sind fuer das Wegwerf-Raum-Design akzeptabel. Die ID ist
/// kein Geheimnis, daher genuegt ein nicht-kryptografischer Zufall.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoomId(pub String);

impl RoomId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generiert eine zufaellige Raum-ID im angegebenen Bereich
    pub fn generieren(min: u32, max: u32) -> Self {
        let id = rand::thread_rng().gen_range(min..=max);
        Self(id.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn ist_leer(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl std::fmt::Display for RoomId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Herkunft einer Chat-Nachricht
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageOrigin {
    /// Lokal verfasst und gesendet
    Lokal,
    /// Von einem anderen Mitglied empfangen und entschluesselt
    Entfernt,
}

/// Art einer Chat-Nachricht
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageKind {
    /// Normale Benutzer-Nachricht
    Benutzer,
    /// Vom Protokoll erzeugte Status-Nachricht
    System,
}

/// Eine Chat-Nachricht im lokalen Verlauf
///
/// Wird beim Senden oder nach erfolgreicher Entschluesselung erzeugt
/// und danach nie mehr veraendert. Der gesamte Verlauf wird beim
/// Verlassen des Raums verworfen.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Lokal generierte, pro Session eindeutige ID
    pub id: Uuid,
    /// Absender (Mitglieds-ID oder "System")
    pub sender_id: MemberId,
    /// Klartext-Inhalt
    pub text: String,
    /// Herkunft (lokal gesendet oder entfernt empfangen)
    pub origin: MessageOrigin,
    /// Art (Benutzer- oder System-Nachricht)
    pub kind: MessageKind,
}

impl ChatMessage {
    /// Erstellt eine lokal gesendete Benutzer-Nachricht
    pub fn lokal(sender_id: MemberId, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            sender_id,
            text: text.into(),
            origin: MessageOrigin::Lokal,
            kind: MessageKind::Benutzer,
        }
    }

    /// Erstellt eine empfangene Benutzer-Nachricht
    pub fn entfernt(sender_id: MemberId, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            sender_id,
            text: text.into(),
            origin: MessageOrigin::Entfernt,
            kind: MessageKind::Benutzer,
        }
    }

    /// Erstellt eine System-Nachricht
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            sender_id: MemberId::new("System"),
            text: text.into(),
            origin: MessageOrigin::Entfernt,
            kind: MessageKind::System,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn member_id_kurzform() {
        let id = MemberId::new("abcdef123456");
        assert_eq!(id.kurz(), "abcdef");
    }

    #[test]
    fn member_id_kurzform_bei_kurzer_id() {
        let id = MemberId::new("abc");
        assert_eq!(id.kurz(), "abc");
    }

    #[test]
    fn member_id_kurzform_an_zeichen_grenze() {
        // Mehrbyte-Zeichen um die Schnittstelle herum duerfen nicht
        // zu einem Panic an einer Byte-Grenze fuehren
        let id = MemberId::new("aaaaaü123");
        assert_eq!(id.kurz(), "aaaaaü");

        let id = MemberId::new("ääääää-rest");
        assert_eq!(id.kurz(), "ääääää");

        let id = MemberId::new("ü");
        assert_eq!(id.kurz(), "ü");
    }

    #[test]
    fn raum_id_im_bereich() {
        for _ in 0..100 {
            let id = RoomId::generieren(1000, 9999);
            let wert: u32 = id.as_str().parse().expect("Raum-ID muss numerisch sein");
            assert!((1000..=9999).contains(&wert));
        }
    }

    #[test]
    fn leere_raum_id_erkannt() {
        assert!(RoomId::new("").ist_leer());
        assert!(RoomId::new("   ").ist_leer());
        assert!(!RoomId::new("4711").ist_leer());
    }

    #[test]
    fn nachrichten_ids_eindeutig() {
        let a = ChatMessage::system("a");
        let b = ChatMessage::system("b");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn nachricht_ist_serde_kompatibel() {
        let msg = ChatMessage::lokal(MemberId::new("m-1"), "Hallo");
        let json = serde_json::to_string(&msg).unwrap();
        let decoded: ChatMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded.text, "Hallo");
        assert_eq!(decoded.origin, MessageOrigin::Lokal);
    }
}
