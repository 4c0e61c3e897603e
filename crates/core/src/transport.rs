//! Transport-Schnittstelle zum Relay-Server
//!
//! Definiert die Schnittstelle ueber die eine Session mit dem Relay
//! spricht. Der Verbindungsaufbau selbst (Socket-Connect, Reconnect)
//! liegt ausserhalb dieses Systems – konkrete Implementierungen
//! (WebSocket, In-Memory-Relay fuer Tests) liefern diesen Trait.
//!
//! Eingehende Ereignisse werden als geordneter Strom zugestellt und
//! muessen strikt in Ankunftsreihenfolge von genau einem Konsumenten
//! verarbeitet werden.

use tokio::sync::mpsc;

use crate::error::Result;

/// Sende-Seite einer Relay-Verbindung
///
/// Nachrichten sind JSON-Objekte als Text. Senden ist fire-and-forget:
/// es gibt keine Zustellbestaetigung und keinen Retry.
pub trait RelayTransport: Send {
    /// Sendet eine serialisierte Relay-Nachricht
    fn senden(&self, text: &str) -> Result<()>;

    /// Schliesst die Verbindung sauber
    fn schliessen(&self);
}

/// Stellt Verbindungen zum Relay her
///
/// Der Verbindungsaufbau (Socket-Connect, Reconnect) liegt ausserhalb
/// dieses Systems. Implementierungen liefern die Sende-Seite plus den
/// geordneten Ereignis-Strom; das erste Ereignis ist `Geoeffnet` sobald
/// die Verbindung steht.
pub trait RelayConnector: Send {
    fn verbinden(
        &mut self,
        url: &str,
    ) -> Result<(
        Box<dyn RelayTransport>,
        mpsc::UnboundedReceiver<TransportEvent>,
    )>;
}

/// Ereignisse aus der Empfangs-Seite einer Relay-Verbindung
///
/// Die konkrete Implementierung liefert diese Ereignisse ueber einen
/// Kanal (z.B. tokio::sync::mpsc) in strikter Reihenfolge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// Verbindung steht – jetzt darf create_room/join_room gesendet werden
    Geoeffnet,

    /// Eine Relay-Nachricht ist angekommen (rohes JSON)
    Nachricht(String),

    /// Verbindung wurde geschlossen
    Geschlossen { grund: String },

    /// Verbindungsaufbau oder Transport ist fehlgeschlagen
    Fehlgeschlagen { fehler: String },
}
