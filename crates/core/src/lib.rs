//! umbra-core – Gemeinsame Typen, Traits und Fehlertypen
//!
//! Dieses Crate stellt die fundamentalen Bausteine bereit, die von allen
//! anderen Umbra-Crates gemeinsam genutzt werden: Raum- und Mitglieds-IDs,
//! Chat-Nachrichten, Session-Ereignisse und die Transport-Schnittstelle
//! zum Relay-Server.

pub mod error;
pub mod event;
pub mod transport;
pub mod types;

// Re-Exporte fuer bequemen Zugriff
pub use error::{Result, UmbraError};
pub use event::SessionEvent;
pub use transport::{RelayConnector, RelayTransport, TransportEvent};
pub use types::{ChatMessage, MemberId, MessageKind, MessageOrigin, RoomId};
