//! # umbra-testkit
//!
//! Test-Hilfen fuer Umbra: ein In-Memory-Relay das die Routing-Semantik
//! des echten Relay-Servers nachbildet, ohne Netzwerk.
//!
//! Das Relay ist genauso "blind" wie das echte: es routet Nachrichten
//! nach Raum- und Mitglieds-ID und schaut nie in verschluesselte
//! Inhalte.
//!
//! ## Beispiel
//!
//! ```
//! use umbra_core::RelayTransport;
//! use umbra_protocol::RelayOutbound;
//! use umbra_testkit::MemoryRelay;
//!
//! let relay = MemoryRelay::neu();
//! let (transport, eingehend) = relay.verbinden();
//!
//! let beitritt = RelayOutbound::CreateRoom { room_id: "4711".into() };
//! transport.senden(&beitritt.to_json().unwrap()).unwrap();
//! // `eingehend` liefert Geoeffnet und danach die joined_room-Bestaetigung
//! ```

pub mod relay;

pub use relay::{MemoryConnector, MemoryRelay};
