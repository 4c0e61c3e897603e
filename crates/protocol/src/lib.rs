//! umbra-protocol – Relay-Protokoll-Definitionen
//!
//! Dieses Crate definiert alle Nachrichtentypen die zwischen einer
//! Session und dem Relay-Server ausgetauscht werden, sowie die inneren
//! Umschlaege die verschluesselt durch den Relay reisen.
//!
//! Der Relay sieht nur die aeusseren Shapes; Inhalte von
//! `broadcast_message` und die eingewickelten Schluessel sind fuer ihn
//! opak.

pub mod envelope;
pub mod error;
pub mod wire;

pub use envelope::{ChatEnvelope, CipherEnvelope};
pub use error::{ProtocolError, ProtocolResult};
pub use wire::{
    BroadcastInboundPayload, BroadcastPayload, JoinedRoomPayload, PeerData, PeerMessagePayload,
    RelayInbound, RelayOutbound, RelayPayload, UserPayload,
};
