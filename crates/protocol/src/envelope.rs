//! Innere Umschlaege fuer Broadcast-Nachrichten
//!
//! Eine Broadcast-Nachricht reist doppelt verpackt:
//!
//! ```text
//! broadcast_message.payload.message
//!   = JSON( CipherEnvelope { iv, content } )        <- sieht der Relay
//! content (entschluesselt)
//!   = JSON( ChatEnvelope::UserMessage { text } )    <- sieht nur die Gruppe
//!   | JSON( ChatEnvelope::GroupKeyUpdate { key } )
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ProtocolResult;

/// Aeusserer Umschlag: Base64-Nonce + Base64-Ciphertext
///
/// Fuer den Relay opak; die Base64-Kodierung passiert ausschliesslich
/// an dieser Transport-Grenze.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CipherEnvelope {
    /// Base64 der 12-Byte-Nonce
    pub iv: String,
    /// Base64 des Ciphertexts inkl. Auth-Tag
    pub content: String,
}

impl CipherEnvelope {
    pub fn to_json(&self) -> ProtocolResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(text: &str) -> ProtocolResult<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

/// Innerer Umschlag: der entschluesselte Inhalt eines Broadcasts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatEnvelope {
    /// Normale Chat-Nachricht
    UserMessage { text: String },

    /// Rotations-Ankuendigung: der neue Gruppenschluessel (Base64),
    /// verschluesselt unter dem alten Schluessel – nur Halter des alten
    /// Schluessels koennen sie lesen
    GroupKeyUpdate { key: String },
}

impl ChatEnvelope {
    pub fn to_json(&self) -> ProtocolResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(text: &str) -> ProtocolResult<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
