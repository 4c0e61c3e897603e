//! Relay-Nachrichten (JSON ueber eine persistente Verbindung)
//!
//! ## Design
//! - Tagged Enums fuer typsichere Nachrichtentypen (`type`-Feld)
//! - Feldnamen auf dem Draht camelCase, intern snake_case
//! - Alle Binaerwerte (Public Keys, Nonces, Ciphertexte, Schluessel)
//!   reisen als Standard-Base64 ohne Zeilenumbruch
//!
//! Ausgehend: `create_room`, `join_room`, `relay_message` (gezielt an
//! ein Mitglied), `broadcast_message` (an alle anderen im Raum).
//! Eingehend: `joined_room`, `new_user`, `user_left`, `peer_message`,
//! `message_broadcast`.

use serde::{Deserialize, Serialize};

use crate::error::ProtocolResult;

// ---------------------------------------------------------------------------
// Ausgehende Nachrichten (Session -> Relay)
// ---------------------------------------------------------------------------

/// Nachricht von der Session an den Relay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RelayOutbound {
    /// Neuen Raum anlegen und beitreten
    CreateRoom {
        #[serde(rename = "roomId")]
        room_id: String,
    },

    /// Bestehendem Raum beitreten
    JoinRoom {
        #[serde(rename = "roomId")]
        room_id: String,
    },

    /// Gezielte Nachricht an genau ein Mitglied (Schluesselaustausch)
    RelayMessage {
        #[serde(rename = "roomId")]
        room_id: String,
        payload: RelayPayload,
    },

    /// Opake Broadcast-Nachricht an alle anderen Mitglieder
    BroadcastMessage {
        #[serde(rename = "roomId")]
        room_id: String,
        payload: BroadcastPayload,
    },
}

impl RelayOutbound {
    pub fn to_json(&self) -> ProtocolResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(text: &str) -> ProtocolResult<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

/// Payload einer gezielten relay_message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelayPayload {
    #[serde(rename = "targetId")]
    pub target_id: String,
    pub data: PeerData,
}

/// Payload einer broadcast_message
///
/// `message` ist der JSON-String eines `CipherEnvelope {iv, content}` –
/// fuer den Relay ein opaker Text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BroadcastPayload {
    pub message: String,
}

// ---------------------------------------------------------------------------
// Schluesselaustausch-Daten (reisen in relay_message / peer_message)
// ---------------------------------------------------------------------------

/// Daten einer gezielten Peer-Nachricht
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PeerData {
    /// Der Neuling bietet seinen Public Key an
    KeyExchangeOffer {
        #[serde(rename = "publicKey")]
        public_key: String,
    },

    /// Antwort: der neue Gruppenschluessel, eingewickelt unter dem
    /// paarweisen Geheimnis
    KeyExchangeAnswer {
        iv: String,
        #[serde(rename = "encryptedKey")]
        encrypted_key: String,
        #[serde(rename = "senderPublicKey")]
        sender_public_key: String,
    },
}

// ---------------------------------------------------------------------------
// Eingehende Nachrichten (Relay -> Session)
// ---------------------------------------------------------------------------

/// Nachricht vom Relay an die Session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RelayInbound {
    /// Beitritt bestaetigt; traegt die eigene ID und alle anderen Mitglieder
    JoinedRoom { payload: JoinedRoomPayload },

    /// Ein neues Mitglied ist beigetreten
    NewUser { payload: UserPayload },

    /// Ein Mitglied hat den Raum verlassen
    UserLeft { payload: UserPayload },

    /// Gezielte Peer-Nachricht (Schluesselaustausch)
    PeerMessage { payload: PeerMessagePayload },

    /// Opake Broadcast-Nachricht eines anderen Mitglieds
    MessageBroadcast { payload: BroadcastInboundPayload },
}

impl RelayInbound {
    pub fn to_json(&self) -> ProtocolResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(text: &str) -> ProtocolResult<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

/// Payload der Beitritts-Bestaetigung
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinedRoomPayload {
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "otherUsers")]
    pub other_users: Vec<String>,
}

/// Payload fuer new_user / user_left
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPayload {
    #[serde(rename = "userId")]
    pub user_id: String,
}

/// Payload einer eingehenden Peer-Nachricht
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeerMessagePayload {
    #[serde(rename = "senderId")]
    pub sender_id: String,
    pub data: PeerData,
}

/// Payload einer eingehenden Broadcast-Nachricht
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BroadcastInboundPayload {
    #[serde(rename = "senderId")]
    pub sender_id: String,
    /// JSON-String eines `CipherEnvelope {iv, content}`
    pub message: String,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
