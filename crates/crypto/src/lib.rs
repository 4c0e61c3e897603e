//! # umbra-crypto
//!
//! Kryptografisches Fundament fuer Umbra-Chat-Sessions.
//!
//! ## Module
//! - `key_agreement` - X25519 Diffie-Hellman fuer das paarweise Geheimnis
//! - `aead` - AES-256-GCM Verschluesselung/Entschluesselung
//! - `group_key` - Verwaltung des aktuellen Gruppenschluessels
//! - `types` - Gemeinsame Typen (SecretBytes, GroupKey, EncryptedPayload)
//! - `error` - Fehlertypen
//!
//! ## Ablauf
//! 1. Jede Session generiert beim Raum-Beitritt ein frisches Schluessel-Paar
//! 2. Der Neuling sendet sein Public Key als key_exchange_offer
//! 3. Ein bestehendes Mitglied leitet das paarweise Geheimnis ab (ECDH + HKDF),
//!    rotiert den Gruppenschluessel und antwortet mit dem eingewickelten Schluessel
//! 4. Chat-Nachrichten werden mit dem Gruppenschluessel (AES-256-GCM) verschluesselt

pub mod aead;
pub mod error;
pub mod group_key;
pub mod key_agreement;
pub mod types;

// Bequeme Re-Exports
pub use aead::{decrypt, encrypt};
pub use error::{CryptoError, CryptoResult};
pub use group_key::GroupKeyStore;
pub use key_agreement::{hkdf_derive, KeyPair};
pub use types::{EncryptedPayload, GroupKey, PairwiseSecret, SecretBytes};
