//! Verwaltung des aktuellen Gruppenschluessels
//!
//! Pro Session existiert hoechstens ein aktueller Gruppenschluessel.
//! Rotation ersetzt ihn atomar (kein Mischen); vor dem ersten
//! Schluesselaustausch ist der Store leer und Broadcast-Operationen
//! schlagen mit `KeinGruppenSchluessel` fehl statt still nichts zu tun.

use rand::rngs::OsRng;
use rand::RngCore;

use crate::aead;
use crate::error::{CryptoError, CryptoResult};
use crate::types::{EncryptedPayload, GroupKey, SecretBytes, KEY_LAENGE};

/// Besitzt den aktuellen Gruppenschluessel einer Session
#[derive(Debug, Default)]
pub struct GroupKeyStore {
    aktueller: Option<GroupKey>,
}

impl GroupKeyStore {
    /// Erstellt einen leeren Store (vor dem ersten Schluesselaustausch)
    pub fn neu() -> Self {
        Self::default()
    }

    /// Generiert einen frischen 32-Byte-Schluessel und macht ihn aktuell
    ///
    /// Ein eventuell vorhandener Vorgaenger wird ersetzt, nicht gemischt.
    /// Wer den Vorgaenger noch braucht (Rotations-Broadcast), muss ihn
    /// vorher via `take_current` entnehmen.
    pub fn generate(&mut self) -> &GroupKey {
        let mut key_bytes = vec![0u8; KEY_LAENGE];
        OsRng.fill_bytes(&mut key_bytes);
        self.aktueller.insert(GroupKey(SecretBytes::new(key_bytes)))
    }

    /// Installiert einen extern erhaltenen Schluessel als aktuellen
    /// (key_exchange_answer oder group_key_update)
    pub fn set_current(&mut self, key: GroupKey) {
        self.aktueller = Some(key);
    }

    /// Installiert einen Base64-kodierten Schluessel als aktuellen
    pub fn set_current_base64(&mut self, key_b64: &str) -> CryptoResult<()> {
        self.aktueller = Some(GroupKey::from_base64(key_b64)?);
        Ok(())
    }

    /// Gibt den aktuellen Schluessel zurueck (None vor dem Austausch)
    pub fn current(&self) -> Option<&GroupKey> {
        self.aktueller.as_ref()
    }

    /// Entnimmt den aktuellen Schluessel und laesst den Store leer zurueck
    ///
    /// Wird vom Rotations-Initiator genutzt um den alten Schluessel noch
    /// fuer genau einen group_key_update-Broadcast zu halten.
    pub fn take_current(&mut self) -> Option<GroupKey> {
        self.aktueller.take()
    }

    /// Verwirft jeglichen Schluessel (beim Verlassen des Raums)
    pub fn clear(&mut self) {
        self.aktueller = None;
    }

    /// Verschluesselt einen Broadcast-Payload mit dem aktuellen Schluessel
    pub fn encrypt_broadcast(&self, plaintext: &[u8]) -> CryptoResult<EncryptedPayload> {
        let key = self.aktueller.as_ref().ok_or(CryptoError::KeinGruppenSchluessel)?;
        aead::encrypt(key.as_bytes(), plaintext)
    }

    /// Entschluesselt einen Broadcast-Payload mit dem aktuellen Schluessel
    pub fn decrypt_broadcast(&self, payload: &EncryptedPayload) -> CryptoResult<Vec<u8>> {
        let key = self.aktueller.as_ref().ok_or(CryptoError::KeinGruppenSchluessel)?;
        aead::decrypt_payload(key.as_bytes(), payload)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leerer_store_hat_keinen_schluessel() {
        let store = GroupKeyStore::neu();
        assert!(store.current().is_none());
    }

    #[test]
    fn generate_macht_schluessel_aktuell() {
        let mut store = GroupKeyStore::neu();
        store.generate();
        assert_eq!(store.current().unwrap().as_bytes().len(), 32);
    }

    #[test]
    fn generate_ersetzt_vorgaenger() {
        let mut store = GroupKeyStore::neu();
        let alt = store.generate().as_bytes().to_vec();
        let neu = store.generate().as_bytes().to_vec();
        assert_ne!(alt, neu);
        assert_eq!(store.current().unwrap().as_bytes(), neu.as_slice());
    }

    #[test]
    fn set_current_base64_installiert() {
        let mut quelle = GroupKeyStore::neu();
        let b64 = quelle.generate().to_base64();

        let mut ziel = GroupKeyStore::neu();
        ziel.set_current_base64(&b64).unwrap();
        assert_eq!(
            ziel.current().unwrap().as_bytes(),
            quelle.current().unwrap().as_bytes()
        );
    }

    #[test]
    fn take_current_laesst_store_leer() {
        let mut store = GroupKeyStore::neu();
        store.generate();
        let entnommen = store.take_current();
        assert!(entnommen.is_some());
        assert!(store.current().is_none());
    }

    #[test]
    fn clear_verwirft_schluessel() {
        let mut store = GroupKeyStore::neu();
        store.generate();
        store.clear();
        assert!(store.current().is_none());
    }

    #[test]
    fn broadcast_ohne_schluessel_schlaegt_fehl() {
        let store = GroupKeyStore::neu();
        let result = store.encrypt_broadcast(b"test");
        assert!(matches!(result, Err(CryptoError::KeinGruppenSchluessel)));

        let payload = EncryptedPayload {
            nonce: [0u8; 12],
            ciphertext: vec![0u8; 20],
        };
        let result = store.decrypt_broadcast(&payload);
        assert!(matches!(result, Err(CryptoError::KeinGruppenSchluessel)));
    }

    #[test]
    fn broadcast_roundtrip() {
        let mut store = GroupKeyStore::neu();
        store.generate();

        let payload = store.encrypt_broadcast(b"Hallo Gruppe").unwrap();
        let decrypted = store.decrypt_broadcast(&payload).unwrap();
        assert_eq!(decrypted, b"Hallo Gruppe");
    }

    #[test]
    fn rotation_macht_alte_broadcasts_unlesbar() {
        let mut store = GroupKeyStore::neu();
        store.generate();
        let payload = store.encrypt_broadcast(b"vor der Rotation").unwrap();

        store.generate();
        let result = store.decrypt_broadcast(&payload);
        assert!(matches!(result, Err(CryptoError::Entschluesselung(_))));
    }
}
