//! X25519 Diffie-Hellman Schluesselvereinbarung
//!
//! Jede Session besitzt genau ein Schluessel-Paar, frisch generiert beim
//! Raum-Beitritt. Aus dem eigenen privaten und einem Peer-Public-Key wird
//! via ECDH + HKDF-SHA256 ein 32-Byte paarweises Geheimnis abgeleitet,
//! das den Gruppenschluessel fuer genau eine Austausch-Runde transportiert.
//!
//! Der Public Key reist als Base64 der rohen 32 Bytes ueber den Relay.

use hkdf::Hkdf;
use rand::rngs::OsRng;
use sha2::Sha256;
use x25519_dalek::{PublicKey as X25519PublicKey, StaticSecret};

use crate::error::{CryptoError, CryptoResult};
use crate::types::{b64_dekodieren, b64_kodieren, PairwiseSecret, KEY_LAENGE};

/// Info-String fuer die HKDF-Ableitung des paarweisen Geheimnisses
const PAIRWISE_INFO: &[u8] = b"umbra-pairwise-v1";

/// Session-Schluessel-Paar
///
/// Der private Schluessel verlaesst diese Struktur nie; nur die
/// oeffentliche Komponente wird serialisiert. Beim Verlassen des Raums
/// wird das Paar verworfen und beim naechsten Beitritt neu generiert.
pub struct KeyPair {
    secret: StaticSecret,
    public_key: [u8; 32],
}

impl KeyPair {
    /// Generiert ein frisches X25519-Schluessel-Paar
    pub fn neu() -> Self {
        let secret = StaticSecret::random_from_rng(OsRng);
        let public_key = X25519PublicKey::from(&secret);
        Self {
            secret,
            public_key: public_key.to_bytes(),
        }
    }

    /// Oeffentlicher Schluessel als rohe 32 Bytes
    pub fn public_key(&self) -> &[u8; 32] {
        &self.public_key
    }

    /// Oeffentlicher Schluessel in Transport-Kodierung (Base64, kein Umbruch)
    pub fn public_key_base64(&self) -> String {
        b64_kodieren(&self.public_key)
    }

    /// Leitet das paarweise Geheimnis mit einem Peer ab
    ///
    /// Dekodiert den Peer-Public-Key, fuehrt den DH-Austausch durch und
    /// leitet via HKDF-SHA256 einen 32-Byte AES-Schluessel ab. Beide
    /// Seiten erhalten denselben Schluessel (DH-Symmetrie).
    ///
    /// Schlaegt mit `UngueltigerPeerSchluessel` fehl wenn die Kodierung
    /// ungueltig ist oder der Punkt kein Geheimnis beitraegt.
    pub fn derive_pairwise_secret(&self, peer_public_b64: &str) -> CryptoResult<PairwiseSecret> {
        let peer_bytes = b64_dekodieren(peer_public_b64)
            .map_err(|e| CryptoError::UngueltigerPeerSchluessel(e.to_string()))?;

        let peer_array: [u8; 32] = peer_bytes.try_into().map_err(|v: Vec<u8>| {
            CryptoError::UngueltigerPeerSchluessel(format!(
                "Erwartet 32 Bytes, erhalten {}",
                v.len()
            ))
        })?;

        let peer_public = X25519PublicKey::from(peer_array);
        let dh_output = self.secret.diffie_hellman(&peer_public);

        // Punkte kleiner Ordnung liefern ein Null-Geheimnis
        if !dh_output.was_contributory() {
            return Err(CryptoError::UngueltigerPeerSchluessel(
                "Peer-Schluessel traegt kein Geheimnis bei".to_string(),
            ));
        }

        let key = hkdf_derive(dh_output.as_bytes(), &[], PAIRWISE_INFO, KEY_LAENGE)?;
        Ok(PairwiseSecret::new(key))
    }
}

/// HKDF-SHA256 Key Derivation (allgemein verwendbar)
pub fn hkdf_derive(ikm: &[u8], salt: &[u8], info: &[u8], len: usize) -> CryptoResult<Vec<u8>> {
    let hk = Hkdf::<Sha256>::new(Some(salt), ikm);
    let mut okm = vec![0u8; len];
    hk.expand(info, &mut okm)
        .map_err(|e| CryptoError::KeyDerivation(e.to_string()))?;
    Ok(okm)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dh_symmetrie() {
        let a = KeyPair::neu();
        let b = KeyPair::neu();

        let secret_a = a.derive_pairwise_secret(&b.public_key_base64()).unwrap();
        let secret_b = b.derive_pairwise_secret(&a.public_key_base64()).unwrap();

        // Beide Seiten muessen dasselbe Geheimnis ableiten
        assert_eq!(secret_a.as_bytes(), secret_b.as_bytes());
        assert_eq!(secret_a.as_bytes().len(), 32);
    }

    #[test]
    fn verschiedene_peers_verschiedene_geheimnisse() {
        let a = KeyPair::neu();
        let b = KeyPair::neu();
        let c = KeyPair::neu();

        let secret_ab = a.derive_pairwise_secret(&b.public_key_base64()).unwrap();
        let secret_ac = a.derive_pairwise_secret(&c.public_key_base64()).unwrap();

        assert_ne!(secret_ab.as_bytes(), secret_ac.as_bytes());
    }

    #[test]
    fn frische_paare_sind_verschieden() {
        let a = KeyPair::neu();
        let b = KeyPair::neu();
        assert_ne!(a.public_key(), b.public_key());
    }

    #[test]
    fn ungueltiges_base64_schlaegt_fehl() {
        let a = KeyPair::neu();
        let result = a.derive_pairwise_secret("kein base64 !!!");
        assert!(matches!(
            result,
            Err(CryptoError::UngueltigerPeerSchluessel(_))
        ));
    }

    #[test]
    fn falsche_schluessel_laenge_schlaegt_fehl() {
        let a = KeyPair::neu();
        let zu_kurz = b64_kodieren(&[0u8; 16]);
        let result = a.derive_pairwise_secret(&zu_kurz);
        assert!(matches!(
            result,
            Err(CryptoError::UngueltigerPeerSchluessel(_))
        ));
    }

    #[test]
    fn null_punkt_schlaegt_fehl() {
        let a = KeyPair::neu();
        // Der Null-Punkt ist von kleiner Ordnung und traegt nichts bei
        let null_punkt = b64_kodieren(&[0u8; 32]);
        let result = a.derive_pairwise_secret(&null_punkt);
        assert!(matches!(
            result,
            Err(CryptoError::UngueltigerPeerSchluessel(_))
        ));
    }

    #[test]
    fn hkdf_derive_deterministisch() {
        let key1 = hkdf_derive(b"ikm", b"salt", b"info", 32).unwrap();
        let key2 = hkdf_derive(b"ikm", b"salt", b"info", 32).unwrap();
        assert_eq!(key1, key2);
        assert_eq!(key1.len(), 32);
    }

    #[test]
    fn hkdf_verschiedene_infos_geben_verschiedene_keys() {
        let key1 = hkdf_derive(b"ikm", b"salt", b"info-1", 32).unwrap();
        let key2 = hkdf_derive(b"ikm", b"salt", b"info-2", 32).unwrap();
        assert_ne!(key1, key2);
    }
}
