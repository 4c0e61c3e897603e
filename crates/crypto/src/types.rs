//! Gemeinsame Typen fuer das Kryptografie-Subsystem

use crate::error::{CryptoError, CryptoResult};

/// Laenge aller symmetrischen Schluessel in Bytes (AES-256)
pub const KEY_LAENGE: usize = 32;

/// Laenge der AEAD-Nonce in Bytes (AES-GCM Standard)
pub const NONCE_LAENGE: usize = 12;

/// Sicherer Schluessel-Container (wird beim Drop genullt)
#[derive(Clone)]
pub struct SecretBytes(pub Vec<u8>);

impl Drop for SecretBytes {
    fn drop(&mut self) {
        self.0.iter_mut().for_each(|b| *b = 0);
    }
}

impl std::fmt::Debug for SecretBytes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SecretBytes([REDACTED] {} bytes)", self.0.len())
    }
}

impl SecretBytes {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Paarweises Geheimnis zwischen genau zwei Mitgliedern
///
/// Lebt nur fuer eine einzige Schluesselaustausch-Runde: es wickelt den
/// Gruppenschluessel ein bzw. aus und wird danach verworfen. Nie
/// persistieren, nie fuer einen anderen Peer wiederverwenden.
#[derive(Debug)]
pub struct PairwiseSecret(pub(crate) SecretBytes);

impl PairwiseSecret {
    pub(crate) fn new(bytes: Vec<u8>) -> Self {
        Self(SecretBytes::new(bytes))
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

/// Symmetrischer Gruppenschluessel fuer Broadcast-Nachrichten
///
/// Genau ein Schluessel ist pro Session "aktuell"; Rotation ersetzt ihn
/// atomar. Der Vorgaenger lebt nur beim Rotations-Initiator weiter, und
/// nur lange genug um ein einziges group_key_update zu verschluesseln.
#[derive(Debug, Clone)]
pub struct GroupKey(pub(crate) SecretBytes);

impl GroupKey {
    /// Erstellt einen Gruppenschluessel aus rohen Bytes (laengengeprueft)
    pub fn from_bytes(bytes: Vec<u8>) -> CryptoResult<Self> {
        if bytes.len() != KEY_LAENGE {
            return Err(CryptoError::UngueltigeSchluesselLaenge {
                erwartet: KEY_LAENGE,
                erhalten: bytes.len(),
            });
        }
        Ok(Self(SecretBytes::new(bytes)))
    }

    /// Erstellt einen Gruppenschluessel aus Base64
    pub fn from_base64(s: &str) -> CryptoResult<Self> {
        Self::from_bytes(b64_dekodieren(s)?)
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Base64-Form fuer den Transport im key_exchange_answer bzw.
    /// group_key_update (nur dort – der Schluessel verlaesst die Session
    /// sonst nie)
    pub fn to_base64(&self) -> String {
        b64_kodieren(self.0.as_bytes())
    }
}

/// Verschluesselter Payload (Nonce + Ciphertext inkl. Auth-Tag)
#[derive(Debug, Clone)]
pub struct EncryptedPayload {
    /// 12 Bytes Nonce, pro Aufruf frisch gewuerfelt
    pub nonce: [u8; NONCE_LAENGE],
    /// Verschluesselter Inhalt inkl. 16 Bytes Auth-Tag (angehaengt)
    pub ciphertext: Vec<u8>,
}

impl EncryptedPayload {
    /// Base64 der Nonce ("iv" auf dem Draht)
    pub fn iv_base64(&self) -> String {
        b64_kodieren(&self.nonce)
    }

    /// Base64 des Ciphertexts ("content" bzw. "encryptedKey" auf dem Draht)
    pub fn content_base64(&self) -> String {
        b64_kodieren(&self.ciphertext)
    }

    /// Dekodiert einen Payload aus den beiden Base64-Feldern
    pub fn from_base64(iv: &str, content: &str) -> CryptoResult<Self> {
        let nonce_bytes = b64_dekodieren(iv)?;
        let nonce: [u8; NONCE_LAENGE] =
            nonce_bytes
                .try_into()
                .map_err(|v: Vec<u8>| CryptoError::UngueltigeNonce {
                    erwartet: NONCE_LAENGE,
                    erhalten: v.len(),
                })?;
        Ok(Self {
            nonce,
            ciphertext: b64_dekodieren(content)?,
        })
    }
}

/// Base64-Kodierung fuer den Transport (Standard-Alphabet, kein Umbruch)
pub fn b64_kodieren(bytes: &[u8]) -> String {
    base64::Engine::encode(&base64::engine::general_purpose::STANDARD, bytes)
}

/// Base64-Dekodierung fuer den Transport
pub fn b64_dekodieren(s: &str) -> CryptoResult<Vec<u8>> {
    Ok(base64::Engine::decode(
        &base64::engine::general_purpose::STANDARD,
        s,
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secret_bytes_debug_redigiert() {
        let secret = SecretBytes::new(vec![1, 2, 3]);
        let debug = format!("{:?}", secret);
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains('1'));
    }

    #[test]
    fn group_key_laenge_geprueft() {
        assert!(GroupKey::from_bytes(vec![0u8; 32]).is_ok());
        assert!(matches!(
            GroupKey::from_bytes(vec![0u8; 16]),
            Err(CryptoError::UngueltigeSchluesselLaenge {
                erwartet: 32,
                erhalten: 16
            })
        ));
    }

    #[test]
    fn group_key_base64_roundtrip() {
        let key = GroupKey::from_bytes((0u8..32).collect()).unwrap();
        let b64 = key.to_base64();
        let restored = GroupKey::from_base64(&b64).unwrap();
        assert_eq!(restored.as_bytes(), key.as_bytes());
    }

    #[test]
    fn payload_base64_roundtrip() {
        let payload = EncryptedPayload {
            nonce: [7u8; 12],
            ciphertext: vec![1, 2, 3, 4],
        };
        let restored =
            EncryptedPayload::from_base64(&payload.iv_base64(), &payload.content_base64()).unwrap();
        assert_eq!(restored.nonce, payload.nonce);
        assert_eq!(restored.ciphertext, payload.ciphertext);
    }

    #[test]
    fn falsche_nonce_laenge_schlaegt_fehl() {
        let result = EncryptedPayload::from_base64(&b64_kodieren(&[0u8; 8]), "");
        assert!(matches!(
            result,
            Err(CryptoError::UngueltigeNonce {
                erwartet: 12,
                erhalten: 8
            })
        ));
    }

    #[test]
    fn ungueltiges_base64_schlaegt_fehl() {
        assert!(b64_dekodieren("nicht base64 !!!").is_err());
    }
}
