//! AEAD-Verschluesselung (AES-256-GCM)
//!
//! Verschluesselt Chat-Payloads und eingewickelte Gruppenschluessel.
//!
//! ## Format
//! ```text
//! nonce:      12 Bytes, pro Aufruf frisch aus OsRng
//! ciphertext: Klartext-Laenge + 16 Bytes Auth-Tag (angehaengt)
//! ```
//!
//! Base64 wird ausschliesslich an der Transport-Grenze angewendet
//! (siehe `EncryptedPayload`); dieses Modul arbeitet auf rohen Bytes.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Key, Nonce as AesNonce,
};
use rand::rngs::OsRng;
use rand::RngCore;

use crate::error::{CryptoError, CryptoResult};
use crate::types::{EncryptedPayload, KEY_LAENGE, NONCE_LAENGE};

/// Verschluesselt einen Klartext mit einem 32-Byte symmetrischen Schluessel
///
/// Wuerfelt pro Aufruf eine frische 12-Byte-Nonce. Nonce-Wiederverwendung
/// unter demselben Schluessel ist damit (probabilistisch) ausgeschlossen.
pub fn encrypt(key_bytes: &[u8], plaintext: &[u8]) -> CryptoResult<EncryptedPayload> {
    let cipher = cipher_aus(key_bytes)?;

    let mut nonce = [0u8; NONCE_LAENGE];
    OsRng.fill_bytes(&mut nonce);

    let ciphertext = cipher
        .encrypt(AesNonce::from_slice(&nonce), plaintext)
        .map_err(|e| CryptoError::Verschluesselung(e.to_string()))?;

    Ok(EncryptedPayload { nonce, ciphertext })
}

/// Entschluesselt einen Ciphertext (inkl. Auth-Tag) mit Nonce
///
/// Schlaegt mit `Entschluesselung` fehl wenn der Auth-Tag nicht passt
/// (falscher Schluessel, manipulierte Nonce oder manipulierter Inhalt).
/// Gibt bei Fehlern nie Teil-Klartext zurueck.
pub fn decrypt(
    key_bytes: &[u8],
    nonce: &[u8; NONCE_LAENGE],
    ciphertext: &[u8],
) -> CryptoResult<Vec<u8>> {
    let cipher = cipher_aus(key_bytes)?;

    cipher
        .decrypt(AesNonce::from_slice(nonce), ciphertext)
        .map_err(|e| CryptoError::Entschluesselung(e.to_string()))
}

/// Entschluesselt einen kompletten `EncryptedPayload`
pub fn decrypt_payload(key_bytes: &[u8], payload: &EncryptedPayload) -> CryptoResult<Vec<u8>> {
    decrypt(key_bytes, &payload.nonce, &payload.ciphertext)
}

fn cipher_aus(key_bytes: &[u8]) -> CryptoResult<Aes256Gcm> {
    if key_bytes.len() != KEY_LAENGE {
        return Err(CryptoError::UngueltigeSchluesselLaenge {
            erwartet: KEY_LAENGE,
            erhalten: key_bytes.len(),
        });
    }
    Ok(Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key_bytes)))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
