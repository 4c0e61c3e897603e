//! umbra-session – Session-Protokoll fuer Umbra-Chat-Raeume
//!
//! Dieses Crate implementiert die Zustandsmaschine die eine Chat-Session
//! durch ihren Lebenszyklus treibt: Raum erstellen/beitreten, den
//! Schluesselaustausch mit bestehenden Mitgliedern, die Rotation des
//! Gruppenschluessels bei Beitritten und das Ver-/Entschluesseln der
//! Chat-Broadcasts.
//!
//! ## Aufbau
//! - `session` - Die Zustandsmaschine (`Session`), rein ereignisgetrieben
//! - `runner` - Serialisiert Kommandos und Transport-Ereignisse durch
//!   genau einen Konsumenten (tokio-Task)
//! - `config` - TOML-Konfiguration mit Standardwerten
//! - `logging` - tracing-subscriber-Initialisierung
//! - `error` - Fehlertypen
//!
//! ## Sicherheitsmodell
//! Der Relay-Server ist nicht vertrauenswuerdig: er routet nur opake
//! Nachrichten und sieht weder Klartext noch Schluesselmaterial. Beim
//! Verlassen des Raums wird saemtliches Schluesselmaterial verworfen;
//! ein erneuter Beitritt startet kryptografisch frisch.

pub mod config;
pub mod error;
pub mod logging;
pub mod runner;
pub mod session;

#[cfg(test)]
mod tests;

// Bequeme Re-Exporte
pub use config::SessionConfig;
pub use error::{SessionError, SessionResult};
pub use runner::{SessionCommand, SessionRunner};
pub use session::{Session, SessionStatus};
pub use umbra_core::RelayConnector;
