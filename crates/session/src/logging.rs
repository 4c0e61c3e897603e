//! Logging-Initialisierung
//!
//! Wird vom einbettenden Programm einmal beim Start aufgerufen. Die
//! `RUST_LOG`-Umgebungsvariable hat Vorrang vor dem konfigurierten
//! Level.

use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LoggingEinstellungen;

/// Initialisiert tracing-subscriber mit dem konfigurierten Level und Format
///
/// Darf nur einmal pro Prozess aufgerufen werden; ein zweiter Aufruf
/// schlaegt im Subscriber fehl und wird ignoriert.
pub fn initialisieren(einstellungen: &LoggingEinstellungen) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(einstellungen.level.clone()));

    let ergebnis = match einstellungen.format.as_str() {
        "json" => fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .try_init(),
        _ => fmt().with_env_filter(filter).with_target(true).try_init(),
    };

    if ergebnis.is_err() {
        tracing::debug!("Logging war bereits initialisiert");
    }
}
