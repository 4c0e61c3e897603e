//! Session-Konfiguration
//!
//! Wird beim Start aus einer TOML-Datei geladen. Alle Felder haben
//! sinnvolle Standardwerte, sodass eine Session ohne Konfigurationsdatei
//! lauffaehig ist.

use serde::{Deserialize, Serialize};

/// Vollstaendige Session-Konfiguration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SessionConfig {
    /// Relay-Einstellungen
    pub relay: RelayEinstellungen,
    /// Raum-Einstellungen
    pub raum: RaumEinstellungen,
    /// Logging-Einstellungen
    pub logging: LoggingEinstellungen,
}

/// Einstellungen fuer die Relay-Verbindung
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayEinstellungen {
    /// URL des Relay-Servers
    pub url: String,
}

impl Default for RelayEinstellungen {
    fn default() -> Self {
        Self {
            url: "ws://127.0.0.1:8080".into(),
        }
    }
}

/// Einstellungen fuer die Raum-ID-Generierung
///
/// Die Raum-ID ist kein Geheimnis; der Bereich bestimmt nur wie leicht
/// sie sich muendlich weitergeben laesst.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RaumEinstellungen {
    /// Untere Grenze fuer generierte Raum-IDs (inklusiv)
    pub id_min: u32,
    /// Obere Grenze fuer generierte Raum-IDs (inklusiv)
    pub id_max: u32,
}

impl Default for RaumEinstellungen {
    fn default() -> Self {
        Self {
            id_min: 1000,
            id_max: 9999,
        }
    }
}

/// Logging-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingEinstellungen {
    /// Log-Level (trace, debug, info, warn, error)
    pub level: String,
    /// Format: "text" oder "json"
    pub format: String,
}

impl Default for LoggingEinstellungen {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "text".into(),
        }
    }
}

impl SessionConfig {
    /// Laedt die Konfiguration aus einer TOML-Datei
    ///
    /// Fehlende Datei ist kein Fehler – dann gelten die Standardwerte.
    pub fn laden(pfad: &str) -> anyhow::Result<Self> {
        match std::fs::read_to_string(pfad) {
            Ok(inhalt) => {
                let config: Self = toml::from_str(&inhalt)
                    .map_err(|e| anyhow::anyhow!("Konfigurationsfehler in '{pfad}': {e}"))?;
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(
                    pfad = pfad,
                    "Konfigurationsdatei nicht gefunden, verwende Standardwerte"
                );
                Ok(Self::default())
            }
            Err(e) => Err(anyhow::anyhow!(
                "Konfigurationsdatei '{pfad}' nicht lesbar: {e}"
            )),
        }
    }
}
