//! Session-Runner – serialisiert Kommandos und Transport-Ereignisse
//!
//! Eine Session darf nie von zwei Seiten gleichzeitig getrieben werden.
//! Der Runner besitzt die Zustandsmaschine exklusiv und konsumiert in
//! einem einzigen tokio-Task sowohl die Kommandos der Lebenszyklus-
//! Schicht als auch den geordneten Ereignis-Strom des Transports. Zwei
//! Ereignisse derselben Session werden damit nie nebenlaeufig
//! verarbeitet.

use tokio::sync::mpsc;

use umbra_core::{RelayConnector, SessionEvent, TransportEvent};

use crate::config::SessionConfig;
use crate::session::Session;

/// Kommandos der Lebenszyklus-Schicht an die Session
#[derive(Debug)]
pub enum SessionCommand {
    /// Neuen Raum mit zufaelliger ID erstellen
    RaumErstellen,
    /// Bestehendem Raum beitreten
    RaumBeitreten { raum_id: String },
    /// Chat-Nachricht senden
    ChatSenden { text: String },
    /// Raum verlassen und Session zuruecksetzen
    RaumVerlassen,
}

/// Treibt genau eine Session
pub struct SessionRunner<C: RelayConnector> {
    session: Session,
    connector: C,
    config: SessionConfig,
    commands: mpsc::UnboundedReceiver<SessionCommand>,
    transport_events: Option<mpsc::UnboundedReceiver<TransportEvent>>,
}

impl<C: RelayConnector> SessionRunner<C> {
    /// Erstellt den Runner samt Kommando-Sender und Ereignis-Empfaenger
    pub fn neu(
        config: SessionConfig,
        connector: C,
    ) -> (
        Self,
        mpsc::UnboundedSender<SessionCommand>,
        mpsc::UnboundedReceiver<SessionEvent>,
    ) {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        let runner = Self {
            session: Session::neu(config.clone(), event_tx),
            connector,
            config,
            commands: command_rx,
            transport_events: None,
        };
        (runner, command_tx, event_rx)
    }

    /// Haupt-Schleife: laeuft bis die Kommando-Seite geschlossen wird
    pub async fn run(mut self) {
        loop {
            tokio::select! {
                kommando = self.commands.recv() => {
                    match kommando {
                        Some(kommando) => self.verarbeite_kommando(kommando),
                        None => {
                            // Lebenszyklus-Schicht weg: sauber aufraeumen
                            self.session.raum_verlassen();
                            break;
                        }
                    }
                }
                ereignis = naechstes(&mut self.transport_events),
                    if self.transport_events.is_some() =>
                {
                    match ereignis {
                        Some(ereignis) => {
                            if let Err(e) = self.session.verarbeite(ereignis) {
                                tracing::warn!(fehler = %e, "Transport-Ereignis fehlgeschlagen");
                            }
                        }
                        None => {
                            // Ereignis-Strom zu Ende (Transport weg)
                            self.transport_events = None;
                        }
                    }
                }
            }
        }
    }

    fn verarbeite_kommando(&mut self, kommando: SessionCommand) {
        match kommando {
            SessionCommand::RaumErstellen => {
                if let Err(e) = self.session.raum_erstellen() {
                    tracing::warn!(fehler = %e, "Raum erstellen abgelehnt");
                    return;
                }
                self.verbinden();
            }
            SessionCommand::RaumBeitreten { raum_id } => {
                if let Err(e) = self.session.raum_beitreten(&raum_id) {
                    tracing::warn!(fehler = %e, "Raum beitreten abgelehnt");
                    return;
                }
                self.verbinden();
            }
            SessionCommand::ChatSenden { text } => {
                if let Err(e) = self.session.chat_senden(&text) {
                    tracing::warn!(fehler = %e, "Chat senden fehlgeschlagen");
                }
            }
            SessionCommand::RaumVerlassen => {
                self.session.raum_verlassen();
                self.transport_events = None;
            }
        }
    }

    /// Verbindet den Transport fuer den vorbereiteten Beitritt
    fn verbinden(&mut self) {
        match self.connector.verbinden(&self.config.relay.url) {
            Ok((transport, ereignisse)) => {
                self.session.transport_setzen(transport);
                self.transport_events = Some(ereignisse);
            }
            Err(e) => {
                tracing::warn!(fehler = %e, "Verbindungsaufbau fehlgeschlagen");
                self.session.verarbeite_verbindungsfehler(&e.to_string());
            }
        }
    }
}

async fn naechstes(
    rx: &mut Option<mpsc::UnboundedReceiver<TransportEvent>>,
) -> Option<TransportEvent> {
    match rx {
        Some(rx) => rx.recv().await,
        None => None,
    }
}
