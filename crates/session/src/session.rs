//! Session-Zustandsmaschine
//!
//! Treibt eine Chat-Session durch ihren Lebenszyklus und beantwortet
//! eingehende Relay-Ereignisse:
//!
//! ```text
//! Idle -> Joining -> Active -> Idle   (wieder betretbar)
//! ```
//!
//! ## Zustandsregeln
//! - Kommandos der Lebenszyklus-Schicht (`raum_erstellen`, `raum_beitreten`,
//!   `chat_senden`, `raum_verlassen`) und Transport-Ereignisse werden von
//!   genau einem Konsumenten strikt in Reihenfolge verarbeitet
//! - Fehler im Schluesselaustausch sind fatal: die Session raeumt auf und
//!   faellt nach Idle zurueck (erneuter Beitritt noetig)
//! - Fehler beim Entschluesseln von Broadcasts werden toleriert: die
//!   Nachricht wird still verworfen (z.B. Empfang vor Abschluss des
//!   Austauschs)
//! - `raum_verlassen` ist aus jedem Zustand sicher und verwirft saemtliches
//!   Schluesselmaterial

use tokio::sync::mpsc;

use umbra_core::{
    ChatMessage, MemberId, RelayTransport, RoomId, SessionEvent, TransportEvent,
};
use umbra_crypto::{aead, EncryptedPayload, GroupKeyStore, KeyPair};
use umbra_protocol::{
    BroadcastInboundPayload, BroadcastPayload, ChatEnvelope, CipherEnvelope, JoinedRoomPayload,
    PeerData, RelayInbound, RelayOutbound, RelayPayload, UserPayload,
};

use crate::config::SessionConfig;
use crate::error::{SessionError, SessionResult};

/// Lebenszyklus-Zustand einer Session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// Nicht verbunden, kein Raum
    Idle,
    /// Beitritts-Kommando abgesetzt, warte auf joined_room
    Joining,
    /// Im Raum, Chat moeglich
    Active,
}

impl SessionStatus {
    fn name(&self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Joining => "Joining",
            Self::Active => "Active",
        }
    }
}

/// Beim Verbindungsaufbau zu sendendes Beitritts-Kommando
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BeitrittsArt {
    Erstellen,
    Beitreten,
}

/// Eine Chat-Session: Zustand, Schluesselmaterial und Verlauf
///
/// Pro Prozess existiert eine logische Session mit hoechstens einer
/// aktiven Relay-Verbindung. Die Struktur wird bei jedem
/// `raum_erstellen`/`raum_beitreten` kryptografisch frisch aufgesetzt –
/// es gibt keine prozessweiten Singletons.
pub struct Session {
    config: SessionConfig,
    status: SessionStatus,
    verbunden: bool,

    raum: Option<RoomId>,
    mitglied: Option<MemberId>,
    mitglieder_zahl: u32,
    beitritt: Option<BeitrittsArt>,

    key_pair: Option<KeyPair>,
    key_store: GroupKeyStore,

    verlauf: Vec<ChatMessage>,

    transport: Option<Box<dyn RelayTransport>>,
    events: mpsc::UnboundedSender<SessionEvent>,
}

impl Session {
    /// Erstellt eine frische Session im Zustand `Idle`
    ///
    /// Ereignisse fuer die Praesentationsschicht laufen ueber `events`.
    pub fn neu(config: SessionConfig, events: mpsc::UnboundedSender<SessionEvent>) -> Self {
        Self {
            config,
            status: SessionStatus::Idle,
            verbunden: false,
            raum: None,
            mitglied: None,
            mitglieder_zahl: 0,
            beitritt: None,
            key_pair: None,
            key_store: GroupKeyStore::neu(),
            verlauf: Vec::new(),
            transport: None,
            events,
        }
    }

    // -----------------------------------------------------------------------
    // Zugriff fuer Lebenszyklus-Schicht und Tests
    // -----------------------------------------------------------------------

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn ist_verbunden(&self) -> bool {
        self.verbunden
    }

    pub fn raum(&self) -> Option<&RoomId> {
        self.raum.as_ref()
    }

    pub fn mitglied(&self) -> Option<&MemberId> {
        self.mitglied.as_ref()
    }

    pub fn mitglieder_zahl(&self) -> u32 {
        self.mitglieder_zahl
    }

    pub fn verlauf(&self) -> &[ChatMessage] {
        &self.verlauf
    }

    /// Gibt true zurueck sobald ein Gruppenschluessel installiert ist
    pub fn hat_gruppen_schluessel(&self) -> bool {
        self.key_store.current().is_some()
    }

    // -----------------------------------------------------------------------
    // Kommandos (von der Lebenszyklus-Schicht)
    // -----------------------------------------------------------------------

    /// Erstellt einen neuen Raum mit zufaelliger ID
    ///
    /// Waehlt die Raum-ID, wechselt nach `Joining` und merkt sich das
    /// `create_room`-Kommando fuer den Moment in dem der Transport
    /// geoeffnet wird. Gibt die gewaehlte Raum-ID zurueck, damit der
    /// Verbindungsaufbau angestossen werden kann.
    pub fn raum_erstellen(&mut self) -> SessionResult<RoomId> {
        self.beitritt_vorbereiten(None, BeitrittsArt::Erstellen)
    }

    /// Tritt einem bestehenden Raum bei
    ///
    /// Schlaegt mit `UngueltigeRaumId` fehl wenn die ID leer ist – ohne
    /// Zustandswechsel und ohne Relay-Nachricht.
    pub fn raum_beitreten(&mut self, id: &str) -> SessionResult<RoomId> {
        let raum = RoomId::new(id.trim());
        if raum.ist_leer() {
            self.melden(SessionEvent::Fehler {
                text: "Raum-ID darf nicht leer sein".into(),
            });
            return Err(SessionError::UngueltigeRaumId(
                "Raum-ID darf nicht leer sein".into(),
            ));
        }
        self.beitritt_vorbereiten(Some(raum), BeitrittsArt::Beitreten)
    }

    fn beitritt_vorbereiten(
        &mut self,
        raum: Option<RoomId>,
        art: BeitrittsArt,
    ) -> SessionResult<RoomId> {
        if self.status != SessionStatus::Idle {
            return Err(SessionError::FalscherZustand {
                aktuell: self.status.name(),
            });
        }

        let raum = raum.unwrap_or_else(|| {
            RoomId::generieren(self.config.raum.id_min, self.config.raum.id_max)
        });

        // Frisches Schluessel-Paar pro Beitritt: Forward Secrecy ueber
        // Raum-Wechsel hinweg
        self.key_pair = Some(KeyPair::neu());
        self.key_store.clear();
        self.verlauf.clear();

        self.raum = Some(raum.clone());
        self.beitritt = Some(art);
        self.status = SessionStatus::Joining;

        tracing::debug!(raum = %raum, art = ?art, "Beitritt vorbereitet");
        Ok(raum)
    }

    /// Haengt den verbundenen Transport ein
    ///
    /// Der Verbindungsaufbau selbst liegt ausserhalb der Session; das
    /// Beitritts-Kommando wird erst beim `TransportEvent::Geoeffnet`
    /// gesendet.
    pub fn transport_setzen(&mut self, transport: Box<dyn RelayTransport>) {
        self.transport = Some(transport);
    }

    /// Sendet eine Chat-Nachricht in den Raum
    ///
    /// No-op bei leerem Text oder ausserhalb von `Active`. Ohne
    /// Gruppenschluessel wird die Nachricht nicht gesendet und der Fehler
    /// benutzer-sichtbar gemeldet (transient, nicht fatal).
    pub fn chat_senden(&mut self, text: &str) -> SessionResult<()> {
        if text.trim().is_empty() || self.status != SessionStatus::Active || !self.verbunden {
            return Ok(());
        }

        let inner = ChatEnvelope::UserMessage { text: text.into() }.to_json()?;

        let payload = match self.key_store.encrypt_broadcast(inner.as_bytes()) {
            Ok(payload) => payload,
            Err(umbra_crypto::CryptoError::KeinGruppenSchluessel) => {
                self.melden(SessionEvent::Fehler {
                    text: "Noch kein Gruppenschluessel – Nachricht nicht gesendet".into(),
                });
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        self.broadcast_senden(&payload)?;

        let absender = self
            .mitglied
            .clone()
            .unwrap_or_else(|| MemberId::new("ich"));
        let nachricht = ChatMessage::lokal(absender, text);
        self.verlauf.push(nachricht.clone());
        self.melden(SessionEvent::Nachricht(nachricht));
        Ok(())
    }

    /// Verlaesst den Raum und setzt die Session vollstaendig zurueck
    ///
    /// Aus jedem Zustand sicher aufrufbar. Schliesst den Transport und
    /// verwirft Schluessel-Paar, Gruppenschluessel und Verlauf, sodass
    /// ein erneuter Beitritt kryptografisch frisch startet.
    pub fn raum_verlassen(&mut self) {
        if let Some(transport) = self.transport.take() {
            transport.schliessen();
        }

        self.key_pair = None;
        self.key_store.clear();
        self.verlauf.clear();
        self.raum = None;
        self.mitglied = None;
        self.mitglieder_zahl = 0;
        self.beitritt = None;
        self.verbunden = false;
        self.status = SessionStatus::Idle;

        self.melden(SessionEvent::RaumVerlassen);
        tracing::debug!("Session zurueckgesetzt");
    }

    // -----------------------------------------------------------------------
    // Transport-Ereignisse
    // -----------------------------------------------------------------------

    /// Verarbeitet ein Transport-Ereignis
    ///
    /// Muss strikt in Ankunftsreihenfolge aufgerufen werden; zwei
    /// Ereignisse derselben Session duerfen nie nebenlaeufig verarbeitet
    /// werden.
    pub fn verarbeite(&mut self, event: TransportEvent) -> SessionResult<()> {
        match event {
            TransportEvent::Geoeffnet => self.bei_geoeffnet(),
            TransportEvent::Nachricht(text) => self.bei_nachricht(&text),
            TransportEvent::Geschlossen { grund } => {
                self.bei_geschlossen(&grund);
                Ok(())
            }
            TransportEvent::Fehlgeschlagen { fehler } => {
                self.bei_fehlgeschlagen(&fehler);
                Ok(())
            }
        }
    }

    /// Transport steht: das vorgemerkte Beitritts-Kommando senden
    fn bei_geoeffnet(&mut self) -> SessionResult<()> {
        self.verbunden = true;
        self.melden(SessionEvent::Verbunden);

        let raum = match (&self.raum, self.beitritt) {
            (Some(raum), Some(art)) => {
                let room_id = raum.as_str().to_string();
                match art {
                    BeitrittsArt::Erstellen => RelayOutbound::CreateRoom { room_id },
                    BeitrittsArt::Beitreten => RelayOutbound::JoinRoom { room_id },
                }
            }
            // Geoeffnet ohne vorgemerkten Beitritt (z.B. nach Reconnect)
            _ => return Ok(()),
        };

        self.senden(&raum)
    }

    fn bei_nachricht(&mut self, text: &str) -> SessionResult<()> {
        let nachricht = match RelayInbound::from_json(text) {
            Ok(nachricht) => nachricht,
            Err(e) => {
                tracing::warn!(fehler = %e, "Unlesbare Relay-Nachricht verworfen");
                return Ok(());
            }
        };

        match nachricht {
            RelayInbound::JoinedRoom { payload } => self.bei_joined_room(payload),
            RelayInbound::NewUser { payload } => {
                self.bei_new_user(payload);
                Ok(())
            }
            RelayInbound::UserLeft { payload } => {
                self.bei_user_left(payload);
                Ok(())
            }
            RelayInbound::PeerMessage { payload } => {
                self.bei_peer_message(payload.sender_id, payload.data)
            }
            RelayInbound::MessageBroadcast { payload } => {
                self.bei_message_broadcast(payload);
                Ok(())
            }
        }
    }

    /// Transport geschlossen: Session bleibt im aktuellen Screen-Zustand
    fn bei_geschlossen(&mut self, grund: &str) {
        self.verbunden = false;
        self.mitglieder_zahl = 0;
        self.system_nachricht(format!("Getrennt: {grund}"));
        self.melden(SessionEvent::MitgliederZahl { anzahl: 0 });
        self.melden(SessionEvent::Getrennt {
            grund: grund.to_string(),
        });
    }

    /// Meldet einen fehlgeschlagenen Verbindungsaufbau
    ///
    /// Fuer den Fall dass der Connector gar nicht erst einen Transport
    /// liefert – gleiche Behandlung wie `TransportEvent::Fehlgeschlagen`.
    pub fn verarbeite_verbindungsfehler(&mut self, fehler: &str) {
        self.bei_fehlgeschlagen(fehler);
    }

    /// Transport fehlgeschlagen: Fehler melden und hart nach Idle
    fn bei_fehlgeschlagen(&mut self, fehler: &str) {
        tracing::warn!(fehler = fehler, "Transport fehlgeschlagen");
        self.melden(SessionEvent::Fehler {
            text: format!("Verbindung fehlgeschlagen: {fehler}"),
        });
        self.raum_verlassen();
    }

    // -----------------------------------------------------------------------
    // Eingehende Relay-Nachrichten
    // -----------------------------------------------------------------------

    /// Beitritt bestaetigt
    ///
    /// Erstes Mitglied: sofort einen frischen Gruppenschluessel erzeugen.
    /// Sonst: Schluesselaustausch mit dem laengst-anwesenden Mitglied
    /// (`other_users[0]`) anstossen; nur dieses eine Mitglied antwortet,
    /// da relay_message gezielt zugestellt wird.
    fn bei_joined_room(&mut self, payload: JoinedRoomPayload) -> SessionResult<()> {
        let mitglied = MemberId::new(payload.user_id);
        tracing::info!(mitglied = %mitglied, andere = payload.other_users.len(), "Raum betreten");

        self.mitglied = Some(mitglied.clone());
        self.mitglieder_zahl = payload.other_users.len() as u32 + 1;
        self.status = SessionStatus::Active;

        self.melden(SessionEvent::RaumBetreten {
            raum: self
                .raum
                .clone()
                .unwrap_or_else(|| RoomId::new("")),
            mitglied,
        });
        self.melden(SessionEvent::MitgliederZahl {
            anzahl: self.mitglieder_zahl,
        });
        self.system_nachricht("Du bist dem Raum beigetreten.");

        if let Some(ziel) = payload.other_users.first() {
            let public_key = match &self.key_pair {
                Some(key_pair) => key_pair.public_key_base64(),
                None => {
                    // joined_room ohne vorbereiteten Beitritt
                    tracing::warn!("joined_room ohne Schluessel-Paar ignoriert");
                    return Ok(());
                }
            };
            let offer = RelayOutbound::RelayMessage {
                room_id: self.raum_id_string(),
                payload: RelayPayload {
                    target_id: ziel.clone(),
                    data: PeerData::KeyExchangeOffer { public_key },
                },
            };
            self.senden(&offer)?;
            tracing::debug!(ziel = %ziel, "key_exchange_offer gesendet");
        } else {
            self.key_store.generate();
            self.system_nachricht("Du hast den Raum erstellt. Neuer Gruppenschluessel generiert.");
        }

        Ok(())
    }

    fn bei_new_user(&mut self, payload: UserPayload) {
        let neuer = MemberId::new(payload.user_id);
        self.mitglieder_zahl += 1;
        self.system_nachricht(format!("Mitglied {}... ist beigetreten.", neuer.kurz()));
        self.melden(SessionEvent::MitgliederZahl {
            anzahl: self.mitglieder_zahl,
        });
        // Keine Schluessel-Aktion hier: die Rotation stoesst der Neuling
        // selbst ueber sein key_exchange_offer an
    }

    /// Mitglied weg: Zaehler und System-Nachricht, bewusst keine Rotation
    ///
    /// Der Gruppenschluessel wird bei Austritten nicht rotiert – ein
    /// ausgetretenes Mitglied kann bis zur naechsten beitritts-bedingten
    /// Rotation weiter mitlesen. Bekannte Forward-Secrecy-Luecke des
    /// Protokolls, siehe DESIGN.md.
    fn bei_user_left(&mut self, payload: UserPayload) {
        let gegangener = MemberId::new(payload.user_id);
        self.mitglieder_zahl = self.mitglieder_zahl.saturating_sub(1);
        self.system_nachricht(format!("Mitglied {}... hat den Raum verlassen.", gegangener.kurz()));
        self.melden(SessionEvent::MitgliederZahl {
            anzahl: self.mitglieder_zahl,
        });
    }

    fn bei_peer_message(&mut self, sender_id: String, data: PeerData) -> SessionResult<()> {
        match data {
            PeerData::KeyExchangeOffer { public_key } => {
                self.bei_key_exchange_offer(&sender_id, &public_key)
            }
            PeerData::KeyExchangeAnswer {
                iv,
                encrypted_key,
                sender_public_key,
            } => self.bei_key_exchange_answer(&iv, &encrypted_key, &sender_public_key),
        }
    }

    /// Ein Neuling bietet seinen Public Key an
    ///
    /// Wir (bestehendes Mitglied) leiten das paarweise Geheimnis ab,
    /// rotieren den Gruppenschluessel, schicken dem Neuling den neuen
    /// Schluessel eingewickelt zurueck und kuendigen die Rotation den
    /// uebrigen Mitgliedern unter dem *alten* Schluessel an. Der alte
    /// Schluessel wird direkt danach verworfen.
    fn bei_key_exchange_offer(&mut self, sender_id: &str, public_key: &str) -> SessionResult<()> {
        let ergebnis = self.schluessel_rotieren_und_antworten(sender_id, public_key);
        if let Err(e) = ergebnis {
            tracing::warn!(fehler = %e, "Schluesselaustausch (Offer) fehlgeschlagen");
            self.system_nachricht("Schluesselaustausch fehlgeschlagen.");
            self.raum_verlassen();
        }
        Ok(())
    }

    fn schluessel_rotieren_und_antworten(
        &mut self,
        sender_id: &str,
        public_key: &str,
    ) -> SessionResult<()> {
        let key_pair = self.key_pair.as_ref().ok_or(SessionError::FalscherZustand {
            aktuell: self.status.name(),
        })?;

        // Paarweises Geheimnis nur fuer diese eine Austausch-Runde
        let pairwise = key_pair.derive_pairwise_secret(public_key)?;
        let eigener_public = key_pair.public_key_base64();

        // Alten Schluessel sichern, frischen erzeugen
        let alter = self.key_store.take_current();
        let neuer_b64 = self.key_store.generate().to_base64();
        self.system_nachricht("Neues Mitglied – Gruppenschluessel wird rotiert.");

        // Neuen Schluessel fuer den Neuling einwickeln
        let eingewickelt = aead::encrypt(pairwise.as_bytes(), neuer_b64.as_bytes())?;
        let antwort = RelayOutbound::RelayMessage {
            room_id: self.raum_id_string(),
            payload: RelayPayload {
                target_id: sender_id.to_string(),
                data: PeerData::KeyExchangeAnswer {
                    iv: eingewickelt.iv_base64(),
                    encrypted_key: eingewickelt.content_base64(),
                    sender_public_key: eigener_public,
                },
            },
        };
        self.senden(&antwort)?;

        // Bestehende Mitglieder (Halter des alten Schluessels) per
        // Broadcast unter dem alten Schluessel informieren
        if let Some(alter) = alter {
            let update = ChatEnvelope::GroupKeyUpdate { key: neuer_b64 }.to_json()?;
            let payload = aead::encrypt(alter.as_bytes(), update.as_bytes())?;
            self.broadcast_senden(&payload)?;
            tracing::debug!("group_key_update unter altem Schluessel gesendet");
        }

        Ok(())
    }

    /// Antwort auf unser Offer: Gruppenschluessel auswickeln und uebernehmen
    ///
    /// Jeder Fehler hier ist fatal fuer die Session – ohne gueltigen
    /// Gruppenschluessel bleibt der Raum unlesbar, also aufraeumen und
    /// erneuten Beitritt verlangen.
    fn bei_key_exchange_answer(
        &mut self,
        iv: &str,
        encrypted_key: &str,
        sender_public_key: &str,
    ) -> SessionResult<()> {
        let ergebnis = self.schluessel_uebernehmen(iv, encrypted_key, sender_public_key);
        if let Err(e) = ergebnis {
            tracing::warn!(fehler = %e, "Schluesselaustausch (Answer) fehlgeschlagen");
            self.system_nachricht("Schluesselaustausch fehlgeschlagen. Bitte erneut beitreten.");
            self.raum_verlassen();
        }
        Ok(())
    }

    fn schluessel_uebernehmen(
        &mut self,
        iv: &str,
        encrypted_key: &str,
        sender_public_key: &str,
    ) -> SessionResult<()> {
        let key_pair = self.key_pair.as_ref().ok_or(SessionError::FalscherZustand {
            aktuell: self.status.name(),
        })?;

        let pairwise = key_pair.derive_pairwise_secret(sender_public_key)?;
        let payload = EncryptedPayload::from_base64(iv, encrypted_key)?;
        let key_b64_bytes = aead::decrypt_payload(pairwise.as_bytes(), &payload)?;
        let key_b64 = String::from_utf8(key_b64_bytes).map_err(|_| {
            umbra_crypto::CryptoError::Entschluesselung(
                "Ausgewickelter Schluessel ist kein UTF-8".into(),
            )
        })?;

        self.key_store.set_current_base64(&key_b64)?;
        self.system_nachricht("Sicherer Schluessel empfangen. Der Chat ist bereit.");
        Ok(())
    }

    /// Opaker Broadcast eines anderen Mitglieds
    ///
    /// Entschluesselungs-Fehler werden still verworfen: die Nachricht kam
    /// z.B. an bevor unser Schluesselaustausch abgeschlossen war. Kein
    /// Fehler darf hier nach aussen dringen.
    fn bei_message_broadcast(&mut self, payload: BroadcastInboundPayload) {
        let envelope = match CipherEnvelope::from_json(&payload.message) {
            Ok(envelope) => envelope,
            Err(e) => {
                tracing::debug!(fehler = %e, "Broadcast mit unlesbarem Umschlag verworfen");
                return;
            }
        };

        let verschluesselt = match EncryptedPayload::from_base64(&envelope.iv, &envelope.content) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::debug!(fehler = %e, "Broadcast mit ungueltigem Base64 verworfen");
                return;
            }
        };

        let klartext = match self.key_store.decrypt_broadcast(&verschluesselt) {
            Ok(klartext) => klartext,
            Err(e) => {
                // Unlesbar (falscher/fehlender Schluessel) – erwartbar
                // waehrend einer laufenden Rotation
                tracing::debug!(fehler = %e, "Unlesbarer Broadcast verworfen");
                return;
            }
        };

        let inner = match std::str::from_utf8(&klartext)
            .map_err(|e| e.to_string())
            .and_then(|text| ChatEnvelope::from_json(text).map_err(|e| e.to_string()))
        {
            Ok(inner) => inner,
            Err(e) => {
                tracing::debug!(fehler = %e, "Broadcast mit unlesbarem Inhalt verworfen");
                return;
            }
        };

        match inner {
            ChatEnvelope::GroupKeyUpdate { key } => {
                if let Err(e) = self.key_store.set_current_base64(&key) {
                    tracing::warn!(fehler = %e, "Ungueltiger Schluessel im group_key_update");
                    return;
                }
                self.system_nachricht("Gruppenschluessel wurde aktualisiert.");
            }
            ChatEnvelope::UserMessage { text } => {
                let nachricht = ChatMessage::entfernt(MemberId::new(payload.sender_id), text);
                self.verlauf.push(nachricht.clone());
                self.melden(SessionEvent::Nachricht(nachricht));
            }
        }
    }

    // -----------------------------------------------------------------------
    // Hilfsfunktionen
    // -----------------------------------------------------------------------

    fn raum_id_string(&self) -> String {
        self.raum
            .as_ref()
            .map(|r| r.as_str().to_string())
            .unwrap_or_default()
    }

    /// Sendet eine Relay-Nachricht (fire-and-forget, kein Retry)
    fn senden(&mut self, nachricht: &RelayOutbound) -> SessionResult<()> {
        let transport = self.transport.as_ref().ok_or(SessionError::NichtVerbunden)?;
        transport.senden(&nachricht.to_json()?)?;
        Ok(())
    }

    fn broadcast_senden(&mut self, payload: &EncryptedPayload) -> SessionResult<()> {
        let envelope = CipherEnvelope {
            iv: payload.iv_base64(),
            content: payload.content_base64(),
        };
        let nachricht = RelayOutbound::BroadcastMessage {
            room_id: self.raum_id_string(),
            payload: BroadcastPayload {
                message: envelope.to_json()?,
            },
        };
        self.senden(&nachricht)
    }

    /// Haengt eine System-Nachricht an den Verlauf und meldet sie
    fn system_nachricht(&mut self, text: impl Into<String>) {
        let nachricht = ChatMessage::system(text);
        self.verlauf.push(nachricht.clone());
        self.melden(SessionEvent::Nachricht(nachricht));
    }

    /// Meldet ein Ereignis an die Praesentationsschicht
    ///
    /// Ein geschlossener Empfaenger ist kein Fehler (z.B. in Tests die
    /// nur den Zustand pruefen).
    fn melden(&self, event: SessionEvent) {
        let _ = self.events.send(event);
    }
}
