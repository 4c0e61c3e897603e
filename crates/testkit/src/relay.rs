//! In-Memory-Relay
//!
//! Bildet die Relay-Semantik aus dem Draht-Protokoll nach:
//! - `create_room` / `join_room` -> `joined_room{userId, otherUsers}`,
//!   bestehende Mitglieder erhalten `new_user`
//! - `relay_message` -> `peer_message` gezielt an ein Mitglied
//! - `broadcast_message` -> `message_broadcast` an alle anderen im Raum
//! - Verbindungs-Schliessen -> `user_left` an die uebrigen Mitglieder
//!
//! Zustellung laeuft ueber unbounded-Kanaele und erhaelt damit die
//! Reihenfolge pro Verbindung – genau die at-most-once-Zustellung in
//! Ankunftsreihenfolge die das Protokoll voraussetzt.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::mpsc;
use uuid::Uuid;

use umbra_core::{RelayConnector, RelayTransport, TransportEvent, UmbraError};
use umbra_protocol::{
    BroadcastInboundPayload, JoinedRoomPayload, PeerMessagePayload, RelayInbound, RelayOutbound,
    UserPayload,
};

/// Ein Mitglied aus Sicht des Relays
struct Mitglied {
    raum: Option<String>,
    tx: mpsc::UnboundedSender<TransportEvent>,
}

/// Geteilter Relay-Zustand
#[derive(Default)]
struct RelayZustand {
    /// Mitglieder pro Raum, in Beitritts-Reihenfolge
    raeume: DashMap<String, Vec<String>>,
    /// Alle verbundenen Mitglieder
    mitglieder: DashMap<String, Mitglied>,
}

/// In-Memory-Relay fuer Tests
///
/// Klonbar; alle Klone teilen denselben Zustand.
#[derive(Clone, Default)]
pub struct MemoryRelay {
    zustand: Arc<RelayZustand>,
}

impl MemoryRelay {
    pub fn neu() -> Self {
        Self::default()
    }

    /// Oeffnet eine neue Verbindung
    ///
    /// Vergibt eine Mitglieds-ID und stellt als erstes Ereignis
    /// `Geoeffnet` zu. Der Raum-Beitritt folgt erst mit dem
    /// create_room/join_room des Clients.
    pub fn verbinden(
        &self,
    ) -> (
        Box<dyn RelayTransport>,
        mpsc::UnboundedReceiver<TransportEvent>,
    ) {
        let id = Uuid::new_v4().to_string();
        let (tx, rx) = mpsc::unbounded_channel();

        let _ = tx.send(TransportEvent::Geoeffnet);
        self.zustand
            .mitglieder
            .insert(id.clone(), Mitglied { raum: None, tx });

        let transport = MemoryTransport {
            zustand: Arc::clone(&self.zustand),
            id,
        };
        (Box::new(transport), rx)
    }

    /// Anzahl der Mitglieder in einem Raum (fuer Test-Assertions)
    pub fn mitglieder_im_raum(&self, raum: &str) -> usize {
        self.zustand
            .raeume
            .get(raum)
            .map(|m| m.len())
            .unwrap_or(0)
    }
}

/// Sende-Seite einer In-Memory-Verbindung
struct MemoryTransport {
    zustand: Arc<RelayZustand>,
    id: String,
}

impl RelayTransport for MemoryTransport {
    fn senden(&self, text: &str) -> umbra_core::Result<()> {
        let nachricht = RelayOutbound::from_json(text)
            .map_err(|e| UmbraError::UngueltigeNachricht(e.to_string()))?;
        self.zustand.verarbeite(&self.id, nachricht);
        Ok(())
    }

    fn schliessen(&self) {
        self.zustand.abmelden(&self.id, "Verbindung geschlossen");
    }
}

impl Drop for MemoryTransport {
    fn drop(&mut self) {
        self.zustand.abmelden(&self.id, "Transport verworfen");
    }
}

impl RelayZustand {
    /// Routet eine Client-Nachricht
    fn verarbeite(&self, absender: &str, nachricht: RelayOutbound) {
        match nachricht {
            RelayOutbound::CreateRoom { room_id } | RelayOutbound::JoinRoom { room_id } => {
                self.beitreten(absender, &room_id);
            }
            RelayOutbound::RelayMessage { payload, .. } => {
                let weitergeleitet = RelayInbound::PeerMessage {
                    payload: PeerMessagePayload {
                        sender_id: absender.to_string(),
                        data: payload.data,
                    },
                };
                self.zustellen(&payload.target_id, &weitergeleitet);
            }
            RelayOutbound::BroadcastMessage { payload, .. } => {
                let weitergeleitet = RelayInbound::MessageBroadcast {
                    payload: BroadcastInboundPayload {
                        sender_id: absender.to_string(),
                        message: payload.message,
                    },
                };
                self.an_alle_anderen(absender, &weitergeleitet);
            }
        }
    }

    /// Nimmt ein Mitglied in einen Raum auf (legt ihn bei Bedarf an)
    fn beitreten(&self, mitglied_id: &str, raum: &str) {
        let andere: Vec<String> = {
            let mut eintrag = self.raeume.entry(raum.to_string()).or_default();
            let andere = eintrag.clone();
            eintrag.push(mitglied_id.to_string());
            andere
        };

        if let Some(mut mitglied) = self.mitglieder.get_mut(mitglied_id) {
            mitglied.raum = Some(raum.to_string());
        }

        // Bestehende Mitglieder informieren
        let neuer = RelayInbound::NewUser {
            payload: UserPayload {
                user_id: mitglied_id.to_string(),
            },
        };
        for id in &andere {
            self.zustellen(id, &neuer);
        }

        // Beitritt bestaetigen
        let bestaetigung = RelayInbound::JoinedRoom {
            payload: JoinedRoomPayload {
                user_id: mitglied_id.to_string(),
                other_users: andere,
            },
        };
        self.zustellen(mitglied_id, &bestaetigung);
    }

    /// Entfernt ein Mitglied und informiert den Rest des Raums
    fn abmelden(&self, mitglied_id: &str, grund: &str) {
        let Some((_, mitglied)) = self.mitglieder.remove(mitglied_id) else {
            return;
        };

        if let Some(raum) = mitglied.raum {
            let verbleibende: Vec<String> = match self.raeume.get_mut(&raum) {
                Some(mut eintrag) => {
                    eintrag.retain(|id| id != mitglied_id);
                    eintrag.clone()
                }
                None => Vec::new(),
            };

            let weg = RelayInbound::UserLeft {
                payload: UserPayload {
                    user_id: mitglied_id.to_string(),
                },
            };
            for id in &verbleibende {
                self.zustellen(id, &weg);
            }
        }

        let _ = mitglied.tx.send(TransportEvent::Geschlossen {
            grund: grund.to_string(),
        });
    }

    fn zustellen(&self, mitglied_id: &str, nachricht: &RelayInbound) {
        let Some(mitglied) = self.mitglieder.get(mitglied_id) else {
            tracing::debug!(ziel = mitglied_id, "Zustellung an unbekanntes Mitglied verworfen");
            return;
        };
        let Ok(json) = nachricht.to_json() else {
            return;
        };
        let _ = mitglied.tx.send(TransportEvent::Nachricht(json));
    }

    fn an_alle_anderen(&self, absender: &str, nachricht: &RelayInbound) {
        let Some(raum) = self
            .mitglieder
            .get(absender)
            .and_then(|m| m.raum.clone())
        else {
            return;
        };
        let Some(ids) = self.raeume.get(&raum).map(|e| e.clone()) else {
            return;
        };
        for id in ids.iter().filter(|id| id.as_str() != absender) {
            self.zustellen(id, nachricht);
        }
    }
}

/// `RelayConnector` gegen ein In-Memory-Relay
///
/// Damit laesst sich der komplette `SessionRunner` ohne Netzwerk
/// betreiben.
#[derive(Clone)]
pub struct MemoryConnector {
    relay: MemoryRelay,
}

impl MemoryConnector {
    pub fn neu(relay: MemoryRelay) -> Self {
        Self { relay }
    }
}

impl RelayConnector for MemoryConnector {
    fn verbinden(
        &mut self,
        _url: &str,
    ) -> umbra_core::Result<(
        Box<dyn RelayTransport>,
        mpsc::UnboundedReceiver<TransportEvent>,
    )> {
        Ok(self.relay.verbinden())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use umbra_protocol::{BroadcastPayload, PeerData, RelayPayload};

    fn naechste_nachricht(rx: &mut mpsc::UnboundedReceiver<TransportEvent>) -> RelayInbound {
        loop {
            match rx.try_recv().expect("Ereignis erwartet") {
                TransportEvent::Nachricht(json) => {
                    return RelayInbound::from_json(&json).expect("Gueltige Relay-Nachricht")
                }
                TransportEvent::Geoeffnet => continue,
                andere => panic!("Unerwartetes Ereignis: {andere:?}"),
            }
        }
    }

    #[test]
    fn erster_beitritt_ohne_andere() {
        let relay = MemoryRelay::neu();
        let (transport, mut rx) = relay.verbinden();

        transport
            .senden(
                &RelayOutbound::CreateRoom {
                    room_id: "1000".into(),
                }
                .to_json()
                .unwrap(),
            )
            .unwrap();

        match naechste_nachricht(&mut rx) {
            RelayInbound::JoinedRoom { payload } => {
                assert!(payload.other_users.is_empty());
                assert!(!payload.user_id.is_empty());
            }
            andere => panic!("Erwartet JoinedRoom, erhalten {andere:?}"),
        }
        assert_eq!(relay.mitglieder_im_raum("1000"), 1);
    }

    #[test]
    fn zweiter_beitritt_sieht_ersten() {
        let relay = MemoryRelay::neu();
        let (t1, mut rx1) = relay.verbinden();
        let (t2, mut rx2) = relay.verbinden();

        t1.senden(
            &RelayOutbound::CreateRoom {
                room_id: "2000".into(),
            }
            .to_json()
            .unwrap(),
        )
        .unwrap();
        let erster_id = match naechste_nachricht(&mut rx1) {
            RelayInbound::JoinedRoom { payload } => payload.user_id,
            andere => panic!("Erwartet JoinedRoom, erhalten {andere:?}"),
        };

        t2.senden(
            &RelayOutbound::JoinRoom {
                room_id: "2000".into(),
            }
            .to_json()
            .unwrap(),
        )
        .unwrap();

        // Der Erste erhaelt new_user
        match naechste_nachricht(&mut rx1) {
            RelayInbound::NewUser { .. } => {}
            andere => panic!("Erwartet NewUser, erhalten {andere:?}"),
        }
        // Der Zweite sieht den Ersten in otherUsers
        match naechste_nachricht(&mut rx2) {
            RelayInbound::JoinedRoom { payload } => {
                assert_eq!(payload.other_users, vec![erster_id]);
            }
            andere => panic!("Erwartet JoinedRoom, erhalten {andere:?}"),
        }
    }

    #[test]
    fn relay_message_geht_nur_an_ziel() {
        let relay = MemoryRelay::neu();
        let (t1, mut rx1) = relay.verbinden();
        let (t2, _rx2) = relay.verbinden();
        let (t3, mut rx3) = relay.verbinden();

        t1.senden(&RelayOutbound::CreateRoom { room_id: "3000".into() }.to_json().unwrap())
            .unwrap();
        let id1 = match naechste_nachricht(&mut rx1) {
            RelayInbound::JoinedRoom { payload } => payload.user_id,
            andere => panic!("Erwartet JoinedRoom, erhalten {andere:?}"),
        };
        t2.senden(&RelayOutbound::JoinRoom { room_id: "3000".into() }.to_json().unwrap())
            .unwrap();
        t3.senden(&RelayOutbound::JoinRoom { room_id: "3000".into() }.to_json().unwrap())
            .unwrap();

        t2.senden(
            &RelayOutbound::RelayMessage {
                room_id: "3000".into(),
                payload: RelayPayload {
                    target_id: id1,
                    data: PeerData::KeyExchangeOffer {
                        public_key: "cGs=".into(),
                    },
                },
            }
            .to_json()
            .unwrap(),
        )
        .unwrap();

        // t1: new_user, new_user, dann peer_message
        let mut gefunden = false;
        for _ in 0..3 {
            if let RelayInbound::PeerMessage { .. } = naechste_nachricht(&mut rx1) {
                gefunden = true;
                break;
            }
        }
        assert!(gefunden, "peer_message muss beim Ziel ankommen");

        // t3 darf keine peer_message sehen (nur joined_room/new_user)
        while let Ok(TransportEvent::Nachricht(json)) = rx3.try_recv() {
            let nachricht = RelayInbound::from_json(&json).unwrap();
            assert!(
                !matches!(nachricht, RelayInbound::PeerMessage { .. }),
                "peer_message darf nicht an Dritte gehen"
            );
        }
    }

    #[test]
    fn broadcast_geht_an_alle_anderen() {
        let relay = MemoryRelay::neu();
        let (t1, mut rx1) = relay.verbinden();
        let (t2, mut rx2) = relay.verbinden();

        t1.senden(&RelayOutbound::CreateRoom { room_id: "4000".into() }.to_json().unwrap())
            .unwrap();
        t2.senden(&RelayOutbound::JoinRoom { room_id: "4000".into() }.to_json().unwrap())
            .unwrap();
        // Bestaetigungen abraeumen
        let _ = naechste_nachricht(&mut rx1); // joined_room
        let _ = naechste_nachricht(&mut rx1); // new_user
        let _ = naechste_nachricht(&mut rx2); // joined_room

        t1.senden(
            &RelayOutbound::BroadcastMessage {
                room_id: "4000".into(),
                payload: BroadcastPayload {
                    message: r#"{"iv":"aXY=","content":"Y3Q="}"#.into(),
                },
            }
            .to_json()
            .unwrap(),
        )
        .unwrap();

        match naechste_nachricht(&mut rx2) {
            RelayInbound::MessageBroadcast { payload } => {
                assert!(payload.message.contains("iv"));
            }
            andere => panic!("Erwartet MessageBroadcast, erhalten {andere:?}"),
        }
        // Absender selbst erhaelt nichts
        assert!(rx1.try_recv().is_err());
    }

    #[test]
    fn connector_liefert_transport_mit_geoeffnet() {
        let relay = MemoryRelay::neu();
        let mut connector = MemoryConnector::neu(relay);

        // Ueber den Trait, wie der Runner es tut
        let (transport, mut rx) =
            RelayConnector::verbinden(&mut connector, "memory://relay").unwrap();
        assert!(matches!(rx.try_recv(), Ok(TransportEvent::Geoeffnet)));

        transport
            .senden(
                &RelayOutbound::CreateRoom {
                    room_id: "6000".into(),
                }
                .to_json()
                .unwrap(),
            )
            .unwrap();
        match naechste_nachricht(&mut rx) {
            RelayInbound::JoinedRoom { .. } => {}
            andere => panic!("Erwartet JoinedRoom, erhalten {andere:?}"),
        }
    }

    #[test]
    fn schliessen_meldet_user_left() {
        let relay = MemoryRelay::neu();
        let (t1, mut rx1) = relay.verbinden();
        let (t2, _rx2) = relay.verbinden();

        t1.senden(&RelayOutbound::CreateRoom { room_id: "5000".into() }.to_json().unwrap())
            .unwrap();
        t2.senden(&RelayOutbound::JoinRoom { room_id: "5000".into() }.to_json().unwrap())
            .unwrap();
        let _ = naechste_nachricht(&mut rx1); // joined_room
        let _ = naechste_nachricht(&mut rx1); // new_user

        t2.schliessen();

        match naechste_nachricht(&mut rx1) {
            RelayInbound::UserLeft { .. } => {}
            andere => panic!("Erwartet UserLeft, erhalten {andere:?}"),
        }
        assert_eq!(relay.mitglieder_im_raum("5000"), 1);
    }
}
