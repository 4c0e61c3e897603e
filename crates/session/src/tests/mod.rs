//! Crate-weite Tests fuer das Session-Protokoll
//!
//! - `session_tests` treibt die Zustandsmaschine mit einem
//!   aufzeichnenden Fake-Transport, ohne Relay
//! - `szenario_tests` spielt komplette Ablaeufe mit mehreren Sessions
//!   ueber das In-Memory-Relay aus umbra-testkit durch
