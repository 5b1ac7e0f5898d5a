//! Elara - world server session layer
//!
//! Accepts persistent client connections, decodes the binary wire protocol,
//! routes each decoded request to exactly one handler and keeps
//! authoritative per-map character state.

/// Account store collaborator, password hashing, login/register flows
pub mod account;
/// Server configuration (YAML)
pub mod config;
/// Maps, characters and the slot table
pub mod game;
/// Transport, connections and the dispatch table
pub mod net;
/// Wire codec: headers, client/server messages, outgoing constructors
pub mod protocol;
/// One request handler per client header
pub mod requests;
