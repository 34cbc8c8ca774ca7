//! hushlinkd: storage service for client-encrypted secrets
//!
//! Holds opaque envelopes in memory, hands each one out exactly once and
//! evicts anything past its time-to-live. Optionally seals stored bytes under
//! a key that lives only as long as the process.

pub mod metrics;
pub mod routes;
pub mod store;
pub mod sweeper;

pub use routes::{router, AppState};
pub use store::{MemoryStore, StoreError};
