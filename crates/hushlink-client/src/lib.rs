//! hushlink-client: share-link protocol and the create/reveal flows
//!
//! Create path:
//! ```text
//! validate → generate key → encrypt → base64url(envelope) → POST → build link
//! ```
//!
//! Reveal path:
//! ```text
//! parse link → GET id → classify status → decode key + envelope → decrypt
//! ```
//!
//! Each flow is consumed by a single `run`, records every state it passes
//! through, and reports a terminal outcome. Nothing is retried automatically.

pub mod create;
pub mod link;
pub mod present;
pub mod reveal;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use create::{CreateFailure, CreateFlow, CreateReport, CreateRequest, CreateState};
pub use link::{LinkError, LinkParts, ShareLink};
pub use present::{present_create, present_reveal, Presenter};
pub use reveal::{RevealFailure, RevealFlow, RevealReport, RevealState};
pub use transport::{ApiReply, HttpSecretApi, SecretApi, TransportError};

/// Callback invoked on every state transition of a flow
pub type ObserverFn<S> = Box<dyn Fn(&S) + Send + Sync>;
