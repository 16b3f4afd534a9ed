//! Typed Rust client and bulk dispatcher for the Evolution WhatsApp gateway API.
//!
//! The crate has three layers: a domain layer of validated types, a transport layer that owns
//! the JSON wire formats, and a client layer that talks HTTP. The [`bulk`] module builds the
//! bulk-send pipeline on top of the client.
//!
//! ```rust,no_run
//! use evoapi::{ApiKey, BaseUrl, EvolutionClient, InstanceName, MessageText, RecipientId, SendText};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), evoapi::EvolutionError> {
//!     let client = EvolutionClient::new(
//!         BaseUrl::new("http://localhost:8080")?,
//!         ApiKey::new("...")?,
//!     );
//!     let instance = InstanceName::new("my-business")?;
//!     let request = SendText::new(RecipientId::new("5511999999999")?, MessageText::new("hello")?);
//!     let _resp = client.send_text(&instance, &request).await?;
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]

pub mod bulk;
pub mod client;
pub mod config;
pub mod domain;
mod transport;

pub use client::{EvolutionClient, EvolutionClientBuilder, EvolutionError, HttpMethod};
pub use config::GatewayConfig;
pub use domain::{
    ApiKey, ApiResponse, BaseUrl, ConnectCode, ConnectionState, ContactCard, CreateInstance,
    FetchInstances, Instance, InstanceName, Integration, MessageKey, MessageText, NumberCheck,
    Presence, RecipientId, SendContact, SendLocation, SendMediaRef, SendPoll, SendReaction,
    SendText, ValidationError,
};
pub use transport::TransportError;
