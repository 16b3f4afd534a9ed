//! Domain layer: strong types with validation and invariants (no I/O).

mod request;
mod response;
mod validation;
mod value;

pub use request::{
    ContactCard, CreateInstance, FetchInstances, MessageKey, SendContact, SendLocation,
    SendMediaRef, SendPoll, SendReaction, SendText,
};
pub use response::{ApiResponse, ConnectCode, ConnectionState, Instance, NumberCheck};
pub use validation::ValidationError;
pub use value::{ApiKey, BaseUrl, InstanceName, Integration, MessageText, Presence, RecipientId};
