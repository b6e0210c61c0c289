// gwsync-api: Async Rust client for the ThingsBoard REST API

mod attributes;
mod auth;
pub mod client;
mod devices;
pub mod error;
pub mod models;
pub mod transport;

pub use client::ThingsBoardClient;
pub use error::Error;
pub use models::{AttributeKv, AttributeScope, Device, EntityId};
pub use transport::{TlsMode, TransportConfig};
