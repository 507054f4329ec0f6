//! Typed Rust client for the Semaphore SMS HTTP API.
//!
//! The crate has a domain layer of strong types, a transport layer for wire-format
//! quirks, a client layer orchestrating requests, and a persistence adapter that
//! mirrors every parsed record into a [`store::RecordStore`] keyed by its natural key.
//!
//! ```rust,no_run
//! use semaphore_sms::{
//!     ApiKey, MessageText, RawPhoneNumber, Recipients, SemaphoreClient, SendMessage,
//!     SqliteStore,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = SqliteStore::open("storage/semaphore.db".as_ref()).await?;
//!     let client = SemaphoreClient::builder(ApiKey::new("...")?)
//!         .store(store)
//!         .build()?;
//!
//!     let recipients = Recipients::many(vec![
//!         RawPhoneNumber::new("09171234567")?,
//!         RawPhoneNumber::new("09181234567")?,
//!     ])?;
//!     let request = SendMessage::new(recipients, MessageText::new("hello")?);
//!     if let Some(messages) = client.send(request).await? {
//!         for message in messages.records() {
//!             println!("{:?} -> {:?}", message.recipient, message.status);
//!         }
//!     }
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]

pub mod client;
pub mod config;
pub mod domain;
pub mod publish;
pub mod store;
mod transport;

pub use client::{SemaphoreClient, SemaphoreClientBuilder, SemaphoreError};
pub use config::{ConfigError, SemaphoreConfig, load_config, load_config_from_path};
pub use domain::{
    Account, ApiKey, Collection, InvalidRequest, Limit, ListQuery, Message, MessageId,
    MessageQuery, MessageSource, MessageStatus, MessageText, MessageType, PhoneNumber,
    RawPhoneNumber, Recipients, SendMessage, SenderId, SenderName, Transaction, User,
    ValidationError,
};
pub use store::{MemoryStore, Persisted, RecordStore, SqliteStore, StoreError};
