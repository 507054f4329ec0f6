//! Domain layer: strong types with validation and invariants (no I/O).

mod collection;
mod record;
mod request;
mod validation;
mod value;

pub use collection::Collection;
pub use record::{
    Account, Message, MessageSource, MessageStatus, MessageType, SenderName, Transaction, User,
};
pub use request::{Limit, ListQuery, MessageQuery, Recipients, SEND_MAX_RECIPIENTS, SendMessage};
pub use validation::{InvalidRequest, ValidationError};
pub use value::{ApiKey, MessageId, MessageText, PhoneNumber, RawPhoneNumber, SenderId};
