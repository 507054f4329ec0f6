//! Records returned by the Semaphore API.

macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $wire:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant,)+
            /// Value this crate does not know, kept verbatim.
            Other(String),
        }

        impl $name {
            /// Parse a wire value; matching is case-insensitive.
            pub fn from_wire(value: &str) -> Self {
                $(
                    if value.eq_ignore_ascii_case($wire) {
                        return Self::$variant;
                    }
                )+
                Self::Other(value.to_owned())
            }

            /// Canonical lowercase wire value.
            pub fn as_str(&self) -> &str {
                match self {
                    $(Self::$variant => $wire,)+
                    Self::Other(value) => value,
                }
            }
        }
    };
}

wire_enum! {
    /// Delivery state of a message.
    MessageStatus {
        Queued => "queued",
        Pending => "pending",
        Sent => "sent",
        Failed => "failed",
        Refunded => "refunded",
    }
}

wire_enum! {
    /// `single` for one recipient, `bulk` for several, `priority` for the priority queue.
    MessageType {
        Single => "single",
        Bulk => "bulk",
        Priority => "priority",
    }
}

wire_enum! {
    /// Where the message originated: the API, the web tool, or a CSV upload.
    MessageSource {
        Api => "api",
        Webtool => "webtool",
        Csv => "csv",
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Message {
    pub message_id: Option<String>,
    pub user_id: Option<String>,
    /// Email address of the sending user.
    pub user: Option<String>,
    pub account_id: Option<String>,
    /// Name of the sending account.
    pub account: Option<String>,
    pub recipient: Option<String>,
    pub message: Option<String>,
    /// Generated code, present on OTP sends.
    pub code: Option<String>,
    pub sender_name: Option<String>,
    pub network: Option<String>,
    pub status: Option<MessageStatus>,
    pub message_type: Option<MessageType>,
    pub source: Option<MessageSource>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl Message {
    pub fn is_pending(&self) -> bool {
        matches!(self.status, Some(MessageStatus::Pending))
    }
}

/// Account summary. All fields are required by the parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub account_id: String,
    pub account_name: String,
    pub status: String,
    /// Remaining credits as sent by Semaphore (one credit is one SMS).
    pub credit_balance: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transaction {
    pub id: Option<String>,
    pub user_id: Option<String>,
    pub user: Option<String>,
    pub account_name: Option<String>,
    pub status: Option<String>,
    pub transaction_method: Option<String>,
    pub external_transaction_id: Option<String>,
    pub amount: Option<String>,
    pub credit_value: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SenderName {
    pub name: Option<String>,
    pub status: Option<String>,
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct User {
    pub user_id: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
}
