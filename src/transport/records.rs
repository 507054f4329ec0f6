use crate::domain::{
    Account, InvalidRequest, Message, MessageSource, MessageStatus, MessageType, SenderName,
    Transaction, User,
};

use super::fields::{FieldValue, Fields};

/// Map one message object. `id` stands in for `message_id` when the latter is absent.
pub fn decode_message(fields: &Fields) -> Message {
    Message {
        message_id: fields.text("message_id").or_else(|| fields.text("id")),
        user_id: fields.text("user_id"),
        user: fields.text("user"),
        account_id: fields.text("account_id"),
        account: fields.text("account"),
        recipient: fields.text("recipient"),
        message: fields.text("message"),
        code: fields.text("code"),
        sender_name: fields.text("sender_name"),
        network: fields.text("network"),
        status: fields.text("status").map(|it| MessageStatus::from_wire(&it)),
        message_type: fields.text("type").map(|it| MessageType::from_wire(&it)),
        source: fields.text("source").map(|it| MessageSource::from_wire(&it)),
        created_at: fields.text("created_at"),
        updated_at: fields.text("updated_at"),
    }
}

/// Whether a bare object looks like a message rather than an error or status payload.
pub fn is_message_object(fields: &Fields) -> bool {
    fields.is_set("message_id") || fields.is_set("id")
}

pub fn decode_account(fields: &Fields) -> Result<Account, InvalidRequest> {
    let required = |name: &str| {
        fields
            .text(name)
            .ok_or_else(|| InvalidRequest::not_found("Account Not Found"))
    };

    Ok(Account {
        account_id: required("account_id")?,
        account_name: required("account_name")?,
        status: required("status")?,
        credit_balance: required("credit_balance")?,
    })
}

pub fn decode_transaction(fields: &Fields) -> Transaction {
    Transaction {
        id: fields.text("id"),
        user_id: fields.text("user_id"),
        user: fields.text("user"),
        account_name: fields.text("account_name"),
        status: fields.text("status"),
        transaction_method: fields.text("transaction_method"),
        external_transaction_id: fields.text("external_transaction_id"),
        amount: fields.text("amount"),
        credit_value: fields.text("credit_value"),
        created_at: fields.text("created_at"),
        updated_at: fields.text("updated_at"),
    }
}

/// Semaphore reports the creation time as `created`; it is stored as `created_at`.
pub fn decode_sender_name(fields: &Fields) -> SenderName {
    let mut fields = fields.clone();
    if let Some(created) = fields
        .get("created")
        .filter(|it| !matches!(it, FieldValue::Null))
        .cloned()
    {
        fields.insert("created_at", created);
    }

    SenderName {
        name: fields.text("name"),
        status: fields.text("status"),
        created_at: fields.text("created_at"),
    }
}

pub fn decode_user(fields: &Fields) -> User {
    User {
        user_id: fields.text("user_id"),
        email: fields.text("email"),
        role: fields.text("role"),
    }
}
