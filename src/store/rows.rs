use crate::domain::{Account, Message, SenderName, Transaction, User};

use super::{Row, StoreError};

/// Table mapping of a record type.
pub trait Persist {
    const TABLE: &'static str;
    /// Natural key column.
    const KEY: &'static str;

    fn key(&self) -> Option<&str>;

    fn columns(&self) -> Vec<(&'static str, Option<String>)>;

    fn row(&self) -> Result<Row, StoreError> {
        let key = self.key().ok_or(StoreError::MissingKey {
            table: Self::TABLE,
            column: Self::KEY,
        })?;

        Ok(Row {
            table: Self::TABLE,
            key_column: Self::KEY,
            key: key.to_owned(),
            columns: self.columns(),
        })
    }
}

impl Persist for Message {
    const TABLE: &'static str = "semaphore_messages";
    const KEY: &'static str = "message_id";

    fn key(&self) -> Option<&str> {
        self.message_id.as_deref()
    }

    fn columns(&self) -> Vec<(&'static str, Option<String>)> {
        vec![
            ("user_id", self.user_id.clone()),
            ("user", self.user.clone()),
            ("account_id", self.account_id.clone()),
            ("account", self.account.clone()),
            ("recipient", self.recipient.clone()),
            ("message", self.message.clone()),
            ("code", self.code.clone()),
            ("sender_name", self.sender_name.clone()),
            ("network", self.network.clone()),
            ("status", self.status.as_ref().map(|it| it.as_str().to_owned())),
            ("type", self.message_type.as_ref().map(|it| it.as_str().to_owned())),
            ("source", self.source.as_ref().map(|it| it.as_str().to_owned())),
            ("created_at", self.created_at.clone()),
            ("updated_at", self.updated_at.clone()),
        ]
    }
}

impl Persist for Account {
    const TABLE: &'static str = "semaphore_accounts";
    const KEY: &'static str = "account_id";

    fn key(&self) -> Option<&str> {
        Some(&self.account_id)
    }

    fn columns(&self) -> Vec<(&'static str, Option<String>)> {
        vec![
            ("account_name", Some(self.account_name.clone())),
            ("status", Some(self.status.clone())),
            ("credit_balance", Some(self.credit_balance.clone())),
        ]
    }
}

impl Persist for Transaction {
    const TABLE: &'static str = "semaphore_transactions";
    const KEY: &'static str = "id";

    fn key(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn columns(&self) -> Vec<(&'static str, Option<String>)> {
        vec![
            ("user_id", self.user_id.clone()),
            ("user", self.user.clone()),
            ("account_name", self.account_name.clone()),
            ("status", self.status.clone()),
            ("transaction_method", self.transaction_method.clone()),
            ("external_transaction_id", self.external_transaction_id.clone()),
            ("amount", self.amount.clone()),
            ("credit_value", self.credit_value.clone()),
            ("created_at", self.created_at.clone()),
            ("updated_at", self.updated_at.clone()),
        ]
    }
}

impl Persist for SenderName {
    const TABLE: &'static str = "semaphore_sender_names";
    const KEY: &'static str = "name";

    fn key(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn columns(&self) -> Vec<(&'static str, Option<String>)> {
        vec![
            ("status", self.status.clone()),
            ("created_at", self.created_at.clone()),
        ]
    }
}

// Users get their own table; they share no columns with accounts.
impl Persist for User {
    const TABLE: &'static str = "semaphore_users";
    const KEY: &'static str = "user_id";

    fn key(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    fn columns(&self) -> Vec<(&'static str, Option<String>)> {
        vec![("email", self.email.clone()), ("role", self.role.clone())]
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::{MessageStatus, MessageType};

    use super::*;

    #[test]
    fn message_row_uses_canonical_enum_values() {
        let message = Message {
            message_id: Some("1".to_owned()),
            status: Some(MessageStatus::from_wire("Pending")),
            message_type: Some(MessageType::Bulk),
            ..Message::default()
        };

        let row = message.row().unwrap();
        assert_eq!(row.table, "semaphore_messages");
        assert_eq!(row.key_column, "message_id");
        assert_eq!(row.key, "1");
        assert!(row.columns.contains(&("status", Some("pending".to_owned()))));
        assert!(row.columns.contains(&("type", Some("bulk".to_owned()))));
        assert!(row.columns.contains(&("code", None)));
    }

    #[test]
    fn rows_require_a_natural_key() {
        assert_eq!(
            Transaction::default().row(),
            Err(StoreError::MissingKey {
                table: "semaphore_transactions",
                column: "id",
            })
        );
        assert!(SenderName::default().row().is_err());
    }

    #[test]
    fn accounts_and_users_use_separate_tables() {
        assert_ne!(Account::TABLE, User::TABLE);
    }
}
