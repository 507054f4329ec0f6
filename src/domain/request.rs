use chrono::NaiveDate;

use crate::domain::record::MessageStatus;
use crate::domain::validation::ValidationError;
use crate::domain::value::{MessageText, RawPhoneNumber};

/// Semaphore accepts up to 1,000 comma-separated numbers per bulk send.
pub const SEND_MAX_RECIPIENTS: usize = 1000;

/// One or more recipients of a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recipients {
    One(RawPhoneNumber),
    Many(Vec<RawPhoneNumber>),
}

impl Recipients {
    pub fn one(number: RawPhoneNumber) -> Self {
        Self::One(number)
    }

    pub fn many(numbers: Vec<RawPhoneNumber>) -> Result<Self, ValidationError> {
        if numbers.is_empty() {
            return Err(ValidationError::Empty {
                field: RawPhoneNumber::FIELD,
            });
        }
        if numbers.len() > SEND_MAX_RECIPIENTS {
            return Err(ValidationError::TooManyRecipients {
                max: SEND_MAX_RECIPIENTS,
                actual: numbers.len(),
            });
        }
        Ok(Self::Many(numbers))
    }

    pub fn as_slice(&self) -> &[RawPhoneNumber] {
        match self {
            Self::One(number) => std::slice::from_ref(number),
            Self::Many(numbers) => numbers,
        }
    }

    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }

    /// Wire form of the `number` field: numbers joined by `,` in the given order.
    pub fn joined(&self) -> String {
        self.as_slice()
            .iter()
            .map(RawPhoneNumber::raw)
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl From<RawPhoneNumber> for Recipients {
    fn from(value: RawPhoneNumber) -> Self {
        Self::One(value)
    }
}

#[derive(Debug, Clone)]
pub struct SendMessage {
    recipients: Recipients,
    message: MessageText,
}

impl SendMessage {
    pub fn new(recipients: impl Into<Recipients>, message: MessageText) -> Self {
        Self {
            recipients: recipients.into(),
            message,
        }
    }

    pub fn to_many(
        numbers: Vec<RawPhoneNumber>,
        message: MessageText,
    ) -> Result<Self, ValidationError> {
        Ok(Self::new(Recipients::many(numbers)?, message))
    }

    pub fn recipients(&self) -> &Recipients {
        &self.recipients
    }

    pub fn message(&self) -> &MessageText {
        &self.message
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Page size for list endpoints (`limit`).
///
/// Invariant: `1..=1000`. Semaphore defaults to 100 when omitted.
pub struct Limit(u16);

impl Limit {
    /// Field name used by Semaphore (`limit`).
    pub const FIELD: &'static str = "limit";

    pub const MIN: u16 = 1;
    pub const MAX: u16 = 1000;

    pub fn new(value: u16) -> Result<Self, ValidationError> {
        if !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(ValidationError::LimitOutOfRange {
                min: Self::MIN,
                max: Self::MAX,
                actual: value,
            });
        }
        Ok(Self(value))
    }

    pub fn value(self) -> u16 {
        self.0
    }
}

/// Pagination filters shared by the list endpoints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub limit: Option<Limit>,
    pub page: Option<u32>,
}

impl ListQuery {
    pub fn page(page: u32) -> Self {
        Self {
            page: Some(page),
            ..Self::default()
        }
    }

    pub fn with_limit(mut self, limit: Limit) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Filters accepted by `GET messages`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageQuery {
    pub list: ListQuery,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Lowercase network name, e.g. `globe` or `smart`.
    pub network: Option<String>,
    pub status: Option<MessageStatus>,
}
