use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Empty { field: &'static str },
    TooManyRecipients { max: usize, actual: usize },
    InvalidPhoneNumber { input: String },
    LimitOutOfRange { min: u16, max: u16, actual: u16 },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{field} must not be empty"),
            Self::TooManyRecipients { max, actual } => {
                write!(f, "too many recipients: {actual} (max {max})")
            }
            Self::InvalidPhoneNumber { input } => write!(f, "invalid phone number: {input}"),
            Self::LimitOutOfRange { min, max, actual } => {
                write!(f, "limit out of range: {actual} (expected {min}..={max})")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Request rejected by Semaphore, or a record the API did not return.
///
/// `status` follows HTTP conventions: `400` for field errors reported by the
/// provider, `404` when an expected record is absent from the response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidRequest {
    pub status: u16,
    pub message: String,
}

impl InvalidRequest {
    pub const BAD_REQUEST: u16 = 400;
    pub const NOT_FOUND: u16 = 404;

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: Self::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: Self::NOT_FOUND,
            message: message.into(),
        }
    }
}

impl fmt::Display for InvalidRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.status)
    }
}

impl std::error::Error for InvalidRequest {}
