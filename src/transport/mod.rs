//! Transport layer: HTTP and wire-format details (serialization/deserialization).

mod body;
mod encode;
mod fields;
mod records;

pub use body::{ResponseBody, decode_body, validate_response};
pub use encode::{
    Credentials, encode_list_query, encode_message_query, encode_otp_fields, encode_send_fields,
    merge_credentials,
};
pub use fields::Fields;
pub use records::{
    decode_account, decode_message, decode_sender_name, decode_transaction, decode_user,
    is_message_object,
};
