use crate::domain::{ApiKey, InvalidRequest, RawPhoneNumber, SenderId};

use super::fields::{FieldValue, Fields};

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("invalid JSON response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unexpected response shape: expected {expected}")]
    UnexpectedShape { expected: &'static str },
}

/// Decoded response body, handed explicitly from the transport call to the parsers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseBody {
    /// JSON array of objects.
    Sequence(Vec<Fields>),
    /// JSON object; an empty body or `null` decodes to an empty object.
    Object(Fields),
}

/// Top-level keys whose list value marks a field-error envelope, in lookup order.
const ERROR_KEYS: [&str; 3] = [ApiKey::FIELD, RawPhoneNumber::FIELD, SenderId::FIELD];

pub fn decode_body(json: &str) -> Result<ResponseBody, TransportError> {
    if json.trim().is_empty() {
        return Ok(ResponseBody::Object(Fields::default()));
    }

    match serde_json::from_str::<FieldValue>(json)? {
        FieldValue::List(items) => items
            .into_iter()
            .map(|item| match item {
                FieldValue::Map(fields) => Ok(fields),
                _ => Err(TransportError::UnexpectedShape {
                    expected: "array of objects",
                }),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(ResponseBody::Sequence),
        FieldValue::Map(fields) => Ok(ResponseBody::Object(fields)),
        FieldValue::Null => Ok(ResponseBody::Object(Fields::default())),
        _ => Err(TransportError::UnexpectedShape {
            expected: "JSON object or array",
        }),
    }
}

/// Detect Semaphore's field-error envelope, e.g. `{"number": ["The number field is required."]}`.
///
/// Only the `apikey`, `number` and `sendername` keys are inspected; any other error
/// shape passes through.
pub fn validate_response(body: &ResponseBody) -> Result<(), InvalidRequest> {
    let ResponseBody::Object(fields) = body else {
        return Ok(());
    };

    for key in ERROR_KEYS {
        if let Some(FieldValue::List(errors)) = fields.get(key) {
            let message = errors
                .iter()
                .filter_map(FieldValue::as_text)
                .collect::<Vec<_>>()
                .join(", ");
            return Err(InvalidRequest::bad_request(message));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_array_of_objects_in_order() {
        let body = decode_body(r#"[{"message_id": 1}, {"message_id": 2}]"#).unwrap();
        let ResponseBody::Sequence(items) = body else {
            panic!("expected sequence");
        };
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].text("message_id").as_deref(), Some("1"));
        assert_eq!(items[1].text("message_id").as_deref(), Some("2"));
    }

    #[test]
    fn empty_and_null_bodies_decode_to_empty_object() {
        assert_eq!(
            decode_body("  ").unwrap(),
            ResponseBody::Object(Fields::default())
        );
        assert_eq!(
            decode_body("null").unwrap(),
            ResponseBody::Object(Fields::default())
        );
        assert_eq!(decode_body("[]").unwrap(), ResponseBody::Sequence(Vec::new()));
    }

    #[test]
    fn rejects_scalars_and_mixed_arrays() {
        assert!(matches!(
            decode_body("\"oops\""),
            Err(TransportError::UnexpectedShape { .. })
        ));
        assert!(matches!(
            decode_body(r#"[{"a": 1}, 2]"#),
            Err(TransportError::UnexpectedShape { .. })
        ));
        assert!(matches!(
            decode_body("{ not json }"),
            Err(TransportError::Json(_))
        ));
    }

    #[test]
    fn field_error_envelope_becomes_bad_request() {
        let body = decode_body(r#"{"number": ["The number field is required."]}"#).unwrap();
        let err = validate_response(&body).unwrap_err();
        assert_eq!(err.status, 400);
        assert_eq!(err.message, "The number field is required.");
    }

    #[test]
    fn envelope_messages_are_joined() {
        let body = decode_body(
            r#"{"apikey": ["The apikey field is required.", "The apikey is invalid."]}"#,
        )
        .unwrap();
        let err = validate_response(&body).unwrap_err();
        assert_eq!(
            err.message,
            "The apikey field is required., The apikey is invalid."
        );
    }

    #[test]
    fn other_shapes_pass_through() {
        let scalar_value = decode_body(r#"{"number": "09171234567"}"#).unwrap();
        assert!(validate_response(&scalar_value).is_ok());

        let unknown_key = decode_body(r#"{"message": ["too long"]}"#).unwrap();
        assert!(validate_response(&unknown_key).is_ok());

        let sequence = decode_body(r#"[{"number": ["x"]}]"#).unwrap();
        assert!(validate_response(&sequence).is_ok());
    }
}
