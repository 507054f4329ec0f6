use crate::domain::{
    ApiKey, Limit, ListQuery, MessageQuery, MessageText, RawPhoneNumber, SendMessage, SenderId,
};

const PAGE_FIELD: &str = "page";
const START_DATE_FIELD: &str = "startDate";
const END_DATE_FIELD: &str = "endDate";
const NETWORK_FIELD: &str = "network";
const STATUS_FIELD: &str = "status";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Fields attached to every request.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub api_key: ApiKey,
    pub sender_name: Option<SenderId>,
}

/// Append the credentials to the caller's fields.
///
/// On a name collision the credential wins and the caller's value is dropped.
pub fn merge_credentials(
    mut params: Vec<(String, String)>,
    credentials: &Credentials,
) -> Vec<(String, String)> {
    let mut merged = vec![(
        ApiKey::FIELD.to_owned(),
        credentials.api_key.as_str().to_owned(),
    )];
    if let Some(sender) = credentials.sender_name.as_ref() {
        merged.push((SenderId::FIELD.to_owned(), sender.as_str().to_owned()));
    }

    params.retain(|(key, _)| !merged.iter().any(|(name, _)| name == key));
    params.extend(merged);
    params
}

pub fn encode_send_fields(request: &SendMessage) -> Vec<(String, String)> {
    vec![
        (
            RawPhoneNumber::FIELD.to_owned(),
            request.recipients().joined(),
        ),
        (
            MessageText::FIELD.to_owned(),
            request.message().as_str().to_owned(),
        ),
    ]
}

pub fn encode_otp_fields(number: &RawPhoneNumber, message: &MessageText) -> Vec<(String, String)> {
    vec![
        (RawPhoneNumber::FIELD.to_owned(), number.raw().to_owned()),
        (MessageText::FIELD.to_owned(), message.as_str().to_owned()),
    ]
}

pub fn encode_list_query(query: &ListQuery) -> Vec<(String, String)> {
    let mut params = Vec::<(String, String)>::new();
    if let Some(limit) = query.limit {
        params.push((Limit::FIELD.to_owned(), limit.value().to_string()));
    }
    if let Some(page) = query.page {
        params.push((PAGE_FIELD.to_owned(), page.to_string()));
    }
    params
}

pub fn encode_message_query(query: &MessageQuery) -> Vec<(String, String)> {
    let mut params = encode_list_query(&query.list);
    if let Some(start) = query.start_date {
        params.push((
            START_DATE_FIELD.to_owned(),
            start.format(DATE_FORMAT).to_string(),
        ));
    }
    if let Some(end) = query.end_date {
        params.push((
            END_DATE_FIELD.to_owned(),
            end.format(DATE_FORMAT).to_string(),
        ));
    }
    if let Some(network) = query.network.as_ref() {
        params.push((NETWORK_FIELD.to_owned(), network.to_lowercase()));
    }
    if let Some(status) = query.status.as_ref() {
        params.push((STATUS_FIELD.to_owned(), status.as_str().to_owned()));
    }
    params
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use crate::domain::{MessageStatus, Recipients};

    use super::*;

    fn credentials(sender: Option<&str>) -> Credentials {
        Credentials {
            api_key: ApiKey::new("secret").unwrap(),
            sender_name: sender.map(|name| SenderId::new(name).unwrap()),
        }
    }

    fn pair(key: &str, value: &str) -> (String, String) {
        (key.to_owned(), value.to_owned())
    }

    #[test]
    fn credentials_are_appended_after_caller_fields() {
        let merged = merge_credentials(vec![pair("number", "0917")], &credentials(Some("SHOP")));
        assert_eq!(
            merged,
            vec![
                pair("number", "0917"),
                pair("apikey", "secret"),
                pair("sendername", "SHOP"),
            ]
        );
    }

    #[test]
    fn credentials_win_on_collision() {
        let merged = merge_credentials(
            vec![pair("sendername", "OTHER"), pair("apikey", "mine")],
            &credentials(Some("SHOP")),
        );
        assert_eq!(merged, vec![pair("apikey", "secret"), pair("sendername", "SHOP")]);
    }

    #[test]
    fn missing_sender_name_is_omitted() {
        let merged = merge_credentials(Vec::new(), &credentials(None));
        assert_eq!(merged, vec![pair("apikey", "secret")]);
    }

    #[test]
    fn send_fields_join_recipients() {
        let numbers = vec![
            RawPhoneNumber::new("09171234567").unwrap(),
            RawPhoneNumber::new("09181234567").unwrap(),
            RawPhoneNumber::new("09191234567").unwrap(),
        ];
        let request = SendMessage::new(
            Recipients::many(numbers).unwrap(),
            MessageText::new("hello").unwrap(),
        );
        assert_eq!(
            encode_send_fields(&request),
            vec![
                pair("number", "09171234567,09181234567,09191234567"),
                pair("message", "hello"),
            ]
        );
    }

    #[test]
    fn otp_fields_keep_placeholder() {
        let params = encode_otp_fields(
            &RawPhoneNumber::new("09171234567").unwrap(),
            &MessageText::new("Your code is {otp}").unwrap(),
        );
        assert_eq!(
            params,
            vec![pair("number", "09171234567"), pair("message", "Your code is {otp}")]
        );
    }

    #[test]
    fn empty_queries_add_nothing() {
        assert!(encode_list_query(&ListQuery::default()).is_empty());
        assert!(encode_message_query(&MessageQuery::default()).is_empty());
    }

    #[test]
    fn message_query_encodes_all_filters() {
        let query = MessageQuery {
            list: ListQuery::page(2).with_limit(Limit::new(500).unwrap()),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1),
            end_date: NaiveDate::from_ymd_opt(2024, 1, 31),
            network: Some("Globe".to_owned()),
            status: Some(MessageStatus::Pending),
        };
        assert_eq!(
            encode_message_query(&query),
            vec![
                pair("limit", "500"),
                pair("page", "2"),
                pair("startDate", "2024-01-01"),
                pair("endDate", "2024-01-31"),
                pair("network", "globe"),
                pair("status", "pending"),
            ]
        );
    }
}
