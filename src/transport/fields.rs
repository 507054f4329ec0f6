use std::collections::BTreeMap;

use serde::Deserialize;
use serde::de::Error as DeError;

/// One JSON value from a Semaphore response.
///
/// Numbers keep their raw JSON token to avoid formatting drift
/// (`10.00` remains `"10.00"` instead of becoming `"10.0"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Number(String),
    Text(String),
    List(Vec<FieldValue>),
    Map(Fields),
}

impl FieldValue {
    /// Scalar value rendered as text; `None` for null, lists and maps.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Self::Text(value) | Self::Number(value) => Some(value.clone()),
            Self::Bool(value) => Some(value.to_string()),
            Self::Null | Self::List(_) | Self::Map(_) => None,
        }
    }
}

impl<'de> Deserialize<'de> for FieldValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw: Box<serde_json::value::RawValue> = Deserialize::deserialize(deserializer)?;
        let token = raw.get();

        match token.as_bytes().first().copied() {
            Some(b'"') => serde_json::from_str::<String>(token)
                .map(Self::Text)
                .map_err(D::Error::custom),
            Some(b'-' | b'0'..=b'9') => Ok(Self::Number(token.to_owned())),
            Some(b't' | b'f') => serde_json::from_str::<bool>(token)
                .map(Self::Bool)
                .map_err(D::Error::custom),
            Some(b'n') => Ok(Self::Null),
            Some(b'[') => serde_json::from_str::<Vec<FieldValue>>(token)
                .map(Self::List)
                .map_err(D::Error::custom),
            Some(b'{') => serde_json::from_str::<Fields>(token)
                .map(Self::Map)
                .map_err(D::Error::custom),
            _ => Err(D::Error::custom("unsupported JSON value")),
        }
    }
}

/// Field map of one JSON object, validated before it is mapped into a record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Fields(BTreeMap<String, FieldValue>);

impl Fields {
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.0.get(name)
    }

    /// Scalar field as text. Missing, null and structured values yield `None`.
    pub fn text(&self, name: &str) -> Option<String> {
        self.get(name).and_then(FieldValue::as_text)
    }

    /// Present and not null.
    pub fn is_set(&self, name: &str) -> bool {
        !matches!(self.get(name), None | Some(FieldValue::Null))
    }

    pub fn insert(&mut self, name: impl Into<String>, value: FieldValue) {
        self.0.insert(name.into(), value);
    }
}

impl FromIterator<(String, FieldValue)> for Fields {
    fn from_iter<I: IntoIterator<Item = (String, FieldValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
