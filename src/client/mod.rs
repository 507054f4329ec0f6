//! Client layer: orchestrates transport calls, response validation, parsing and persistence.

use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;
use url::Url;

use crate::config::{DEFAULT_BASE_URL, SemaphoreConfig};
use crate::domain::{
    Account, ApiKey, Collection, InvalidRequest, ListQuery, Message, MessageId, MessageQuery,
    MessageText, RawPhoneNumber, SendMessage, SenderId, SenderName, Transaction, User,
    ValidationError,
};
use crate::store::{
    BoxFuture, MemoryStore, Persist, Persisted, RecordStore, SqliteStore, StoreError, persist,
};
use crate::transport::{self, Credentials, Fields, ResponseBody};

pub type MessageCollection = Collection<Persisted<Message>>;
pub type TransactionCollection = Collection<Persisted<Transaction>>;
pub type SenderNameCollection = Collection<Persisted<SenderName>>;
pub type UserCollection = Collection<Persisted<User>>;

const MESSAGES_PATH: &str = "messages";
const PRIORITY_PATH: &str = "priority";
const OTP_PATH: &str = "otp";
const ACCOUNT_PATH: &str = "account";
const TRANSACTIONS_PATH: &str = "transactions";
const SENDER_NAMES_PATH: &str = "sendernames";
const USERS_PATH: &str = "users";

#[derive(Debug, Clone)]
struct HttpResponse {
    status: u16,
    body: String,
}

trait HttpTransport: Send + Sync {
    fn post_json<'a>(
        &'a self,
        url: &'a str,
        params: Vec<(String, String)>,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>>;

    fn get_query<'a>(
        &'a self,
        url: &'a str,
        params: Vec<(String, String)>,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>>;
}

#[derive(Debug, Clone)]
struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    async fn read(
        request: reqwest::RequestBuilder,
    ) -> Result<HttpResponse, Box<dyn StdError + Send + Sync>> {
        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(HttpResponse { status, body })
    }
}

impl HttpTransport for ReqwestTransport {
    fn post_json<'a>(
        &'a self,
        url: &'a str,
        params: Vec<(String, String)>,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
        Box::pin(async move {
            let body = params
                .into_iter()
                .map(|(key, value)| (key, serde_json::Value::String(value)))
                .collect::<serde_json::Map<_, _>>();
            Self::read(self.client.post(url).json(&body)).await
        })
    }

    fn get_query<'a>(
        &'a self,
        url: &'a str,
        params: Vec<(String, String)>,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
        Box::pin(async move { Self::read(self.client.get(url).query(&params)).await })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Method {
    Get,
    Post,
}

#[derive(Debug, thiserror::Error)]
/// Errors returned by [`SemaphoreClient`].
///
/// Store failures never surface here; they are reported through [`Persisted::Unsaved`].
pub enum SemaphoreError {
    /// HTTP client / transport failure (DNS, TLS, timeouts, etc).
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn StdError + Send + Sync>),

    /// Non-successful HTTP status code that did not carry a field-error envelope.
    #[error("unexpected HTTP status: {status}")]
    HttpStatus { status: u16, body: Option<String> },

    /// Semaphore rejected the request, or the expected record was absent.
    #[error("invalid request: {0}")]
    InvalidRequest(#[from] InvalidRequest),

    /// Response body could not be parsed as the expected format.
    #[error("parse error: {0}")]
    Parse(#[source] Box<dyn StdError + Send + Sync>),

    /// One of the domain constructors rejected an invalid value.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The configured base URL cannot carry endpoint paths.
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),

    /// The configured database could not be opened. Only returned while building a client.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl SemaphoreError {
    /// HTTP-like status of an [`SemaphoreError::InvalidRequest`] or [`SemaphoreError::HttpStatus`].
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::InvalidRequest(err) => Some(err.status),
            Self::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Clone)]
/// Builder for [`SemaphoreClient`].
///
/// Use this when you need to customize the base URL, sender name, timeout, or store.
pub struct SemaphoreClientBuilder {
    api_key: ApiKey,
    sender_name: Option<SenderId>,
    base_url: String,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    store: Option<Arc<dyn RecordStore>>,
}

impl fmt::Debug for SemaphoreClientBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SemaphoreClientBuilder")
            .field("sender_name", &self.sender_name)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .field("custom_store", &self.store.is_some())
            .finish_non_exhaustive()
    }
}

impl SemaphoreClientBuilder {
    /// Create a builder with the default base URL, no sender name and an in-memory store.
    pub fn new(api_key: ApiKey) -> Self {
        Self {
            api_key,
            sender_name: None,
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: None,
            user_agent: None,
            store: None,
        }
    }

    /// Seed a builder from loaded configuration. The store is left to the caller.
    pub fn from_config(config: &SemaphoreConfig) -> Result<Self, SemaphoreError> {
        let mut builder = Self::new(ApiKey::new(config.api_key.as_str())?)
            .base_url(config.base_url.as_str());
        if let Some(sender) = config.sender_name.as_deref() {
            builder = builder.sender_name(SenderId::new(sender)?);
        }
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        Ok(builder)
    }

    /// Default sender name merged into every request.
    pub fn sender_name(mut self, sender_name: SenderId) -> Self {
        self.sender_name = Some(sender_name);
        self
    }

    /// Override the API base URL (defaults to `https://api.semaphore.co/api/v4/`).
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set an HTTP client timeout applied to the entire request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Override the HTTP `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Store that parsed records are mirrored into.
    pub fn store(mut self, store: impl RecordStore + 'static) -> Self {
        self.store = Some(Arc::new(store));
        self
    }

    /// Share a store with other clients.
    pub fn shared_store(mut self, store: Arc<dyn RecordStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Build a [`SemaphoreClient`].
    pub fn build(self) -> Result<SemaphoreClient, SemaphoreError> {
        let base_url = parse_base_url(&self.base_url)?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(user_agent) = self.user_agent {
            builder = builder.user_agent(user_agent);
        }

        let client = builder
            .build()
            .map_err(|err| SemaphoreError::Transport(Box::new(err)))?;

        Ok(SemaphoreClient {
            credentials: Credentials {
                api_key: self.api_key,
                sender_name: self.sender_name,
            },
            base_url,
            http: Arc::new(ReqwestTransport { client }),
            store: self
                .store
                .unwrap_or_else(|| Arc::new(MemoryStore::new())),
        })
    }
}

#[derive(Clone)]
/// High-level Semaphore client.
///
/// Every operation issues one request, validates the response for Semaphore's
/// field-error envelope, parses the body into records and mirrors each record into
/// the configured [`RecordStore`].
pub struct SemaphoreClient {
    credentials: Credentials,
    base_url: Url,
    http: Arc<dyn HttpTransport>,
    store: Arc<dyn RecordStore>,
}

impl SemaphoreClient {
    /// Start building a client with custom settings.
    pub fn builder(api_key: ApiKey) -> SemaphoreClientBuilder {
        SemaphoreClientBuilder::new(api_key)
    }

    /// Build a client from loaded configuration.
    ///
    /// When `database` is set, records are mirrored into that SQLite file (created and
    /// migrated on first use); otherwise they stay in memory.
    pub async fn from_config(config: &SemaphoreConfig) -> Result<Self, SemaphoreError> {
        let builder = SemaphoreClientBuilder::from_config(config)?;
        let builder = match config.database.as_deref() {
            Some(path) => builder.store(SqliteStore::open(path).await?),
            None => builder,
        };
        builder.build()
    }

    /// Send a message to one or many recipients (`POST messages`).
    ///
    /// Returns `None` when Semaphore answers with an object that is not a message list.
    pub async fn send(
        &self,
        request: SendMessage,
    ) -> Result<Option<MessageCollection>, SemaphoreError> {
        let body = self
            .call(
                Method::Post,
                &[MESSAGES_PATH],
                transport::encode_send_fields(&request),
            )
            .await?;
        Ok(self.collect(body, transport::decode_message).await)
    }

    /// Send a one-time password (`POST otp`).
    ///
    /// Put `{otp}` in `message` to choose where the code goes; otherwise Semaphore
    /// appends it. The generated code is returned in [`Message::code`].
    pub async fn otp(
        &self,
        number: RawPhoneNumber,
        message: MessageText,
    ) -> Result<Option<MessageCollection>, SemaphoreError> {
        let body = self
            .call(
                Method::Post,
                &[OTP_PATH],
                transport::encode_otp_fields(&number, &message),
            )
            .await?;
        Ok(self.collect(body, transport::decode_message).await)
    }

    /// Send through the priority queue (`POST priority`).
    pub async fn priority(
        &self,
        request: SendMessage,
    ) -> Result<Option<MessageCollection>, SemaphoreError> {
        let body = self
            .call(
                Method::Post,
                &[PRIORITY_PATH],
                transport::encode_send_fields(&request),
            )
            .await?;
        Ok(self.collect(body, transport::decode_message).await)
    }

    /// Fetch one message by id (`GET messages/{id}`).
    ///
    /// Errors:
    /// - [`SemaphoreError::InvalidRequest`] with status 404 when no message is returned.
    pub async fn find(&self, id: &MessageId) -> Result<Persisted<Message>, SemaphoreError> {
        let body = self
            .call(Method::Get, &[MESSAGES_PATH, id.as_str()], Vec::new())
            .await?;

        let body = match body {
            ResponseBody::Object(fields) if transport::is_message_object(&fields) => {
                ResponseBody::Sequence(vec![fields])
            }
            other => other,
        };

        self.collect(body, transport::decode_message)
            .await
            .and_then(Collection::into_first)
            .ok_or_else(|| InvalidRequest::not_found("Message Not Found").into())
    }

    /// Re-fetch a message that is still pending; anything else is returned unchanged.
    pub async fn refresh(
        &self,
        message: Persisted<Message>,
    ) -> Result<Persisted<Message>, SemaphoreError> {
        let pending_id = Some(message.record())
            .filter(|record| record.is_pending())
            .and_then(|record| record.message_id.clone());

        match pending_id {
            Some(id) => self.find(&MessageId::new(id)?).await,
            None => Ok(message),
        }
    }

    /// List sent messages (`GET messages`).
    pub async fn messages(&self) -> Result<Option<MessageCollection>, SemaphoreError> {
        self.messages_matching(&MessageQuery::default()).await
    }

    /// List sent messages with filters (`GET messages`).
    pub async fn messages_matching(
        &self,
        query: &MessageQuery,
    ) -> Result<Option<MessageCollection>, SemaphoreError> {
        let body = self
            .call(
                Method::Get,
                &[MESSAGES_PATH],
                transport::encode_message_query(query),
            )
            .await?;
        Ok(self.collect(body, transport::decode_message).await)
    }

    /// Fetch account details (`GET account`).
    ///
    /// Errors:
    /// - [`SemaphoreError::InvalidRequest`] with status 404 when any account field is
    ///   missing; nothing is persisted in that case.
    pub async fn account(&self) -> Result<Persisted<Account>, SemaphoreError> {
        let body = self.call(Method::Get, &[ACCOUNT_PATH], Vec::new()).await?;

        let fields = match body {
            ResponseBody::Object(fields) => fields,
            ResponseBody::Sequence(_) => Fields::default(),
        };
        let account = transport::decode_account(&fields)?;
        Ok(persist(self.store.as_ref(), account).await)
    }

    /// List account transactions (`GET account/transactions`).
    pub async fn transactions(
        &self,
        query: &ListQuery,
    ) -> Result<Option<TransactionCollection>, SemaphoreError> {
        let body = self
            .call(
                Method::Get,
                &[ACCOUNT_PATH, TRANSACTIONS_PATH],
                transport::encode_list_query(query),
            )
            .await?;
        Ok(self.collect(body, transport::decode_transaction).await)
    }

    /// List sender names registered on the account (`GET account/sendernames`).
    pub async fn sender_names(
        &self,
        query: &ListQuery,
    ) -> Result<Option<SenderNameCollection>, SemaphoreError> {
        let body = self
            .call(
                Method::Get,
                &[ACCOUNT_PATH, SENDER_NAMES_PATH],
                transport::encode_list_query(query),
            )
            .await?;
        Ok(self.collect(body, transport::decode_sender_name).await)
    }

    /// List users of the account (`GET account/users`).
    pub async fn users(&self, query: &ListQuery) -> Result<Option<UserCollection>, SemaphoreError> {
        let body = self
            .call(
                Method::Get,
                &[ACCOUNT_PATH, USERS_PATH],
                transport::encode_list_query(query),
            )
            .await?;
        Ok(self.collect(body, transport::decode_user).await)
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // `parse_base_url` rejects URLs that cannot be a base, so this always applies.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn call(
        &self,
        method: Method,
        segments: &[&str],
        fields: Vec<(String, String)>,
    ) -> Result<ResponseBody, SemaphoreError> {
        let url = self.endpoint(segments);
        let params = transport::merge_credentials(fields, &self.credentials);

        debug!(?method, endpoint = url.path(), "sending request");
        let response = match method {
            Method::Get => self.http.get_query(url.as_str(), params).await,
            Method::Post => self.http.post_json(url.as_str(), params).await,
        }
        .map_err(SemaphoreError::Transport)?;
        debug!(status = response.status, "received response");

        interpret_response(response)
    }

    async fn collect<T: Persist>(
        &self,
        body: ResponseBody,
        decode: fn(&Fields) -> T,
    ) -> Option<Collection<Persisted<T>>> {
        let ResponseBody::Sequence(items) = body else {
            return None;
        };

        let mut collection = Collection::new();
        for fields in &items {
            collection.add(persist(self.store.as_ref(), decode(fields)).await);
        }
        Some(collection)
    }
}

/// Envelope validation runs first so field errors win over the HTTP status.
fn interpret_response(response: HttpResponse) -> Result<ResponseBody, SemaphoreError> {
    let success = (200..=299).contains(&response.status);

    match transport::decode_body(&response.body) {
        Ok(body) => {
            transport::validate_response(&body)?;
            if !success {
                return Err(http_status_error(response));
            }
            Ok(body)
        }
        Err(err) if success => Err(SemaphoreError::Parse(Box::new(err))),
        Err(_) => Err(http_status_error(response)),
    }
}

fn http_status_error(response: HttpResponse) -> SemaphoreError {
    let body = if response.body.trim().is_empty() {
        None
    } else {
        Some(response.body)
    };
    SemaphoreError::HttpStatus {
        status: response.status,
        body,
    }
}

fn parse_base_url(raw: &str) -> Result<Url, SemaphoreError> {
    let url = Url::parse(raw)?;
    if url.cannot_be_a_base() {
        return Err(SemaphoreError::InvalidBaseUrl(
            url::ParseError::RelativeUrlWithCannotBeABaseBase,
        ));
    }
    Ok(url)
}
