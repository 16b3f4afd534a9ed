//! Client layer: authenticated HTTP calls against the Evolution API and mapping of results into domain types.

use std::error::Error as StdError;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::config::GatewayConfig;
use crate::domain::{
    ApiKey, ApiResponse, BaseUrl, ConnectCode, ConnectionState, CreateInstance, FetchInstances,
    Instance, InstanceName, NumberCheck, Presence, RecipientId, SendContact, SendLocation,
    SendMediaRef, SendPoll, SendReaction, SendText, ValidationError,
};
use crate::transport::{self, TransportError};

/// Boxed future returned by the crate's object-safe async traits.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Delete,
}

impl HttpMethod {
    fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Delete => "DELETE",
        }
    }
}

#[derive(Debug, Clone)]
struct HttpRequest {
    method: HttpMethod,
    url: String,
    headers: Vec<(&'static str, String)>,
    body: Option<String>,
}

#[derive(Debug, Clone)]
struct HttpResponse {
    status: u16,
    content_type: Option<String>,
    body: String,
}

trait HttpTransport: Send + Sync {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>>;
}

#[derive(Debug, Clone)]
struct ReqwestTransport {
    client: reqwest::Client,
}

impl HttpTransport for ReqwestTransport {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
        Box::pin(async move {
            let method = match request.method {
                HttpMethod::Get => reqwest::Method::GET,
                HttpMethod::Post => reqwest::Method::POST,
                HttpMethod::Delete => reqwest::Method::DELETE,
            };
            let mut builder = self.client.request(method, &request.url);
            for (name, value) in request.headers {
                builder = builder.header(name, value);
            }
            if let Some(body) = request.body {
                builder = builder.body(body);
            }

            let response = builder.send().await?;
            let status = response.status().as_u16();
            let content_type = response
                .headers()
                .get(reqwest::header::CONTENT_TYPE)
                .and_then(|value| value.to_str().ok())
                .map(str::to_owned);
            let body = response.text().await?;
            Ok(HttpResponse {
                status,
                content_type,
                body,
            })
        })
    }
}

#[derive(Debug, thiserror::Error)]
/// Errors returned by [`EvolutionClient`].
///
/// This error preserves:
/// - transport failures (DNS, TLS, timeouts, connection resets),
/// - non-2xx responses with the best message the gateway provided,
/// - encode/parse/validation failures.
pub enum EvolutionError {
    /// HTTP client / transport failure (DNS, TLS, timeouts, etc).
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn StdError + Send + Sync>),

    /// Non-successful HTTP status. `message` is the body's `message` field, or `HTTP <status>`.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// Request body could not be encoded.
    #[error("encode error: {0}")]
    Encode(#[source] TransportError),

    /// Response body could not be parsed as the expected format.
    #[error("parse error: {0}")]
    Parse(#[source] Box<dyn StdError + Send + Sync>),

    /// One of the domain constructors rejected an invalid value.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl EvolutionError {
    /// HTTP status of an [`EvolutionError::Api`] failure.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns `true` when the gateway rejected the API key.
    pub fn is_auth_error(&self) -> bool {
        matches!(self.status(), Some(401 | 403))
    }
}

#[derive(Debug, Clone)]
/// Builder for [`EvolutionClient`].
///
/// Use this when you need to customize the timeout or user-agent.
pub struct EvolutionClientBuilder {
    base_url: BaseUrl,
    api_key: ApiKey,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl EvolutionClientBuilder {
    /// Create a builder with no timeout/user-agent override.
    pub fn new(base_url: BaseUrl, api_key: ApiKey) -> Self {
        Self {
            base_url,
            api_key,
            timeout: None,
            user_agent: None,
        }
    }

    /// Set an HTTP client timeout applied to each entire request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Override the HTTP `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Build an [`EvolutionClient`].
    pub fn build(self) -> Result<EvolutionClient, EvolutionError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(user_agent) = self.user_agent {
            builder = builder.user_agent(user_agent);
        }

        let client = builder
            .build()
            .map_err(|err| EvolutionError::Transport(Box::new(err)))?;

        Ok(EvolutionClient {
            base_url: self.base_url,
            api_key: self.api_key,
            http: Arc::new(ReqwestTransport { client }),
        })
    }
}

#[derive(Clone)]
/// High-level Evolution API client.
///
/// Every request carries the `apikey` header; bodies are JSON. Non-2xx responses become
/// [`EvolutionError::Api`] with the gateway's own message where one is available.
pub struct EvolutionClient {
    base_url: BaseUrl,
    api_key: ApiKey,
    http: Arc<dyn HttpTransport>,
}

impl std::fmt::Debug for EvolutionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvolutionClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl EvolutionClient {
    /// Create a client with default HTTP settings.
    ///
    /// For more customization, use [`EvolutionClient::builder`].
    pub fn new(base_url: BaseUrl, api_key: ApiKey) -> Self {
        Self {
            base_url,
            api_key,
            http: Arc::new(ReqwestTransport {
                client: reqwest::Client::new(),
            }),
        }
    }

    /// Start building a client with custom settings.
    pub fn builder(base_url: BaseUrl, api_key: ApiKey) -> EvolutionClientBuilder {
        EvolutionClientBuilder::new(base_url, api_key)
    }

    /// Build a client from loaded gateway settings.
    pub fn from_config(config: &GatewayConfig) -> Result<Self, EvolutionError> {
        let mut builder = Self::builder(config.base_url.clone(), config.api_key.clone());
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(user_agent) = config.user_agent.as_ref() {
            builder = builder.user_agent(user_agent.clone());
        }
        builder.build()
    }

    pub fn base_url(&self) -> &BaseUrl {
        &self.base_url
    }

    /// Issue a raw API request.
    ///
    /// The body, when present, is sent as `application/json`. A successful response is
    /// decoded as JSON when the server labels it `application/json`, and returned as text
    /// otherwise.
    pub async fn request(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<String>,
    ) -> Result<ApiResponse, EvolutionError> {
        let response = self.execute(method, path, body).await?;
        let is_json = response
            .content_type
            .as_deref()
            .is_some_and(|value| value.contains("application/json"));
        if !is_json {
            return Ok(ApiResponse::Text(response.body));
        }

        serde_json::from_str(&response.body)
            .map(ApiResponse::Json)
            .map_err(|err| EvolutionError::Parse(Box::new(err)))
    }

    async fn execute(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<String>,
    ) -> Result<HttpResponse, EvolutionError> {
        let mut headers = vec![(ApiKey::FIELD, self.api_key.as_str().to_owned())];
        if body.is_some() {
            headers.push(("content-type", "application/json".to_owned()));
        }

        debug!(method = method.as_str(), path, "evolution api request");
        let response = self
            .http
            .execute(HttpRequest {
                method,
                url: self.base_url.join(path),
                headers,
                body,
            })
            .await
            .map_err(EvolutionError::Transport)?;

        if !(200..=299).contains(&response.status) {
            let message = transport::extract_error_message(response.status, &response.body);
            debug!(
                method = method.as_str(),
                path,
                status = response.status,
                %message,
                "evolution api request failed"
            );
            return Err(EvolutionError::Api {
                status: response.status,
                message,
            });
        }

        Ok(response)
    }

    async fn post_json(
        &self,
        path: &str,
        body: Result<String, TransportError>,
    ) -> Result<ApiResponse, EvolutionError> {
        let body = body.map_err(EvolutionError::Encode)?;
        self.request(HttpMethod::Post, path, Some(body)).await
    }

    /// Create a new instance (`POST /instance/create`).
    pub async fn create_instance(
        &self,
        request: &CreateInstance,
    ) -> Result<ApiResponse, EvolutionError> {
        self.post_json(
            "/instance/create",
            transport::encode_create_instance_body(request),
        )
        .await
    }

    /// List instances, optionally filtered by name or id.
    ///
    /// Entries the gateway returns without an `id` or `name` are skipped.
    pub async fn fetch_instances(
        &self,
        filter: &FetchInstances,
    ) -> Result<Vec<Instance>, EvolutionError> {
        let response = self
            .execute(HttpMethod::Get, &transport::fetch_instances_path(filter), None)
            .await?;
        transport::decode_fetch_instances_response(&response.body)
            .map_err(|err| EvolutionError::Parse(Box::new(err)))
    }

    /// Ask the gateway for a QR code (or a pairing code when `number` is given).
    pub async fn instance_connect(
        &self,
        instance: &InstanceName,
        number: Option<&RecipientId>,
    ) -> Result<ConnectCode, EvolutionError> {
        let response = self
            .execute(
                HttpMethod::Get,
                &transport::instance_connect_path(instance, number),
                None,
            )
            .await?;
        transport::decode_connect_response(&response.body)
            .map_err(|err| EvolutionError::Parse(Box::new(err)))
    }

    pub async fn instance_restart(
        &self,
        instance: &InstanceName,
    ) -> Result<ApiResponse, EvolutionError> {
        let path = format!("/instance/restart/{}", instance.as_str());
        self.request(HttpMethod::Post, &path, None).await
    }

    pub async fn instance_logout(
        &self,
        instance: &InstanceName,
    ) -> Result<ApiResponse, EvolutionError> {
        let path = format!("/instance/logout/{}", instance.as_str());
        self.request(HttpMethod::Delete, &path, None).await
    }

    pub async fn instance_delete(
        &self,
        instance: &InstanceName,
    ) -> Result<ApiResponse, EvolutionError> {
        let path = format!("/instance/delete/{}", instance.as_str());
        self.request(HttpMethod::Delete, &path, None).await
    }

    pub async fn connection_state(
        &self,
        instance: &InstanceName,
    ) -> Result<ConnectionState, EvolutionError> {
        let path = format!("/instance/connectionState/{}", instance.as_str());
        let response = self.execute(HttpMethod::Get, &path, None).await?;
        transport::decode_connection_state_response(&response.body)
            .map_err(|err| EvolutionError::Parse(Box::new(err)))
    }

    pub async fn set_presence(
        &self,
        instance: &InstanceName,
        presence: Presence,
    ) -> Result<ApiResponse, EvolutionError> {
        let path = format!("/instance/setPresence/{}", instance.as_str());
        self.post_json(&path, transport::encode_presence_body(presence))
            .await
    }

    /// Send a plain text message.
    pub async fn send_text(
        &self,
        instance: &InstanceName,
        request: &SendText,
    ) -> Result<ApiResponse, EvolutionError> {
        let path = format!("/message/sendText/{}", instance.as_str());
        self.post_json(&path, transport::encode_text_body(request))
            .await
    }

    pub async fn send_location(
        &self,
        instance: &InstanceName,
        request: &SendLocation,
    ) -> Result<ApiResponse, EvolutionError> {
        let path = format!("/message/sendLocation/{}", instance.as_str());
        self.post_json(&path, transport::encode_location_body(request))
            .await
    }

    pub async fn send_contact(
        &self,
        instance: &InstanceName,
        request: &SendContact,
    ) -> Result<ApiResponse, EvolutionError> {
        let path = format!("/message/sendContact/{}", instance.as_str());
        self.post_json(&path, transport::encode_contact_body(request))
            .await
    }

    pub async fn send_poll(
        &self,
        instance: &InstanceName,
        request: &SendPoll,
    ) -> Result<ApiResponse, EvolutionError> {
        let path = format!("/message/sendPoll/{}", instance.as_str());
        self.post_json(&path, transport::encode_poll_body(request))
            .await
    }

    pub async fn send_sticker(
        &self,
        instance: &InstanceName,
        request: &SendMediaRef,
    ) -> Result<ApiResponse, EvolutionError> {
        let path = format!("/message/sendSticker/{}", instance.as_str());
        self.post_json(&path, transport::encode_sticker_body(request))
            .await
    }

    pub async fn send_whatsapp_audio(
        &self,
        instance: &InstanceName,
        request: &SendMediaRef,
    ) -> Result<ApiResponse, EvolutionError> {
        let path = format!("/message/sendWhatsAppAudio/{}", instance.as_str());
        self.post_json(&path, transport::encode_audio_body(request))
            .await
    }

    pub async fn send_reaction(
        &self,
        instance: &InstanceName,
        request: &SendReaction,
    ) -> Result<ApiResponse, EvolutionError> {
        let path = format!("/message/sendReaction/{}", instance.as_str());
        self.post_json(&path, transport::encode_reaction_body(request))
            .await
    }

    /// Check which numbers have a WhatsApp account, in one round trip.
    ///
    /// Errors:
    /// - [`EvolutionError::Api`] for non-2xx responses,
    /// - [`EvolutionError::Parse`] when the body is not an array of checks.
    pub async fn check_whatsapp_numbers(
        &self,
        instance: &InstanceName,
        numbers: &[RecipientId],
    ) -> Result<Vec<NumberCheck>, EvolutionError> {
        let body =
            transport::encode_whatsapp_numbers_body(numbers).map_err(EvolutionError::Encode)?;
        let path = format!("/chat/whatsappNumbers/{}", instance.as_str());
        let response = self.execute(HttpMethod::Post, &path, Some(body)).await?;
        transport::decode_whatsapp_numbers_response(&response.body)
            .map_err(|err| EvolutionError::Parse(Box::new(err)))
    }
}
