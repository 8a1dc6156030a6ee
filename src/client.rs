use std::time::{Duration, Instant};

use reqwest::header::{HeaderMap, HeaderValue, RETRY_AFTER};
use reqwest::Url;
use uuid::Uuid;

use crate::credentials::ClientCredentials;
use crate::error::ClientError;
use crate::models::{ChatMessage, CompletionRequest, CompletionResponse};
use crate::util::{env_flag, env_nonempty};

const CHAT_COMPLETIONS_PATH: &str = "chat/completions";
const REQUEST_ID_HEADER: &str = "x-request-id";

/// Transport settings for the underlying HTTP client.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Overall per-request timeout. `None` waits for the endpoint indefinitely.
    pub timeout: Option<Duration>,
    pub user_agent: String,
    pub proxy: ProxySettings,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ProxySettings {
    /// reqwest's default: honour the system proxy variables.
    #[default]
    System,
    /// Never use a proxy.
    Disabled,
    /// Route every scheme through this proxy URL.
    All(String),
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout: None,
            user_agent: format!("serving-chat/{}", env!("CARGO_PKG_VERSION")),
            proxy: ProxySettings::System,
        }
    }
}

impl ClientOptions {
    /// Build options from environment variables.
    ///
    /// Environment:
    /// - SERVING_CHAT_HTTP_TIMEOUT_SECONDS      -> overall request timeout (u64)
    /// - SERVING_CHAT_NO_PROXY = 1|true|yes|on  -> disable all proxies
    /// - SERVING_CHAT_PROXY_URL = <url>         -> proxy for all schemes
    ///
    /// HTTP_PROXY / HTTPS_PROXY keep working through reqwest's system proxy
    /// detection unless proxies are disabled.
    pub fn from_env() -> Self {
        let mut options = Self::default();

        if let Some(secs) = env_nonempty("SERVING_CHAT_HTTP_TIMEOUT_SECONDS") {
            match secs.parse::<u64>() {
                Ok(n) if n > 0 => options.timeout = Some(Duration::from_secs(n)),
                _ => tracing::warn!(
                    "Ignoring SERVING_CHAT_HTTP_TIMEOUT_SECONDS={:?}: expected a positive integer",
                    secs
                ),
            }
        }

        if env_flag("SERVING_CHAT_NO_PROXY") {
            options.proxy = ProxySettings::Disabled;
        } else if let Some(url) = env_nonempty("SERVING_CHAT_PROXY_URL") {
            options.proxy = ProxySettings::All(url);
        }

        options
    }

    fn build_http_client(&self) -> Result<reqwest::Client, ClientError> {
        let mut builder = reqwest::Client::builder().user_agent(self.user_agent.clone());

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        builder = match &self.proxy {
            ProxySettings::System => builder,
            ProxySettings::Disabled => builder.no_proxy(),
            ProxySettings::All(url) => {
                let proxy = reqwest::Proxy::all(url.as_str()).map_err(|e| {
                    ClientError::invalid_request(format!("invalid proxy URL {url:?}: {e}"))
                })?;
                builder.proxy(proxy)
            }
        };

        builder
            .build()
            .map_err(|e| ClientError::network(format!("failed to build HTTP client: {e}")))
    }
}

/// Client for a single chat-completions endpoint.
///
/// Holds no per-call state: clones share one connection pool and calls may
/// run concurrently without coordination.
#[derive(Debug, Clone)]
pub struct ChatCompletionClient {
    http: reqwest::Client,
    credentials: ClientCredentials,
    endpoint: Url,
}

impl ChatCompletionClient {
    pub fn new(credentials: ClientCredentials) -> Result<Self, ClientError> {
        Self::with_options(credentials, ClientOptions::default())
    }

    pub fn with_options(
        credentials: ClientCredentials,
        options: ClientOptions,
    ) -> Result<Self, ClientError> {
        let endpoint = completions_url(credentials.base_url())?;
        let http = options.build_http_client()?;
        Ok(Self {
            http,
            credentials,
            endpoint,
        })
    }

    /// Full URL requests are posted to.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Send one chat completion and return the endpoint's payload.
    ///
    /// Credentials and input are checked before anything goes on the wire: a
    /// blank or unsendable API key fails with `Authentication`, malformed input with
    /// `InvalidRequest`. Otherwise exactly one request is made and never
    /// retried.
    pub async fn complete(
        &self,
        model: &str,
        messages: &[ChatMessage],
        max_tokens: Option<u32>,
    ) -> Result<CompletionResponse, ClientError> {
        let request = CompletionRequest::new(model, messages.to_vec(), max_tokens);
        self.send(&request).await
    }

    /// Same as [`complete`](Self::complete) for an already assembled request.
    pub async fn send(&self, request: &CompletionRequest) -> Result<CompletionResponse, ClientError> {
        if self.credentials.api_key().trim().is_empty() {
            return Err(ClientError::authentication("API key is empty"));
        }
        if HeaderValue::from_str(&format!("Bearer {}", self.credentials.api_key())).is_err() {
            return Err(ClientError::authentication(
                "API key is not a valid header value",
            ));
        }
        request.validate()?;

        let request_id = Uuid::new_v4();
        tracing::debug!(
            %request_id,
            endpoint = %self.endpoint,
            model = %request.model,
            messages = request.messages.len(),
            max_tokens = ?request.max_tokens,
            "Sending chat completion"
        );

        let started = Instant::now();
        let result = self.execute(request_id, request).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match &result {
            Ok(resp) => tracing::info!(
                %request_id,
                model = %request.model,
                elapsed_ms,
                completion_id = resp.id().unwrap_or("-"),
                "Chat completion succeeded"
            ),
            Err(e) => tracing::warn!(
                %request_id,
                model = %request.model,
                elapsed_ms,
                kind = ?e.kind(),
                status = ?e.status(),
                "Chat completion failed: {}",
                e
            ),
        }

        result
    }

    async fn execute(
        &self,
        request_id: Uuid,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, ClientError> {
        let response = self
            .http
            .post(self.endpoint.clone())
            .bearer_auth(self.credentials.api_key())
            .header(REQUEST_ID_HEADER, request_id.to_string())
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let retry_after = parse_retry_after(response.headers());
        let body = response.bytes().await?;

        if !status.is_success() {
            return Err(ClientError::from_status(status.as_u16(), &body, retry_after));
        }

        CompletionResponse::from_slice(&body)
    }
}

/// Join the chat-completions path onto the base URL, ignoring a trailing `/`.
///
/// Base URLs carrying a query or fragment are rejected; the path is appended
/// to, never replaced.
fn completions_url(base_url: &str) -> Result<Url, ClientError> {
    let trimmed = base_url.trim();
    if trimmed.is_empty() {
        return Err(ClientError::invalid_request("base URL is empty"));
    }

    let mut base = Url::parse(trimmed)
        .map_err(|e| ClientError::invalid_request(format!("invalid base URL {trimmed:?}: {e}")))?;
    if !matches!(base.scheme(), "http" | "https") {
        return Err(ClientError::invalid_request(format!(
            "unsupported base URL scheme {:?}",
            base.scheme()
        )));
    }
    if base.query().is_some() || base.fragment().is_some() {
        return Err(ClientError::invalid_request(format!(
            "base URL {trimmed:?} must not carry a query or fragment"
        )));
    }
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }

    base.join(CHAT_COMPLETIONS_PATH)
        .map_err(|e| ClientError::invalid_request(format!("invalid base URL {trimmed:?}: {e}")))
}

/// `Retry-After` in its delay-seconds form; HTTP-date values are ignored.
fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}
