#![forbid(unsafe_code)]
#![doc = r#"
Serving Chat

Send chat completions to a hosted model-serving endpoint and print what comes back.

Crate highlights
- Library: `ChatCompletionClient::complete(model, messages, max_tokens)` posts one
  request to `{base_url}/chat/completions` with bearer auth and returns the raw JSON payload.
- Errors: every failure is one of `Authentication`, `Network`, `InvalidRequest`, `RateLimit`.
  Nothing is retried.
- Binary (`serving-chat`): reads credentials from the environment and prints the
  response as indented JSON.

Modules
- `models`: request/response types for the Chat Completions API.
- `client`: HTTP client and transport options.
- `credentials`: API key + endpoint, and where to find them in the environment.
- `error`: error taxonomy and HTTP status classification.
- `run_config`: JSON run configuration used by the binary.
- `util`: shared helpers (tracing, env).
"#]

pub mod client;
pub mod credentials;
pub mod error;
pub mod models;
pub mod run_config;
pub mod util;

pub use crate::client::{ChatCompletionClient, ClientOptions, ProxySettings};
pub use crate::credentials::{ClientCredentials, MissingCredential};
pub use crate::error::{ClientError, ErrorKind};
pub use crate::models::{ChatMessage, CompletionRequest, CompletionResponse, Role};
