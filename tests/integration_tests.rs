/// Integration tests against a real serving endpoint
///
/// These tests make actual API calls to validate the client end-to-end.
///
/// SETUP:
/// 1. Configure required environment variables in .env:
///    DATABRICKS_SERVING_ENDPOINT=https://<workspace>/serving-endpoints  (or OPENAI_BASE_URL)
///    DATABRICKS_TOKEN=dapi...                                           (or OPENAI_API_KEY)
///    MODEL=databricks-dbrx-instruct                                     (optional)
///
/// 2. Run tests with --ignored flag:
///    cargo test --test integration_tests -- --ignored --nocapture
///
/// NOTES:
/// - These tests are marked #[ignore] to prevent accidental API calls
/// - Tests skip when credentials are missing
/// - These tests will consume API credits
use serving_chat::run_config::DEFAULT_MODEL;
use serving_chat::{ChatCompletionClient, ChatMessage, ClientCredentials, ClientOptions, ErrorKind};
use std::env;

/// Load .env and resolve credentials, or explain why the test is skipped.
fn live_credentials() -> Option<ClientCredentials> {
    match dotenvy::dotenv() {
        Ok(path) => eprintln!("Env debug -> loaded .env from: {}", path.display()),
        Err(_) => eprintln!("Env debug -> no .env loaded; using process environment"),
    }

    match ClientCredentials::from_env() {
        Ok(creds) => {
            eprintln!("Env debug -> credentials: {creds:?}");
            Some(creds)
        }
        Err(e) => {
            eprintln!("⚠️  Skipping live tests: {e}");
            eprintln!("    Example .env:");
            eprintln!("      DATABRICKS_SERVING_ENDPOINT=https://<workspace>/serving-endpoints");
            eprintln!("      DATABRICKS_TOKEN=dapi...");
            None
        }
    }
}

fn get_model() -> String {
    env::var("MODEL")
        .ok()
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| DEFAULT_MODEL.to_string())
}

#[tokio::test]
#[ignore]
async fn test_live_mixture_of_experts_question() {
    let Some(creds) = live_credentials() else {
        return;
    };
    let client = ChatCompletionClient::with_options(creds, ClientOptions::from_env())
        .expect("client builds");

    let messages = vec![
        ChatMessage::system("You are a helpful assistant."),
        ChatMessage::user("What is a mixture of experts model?"),
    ];
    let resp = client
        .complete(&get_model(), &messages, Some(256))
        .await
        .expect("live completion");

    println!("{}", resp.to_pretty_json());
    assert!(resp.content().is_some_and(|c| !c.is_empty()));
}

#[tokio::test]
#[ignore]
async fn test_live_unknown_model_is_rejected() {
    let Some(creds) = live_credentials() else {
        return;
    };
    let client = ChatCompletionClient::new(creds).expect("client builds");

    let err = client
        .complete(
            "serving-chat-no-such-model",
            &[ChatMessage::user("ping")],
            Some(8),
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidRequest, "{err}");
}
