use tracing_subscriber::{fmt, EnvFilter};

/// Load dotenv and initialize structured tracing based on RUST_LOG.
///
/// - Explicit env file paths via ENV_FILE or DOTENV_PATH win
/// - Falls back to default `.env` discovery from the working directory
/// - Existing process variables are never overwritten
/// - Logs go to stderr; stdout is reserved for command output
pub fn init_tracing() {
    let mut env_source: String = "none".into();
    for key in ["ENV_FILE", "DOTENV_PATH"] {
        if let Some(p) = env_nonempty(key) {
            if std::path::Path::new(&p).is_file() && dotenvy::from_filename(&p).is_ok() {
                env_source = format!("{p} ({key})");
                break;
            }
        }
    }

    if env_source == "none" {
        if let Ok(path) = dotenvy::dotenv() {
            env_source = path.display().to_string();
        }
    }

    // Initialize tracing (respects RUST_LOG potentially provided by the env file)
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into());
    let subscriber = fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    tracing::debug!("Environment loaded from: {}", env_source);
}

/// Read an environment variable, treating unset and blank the same.
pub fn env_nonempty(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Truthy environment flag: 1, true, yes, on (case-insensitive).
pub fn env_flag(key: &str) -> bool {
    env_nonempty(key)
        .map(|v| v.to_ascii_lowercase())
        .map(|v| v == "1" || v == "true" || v == "yes" || v == "on")
        .unwrap_or(false)
}
