use anyhow::{bail, Context, Result};
use serving_chat::run_config::RunConfig;
use serving_chat::util::init_tracing;
use serving_chat::{ChatCompletionClient, ClientCredentials, ClientOptions};
use std::env;

const USAGE: &str = "Usage: serving-chat [PROMPT] [--config=run.json] [--model=ID] [--system=TEXT] [--max-tokens=N|--no-max-tokens]";

/// Command-line overrides applied on top of the run config.
#[derive(Debug, Default, PartialEq, Eq)]
struct CliArgs {
    config_path: Option<String>,
    model: Option<String>,
    system_prompt: Option<String>,
    user_prompt: Option<String>,
    max_tokens: Option<Option<u32>>,
    help: bool,
}

fn parse_args(args: &[String]) -> Result<CliArgs> {
    let mut cli = CliArgs::default();
    for arg in args.iter().skip(1) {
        if arg == "-h" || arg == "--help" {
            cli.help = true;
        } else if let Some(v) = arg.strip_prefix("--config=") {
            cli.config_path = Some(v.to_string());
        } else if let Some(v) = arg.strip_prefix("--model=") {
            cli.model = Some(v.to_string());
        } else if let Some(v) = arg.strip_prefix("--system=") {
            cli.system_prompt = Some(v.to_string());
        } else if let Some(v) = arg.strip_prefix("--max-tokens=") {
            let n: u32 = v
                .trim()
                .parse()
                .with_context(|| format!("--max-tokens expects a positive integer, got {v:?}"))?;
            cli.max_tokens = Some(Some(n));
        } else if arg == "--no-max-tokens" {
            cli.max_tokens = Some(None);
        } else if arg.starts_with("--") {
            bail!("unknown flag {arg}\n{USAGE}");
        } else if cli.user_prompt.is_none() {
            cli.user_prompt = Some(arg.clone());
        } else {
            bail!("unexpected extra argument {arg:?}\n{USAGE}");
        }
    }
    Ok(cli)
}

fn resolve_run_config(cli: CliArgs) -> Result<RunConfig> {
    let mut config = match &cli.config_path {
        Some(path) => {
            tracing::info!("Loading run configuration from: {}", path);
            RunConfig::load_from_file(path)?
        }
        None => RunConfig::default(),
    };

    if let Some(model) = cli.model {
        config.model = model;
    }
    if let Some(system) = cli.system_prompt {
        config.system_prompt = system;
    }
    if let Some(prompt) = cli.user_prompt {
        config.user_prompt = prompt;
    }
    if let Some(max_tokens) = cli.max_tokens {
        config.max_tokens = max_tokens;
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let args: Vec<String> = env::args().collect();
    let cli = parse_args(&args)?;
    if cli.help {
        println!("{USAGE}");
        return Ok(());
    }
    let config = resolve_run_config(cli)?;

    let credentials =
        ClientCredentials::from_env().context("Serving endpoint credentials not configured")?;
    let client = ChatCompletionClient::with_options(credentials, ClientOptions::from_env())?;
    tracing::info!(
        "Querying {} at {}",
        config.model,
        client.endpoint()
    );

    let response = client
        .complete(&config.model, &config.messages(), config.max_tokens)
        .await?;

    println!("{}", response.to_pretty_json());
    Ok(())
}
