use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use snooze_bridge::prompt::build_intent_prompt;
use snooze_bridge::{ApiServerBuilder, Config, GeminiClient, ReplyGenerator, SpeechLauncher};

/// Snooze Bridge - turns short intents into spoken wake-up replies
#[derive(Parser)]
#[command(name = "snooze-bridge", version, about)]
struct Cli {
    /// Port to listen on (overrides config)
    #[arg(long)]
    port: Option<u16>,

    /// Address to bind (overrides config)
    #[arg(long)]
    host: Option<String>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a reply for an intent and print it, without speaking
    Ask {
        /// Intent, e.g. "pep talk"
        intent: String,
    },
    /// Run the speech synthesis script on the given text
    Speak {
        /// Text to speak
        #[arg(default_value = "Hello! This is a test of the speech script.")]
        text: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let dotenv = dotenvy::dotenv();

    let cli = Cli::parse();

    // RUST_LOG wins over -v
    let filter = match cli.verbose {
        0 => "info,snooze_bridge=info",
        1 => "info,snooze_bridge=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    if let Some(problem) = dotenv_problem(&dotenv) {
        tracing::debug!(error = %problem, "ignoring .env file");
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Describe a `.env` load failure worth reporting; a missing file is normal
fn dotenv_problem(result: &Result<PathBuf, dotenvy::Error>) -> Option<String> {
    match result {
        Err(e) if !e.not_found() => Some(e.to_string()),
        _ => None,
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = Config::load();
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    tracing::debug!(?config, "loaded configuration");

    match cli.command {
        Some(Command::Ask { intent }) => ask(&config, &intent).await,
        Some(Command::Speak { text }) => speak(&config, &text).await,
        None => serve(config).await,
    }
}

async fn serve(config: Config) -> anyhow::Result<()> {
    let generator = GeminiClient::new(config.api_keys.require_google()?, &config.llm)?;
    let speech = SpeechLauncher::from_config(&config.speech, &config.api_keys);

    if config.api_keys.elevenlabs.is_none() {
        tracing::warn!("ELEVENLABS_API_KEY not set, speech script may fail");
    }

    tracing::info!(
        port = config.server.port,
        model = %config.llm.model,
        "starting snooze bridge"
    );

    ApiServerBuilder::new(Arc::new(generator), speech)
        .host(config.server.host)
        .port(config.server.port)
        .build()
        .run()
        .await?;

    Ok(())
}

/// Generate a reply only
async fn ask(config: &Config, intent: &str) -> anyhow::Result<()> {
    let intent = intent.trim();
    anyhow::ensure!(!intent.is_empty(), "no intent provided");

    let generator = GeminiClient::new(config.api_keys.require_google()?, &config.llm)?;
    let reply = generator.generate(&build_intent_prompt(intent)).await?;

    println!("{reply}");
    Ok(())
}

/// Run the synthesis script directly
async fn speak(config: &Config, text: &str) -> anyhow::Result<()> {
    let launcher = SpeechLauncher::from_config(&config.speech, &config.api_keys);
    let runtime = config.speech.runtime.resolve()?;

    println!("Runtime: {}", runtime.display());
    println!("Script: {}", launcher.script().display());
    println!("Speaking: \"{text}\"\n");

    let run = launcher.speak(text).await?;

    println!("----- stdout -----\n{}", run.stdout.trim_end());
    println!("----- stderr -----\n{}", run.stderr.trim_end());
    println!("----- exit code: {} -----", run.exit_code);

    Ok(())
}
