//! routesmith CLI entrypoint
//! Reads generation requests and feeds them to the driver.
#![deny(unsafe_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, bail};
use clap::Parser;
use tracing::{Level, info};
use tracing_subscriber::EnvFilter;

use routesmith::application::{
    CommandExecutor, DispatchOutcome, GenerationDriver, ProjectStore, RequestCall, RunSummary,
    declarations,
};
use routesmith::core::Config;
use routesmith::infrastructure::{
    FileSystemProjectStore, MemoryProjectStore, RecordingCommandExecutor, ShellCommandExecutor,
    TeraTemplateRenderer,
};

#[derive(Parser)]
#[command(name = "routesmith")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file (defaults to <config dir>/routesmith/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory new projects are created in
    #[arg(long, global = true)]
    base_dir: Option<PathBuf>,

    /// Environment variable that must be set before anything runs (repeatable)
    #[arg(long = "require-env", global = true)]
    require_env: Vec<String>,

    /// Abort timeout baked into generated service modules, in milliseconds
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    /// Keep every file in memory and run no external tools
    #[arg(long, global = true)]
    dry_run: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Run a stream of requests from a JSON array or JSON Lines file ("-" for stdin)
    Run {
        file: PathBuf,
    },
    /// Run a single request
    Call {
        /// Request name, e.g. generate_controller
        name: String,
        /// Request arguments as a JSON object
        #[arg(long, default_value = "{}")]
        args: String,
    },
    /// Print the request declarations as JSON
    Declarations,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .init();

    if let Commands::Declarations = cli.command {
        let declarations = serde_json::Value::Array(declarations());
        println!("{}", serde_json::to_string_pretty(&declarations)?);
        return Ok(());
    }

    let config = load_config(&cli)?;

    let calls = match &cli.command {
        Commands::Run { file } => read_calls(file)?,
        Commands::Call { name, args } => {
            let args = serde_json::from_str(args)
                .with_context(|| format!("Arguments for '{name}' are not valid JSON"))?;
            vec![RequestCall::new(name.clone(), args)]
        }
        Commands::Declarations => Vec::new(),
    };

    info!(
        requests = calls.len(),
        base_dir = %config.base_dir.display(),
        dry_run = cli.dry_run,
        "Starting routesmith"
    );

    let renderer = Arc::new(TeraTemplateRenderer::new().context("Failed to load templates")?);

    if cli.dry_run {
        let store = Arc::new(MemoryProjectStore::new());
        let executor = Arc::new(RecordingCommandExecutor::new());
        let driver = GenerationDriver::new(config, renderer, store.clone(), executor.clone());
        let summary = driver.run(calls).await;
        report(&summary);

        for command in executor.calls() {
            println!(
                "would run: {} {} (in {})",
                command.program,
                command.args.join(" "),
                command.working_dir.display()
            );
        }
        for (path, content) in store.files().await {
            println!("would write: {} ({} bytes)", path.display(), content.len());
        }
    } else {
        let store: Arc<dyn ProjectStore> = Arc::new(FileSystemProjectStore::new());
        let executor: Arc<dyn CommandExecutor> = Arc::new(ShellCommandExecutor::new());
        let driver = GenerationDriver::new(config, renderer, store, executor);
        let summary = driver.run(calls).await;
        report(&summary);
    }

    Ok(())
}

/// Defaults, then the TOML file, then `ROUTESMITH_*` variables, then flags.
/// Missing required environment variables abort before any request runs.
fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let env = |name: &str| std::env::var(name).ok();

    let mut config = Config::load(cli.config.as_deref())
        .context("Failed to load configuration")?
        .with_env_overrides(env)
        .context("Invalid environment configuration")?;

    if let Some(base_dir) = &cli.base_dir {
        config.base_dir = base_dir.clone();
    }
    if let Some(timeout_ms) = cli.timeout_ms {
        config.service_timeout_ms = timeout_ms;
    }
    config.required_env.extend(cli.require_env.iter().cloned());

    config
        .check_required_env(env)
        .context("Required environment is incomplete")?;
    Ok(config)
}

/// Accepts either a JSON array of calls or one call per line
fn read_calls(file: &Path) -> anyhow::Result<Vec<RequestCall>> {
    let raw = if file == Path::new("-") {
        std::io::read_to_string(std::io::stdin()).context("Failed to read requests from stdin")?
    } else {
        std::fs::read_to_string(file)
            .with_context(|| format!("Failed to read requests from {}", file.display()))?
    };

    let trimmed = raw.trim_start();
    if trimmed.is_empty() {
        bail!("No requests found in {}", file.display());
    }

    if trimmed.starts_with('[') {
        return serde_json::from_str(trimmed)
            .with_context(|| format!("{} is not a JSON array of requests", file.display()));
    }

    raw.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            serde_json::from_str(line)
                .with_context(|| format!("{}:{} is not a valid request", file.display(), idx + 1))
        })
        .collect()
}

fn report(summary: &RunSummary) {
    for outcome in &summary.outcomes {
        match outcome {
            DispatchOutcome::Completed { request, paths } => {
                if paths.is_empty() {
                    println!("completed {request}");
                }
                for path in paths {
                    println!("completed {request}: {}", path.display());
                }
            }
            DispatchOutcome::Skipped { request, reason } => {
                println!("skipped {request}: {reason}");
            }
        }
    }
    println!(
        "{} completed, {} skipped",
        summary.completed(),
        summary.skipped()
    );
}
