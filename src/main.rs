use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use dts_rewrap::diagnostic::report_parse_error;
use dts_rewrap::{Config, GenerateError, Project};

#[derive(Parser, Debug)]
#[command(
    name = "dts-rewrap",
    version,
    about = "Regenerate the wrapped TypeScript compiler declaration module"
)]
struct Cli {
    /// Project root
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Configuration file (defaults to <root>/dts-rewrap.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Compiler declaration file, overriding discovery
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output module path, relative to the root
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

fn init_tracing(debug: bool) {
    // DTS_REWRAP_LOG overrides the default unless --debug is given
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("DTS_REWRAP_LOG").unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_level(true),
        )
        .init();
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from_path(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => Config::load_or_default(&cli.root)?,
    };
    if let Some(input) = &cli.input {
        config.input = Some(input.clone());
    }
    if let Some(output) = &cli.output {
        config.output = output.clone();
    }
    Ok(config)
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = load_config(cli)?;
    let project = Project::with_config(&cli.root, config)?;
    let written = project
        .regenerate()
        .with_context(|| format!("regenerating from {}", project.compiler_path().display()))?;
    tracing::info!("done: {}", written.display());
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if let Some(GenerateError::Parse { path, text, source }) =
                err.downcast_ref::<GenerateError>()
            {
                report_parse_error(&path.display().to_string(), text, source);
            }
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
