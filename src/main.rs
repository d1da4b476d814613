//! unmess-mcp: MCP server for the UnmessMe design system
//!
//! Serves design-system tools over stdio, or materialises the benchmark
//! corpora with the `transform` subcommand.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::{error, info, Level};
use tracing_subscriber::EnvFilter;

use unmess_design_mcp::artifacts::{ArtifactLayout, Artifacts};
use unmess_design_mcp::config;
use unmess_design_mcp::error::TransportError;
use unmess_design_mcp::mcp::server::McpServer;
use unmess_design_mcp::transform::{self, Pipeline};

/// MCP server for the UnmessMe design system.
///
/// Exposes component documentation, design tokens, code generation and
/// format benchmarking tools to AI assistants over stdio.
#[derive(Parser, Debug)]
#[command(name = "unmess-mcp")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Design-system root directory
    #[arg(long, value_name = "DIR", env = "DESIGN_SYSTEM_ROOT")]
    root: Option<PathBuf>,

    /// Serve over HTTP/SSE on this port (not supported)
    #[arg(long, value_name = "PORT", env = "MCP_PORT")]
    port: Option<u16>,

    /// Increase logging verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Decrease logging verbosity (only show errors)
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Materialise the benchmark corpora from specs and tokens
    Transform {
        /// Pipeline to run
        #[arg(value_enum)]
        pipeline: PipelineArg,

        /// Output root (defaults to the configured corpus directory)
        #[arg(long, value_name = "DIR")]
        output: Option<PathBuf>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum PipelineArg {
    ToonMd,
    PureMd,
    MonoJson,
    All,
}

impl PipelineArg {
    fn pipelines(self) -> &'static [Pipeline] {
        match self {
            Self::ToonMd => &[Pipeline::ToonMd],
            Self::PureMd => &[Pipeline::PureMd],
            Self::MonoJson => &[Pipeline::MonoJson],
            Self::All => &Pipeline::ALL,
        }
    }
}

/// Determines the log level from CLI arguments.
#[allow(clippy::match_same_arms)] // Explicit "warn" arm for clarity
fn get_log_level(verbose: u8, quiet: bool, config_level: &str) -> Level {
    if quiet {
        return Level::ERROR;
    }

    match verbose {
        0 => match config_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::WARN,
        },
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Initialises the tracing subscriber. stdout is the protocol channel, so
/// logs always go to stderr.
fn init_tracing(level: Level) {
    let filter = EnvFilter::from_default_env().add_directive(level.into());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run_transform(arg: PipelineArg, layout: &ArtifactLayout, output: Option<PathBuf>) -> ExitCode {
    let output_root = output.unwrap_or_else(|| layout.corpus_dir.clone());

    for &pipeline in arg.pipelines() {
        match transform::run(pipeline, &layout.specs_dir, &layout.tokens_dir, &output_root) {
            Ok(report) => {
                eprintln!(
                    "{pipeline}: wrote {} component file(s) and {} token file(s) to {}",
                    report.components.len(),
                    report.tokens.len(),
                    output_root.join(pipeline.test_dir()).display()
                );
            }
            Err(e) => {
                error!(pipeline = %pipeline, error = %e, "Transform failed");
                eprintln!("Transform error ({pipeline}): {e}");
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}

fn run_server(layout: &ArtifactLayout) -> ExitCode {
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Failed to create Tokio runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut server = McpServer::new(Artifacts::new(layout));
    info!("MCP server ready, waiting for client connection...");

    match runtime.block_on(server.run()) {
        Ok(()) => {
            info!("Server shut down gracefully");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Server error");
            ExitCode::FAILURE
        }
    }
}

/// Entry point for the unmess-mcp server.
fn main() -> ExitCode {
    let args = Args::parse();

    let cfg = match config::load_config(args.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let log_level = get_log_level(args.verbose, args.quiet, &cfg.logging.level);
    init_tracing(log_level);

    let layout = cfg.layout(args.root.as_deref());
    info!(
        version = env!("CARGO_PKG_VERSION"),
        specs = %layout.specs_dir.display(),
        tokens = %layout.tokens_dir.display(),
        "Starting unmess-mcp"
    );

    if let Some(Command::Transform { pipeline, output }) = args.command {
        return run_transform(pipeline, &layout, output);
    }

    if let Some(port) = args.port {
        let e = TransportError::Unavailable { port };
        error!(error = %e, "Transport selection failed");
        eprintln!("{e}");
        return ExitCode::FAILURE;
    }

    run_server(&layout)
}
