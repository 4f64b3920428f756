mod commands;
mod logging;

use clap::{Parser, Subcommand};
use logging::{init_logging, LoggingConfig};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "responder")]
#[command(about = "Publish responder assets and generate transformers", version)]
struct Cli {
    /// Log level filter, overridden by RUST_LOG
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Copy the config file and language files into the application
    Publish {
        /// Application root
        #[arg(long, default_value = ".")]
        base_path: PathBuf,

        /// Only publish these tags (config, lang)
        #[arg(long = "tag")]
        tags: Vec<String>,

        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },

    /// Code generation
    Make {
        #[command(subcommand)]
        make_command: MakeCommands,
    },
}

#[derive(Subcommand)]
enum MakeCommands {
    /// Create a new transformer (make:transformer)
    Transformer {
        /// Transformer name (e.g., Post, BlogPost, post_transformer)
        name: String,

        /// Model the transformer shapes, defaults to the name
        #[arg(long)]
        model: Option<String>,

        /// Application root
        #[arg(long, default_value = ".")]
        base_path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Publish {
            base_path,
            tags,
            force,
        } => {
            commands::publish::run(&base_path, &tags, force)?;
        }
        Commands::Make { make_command } => match make_command {
            MakeCommands::Transformer {
                name,
                model,
                base_path,
                force,
            } => {
                commands::make::transformer(&name, model.as_deref(), &base_path, force)?;
            }
        },
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let logging = LoggingConfig::new(cli.log_level.clone()).with_json_format(cli.log_json);
    if let Err(e) = init_logging(&logging) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
