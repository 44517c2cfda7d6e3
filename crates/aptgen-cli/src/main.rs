//! aptgen - Command-line driver for annotation-processing code generation
//!
//! Presents the annotated elements of an element manifest to the built-in
//! processors round by round and writes the requested sources.

use aptgen_spec::SourceVersion;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use aptgen_cli::commands;
use aptgen_cli::config::DriverConfig;
use aptgen_cli::logging;
use aptgen_cli::processors::DEFAULT_MARKER;
use aptgen_cli::session::DEFAULT_MAX_ROUNDS;

/// aptgen - Annotation-Processing Code Generation
#[derive(Parser)]
#[command(name = "aptgen")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Increase diagnostic logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run processors over an element manifest and write generated sources
    Generate {
        /// Path to the element manifest (JSON)
        #[arg(short, long)]
        manifest: String,

        /// Generated-sources directory (overrides -A kapt.kotlin.generated=...)
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Processor option as key=value (repeatable)
        #[arg(short = 'A', value_name = "KEY=VALUE")]
        options: Vec<String>,

        /// Marker annotation observed by the kaptgen processor
        #[arg(long, default_value = DEFAULT_MARKER)]
        marker: String,

        /// Maximum number of processing rounds
        #[arg(long, default_value_t = DEFAULT_MAX_ROUNDS)]
        max_rounds: u32,

        /// Remove everything in the output directory before the first round
        #[arg(long)]
        clean: bool,

        /// Source version (e.g. 8, 1.8, 17); overrides the manifest
        #[arg(long)]
        source_version: Option<SourceVersion>,

        /// Write a JSON report to this path
        #[arg(long)]
        report: Option<String>,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Validate an element manifest without generating anything
    Validate {
        /// Path to the element manifest (JSON)
        #[arg(short, long)]
        manifest: String,

        /// Write a JSON report to this path
        #[arg(long)]
        report: Option<String>,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// List the built-in processors and their capabilities
    Processors {
        /// Marker annotation observed by the kaptgen processor
        #[arg(long, default_value = DEFAULT_MARKER)]
        marker: String,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result = match cli.command {
        Commands::Generate {
            manifest,
            out,
            options,
            marker,
            max_rounds,
            clean,
            source_version,
            report,
            json,
        } => {
            let config = DriverConfig {
                out_dir: out,
                options,
                marker,
                max_rounds,
                clean,
                source_version,
            };
            commands::generate::run(&manifest, &config, report.as_deref(), json)
        }
        Commands::Validate {
            manifest,
            report,
            json,
        } => commands::validate::run(&manifest, report.as_deref(), json),
        Commands::Processors { marker, json } => commands::processors::run(&marker, json),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", colored::Colorize::red("error"), e);
            ExitCode::from(commands::EXIT_INVALID)
        }
    }
}
