//! gRPC Transcoder CLI
//!
//! Command-line interface for generating Istio EnvoyFilter configuration
//! that enables Envoy's gRPC-JSON transcoding for the services found in a
//! compiled proto descriptor set.
//!
//! The rendered document goes to stdout (or `--output`); all progress and
//! warning lines go to stderr so the artifact stays pipeable.

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use colored::*;
use grpc_transcoder_common::FilterParams;
use grpc_transcoder_descriptor::{find_services, DescriptorSource, MatchOutcome};
use grpc_transcoder_generator::EnvoyFilterGenerator;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "grpc-transcoder")]
#[command(version, about = "Generate Istio EnvoyFilter configs for gRPC-JSON transcoding", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate an EnvoyFilter document from a descriptor set
    #[command(after_help = "EXAMPLES:\n  \
        # Generate a filter for the echo workload on port 80\n  \
        grpc-transcoder generate --descriptor ./echo.pb --service echo\n\n  \
        # Restrict to one proto package, pretty-print JSON responses\n  \
        grpc-transcoder generate -d ./all.pb -s echo \\\n    \
        --packages acme.example --services 'Echo.*' --port 8080\n\n  \
        # Write to a file instead of stdout\n  \
        grpc-transcoder generate -d ./echo.pb -s echo -o echo-filter.yaml")]
    Generate {
        /// Path to the binary proto descriptor set
        #[arg(short, long)]
        descriptor: PathBuf,

        /// Value of the `app` label for the EnvoyFilter's workload selector
        #[arg(short, long, default_value = "grpc-transcoder")]
        service: String,

        /// Port the HTTP/JSON -> gRPC transcoding filter should be attached to
        #[arg(short, long, default_value_t = 80)]
        port: u16,

        /// Comma-separated proto package prefixes to include (empty includes all)
        #[arg(long, value_delimiter = ',')]
        packages: Vec<String>,

        /// Comma-separated service name patterns to include (empty includes all)
        #[arg(long, value_delimiter = ',')]
        services: Vec<String>,

        /// JSON pretty printing in transcoded responses
        #[arg(short = 'w', long, default_value_t = true, action = ArgAction::Set)]
        add_whitespace: bool,

        /// Convert gRPC status trailers to JSON error bodies
        #[arg(short = 'c', long, default_value_t = true, action = ArgAction::Set)]
        convert_grpc_status: bool,

        /// Write the document to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List the qualified service names a descriptor set provides
    #[command(after_help = "EXAMPLES:\n  \
        # All services in the descriptor set\n  \
        grpc-transcoder services --descriptor ./all.pb\n\n  \
        # Only services in one package\n  \
        grpc-transcoder services -d ./all.pb --packages acme.example")]
    Services {
        /// Path to the binary proto descriptor set
        #[arg(short, long)]
        descriptor: PathBuf,

        /// Comma-separated proto package prefixes to include (empty includes all)
        #[arg(long, value_delimiter = ',')]
        packages: Vec<String>,

        /// Comma-separated service name patterns to include (empty includes all)
        #[arg(long, value_delimiter = ',')]
        services: Vec<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            descriptor,
            service,
            port,
            packages,
            services,
            add_whitespace,
            convert_grpc_status,
            output,
        } => generate_command(GenerateConfig {
            descriptor: descriptor.as_path(),
            service: &service,
            port,
            packages: &packages,
            services: &services,
            add_whitespace,
            convert_grpc_status,
            output: output.as_deref(),
            verbose: cli.verbose,
        }),

        Commands::Services {
            descriptor,
            packages,
            services,
        } => services_command(descriptor.as_path(), &packages, &services, cli.verbose),
    }
}

/// Configuration for the generate subcommand
struct GenerateConfig<'a> {
    descriptor: &'a Path,
    service: &'a str,
    port: u16,
    packages: &'a [String],
    services: &'a [String],
    add_whitespace: bool,
    convert_grpc_status: bool,
    output: Option<&'a Path>,
    verbose: bool,
}

fn generate_command(config: GenerateConfig) -> Result<()> {
    // Built before any other work; a broken template aborts startup.
    let generator =
        EnvoyFilterGenerator::new().context("failed to build the EnvoyFilter template")?;

    let source = load_descriptor(config.descriptor, config.verbose)?;
    let outcome = find_services(source.set(), config.packages, config.services);
    report_pattern_errors(&outcome);

    if config.verbose {
        eprintln!(
            "{} Matched {} service(s) in {} file(s)",
            "✓".green(),
            outcome.services.len(),
            source.set().file.len()
        );
    }

    let params = FilterParams {
        service_name: config.service.to_string(),
        port_number: config.port,
        proto_services: outcome.services,
        add_whitespace: config.add_whitespace,
        convert_grpc_status: config.convert_grpc_status,
    };

    match config.output {
        Some(path) => {
            generator
                .write_to_path(&params, source.bytes(), path)
                .with_context(|| format!("failed to write EnvoyFilter to {}", path.display()))?;
            eprintln!("{} Wrote EnvoyFilter to {}", "✓".green(), path.display());
        }
        None => {
            let rendered = generator.render(&params, source.bytes())?;
            std::io::stdout()
                .lock()
                .write_all(rendered.as_bytes())
                .context("failed to write EnvoyFilter to stdout")?;
        }
    }

    Ok(())
}

fn services_command(
    descriptor: &Path,
    packages: &[String],
    patterns: &[String],
    verbose: bool,
) -> Result<()> {
    let source = load_descriptor(descriptor, verbose)?;
    let outcome = find_services(source.set(), packages, patterns);
    report_pattern_errors(&outcome);

    for name in &outcome.services {
        println!("{name}");
    }

    Ok(())
}

fn load_descriptor(path: &Path, verbose: bool) -> Result<DescriptorSource> {
    if !path.exists() {
        anyhow::bail!("descriptor file {} does not exist", path.display());
    }

    if verbose {
        eprintln!("{} Reading descriptor set: {}", "→".cyan(), path.display());
    }

    DescriptorSource::from_file(path)
        .with_context(|| format!("failed to load descriptor set {}", path.display()))
}

/// Pattern compilation failures are warnings: matching already completed
/// with the valid subset, and the artifact is still emitted.
fn report_pattern_errors(outcome: &MatchOutcome) {
    if let Some(errors) = &outcome.pattern_errors {
        eprintln!("{} {}", "⚠".yellow(), errors);
    }
}
