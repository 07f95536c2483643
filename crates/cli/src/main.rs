//! AuditCalc CLI - Main entry point

use auditcalc_cli::commands::{self, MaterialityArgs};
use auditcalc_cli::AppContext;
use auditcalc_core::{BenchmarkType, ConfidenceLevel};
use auditcalc_sampling::{AttributeInput, ClassicalInput, MusInput, SamplingInput};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "auditcalc")]
#[command(about = "AuditCalc - materiality and sampling calculations", long_about = None)]
struct Cli {
    /// SQLite ledger path (overrides AUDITCALC_DB and the config file)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Materiality thresholds and their version history
    Materiality {
        #[command(subcommand)]
        action: MaterialityCommand,
    },

    /// Required sample sizes
    Sampling {
        #[command(subcommand)]
        method: SamplingCommand,
    },

    /// Recommended percentages for an industry and benchmark
    Guidance {
        /// Industry name (e.g. retail, "financial services")
        industry: String,
        /// Benchmark type
        benchmark: BenchmarkType,
    },
}

#[derive(Subcommand)]
enum MaterialityCommand {
    /// Compute thresholds without saving
    Compute {
        #[command(flatten)]
        args: MaterialityArgs,
    },

    /// Compute and save a new version
    Save {
        /// Engagement ID
        #[arg(long)]
        engagement: String,
        /// Current version ID you are editing (omit for the first save)
        #[arg(long)]
        expected_version: Option<String>,
        /// Who is saving
        #[arg(long)]
        author: String,
        #[command(flatten)]
        args: MaterialityArgs,
    },

    /// Approve a specific version
    Approve {
        /// Version ID (MAT-...)
        version_id: String,
        #[arg(long)]
        approver: String,
    },

    /// List all versions for an engagement
    History {
        #[arg(long)]
        engagement: String,
    },
}

#[derive(Subcommand)]
enum SamplingCommand {
    /// Monetary unit sampling
    Mus {
        #[arg(long)]
        population_value: Option<Decimal>,
        #[arg(long)]
        tolerable_error: Option<Decimal>,
        #[arg(long, default_value = "0")]
        expected_misstatements: u32,
        /// 90, 95 or 99
        #[arg(long, default_value = "95")]
        confidence: ConfidenceLevel,
    },

    /// Classical variables sampling
    Classical {
        #[arg(long)]
        population_size: Option<u64>,
        #[arg(long)]
        population_value: Option<Decimal>,
        #[arg(long)]
        tolerable_error: Option<Decimal>,
        #[arg(long, default_value = "95")]
        confidence: ConfidenceLevel,
    },

    /// Attribute sampling
    Attribute {
        #[arg(long)]
        population_size: Option<u64>,
        /// Expected deviation rate in percent
        #[arg(long)]
        expected_error_rate: Option<Decimal>,
        #[arg(long, default_value = "95")]
        confidence: ConfidenceLevel,
    },
}

impl SamplingCommand {
    fn into_input(self) -> SamplingInput {
        match self {
            SamplingCommand::Mus {
                population_value,
                tolerable_error,
                expected_misstatements,
                confidence,
            } => SamplingInput::Mus(MusInput {
                population_value,
                tolerable_error,
                expected_misstatements,
                confidence_level: confidence,
            }),
            SamplingCommand::Classical {
                population_size,
                population_value,
                tolerable_error,
                confidence,
            } => SamplingInput::ClassicalVariables(ClassicalInput {
                population_size,
                population_value,
                tolerable_error,
                confidence_level: confidence,
            }),
            SamplingCommand::Attribute {
                population_size,
                expected_error_rate,
                confidence,
            } => SamplingInput::Attribute(AttributeInput {
                population_size,
                expected_error_rate,
                confidence_level: confidence,
            }),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so --json output stays parseable
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let mut ctx = AppContext::new(cli.db, cli.config.as_deref(), cli.json)?;

    match cli.command {
        Commands::Materiality { action } => match action {
            MaterialityCommand::Compute { args } => {
                commands::materiality_compute(&ctx, &args).await?;
            }

            MaterialityCommand::Save {
                engagement,
                expected_version,
                author,
                args,
            } => {
                commands::materiality_save(
                    &mut ctx,
                    &engagement,
                    expected_version.as_deref(),
                    &author,
                    &args,
                )
                .await?;
            }

            MaterialityCommand::Approve {
                version_id,
                approver,
            } => {
                commands::materiality_approve(&mut ctx, &version_id, &approver)?;
            }

            MaterialityCommand::History { engagement } => {
                commands::materiality_history(&mut ctx, &engagement)?;
            }
        },

        Commands::Sampling { method } => {
            commands::sampling(&ctx, &method.into_input())?;
        }

        Commands::Guidance {
            industry,
            benchmark,
        } => {
            commands::guidance(&ctx, &industry, benchmark).await?;
        }
    }

    Ok(())
}
