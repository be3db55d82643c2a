use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use edu_qa::checks::cleaning::clean_dataset;
use edu_qa::checks::quality::run_quality_checks;
use edu_qa::checks::severity::{compute_severity, severity_score};
use edu_qa::checks::{AuditLog, QualityReport, Severity};
use edu_qa::config::{expand_tilde, Config, ConfigOverrides};
use edu_qa::dataset::loader::{load_path, LoadOptions};
use edu_qa::dataset::writer::write_dataset;
use edu_qa::dataset::Dataset;
use edu_qa::generator::{generate_dataset, GeneratorOptions};
use edu_qa::indicators::{derive_all_indicators, derive_insights, IndicatorSet, LevelInsight};
use edu_qa::output::csv::{
    audit_log_to_csv, dataset_to_csv, errors_to_csv, indicator_to_csv, quality_report_to_csv,
};
use edu_qa::output::export::export_outputs;
use edu_qa::output::json::{render_json, render_qa_document};
use edu_qa::output::report::render_text_report;
use edu_qa::output::table::{
    render_audit_table, render_indicator_table, render_insights_table, render_quality_table,
    render_severity_table, render_validation_table,
};
use edu_qa::pipeline::{run_pipeline, PipelineError};
use edu_qa::schema::validate_schema;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const EXIT_SCHEMA_REJECTED: u8 = 1;
const EXIT_HIGH_SEVERITY: u8 = 2;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Debug, Parser)]
#[command(
    name = "edu-qa",
    about = "Validate, clean and score education monitoring survey data"
)]
struct Cli {
    #[arg(short, long)]
    config: Option<PathBuf>,
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,
    /// Field delimiter of the input file, e.g. "," or "tab"
    #[arg(short, long)]
    delimiter: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Check column presence and categorical values
    Validate { file: PathBuf },
    /// Measure missing values, bound and logic violations
    Audit { file: PathBuf },
    /// Clamp bounded columns and list every correction
    Clean {
        file: PathBuf,
        /// Write the cleaned table here
        #[arg(long)]
        out: Option<PathBuf>,
        /// Print only the corrections, not the cleaned table
        #[arg(long)]
        audit_only: bool,
    },
    /// Classify the incoming data as LOW, MEDIUM or HIGH risk
    Score { file: PathBuf },
    /// Derive transition drop-off and gender parity tables
    Indicators {
        file: PathBuf,
        /// Also print per-level completion contrasts
        #[arg(long)]
        insights: bool,
    },
    /// Run the full pipeline and export every artifact
    Run {
        file: PathBuf,
        /// Export directory, overriding the configured one
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
    /// Write a synthetic partner dataset
    Generate {
        /// Destination file
        #[arg(long)]
        out: PathBuf,
        /// Seed for a reproducible dataset
        #[arg(long)]
        seed: Option<u64>,
        /// Skip injecting missing, logic and out-of-range defects
        #[arg(long)]
        no_defects: bool,
    },
    /// Show the effective configuration or write a template
    Config {
        /// Write a config template to the config path
        #[arg(long)]
        init: bool,
        /// Print the effective configuration
        #[arg(long)]
        show: bool,
    },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    let mut config = Config::load(Some(&config_path))?;
    config.apply_overrides(ConfigOverrides {
        delimiter: cli.delimiter.clone(),
        output_directory: match &cli.command {
            Commands::Run {
                out_dir: Some(dir), ..
            } => Some(dir.display().to_string()),
            _ => None,
        },
    });
    init_tracing(&config.logging.level);

    if let Commands::Config { init, show } = &cli.command {
        return handle_config_command(*init, *show, &config, &config_path);
    }
    if let Commands::Generate {
        out,
        seed,
        no_defects,
    } = &cli.command
    {
        return handle_generate(out, *seed, *no_defects, &config);
    }

    let load_options = config.load_options()?;

    match &cli.command {
        Commands::Validate { file } => {
            let dataset = load(file, &load_options)?;
            let errors = validate_schema(&dataset);
            print_validation(&errors, cli.output)?;
            if !errors.is_empty() {
                return Ok(ExitCode::from(EXIT_SCHEMA_REJECTED));
            }
        }
        Commands::Audit { file } => {
            let Some(dataset) = load_validated(file, &load_options, cli.output)? else {
                return Ok(ExitCode::from(EXIT_SCHEMA_REJECTED));
            };
            print_quality(&run_quality_checks(&dataset), cli.output)?;
        }
        Commands::Clean {
            file,
            out,
            audit_only,
        } => {
            let Some(dataset) = load_validated(file, &load_options, cli.output)? else {
                return Ok(ExitCode::from(EXIT_SCHEMA_REJECTED));
            };
            let (cleaned, audit) = clean_dataset(dataset);
            if let Some(path) = out {
                write_table(path, &cleaned, load_options.delimiter)?;
                info!(path = %path.display(), "cleaned dataset written");
            }
            print_audit(&audit, cli.output)?;
            if !*audit_only && out.is_none() {
                print_dataset(&cleaned, cli.output)?;
            }
        }
        Commands::Score { file } => {
            let Some(dataset) = load_validated(file, &load_options, cli.output)? else {
                return Ok(ExitCode::from(EXIT_SCHEMA_REJECTED));
            };
            let report = run_quality_checks(&dataset);
            let severity = compute_severity(&report);
            print_severity(&report, severity, severity_score(&report), cli.output)?;
            if severity.blocks_analysis() {
                return Ok(ExitCode::from(EXIT_HIGH_SEVERITY));
            }
        }
        Commands::Indicators { file, insights } => {
            let Some(dataset) = load_validated(file, &load_options, cli.output)? else {
                return Ok(ExitCode::from(EXIT_SCHEMA_REJECTED));
            };
            let (cleaned, _) = clean_dataset(dataset);
            print_indicators(&derive_all_indicators(&cleaned), cli.output)?;
            if *insights {
                print_insights(&derive_insights(&cleaned), cli.output)?;
            }
        }
        Commands::Run { file, .. } => {
            let dataset = load(file, &load_options)?;
            let outcome = match run_pipeline(dataset) {
                Ok(outcome) => outcome,
                Err(PipelineError::SchemaRejected(errors)) => {
                    print_validation(&errors, cli.output)?;
                    return Ok(ExitCode::from(EXIT_SCHEMA_REJECTED));
                }
            };
            let out_dir = config.resolved_output_dir();
            let written = export_outputs(&out_dir, &outcome, config.export_options())?;
            match cli.output {
                OutputFormat::Table => {
                    println!("Schema validation passed.");
                    println!("{}", render_quality_table(&outcome.report));
                    println!("Corrections applied: {}", outcome.audit_log.len());
                    println!(
                        "{}",
                        render_severity_table(outcome.severity, outcome.severity_score)
                    );
                    for path in &written {
                        println!("wrote {}", path.display());
                    }
                }
                OutputFormat::Json => println!("{}", render_json(&outcome.summary())?),
                OutputFormat::Csv => {
                    warn!("CSV output for run not implemented, using text report");
                    println!("{}", render_text_report(&outcome.report, outcome.severity)?);
                }
            }
            if outcome.severity.blocks_analysis() {
                eprintln!("{}", outcome.severity.guidance());
                return Ok(ExitCode::from(EXIT_HIGH_SEVERITY));
            }
        }
        Commands::Generate { .. } | Commands::Config { .. } => {
            unreachable!("handled before dispatch")
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn handle_config_command(
    init: bool,
    show: bool,
    config: &Config,
    config_path: &Path,
) -> Result<ExitCode> {
    if init {
        Config::write_template(config_path)?;
        println!("Wrote config template to {}", config_path.display());
    }
    if show || !init {
        println!("{}", render_json(config)?);
    }
    Ok(ExitCode::SUCCESS)
}

fn handle_generate(
    out: &Path,
    seed: Option<u64>,
    no_defects: bool,
    config: &Config,
) -> Result<ExitCode> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let options = if no_defects {
        GeneratorOptions::without_defects()
    } else {
        GeneratorOptions::default()
    };
    let dataset = generate_dataset(&mut rng, &options)?;
    let path = expand_tilde(&out.display().to_string());
    write_table(&path, &dataset, config.input.delimiter_byte()?)?;
    println!("Wrote {} rows to {}", dataset.len(), path.display());
    Ok(ExitCode::SUCCESS)
}

fn load(path: &Path, options: &LoadOptions) -> Result<Dataset> {
    load_path(path, options).with_context(|| format!("failed loading {}", path.display()))
}

fn load_validated(
    path: &Path,
    options: &LoadOptions,
    format: OutputFormat,
) -> Result<Option<Dataset>> {
    let dataset = load(path, options)?;
    let errors = validate_schema(&dataset);
    if errors.is_empty() {
        return Ok(Some(dataset));
    }
    print_validation(&errors, format)?;
    Ok(None)
}

fn write_table(path: &Path, dataset: &Dataset, delimiter: u8) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed creating directory: {}", parent.display()))?;
    }
    let file =
        File::create(path).with_context(|| format!("failed creating {}", path.display()))?;
    write_dataset(BufWriter::new(file), dataset, delimiter)
        .with_context(|| format!("failed writing {}", path.display()))
}

fn print_validation(errors: &[String], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => {
            if errors.is_empty() {
                println!("Schema validation passed.");
            } else {
                println!("Schema validation failed.");
                println!("{}", render_validation_table(errors));
            }
        }
        OutputFormat::Json => println!("{}", render_json(errors)?),
        OutputFormat::Csv => print!("{}", errors_to_csv(errors)?),
    }
    Ok(())
}

fn print_quality(report: &QualityReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", render_quality_table(report)),
        OutputFormat::Json => println!("{}", render_json(report)?),
        OutputFormat::Csv => print!("{}", quality_report_to_csv(report)?),
    }
    Ok(())
}

fn print_audit(audit: &AuditLog, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => {
            println!("Corrections applied: {}", audit.len());
            if !audit.is_empty() {
                println!("{}", render_audit_table(audit));
            }
        }
        OutputFormat::Json => println!("{}", render_json(audit)?),
        OutputFormat::Csv => print!("{}", audit_log_to_csv(audit)?),
    }
    Ok(())
}

fn print_dataset(dataset: &Dataset, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", render_json(dataset)?),
        OutputFormat::Table | OutputFormat::Csv => print!("{}", dataset_to_csv(dataset)?),
    }
    Ok(())
}

fn print_severity(
    report: &QualityReport,
    severity: Severity,
    score: u32,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", render_severity_table(severity, score)),
        OutputFormat::Json => println!("{}", render_qa_document(report, severity, score)?),
        OutputFormat::Csv => {
            warn!("CSV output for score not implemented, using text report");
            println!("{}", render_text_report(report, severity)?);
        }
    }
    Ok(())
}

fn print_indicators(indicators: &IndicatorSet, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => {
            for (name, table) in indicators {
                println!("{}", render_indicator_table(name, table));
            }
        }
        OutputFormat::Json => println!("{}", render_json(indicators)?),
        OutputFormat::Csv => {
            for (name, table) in indicators {
                println!("# {name}");
                print!("{}", indicator_to_csv(table)?);
            }
        }
    }
    Ok(())
}

fn print_insights(insights: &[LevelInsight], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", render_insights_table(insights)),
        OutputFormat::Json => println!("{}", render_json(insights)?),
        OutputFormat::Csv => {
            warn!("CSV output for insights not implemented, using JSON");
            println!("{}", render_json(insights)?);
        }
    }
    Ok(())
}
