//! Coach CLI - Command-line interface for Synheart Coach
//!
//! Commands:
//! - recommend: Generate coaching recommendations from an activity log
//! - summary: Print time distribution, score and productivity features
//! - report: Encode a full coaching report
//! - classify: Fill in missing categories by keyword
//! - validate: Validate activity records
//! - doctor: Diagnose configuration and environment

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use synheart_coach::adapter::{parse_activities, retain_valid, validate_records};
use synheart_coach::encoder::REPORT_VERSION;
use synheart_coach::features::{productivity_score, summarize, FeatureExtractor};
use synheart_coach::store::ActivityStore;
use synheart_coach::types::{
    parse_timestamp, ActivityRecord, ActivitySummary, ProductivityFeatures,
};
use synheart_coach::{
    AnalyzerConfig, CoachError, KeywordClassifier, RecommendationEngine, ReportEncoder,
    COACH_VERSION, PRODUCER_NAME,
};

/// Coach - On-device productivity coaching from desktop activity logs
#[derive(Parser)]
#[command(name = "coach")]
#[command(author = "Synheart AI Inc")]
#[command(version = COACH_VERSION)]
#[command(about = "Turn activity logs into productivity recommendations", long_about = None)]
struct Cli {
    /// Log filter (e.g. "debug", "synheart_coach=trace"); overrides RUST_LOG
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate coaching recommendations from an activity log
    Recommend {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output format
        #[arg(long, default_value = "json-pretty")]
        output_format: OutputFormat,

        /// Seed for template choice and selection (random if omitted)
        #[arg(long)]
        seed: Option<u64>,

        #[command(flatten)]
        analysis: AnalysisArgs,
    },

    /// Print time distribution, score and productivity features
    Summary {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Number of apps to list
        #[arg(long, default_value = "5")]
        top: usize,

        /// Fill missing categories by keyword before summarising
        #[arg(long)]
        classify: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Encode a full coaching report
    Report {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,

        /// Seed for template choice and selection (random if omitted)
        #[arg(long)]
        seed: Option<u64>,

        /// Only include records at or after this time (RFC3339)
        #[arg(long)]
        since: Option<String>,

        /// Only include records before this time (RFC3339)
        #[arg(long)]
        until: Option<String>,

        /// Producer instance ID (random UUID if omitted)
        #[arg(long)]
        instance_id: Option<String>,

        #[command(flatten)]
        analysis: AnalysisArgs,
    },

    /// Fill in missing categories by keyword and print the records
    Classify {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output format
        #[arg(long, default_value = "ndjson")]
        output_format: OutputFormat,

        /// Re-categorise every record, not only those without a category
        #[arg(long)]
        overwrite: bool,

        /// Keyword lists as JSON ({"productive": [...], "neutral": [...], "distracting": [...]})
        #[arg(long)]
        keywords: Option<PathBuf>,
    },

    /// Validate activity records
    Validate {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output validation report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Diagnose configuration and environment
    Doctor {
        /// Check an analyzer config file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Options shared by commands that run the analyses
#[derive(Args)]
struct AnalysisArgs {
    /// Analyzer config file (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Maximum number of recommendations
    #[arg(long)]
    max: Option<usize>,

    /// Minutes in a distracting app before it is flagged
    #[arg(long)]
    distracting_minutes: Option<f64>,

    /// Switches per hour before context switching is flagged
    #[arg(long)]
    switches_per_hour: Option<f64>,

    /// Minutes without a gap before a break is suggested
    #[arg(long)]
    session_minutes: Option<f64>,

    /// Minutes in a productive app before it is praised
    #[arg(long)]
    productive_minutes: Option<f64>,

    /// Fill missing categories by keyword before analysing
    #[arg(long)]
    classify: bool,
}

impl AnalysisArgs {
    /// Config file (or defaults) with flag overrides applied
    fn resolve_config(&self) -> Result<AnalyzerConfig, CoachCliError> {
        let mut config = match &self.config {
            Some(path) => AnalyzerConfig::from_file(path)?,
            None => AnalyzerConfig::default(),
        };

        if let Some(max) = self.max {
            config.max_recommendations = max;
        }
        if let Some(minutes) = self.distracting_minutes {
            config.distracting_threshold_minutes = minutes;
        }
        if let Some(rate) = self.switches_per_hour {
            config.switches_per_hour_threshold = rate;
        }
        if let Some(minutes) = self.session_minutes {
            config.long_session_threshold_minutes = minutes;
        }
        if let Some(minutes) = self.productive_minutes {
            config.productive_threshold_minutes = minutes;
        }

        config.validate()?;
        Ok(config)
    }
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Newline-delimited JSON (one item per line)
    Ndjson,
    /// JSON array
    Json,
    /// Pretty-printed JSON
    JsonPretty,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref());

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e))
                    .unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr so stdout stays machine-readable
fn init_logging(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .init();
}

fn run(cli: Cli) -> Result<(), CoachCliError> {
    match cli.command {
        Commands::Recommend {
            input,
            output_format,
            seed,
            analysis,
        } => cmd_recommend(&input, output_format, seed, &analysis),
        Commands::Summary {
            input,
            top,
            classify,
            json,
        } => cmd_summary(&input, top, classify, json),
        Commands::Report {
            input,
            output,
            seed,
            since,
            until,
            instance_id,
            analysis,
        } => cmd_report(
            &input,
            &output,
            seed,
            since.as_deref(),
            until.as_deref(),
            instance_id,
            &analysis,
        ),
        Commands::Classify {
            input,
            output_format,
            overwrite,
            keywords,
        } => cmd_classify(&input, output_format, overwrite, keywords.as_deref()),
        Commands::Validate { input, json } => cmd_validate(&input, json),
        Commands::Doctor { config, json } => cmd_doctor(config.as_deref(), json),
    }
}

fn cmd_recommend(
    input: &Path,
    output_format: OutputFormat,
    seed: Option<u64>,
    analysis: &AnalysisArgs,
) -> Result<(), CoachCliError> {
    let config = analysis.resolve_config()?;
    let records = load_records(input, analysis.classify)?;

    let engine = RecommendationEngine::new(config)?;
    let recommendations = match seed {
        Some(seed) => engine.generate_seeded(&records, seed),
        None => engine.generate(&records, &mut rand::thread_rng()),
    };

    info!(
        records = records.len(),
        recommendations = recommendations.len(),
        "recommend complete"
    );
    print!("{}", format_output(&recommendations, &output_format)?);
    Ok(())
}

fn cmd_summary(input: &Path, top: usize, classify: bool, json: bool) -> Result<(), CoachCliError> {
    let records = load_records(input, classify)?;

    let output = SummaryOutput {
        summary: summarize(&records, top),
        productivity_score: productivity_score(&records),
        features: FeatureExtractor::extract(&records),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let summary = &output.summary;
    println!("Activity Summary");
    println!("================");
    println!("Records:        {}", summary.record_count);
    println!("Tracked time:   {}", format_duration(summary.total_duration));
    println!("Productive:     {}", format_duration(summary.distribution.productive));
    println!("Neutral:        {}", format_duration(summary.distribution.neutral));
    println!("Distracting:    {}", format_duration(summary.distribution.distracting));
    println!("Productivity:   {}%", summary.productivity_percent);
    println!("Score:          {:.1}", output.productivity_score);
    println!("Switches/hour:  {:.1}", output.features.switches_per_hour);

    if !summary.top_apps.is_empty() {
        println!("\nTop apps:");
        for usage in &summary.top_apps {
            println!("  - {}: {}", usage.app, format_duration(usage.duration));
        }
    }
    Ok(())
}

fn cmd_report(
    input: &Path,
    output: &Path,
    seed: Option<u64>,
    since: Option<&str>,
    until: Option<&str>,
    instance_id: Option<String>,
    analysis: &AnalysisArgs,
) -> Result<(), CoachCliError> {
    let config = analysis.resolve_config()?;
    let store = ActivityStore::with_records(load_records(input, analysis.classify)?);

    let records = if since.is_some() || until.is_some() {
        let start = since.map(parse_bound).transpose()?.unwrap_or(DateTime::<Utc>::MIN_UTC);
        let end = until.map(parse_bound).transpose()?.unwrap_or(DateTime::<Utc>::MAX_UTC);
        store.between(start, end)?
    } else {
        store.snapshot()?
    };
    debug!(records = records.len(), "report window selected");

    let engine = RecommendationEngine::new(config)?;
    let recommendations = match seed {
        Some(seed) => engine.generate_seeded(&records, seed),
        None => engine.generate(&records, &mut rand::thread_rng()),
    };

    let encoder = match instance_id {
        Some(id) => ReportEncoder::with_instance_id(id),
        None => ReportEncoder::new(),
    };
    let report_json = encoder.encode_to_json(&records, recommendations)?;

    if output.to_string_lossy() == "-" {
        println!("{}", report_json);
    } else {
        fs::write(output, report_json)?;
    }
    Ok(())
}

fn cmd_classify(
    input: &Path,
    output_format: OutputFormat,
    overwrite: bool,
    keywords: Option<&Path>,
) -> Result<(), CoachCliError> {
    let classifier = match keywords {
        Some(path) => serde_json::from_str::<KeywordClassifier>(&fs::read_to_string(path)?)?,
        None => KeywordClassifier::default(),
    };

    let mut records = parse_activities(&read_input(input)?)?;
    if overwrite {
        for record in &mut records {
            let category = classifier.classify_record(record);
            record.category = Some(category);
        }
    } else {
        classifier.fill_missing_categories(&mut records);
    }

    print!("{}", format_output(&records, &output_format)?);
    Ok(())
}

fn cmd_validate(input: &Path, json: bool) -> Result<(), CoachCliError> {
    let records = parse_activities(&read_input(input)?)?;
    let results = validate_records(&records);

    let report = ValidationReport {
        total_records: records.len(),
        valid_records: records.len() - results.len(),
        invalid_records: results.len(),
        untimed_records: records.iter().filter(|r| r.timestamp.is_none()).count(),
        uncategorized_records: records.iter().filter(|r| r.category.is_none()).count(),
        errors: results
            .iter()
            .map(|r| ValidationErrorDetail {
                index: r.index,
                app: r.app.clone(),
                error: r.error.to_string(),
            })
            .collect(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Validation Report");
        println!("=================");
        println!("Total records:         {}", report.total_records);
        println!("Valid records:         {}", report.valid_records);
        println!("Invalid records:       {}", report.invalid_records);
        println!("Without timestamp:     {}", report.untimed_records);
        println!("Without category:      {}", report.uncategorized_records);

        if !report.errors.is_empty() {
            println!("\nErrors:");
            for err in &report.errors {
                println!("  - Record {} ({:?}): {}", err.index, err.app, err.error);
            }
        }
    }

    if report.invalid_records > 0 {
        Err(CoachCliError::ValidationFailed(report.invalid_records))
    } else {
        Ok(())
    }
}

fn cmd_doctor(config: Option<&Path>, json: bool) -> Result<(), CoachCliError> {
    let mut checks: Vec<DoctorCheck> = Vec::new();

    checks.push(DoctorCheck {
        name: "coach_version".to_string(),
        status: CheckStatus::Ok,
        message: format!("Coach version {}", COACH_VERSION),
    });

    checks.push(DoctorCheck {
        name: "report_version".to_string(),
        status: CheckStatus::Ok,
        message: format!("Report schema: {}", REPORT_VERSION),
    });

    // Check config file if provided
    if let Some(config_path) = config {
        let check = if !config_path.exists() {
            DoctorCheck {
                name: "config".to_string(),
                status: CheckStatus::Warning,
                message: "Config file does not exist; defaults will be used".to_string(),
            }
        } else {
            match AnalyzerConfig::from_file(config_path) {
                Ok(cfg) => DoctorCheck {
                    name: "config".to_string(),
                    status: CheckStatus::Ok,
                    message: format!(
                        "Config valid (max {} recommendations)",
                        cfg.max_recommendations
                    ),
                },
                Err(e) => DoctorCheck {
                    name: "config".to_string(),
                    status: CheckStatus::Error,
                    message: e.to_string(),
                },
            }
        };
        checks.push(check);
    }

    // Check stdin is available (for piped logs)
    let stdin_check = if atty::is(atty::Stream::Stdin) {
        DoctorCheck {
            name: "stdin".to_string(),
            status: CheckStatus::Ok,
            message: "stdin is a TTY (interactive mode)".to_string(),
        }
    } else {
        DoctorCheck {
            name: "stdin".to_string(),
            status: CheckStatus::Ok,
            message: "stdin is a pipe (use --input - to read it)".to_string(),
        }
    };
    checks.push(stdin_check);

    let report = DoctorReport {
        producer: PRODUCER_NAME.to_string(),
        version: COACH_VERSION.to_string(),
        checks,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Coach Doctor Report");
        println!("===================");
        println!("Producer: {}", report.producer);
        println!("Version:  {}", report.version);
        println!("\nChecks:");
        for check in &report.checks {
            let status_icon = match check.status {
                CheckStatus::Ok => "[OK]",
                CheckStatus::Warning => "[WARN]",
                CheckStatus::Error => "[ERR]",
            };
            println!("  {} {}: {}", status_icon, check.name, check.message);
        }
    }

    let has_errors = report.checks.iter().any(|c| matches!(c.status, CheckStatus::Error));
    if has_errors {
        Err(CoachCliError::DoctorFailed)
    } else {
        Ok(())
    }
}

// Helper functions

fn read_input(input: &Path) -> Result<String, CoachCliError> {
    if input.to_string_lossy() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(fs::read_to_string(input)?)
    }
}

fn load_records(input: &Path, classify: bool) -> Result<Vec<ActivityRecord>, CoachCliError> {
    let mut records = retain_valid(parse_activities(&read_input(input)?)?);
    if classify {
        KeywordClassifier::default().fill_missing_categories(&mut records);
    }
    Ok(records)
}

fn parse_bound(raw: &str) -> Result<DateTime<Utc>, CoachError> {
    parse_timestamp(raw).ok_or_else(|| CoachError::InvalidTimestamp(raw.to_string()))
}

fn format_output<T: Serialize>(
    items: &[T],
    format: &OutputFormat,
) -> Result<String, CoachCliError> {
    match format {
        OutputFormat::Ndjson => {
            let mut lines: Vec<String> = Vec::new();
            for item in items {
                lines.push(serde_json::to_string(item)?);
            }
            Ok(lines.join("\n") + "\n")
        }
        OutputFormat::Json => Ok(serde_json::to_string(items)? + "\n"),
        OutputFormat::JsonPretty => Ok(serde_json::to_string_pretty(items)? + "\n"),
    }
}

fn format_duration(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}

// Error types

#[derive(Debug)]
enum CoachCliError {
    Io(io::Error),
    Coach(CoachError),
    Json(serde_json::Error),
    ValidationFailed(usize),
    DoctorFailed,
}

impl From<io::Error> for CoachCliError {
    fn from(e: io::Error) -> Self {
        CoachCliError::Io(e)
    }
}

impl From<CoachError> for CoachCliError {
    fn from(e: CoachError) -> Self {
        CoachCliError::Coach(e)
    }
}

impl From<serde_json::Error> for CoachCliError {
    fn from(e: serde_json::Error) -> Self {
        CoachCliError::Json(e)
    }
}

#[derive(Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<CoachCliError> for CliError {
    fn from(e: CoachCliError) -> Self {
        match e {
            CoachCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            CoachCliError::Coach(e) => {
                let (code, hint) = match &e {
                    CoachError::InvalidConfig(_) => {
                        ("CONFIG_ERROR", "Run 'coach doctor --config <file>' to check it")
                    }
                    CoachError::InvalidTimestamp(_) => {
                        ("TIMESTAMP_ERROR", "Use RFC3339, e.g. 2023-01-01T09:00:00Z")
                    }
                    CoachError::InvalidRecord(_) => {
                        ("VALIDATION_ERROR", "Run 'coach validate' for details")
                    }
                    _ => ("PARSE_ERROR", "Check input format"),
                };
                CliError {
                    code: code.to_string(),
                    message: e.to_string(),
                    hint: Some(hint.to_string()),
                }
            }
            CoachCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            CoachCliError::ValidationFailed(count) => CliError {
                code: "VALIDATION_FAILED".to_string(),
                message: format!("{} records failed validation", count),
                hint: Some("Fix validation errors and retry".to_string()),
            },
            CoachCliError::DoctorFailed => CliError {
                code: "DOCTOR_FAILED".to_string(),
                message: "One or more health checks failed".to_string(),
                hint: Some("Review the doctor report for details".to_string()),
            },
        }
    }
}

// Report types

#[derive(Serialize)]
struct SummaryOutput {
    summary: ActivitySummary,
    productivity_score: f64,
    features: ProductivityFeatures,
}

#[derive(Serialize)]
struct ValidationReport {
    total_records: usize,
    valid_records: usize,
    invalid_records: usize,
    untimed_records: usize,
    uncategorized_records: usize,
    errors: Vec<ValidationErrorDetail>,
}

#[derive(Serialize)]
struct ValidationErrorDetail {
    index: usize,
    app: String,
    error: String,
}

#[derive(Serialize)]
struct DoctorReport {
    producer: String,
    version: String,
    checks: Vec<DoctorCheck>,
}

#[derive(Serialize)]
struct DoctorCheck {
    name: String,
    status: CheckStatus,
    message: String,
}

#[derive(Serialize)]
enum CheckStatus {
    Ok,
    Warning,
    Error,
}
