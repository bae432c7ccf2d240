/// Reshelf - music library audit and reorganization tools
use anyhow::Context;
use clap::{Parser, Subcommand};
use reshelf_core::{ReportEntry, ReportSink, RunSummary};
use reshelf_engine::{
    check, check_missing, plan_corrections, plan_prefix_renames, plan_relocation, AuditOptions,
    EngineError, Executor, Grouper, JsonlReport, DEFAULT_CATEGORIES, DEFAULT_WATCHED_FIELDS,
};
use reshelf_metadata::{FileScanner, LoftyTagStore};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "reshelf")]
#[command(about = "Music library audit and reorganization tools", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Audit album-level tags and converge inconsistent values
    Audit {
        /// Path to the music library root
        library_path: PathBuf,

        /// Path to the report file
        #[arg(long, default_value = "reshelf-audit.jsonl")]
        log_file: PathBuf,

        /// Compute and record actions without modifying files
        #[arg(long)]
        dry_run: bool,

        /// Allowed album artist categories; an observed value matching the
        /// list is preferred as canonical even when less frequent
        #[arg(long, num_args = 1.., default_values_t = DEFAULT_CATEGORIES.iter().map(ToString::to_string))]
        categories: Vec<String>,
    },

    /// Move files into organized artist/album folders
    Reorganize {
        /// Path to the music library root
        library_path: PathBuf,

        /// Path to the report file
        #[arg(long, default_value = "reshelf-reorg.jsonl")]
        log_file: PathBuf,

        /// Compute and record actions without modifying files
        #[arg(long)]
        dry_run: bool,
    },

    /// Prefix every file in a directory
    Rename {
        /// Directory containing the files to rename
        path: PathBuf,

        /// Prefix to add to each file name
        #[arg(long, default_value = "1 - ")]
        prefix: String,

        /// Path to the report file
        #[arg(long, default_value = "reshelf-rename.jsonl")]
        log_file: PathBuf,

        /// Compute and record actions without modifying files
        #[arg(long)]
        dry_run: bool,
    },
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "reshelf=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    // Individual action failures surface in the report and summary, not the
    // exit status; a non-zero exit is reserved for fatal run errors.
    match cli.command {
        Commands::Audit {
            library_path,
            log_file,
            dry_run,
            categories,
        } => audit(&library_path, &log_file, dry_run, categories)?,
        Commands::Reorganize {
            library_path,
            log_file,
            dry_run,
        } => reorganize(&library_path, &log_file, dry_run)?,
        Commands::Rename {
            path,
            prefix,
            log_file,
            dry_run,
        } => rename(&path, &prefix, &log_file, dry_run)?,
    }

    Ok(())
}

fn audit(
    library_path: &Path,
    log_file: &Path,
    dry_run: bool,
    categories: Vec<String>,
) -> anyhow::Result<()> {
    let store = LoftyTagStore::new();
    let mut report = open_report(log_file)?;

    let grouping = Grouper::new(&store).group(library_path)?;
    record_scan_errors(&mut report, &grouping.errors)?;

    let options = AuditOptions {
        watched_fields: DEFAULT_WATCHED_FIELDS.to_vec(),
        categories,
    };

    let mut actions = Vec::new();
    let mut inconsistent_fields = 0;
    let mut missing_fields = 0;

    for group in &grouping.groups {
        let findings = check(group, &options.watched_fields);
        inconsistent_fields += findings.len();
        actions.extend(plan_corrections(&findings, &options));

        for missing in check_missing(group, &options.watched_fields) {
            missing_fields += 1;
            report.append(&ReportEntry::missing_field(missing))?;
        }
    }

    println!(
        "Audited {} albums: {} inconsistent fields, {} missing fields",
        grouping.groups.len(),
        inconsistent_fields,
        missing_fields
    );
    let untagged = grouping
        .groups
        .iter()
        .find(|g| g.key.is_unknown())
        .map(|g| g.members.len())
        .unwrap_or(0);
    if untagged > 0 {
        println!("Files with no album tag: {untagged}");
    }

    let results = Executor::new(&store, &mut report, dry_run).execute(&actions)?;
    print_summary(&RunSummary::from_results(&results), &grouping.errors, log_file);

    Ok(())
}

fn reorganize(library_path: &Path, log_file: &Path, dry_run: bool) -> anyhow::Result<()> {
    let store = LoftyTagStore::new();
    let mut report = open_report(log_file)?;

    let grouping = Grouper::new(&store).group(library_path)?;
    record_scan_errors(&mut report, &grouping.errors)?;

    let mut actions = Vec::new();
    for file in grouping.groups.iter().flat_map(|g| &g.members) {
        match plan_relocation(file, library_path) {
            Ok(Some(action)) => actions.push(action),
            Ok(None) => {} // already shelved correctly
            Err(e @ EngineError::Unsanitizable { .. }) => {
                // A single bad file never blocks the batch.
                tracing::warn!("{e}");
            }
            Err(e) => return Err(e.into()),
        }
    }

    let results = Executor::new(&store, &mut report, dry_run).execute(&actions)?;
    print_summary(&RunSummary::from_results(&results), &grouping.errors, log_file);

    Ok(())
}

fn rename(path: &Path, prefix: &str, log_file: &Path, dry_run: bool) -> anyhow::Result<()> {
    let store = LoftyTagStore::new();
    let mut report = open_report(log_file)?;

    let files = FileScanner::new()
        .list_files(path)
        .map_err(EngineError::from)?;
    let actions = plan_prefix_renames(&files, prefix);

    let results = Executor::new(&store, &mut report, dry_run).execute(&actions)?;
    print_summary(&RunSummary::from_results(&results), &[], log_file);

    Ok(())
}

fn open_report(log_file: &Path) -> anyhow::Result<JsonlReport> {
    JsonlReport::open(log_file)
        .with_context(|| format!("cannot open report file {}", log_file.display()))
}

fn record_scan_errors(
    report: &mut JsonlReport,
    errors: &[(PathBuf, String)],
) -> anyhow::Result<()> {
    for (path, message) in errors {
        report.append(&ReportEntry::scan_error(path.clone(), message.clone()))?;
    }
    Ok(())
}

fn print_summary(summary: &RunSummary, scan_errors: &[(PathBuf, String)], log_file: &Path) {
    if !scan_errors.is_empty() {
        println!("Unreadable files: {}", scan_errors.len());
    }
    println!("Actions: {summary}");
    println!("Report: {}", log_file.display());
}
