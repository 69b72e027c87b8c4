//! pageaudit: SEO and AEO auditor CLI

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use pageaudit::analyzer::{AuditEngine, FileReport};
use pageaudit::cache::AuditCache;
use pageaudit::config::{
    build_ignore_set, default_config_json, find_project_root, is_ignored, load_config, Config,
    CONFIG_FILENAME,
};
use pageaudit::prompt::StrategicPromptBuilder;
use pageaudit::reporter::{ConsoleReporter, JsonReporter, MarkdownReporter};
use pageaudit::watcher::HtmlWatcher;
use pageaudit::{AuditMode, Priority};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

/// pageaudit: SEO and AEO auditor for HTML pages
#[derive(Parser, Debug)]
#[command(name = "pageaudit")]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true, subcommand_negates_reqs = true)]
struct Args {
    #[command(subcommand)]
    command: Option<Commands>,

    /// HTML file or directory to audit, or `-` for stdin (omit when using a subcommand)
    #[arg(required = true)]
    path: Option<PathBuf>,

    /// Audit mode: seo or aeo (default: config, then seo)
    #[arg(long, short)]
    mode: Option<AuditMode>,

    /// Output format as JSON
    #[arg(long, short, conflicts_with = "markdown")]
    json: bool,

    /// Output format as Markdown
    #[arg(long)]
    markdown: bool,

    /// Quiet mode (one line per file)
    #[arg(long, short)]
    quiet: bool,

    /// Verbose output (fix snippets, debug logging)
    #[arg(long, short)]
    verbose: bool,

    /// Path to config file (default: search .pageauditrc.json in current dir and parents)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Exit 1 when any fix at or above this priority is reported: critical, high or medium
    #[arg(long, value_name = "PRIORITY")]
    fail_on: Option<Priority>,

    /// Print the strategic report prompt instead of the audit (single file only)
    #[arg(long)]
    prompt: bool,

    /// Describe the site (audience, goals) at the end of the prompt
    #[arg(long, value_name = "TEXT", requires = "prompt")]
    site_context: Option<String>,

    /// Write output to a file instead of stdout
    #[arg(long, short, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Watch for file changes and re-audit
    #[arg(long)]
    watch: bool,

    /// Disable caching (re-audit all files even if unchanged)
    #[arg(long)]
    no_cache: bool,

    /// Clear the audit cache before running
    #[arg(long)]
    clear_cache: bool,

    /// Audit files in parallel (default for directories with many files)
    #[arg(long)]
    parallel: bool,

    /// Number of parallel threads (default: number of CPU cores)
    #[arg(long, value_name = "N")]
    jobs: Option<usize>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create .pageauditrc.json with sensible defaults
    Init {
        /// Default audit mode: seo or aeo
        #[arg(long)]
        mode: Option<AuditMode>,

        /// Directory in which to create config (default: current)
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", "Error".red().bold(), e);
            ExitCode::from(2)
        }
    }
}

/// Log to stderr. `--verbose` forces debug; otherwise PAGEAUDIT_LOG, default warn.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("pageaudit=debug")
    } else {
        EnvFilter::try_from_env("PAGEAUDIT_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run() -> Result<ExitCode> {
    let args = Args::parse();
    init_tracing(args.verbose);

    if let Some(Commands::Init { mode, dir }) = args.command {
        return run_init(mode, dir.as_deref());
    }

    let path = args
        .path
        .clone()
        .context("A path is required when no subcommand is given")?;

    if path.as_os_str() == "-" {
        return run_stdin(&args);
    }

    if args.watch {
        return run_watch(&args, &path);
    }

    let work_dir = work_dir_for(&path);
    let config = load_config(work_dir, args.config.as_deref())?
        .merge_with_cli(args.mode, args.fail_on);

    let ignore_set = if config.ignore.is_empty() {
        None
    } else {
        Some(build_ignore_set(&config.ignore)?)
    };

    let files = collect_html_files(&path, ignore_set.as_ref())?;
    if files.is_empty() {
        eprintln!("{}: No HTML files found", "Warning".yellow());
        return Ok(ExitCode::from(2));
    }

    let project_root = find_project_root(work_dir).unwrap_or_else(|| work_dir.to_path_buf());
    let mut cache = if args.no_cache {
        AuditCache::disabled()
    } else {
        AuditCache::new(&project_root)
    };

    if args.clear_cache {
        cache.clear();
        if !args.quiet {
            eprintln!("{}: Cache cleared", "Info".blue());
        }
    }

    if let Some(jobs) = args.jobs {
        rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build_global()
            .ok();
    }

    let engine = AuditEngine::new().with_inline_directives(true);
    let use_parallel = args.parallel || files.len() > 10;

    let (results, had_errors) = if use_parallel {
        audit_files_parallel(&engine, &files, &config, &mut cache, args.quiet)
    } else {
        audit_files_sequential(&engine, &files, &config, &mut cache, args.quiet)
    };

    cache.prune_missing();
    if let Err(e) = cache.save() {
        if !args.quiet {
            eprintln!("{}: Failed to save cache: {}", "Warning".yellow(), e);
        }
    }

    if results.is_empty() {
        eprintln!("{}: All files failed to audit", "Error".red());
        return Ok(ExitCode::from(2));
    }

    emit(&args, &results)?;

    if let Some(code) = fail_on_exit(&args, &config, &results) {
        return Ok(code);
    }

    if had_errors {
        Ok(ExitCode::from(2))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn work_dir_for(path: &Path) -> &Path {
    if path.is_file() {
        path.parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."))
    } else {
        path
    }
}

/// Audit a document piped on stdin
fn run_stdin(args: &Args) -> Result<ExitCode> {
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    let config = load_config(&cwd, args.config.as_deref())?.merge_with_cli(args.mode, args.fail_on);

    let mut bytes = Vec::new();
    std::io::stdin()
        .read_to_end(&mut bytes)
        .context("Failed to read stdin")?;
    let source = std::str::from_utf8(&bytes)
        .map_err(pageaudit::AuditError::from)
        .context("Failed to parse document: <stdin>")?;

    let stdin_path = Path::new("<stdin>");
    let effective = config.effective_for_file(stdin_path);
    let report = AuditEngine::new()
        .with_inline_directives(true)
        .with_disabled_checks(effective.disabled_checks())
        .audit_source(source, effective.mode)
        .context("Failed to parse document: <stdin>")?;

    let results = vec![FileReport {
        path: stdin_path.to_path_buf(),
        report,
    }];
    emit(args, &results)?;

    Ok(fail_on_exit(args, &config, &results).unwrap_or(ExitCode::SUCCESS))
}

/// Render results in the requested format and write them out
fn emit(args: &Args, results: &[FileReport]) -> Result<()> {
    let to_file = args.output.is_some();
    let text = if args.prompt {
        if results.len() > 1 {
            eprintln!(
                "{}: --prompt only works with a single file",
                "Warning".yellow()
            );
            return Ok(());
        }
        let mut builder = StrategicPromptBuilder::new();
        if let Some(context) = &args.site_context {
            builder = builder.with_site_context(context.as_str());
        }
        builder.build(&results[0].report)
    } else if args.json {
        let reporter = JsonReporter::new().pretty();
        if results.len() == 1 {
            reporter.report(&results[0].report)
        } else {
            reporter.report_with_summary(results, &AuditEngine::aggregate_stats(results))
        }
    } else if args.markdown {
        let reporter = MarkdownReporter::new().with_timestamp();
        if results.len() == 1 {
            reporter.report(&results[0])
        } else {
            reporter.report_many(results, &AuditEngine::aggregate_stats(results))
        }
    } else {
        let mut reporter = ConsoleReporter::new();
        if args.verbose {
            reporter = reporter.verbose();
        }
        if to_file {
            reporter = reporter.without_colors();
        }
        if args.quiet {
            let lines: Vec<String> = results.iter().map(|r| reporter.render_quiet(r)).collect();
            lines.join("\n")
        } else {
            let mut text: String = results.iter().map(|r| reporter.render(r)).collect();
            if results.len() > 1 {
                text.push_str(&reporter.render_summary(&AuditEngine::aggregate_stats(results)));
            }
            text
        }
    };

    match args.output {
        Some(ref output_path) => {
            std::fs::write(output_path, &text)
                .with_context(|| format!("Failed to write output to {}", output_path.display()))?;
            if !args.quiet {
                eprintln!(
                    "{}: Output written to {}",
                    "Info".blue(),
                    output_path.display()
                );
            }
        }
        None => println!("{}", text.trim_end_matches('\n')),
    }
    Ok(())
}

/// Exit code 1 when any report has a fix at or above the configured priority
fn fail_on_exit(args: &Args, config: &Config, results: &[FileReport]) -> Option<ExitCode> {
    let threshold = config.fail_on?;
    let failing = results
        .iter()
        .filter(|r| r.report.has_fix_at_or_above(threshold))
        .count();
    if failing == 0 {
        return None;
    }
    if !args.quiet && !args.json {
        eprintln!(
            "\n{}: {} file(s) have {} or higher fixes",
            "Failed".red().bold(),
            failing,
            threshold
        );
    }
    Some(ExitCode::from(1))
}

fn run_init(mode: Option<AuditMode>, dir: Option<&Path>) -> Result<ExitCode> {
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    let dir = dir.unwrap_or(&cwd);
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() {
        eprintln!(
            "{}: {} already exists; use --dir to write elsewhere or remove it first",
            "Warning".yellow(),
            config_path.display()
        );
        return Ok(ExitCode::SUCCESS);
    }

    let mode = mode.unwrap_or(AuditMode::Seo);
    std::fs::write(&config_path, default_config_json(mode))
        .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

    println!(
        "{}: Created {} with mode={}",
        "Done".green().bold(),
        config_path.display(),
        mode.to_string().to_lowercase()
    );
    Ok(ExitCode::SUCCESS)
}

fn run_watch(args: &Args, path: &Path) -> Result<ExitCode> {
    let work_dir = work_dir_for(path);
    let config = load_config(work_dir, args.config.as_deref())?
        .merge_with_cli(args.mode, args.fail_on);
    let ignore_set = if config.ignore.is_empty() {
        None
    } else {
        Some(build_ignore_set(&config.ignore)?)
    };

    let engine = AuditEngine::new().with_inline_directives(true);
    let mut reporter = ConsoleReporter::new();
    if args.verbose {
        reporter = reporter.verbose();
    }

    let watcher = HtmlWatcher::watch(path).context("Failed to create file watcher")?;
    eprintln!("{}: Watching for changes... (Ctrl+C to stop)", "Info".blue());

    loop {
        let changed = watcher.next_changes();
        let filtered = changed.into_iter().filter(|p| {
            ignore_set
                .as_ref()
                .map(|set| !is_ignored(p, set))
                .unwrap_or(true)
        });
        for file in filtered {
            match engine.audit_file(&file, Some(&config)) {
                Ok(result) => {
                    if args.quiet {
                        reporter.report_quiet(&result);
                    } else {
                        reporter.report(&result);
                    }
                }
                Err(e) => {
                    eprintln!("{}: {}: {:#}", "Error".red(), file.display(), e);
                }
            }
        }
    }
}

fn collect_html_files(path: &Path, ignore_set: Option<&globset::GlobSet>) -> Result<Vec<PathBuf>> {
    if path.is_file() {
        if let Some(set) = ignore_set {
            if is_ignored(path, set) {
                return Ok(vec![]);
            }
        }
        return Ok(vec![path.to_path_buf()]);
    }

    if !path.is_dir() {
        anyhow::bail!("Path does not exist: {}", path.display());
    }

    let mut files: Vec<PathBuf> = WalkDir::new(path)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|entry| entry.into_path())
        .filter(|p| p.is_file() && HtmlWatcher::is_html_file(p))
        .filter(|p| ignore_set.map(|set| !is_ignored(p, set)).unwrap_or(true))
        .collect();

    // Sort for consistent output
    files.sort();

    Ok(files)
}

/// Read a file's content for cache lookup; unreadable files skip the cache
fn read_for_cache(path: &Path) -> Option<String> {
    std::fs::read_to_string(path).ok()
}

fn audit_files_sequential(
    engine: &AuditEngine,
    files: &[PathBuf],
    config: &Config,
    cache: &mut AuditCache,
    quiet: bool,
) -> (Vec<FileReport>, bool) {
    let mut results = Vec::new();
    let mut had_errors = false;
    let mut cache_hits = 0;

    for file in files {
        let effective = config.effective_for_file(file);
        let disabled = effective.disabled_checks();
        let content = read_for_cache(file);

        if let Some(ref content) = content {
            if let Some(report) = cache.get(file, content, effective.mode, &disabled) {
                results.push(FileReport {
                    path: file.clone(),
                    report,
                });
                cache_hits += 1;
                continue;
            }
        }

        match engine.audit_file(file, Some(config)) {
            Ok(result) => {
                if let Some(ref content) = content {
                    cache.set(file, content, &disabled, result.report.clone());
                }
                results.push(result);
            }
            Err(e) => {
                if !quiet {
                    eprintln!("{}: Failed to audit {}: {:#}", "Error".red(), file.display(), e);
                }
                had_errors = true;
            }
        }
    }

    report_cache_hits(cache_hits, files.len(), quiet);
    (results, had_errors)
}

/// Audit in parallel; cache lookups run concurrently, new entries are stored afterwards
fn audit_files_parallel(
    engine: &AuditEngine,
    files: &[PathBuf],
    config: &Config,
    cache: &mut AuditCache,
    quiet: bool,
) -> (Vec<FileReport>, bool) {
    use rayon::prelude::*;

    enum Outcome {
        Cached(FileReport),
        Fresh(FileReport, Option<String>),
        Failed,
    }

    let shared: &AuditCache = cache;
    let outcomes: Vec<Outcome> = files
        .par_iter()
        .map(|file| {
            let effective = config.effective_for_file(file);
            let content = read_for_cache(file);
            if let Some(ref text) = content {
                let disabled = effective.disabled_checks();
                if let Some(report) = shared.get(file, text, effective.mode, &disabled) {
                    return Outcome::Cached(FileReport {
                        path: file.clone(),
                        report,
                    });
                }
            }
            match engine.audit_file(file, Some(config)) {
                Ok(result) => Outcome::Fresh(result, content),
                Err(e) => {
                    if !quiet {
                        eprintln!("{}: Failed to audit {}: {:#}", "Error".red(), file.display(), e);
                    }
                    Outcome::Failed
                }
            }
        })
        .collect();

    let mut results = Vec::with_capacity(outcomes.len());
    let mut had_errors = false;
    let mut cache_hits = 0;
    for outcome in outcomes {
        match outcome {
            Outcome::Cached(result) => {
                cache_hits += 1;
                results.push(result);
            }
            Outcome::Fresh(result, content) => {
                if let Some(content) = content {
                    let disabled = config.effective_for_file(&result.path).disabled_checks();
                    cache.set(&result.path, &content, &disabled, result.report.clone());
                }
                results.push(result);
            }
            Outcome::Failed => had_errors = true,
        }
    }

    report_cache_hits(cache_hits, files.len(), quiet);
    (results, had_errors)
}

fn report_cache_hits(hits: usize, total: usize, quiet: bool) {
    if !quiet && hits > 0 {
        eprintln!(
            "{}: {} files from cache, {} audited",
            "Cache".blue(),
            hits,
            total - hits
        );
    }
}
