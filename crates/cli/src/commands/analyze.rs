use std::path::{Path, PathBuf};

use anyhow::{ensure, Result};
use tracing::{info, warn};

use solflow::ast::{JsonAstProvider, SolcProvider, SyntaxProvider, TreeSitterProvider};
use solflow::cache::{AstCache, CachedProvider};
use solflow::config::{Config, CONFIG_FILE_NAME};
use solflow::engine::{discover_sources, Engine};
use solflow::finding::Severity;
use solflow::report::AnalysisReport;
use solflow::rule::RuleRegistry;

use crate::output;
use crate::{AnalyzeArgs, OutputFormat, ProviderKind, SeverityFilter};

/// Exit status: 0 clean, 1 findings or nothing to analyze, 2 every file failed.
pub fn run(args: AnalyzeArgs) -> Result<u8> {
    // 1. Load config
    let config = match &args.config {
        Some(path) => {
            ensure!(path.exists(), "Config file not found: {}", path.display());
            Config::load(path)?
        }
        None => Config::load(Path::new(CONFIG_FILE_NAME))?,
    };

    // 2. Collect sources
    let files = discover_sources(&args.paths);
    if files.is_empty() {
        let roots: Vec<String> = args.paths.iter().map(|p| p.display().to_string()).collect();
        eprintln!("No Solidity files found in {}", roots.join(", "));
        return Ok(1);
    }
    if !args.quiet {
        eprintln!("Analyzing {} files...", files.len());
    }

    // 3. Build rule registry
    let mut all_rules = solflow_rules::all_rules();
    for name in args.rules.iter().chain(args.exclude.iter()).flatten() {
        if !all_rules.iter().any(|r| r.name() == name) {
            warn!(rule = %name, "unknown rule name");
        }
    }
    if let Some(ref names) = args.rules {
        all_rules.retain(|r| names.iter().any(|n| n == r.name()));
    }
    if let Some(ref names) = args.exclude {
        all_rules.retain(|r| !names.iter().any(|n| n == r.name()));
    }
    let mut registry = RuleRegistry::new();
    registry.register_all(all_rules);
    info!(rules = ?registry.list_rules(), "rules enabled");

    // 4. Severity threshold: flag wins over config
    let min_severity = match args.severity {
        Some(SeverityFilter::Critical) => Severity::Critical,
        Some(SeverityFilter::High) => Severity::High,
        Some(SeverityFilter::Medium) => Severity::Medium,
        Some(SeverityFilter::Low) => Severity::Low,
        Some(SeverityFilter::Info) => Severity::Informational,
        None => config.severity_threshold(),
    };
    let format = args
        .format
        .unwrap_or_else(|| format_from_config(&config.global.output_format));

    // 5. Analyze
    let engine = Engine::new(registry, config).with_min_severity(min_severity);
    let report = analyze(&engine, &files, &args)?;
    info!(
        files = report.files.len(),
        errors = report.errors.len(),
        findings = report.total_findings,
        "analysis finished"
    );

    // 6. Output
    match format {
        OutputFormat::Json => output::json::print(&report)?,
        OutputFormat::Sarif => output::sarif::print(&report)?,
        OutputFormat::Text => output::text::print(&report, args.quiet, args.no_color)?,
    }

    // 7. Exit code
    Ok(exit_status(&report))
}

fn analyze(engine: &Engine, files: &[PathBuf], args: &AnalyzeArgs) -> Result<AnalysisReport> {
    let provider: Box<dyn SyntaxProvider> = match args.provider {
        ProviderKind::Solc => {
            let mut solc = SolcProvider::new(&args.solc);
            if !args.include_path.is_empty() {
                solc.include_paths = args.include_path.clone();
            }
            Box::new(solc)
        }
        ProviderKind::Json => Box::new(JsonAstProvider),
        ProviderKind::TreeSitter => Box::new(TreeSitterProvider),
    };

    let Some(cache_dir) = &args.cache else {
        return Ok(engine.analyze_files(files, &provider));
    };
    let mut cache = AstCache::open(cache_dir.clone())?;
    if args.clear_cache {
        cache.clear()?;
        info!(cache = %cache_dir.display(), "cleared AST cache");
    }
    let cached = CachedProvider::new(provider, cache);
    let report = engine.analyze_files(files, &cached);
    if let Err(e) = cached.flush() {
        warn!(error = %e, "failed to write AST cache manifest");
    }
    Ok(report)
}

fn format_from_config(name: &str) -> OutputFormat {
    match name.to_lowercase().as_str() {
        "json" => OutputFormat::Json,
        "sarif" => OutputFormat::Sarif,
        _ => OutputFormat::Text,
    }
}

fn exit_status(report: &AnalysisReport) -> u8 {
    if report.all_failed() {
        2
    } else if report.total_findings > 0 {
        1
    } else {
        0
    }
}
