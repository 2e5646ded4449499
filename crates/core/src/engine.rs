use std::collections::HashSet;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{debug, trace, warn};
use walkdir::WalkDir;

use crate::ast::{load, ParsedSource, SourceUnit, SyntaxProvider};
use crate::config::{self, Config};
use crate::error::AnalysisError;
use crate::finding::Severity;
use crate::heuristics::Heuristics;
use crate::report::{AnalysisReport, FileError, FileReport};
use crate::rule::RuleRegistry;
use crate::summary::{ContractExtractor, ContractSummary};

/// Runs extraction, summarization and the rule table over a batch of files.
///
/// Each file is analyzed independently and in parallel; results come back in
/// input order and one file's failure never affects another.
pub struct Engine {
    registry: RuleRegistry,
    config: Config,
    heuristics: Heuristics,
    min_severity: Severity,
}

impl Engine {
    pub fn new(registry: RuleRegistry, config: Config) -> Self {
        let heuristics = config.heuristics();
        let min_severity = config.severity_threshold();
        debug!(
            owner_keywords = ?heuristics.owner_keywords(),
            access_modifiers = ?heuristics.access_modifiers(),
            "heuristics configured"
        );
        Self {
            registry,
            config,
            heuristics,
            min_severity,
        }
    }

    /// Report only findings at least as severe as `severity`.
    pub fn with_min_severity(mut self, severity: Severity) -> Self {
        self.min_severity = severity;
        self
    }

    /// Summaries with findings for one source whose AST is already built.
    pub fn analyze_source(&self, path: &Path, source: &str, unit: &SourceUnit) -> Vec<ContractSummary> {
        let inline = config::parse_inline_suppressions(source);
        let mut contracts = ContractExtractor::new(source, &self.heuristics).extract(unit);

        for contract in &mut contracts {
            let findings = self.registry.evaluate_contract(path, source, contract);
            let findings = config::apply_severity_overrides(findings, &self.config);
            let findings = config::apply_suppressions(findings, &self.config, &inline);
            contract.findings = RuleRegistry::filter_by_severity(findings, &self.min_severity);
            for finding in &contract.findings {
                trace!(%finding, "finding");
            }
        }
        contracts
    }

    pub fn analyze_parsed(&self, parsed: &ParsedSource) -> FileReport {
        let contracts = self.analyze_source(&parsed.path, &parsed.source, &parsed.ast);
        debug!(
            path = %parsed.path.display(),
            contracts = contracts.len(),
            findings = contracts.iter().map(|c| c.findings.len()).sum::<usize>(),
            "analyzed file"
        );
        FileReport {
            path: parsed.path.clone(),
            contracts,
        }
    }

    pub fn analyze_file(
        &self,
        path: &Path,
        provider: &dyn SyntaxProvider,
    ) -> Result<FileReport, AnalysisError> {
        let parsed = load(provider, path)?;
        Ok(self.analyze_parsed(&parsed))
    }

    /// Analyze every path, skipping files excluded by the suppression globs.
    pub fn analyze_files(&self, paths: &[PathBuf], provider: &dyn SyntaxProvider) -> AnalysisReport {
        let selected: Vec<&PathBuf> = paths
            .iter()
            .filter(|p| {
                let excluded = self.config.is_file_excluded(p);
                if excluded {
                    debug!(path = %p.display(), "skipping excluded file");
                }
                !excluded
            })
            .collect();

        let results: Vec<Result<FileReport, AnalysisError>> = selected
            .par_iter()
            .map(|path| self.analyze_file(path, provider))
            .collect();

        let mut files = Vec::new();
        let mut errors = Vec::new();
        for result in results {
            match result {
                Ok(report) => files.push(report),
                Err(e) => {
                    warn!(error = %e, "file analysis failed");
                    errors.push(FileError::from(&e));
                }
            }
        }
        AnalysisReport::new(files, errors)
    }
}

/// Expand roots into `.sol` files. Directories are walked recursively in file
/// name order; explicit file paths are kept as given, even if missing.
pub fn discover_sources(roots: &[PathBuf]) -> Vec<PathBuf> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for root in roots {
        if !root.is_dir() {
            if seen.insert(root.clone()) {
                out.push(root.clone());
            }
            continue;
        }
        let walker = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| e.path().extension().is_some_and(|ext| ext == "sol"));
        for entry in walker {
            let path = entry.into_path();
            if seen.insert(path.clone()) {
                out.push(path);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::TreeSitterProvider;
    use crate::error::ErrorKind;
    use crate::finding::{Category, Finding};
    use crate::rule::{Rule, RuleContext};
    use std::fs;

    /// Reports every state-mutating entry point without access control.
    struct OpenWrite;

    impl Rule for OpenWrite {
        fn category(&self) -> Category {
            Category::UnrestrictedEntryPoint
        }
        fn description(&self) -> &str {
            "state write without access control"
        }
        fn severity(&self) -> Severity {
            Severity::High
        }
        fn evaluate(&self, ctx: &RuleContext) -> Vec<Finding> {
            if !ctx.function.mutates_state || ctx.function.has_access_control {
                return Vec::new();
            }
            vec![Finding {
                category: self.category(),
                severity: self.severity(),
                title: "open write".to_string(),
                message: String::new(),
                contract_name: ctx.contract.name.clone(),
                function_name: ctx.function.name.clone(),
                location: ctx.function_location(),
                detail: None,
                recommendation: None,
            }]
        }
    }

    fn engine(config: Config) -> Engine {
        let mut registry = RuleRegistry::new();
        registry.register(Box::new(OpenWrite));
        Engine::new(registry, config)
    }

    const COUNTER: &str = "contract Counter {\n    uint256 count;\n    function bump() external {\n        count += 1;\n    }\n    // solflow-ignore: unrestricted-entry-point\n    function reset() external {\n        count = 0;\n    }\n}\n";

    fn parse(source: &str) -> SourceUnit {
        TreeSitterProvider
            .source_unit(Path::new("Counter.sol"), source)
            .unwrap()
    }

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("solflow-engine-{name}"));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_analyze_source_with_inline_suppression() {
        let unit = parse(COUNTER);
        let contracts = engine(Config::default()).analyze_source(Path::new("Counter.sol"), COUNTER, &unit);
        assert_eq!(contracts.len(), 1);
        let findings = &contracts[0].findings;
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].function_name, "bump");
        assert_eq!(findings[0].location.line, 3);
        assert_eq!(findings[0].location.snippet, "function bump() external {");
    }

    #[test]
    fn test_severity_threshold_and_override() {
        let unit = parse(COUNTER);
        let config: Config =
            toml::from_str("[rules.unrestricted-entry-point]\nseverity = \"low\"\n").unwrap();
        let contracts = engine(config)
            .with_min_severity(Severity::Medium)
            .analyze_source(Path::new("Counter.sol"), COUNTER, &unit);
        assert!(contracts[0].findings.is_empty());
    }

    #[test]
    fn test_repeated_runs_are_identical() {
        let unit = parse(COUNTER);
        let engine = engine(Config::default());
        let first = engine.analyze_source(Path::new("Counter.sol"), COUNTER, &unit);
        let second = engine.analyze_source(Path::new("Counter.sol"), COUNTER, &unit);
        assert_eq!(first[0].findings, second[0].findings);
    }

    #[test]
    fn test_failed_file_does_not_abort_batch() {
        let dir = temp_dir("batch");
        let good = dir.join("Counter.sol");
        fs::write(&good, COUNTER).unwrap();
        let broken = dir.join("Broken.sol");
        fs::write(&broken, "contract Broken {").unwrap();
        let missing = dir.join("Missing.sol");

        let report = engine(Config::default()).analyze_files(
            &[broken.clone(), good.clone(), missing.clone()],
            &TreeSitterProvider,
        );

        assert_eq!(report.files.len(), 1);
        assert_eq!(report.files[0].path, good);
        assert_eq!(report.total_findings, 1);
        let errors: Vec<(&PathBuf, ErrorKind)> =
            report.errors.iter().map(|e| (&e.path, e.kind)).collect();
        assert_eq!(
            errors,
            vec![
                (&broken, ErrorKind::ParseFailure),
                (&missing, ErrorKind::SourceUnavailable),
            ]
        );
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_excluded_files_are_skipped() {
        let config: Config = toml::from_str("[suppressions]\nfiles = [\"**/Missing.sol\"]\n").unwrap();
        let report = engine(config).analyze_files(&[PathBuf::from("test/Missing.sol")], &TreeSitterProvider);
        assert!(report.files.is_empty());
        assert!(report.errors.is_empty());
    }

    #[test]
    fn test_discover_sources_sorted_and_filtered() {
        let dir = temp_dir("discover");
        fs::create_dir_all(dir.join("b")).unwrap();
        fs::write(dir.join("b/Zeta.sol"), "").unwrap();
        fs::write(dir.join("b/Alpha.sol"), "").unwrap();
        fs::write(dir.join("a.sol"), "").unwrap();
        fs::write(dir.join("notes.md"), "").unwrap();

        let found = discover_sources(&[dir.clone(), dir.join("a.sol")]);
        assert_eq!(
            found,
            vec![dir.join("a.sol"), dir.join("b/Alpha.sol"), dir.join("b/Zeta.sol")]
        );
        let _ = fs::remove_dir_all(&dir);
    }
}
